//! Gravity sandbox client - binds the sim's controller and orbit camera to bevy + rapier
//!
//! Physics and the character controller run in `FixedUpdate`; input and the camera run
//! every frame.

mod camera;
mod config;
mod input;
mod physics;
mod props;
mod states;
mod systems;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use sim::{tick_duration, FIXED_TIMESTEP_HZ};
use states::GameState;

fn main() {
    let asset_path = config::asset_dir();

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Gravity Sandbox".to_string(),
                    resolution: WindowResolution::new(1280, 720),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_path.to_string_lossy().to_string(),
                ..default()
            }),
    );

    // Physics steps on the fixed clock so the controller sees one set of contacts per tick.
    app.insert_resource(Time::<Fixed>::from_duration(tick_duration()));
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());

    app.add_plugins(states::PausePlugin);
    app.add_plugins(props::PropsPlugin);

    app.init_resource::<input::InputState>();

    // Config must be in place before anything reads the gravity field.
    app.add_systems(PreStartup, config::load_sandbox_config);
    app.add_systems(
        Startup,
        (
            systems::setup_rendering,
            systems::spawn_world,
            systems::spawn_player,
        )
            .chain(),
    );

    // Rapier steps in FixedPostUpdate, so the controller sees the previous tick's contacts
    // and its velocity is integrated in the same tick.
    app.add_systems(
        FixedUpdate,
        (systems::step_players, systems::respawn_fallen_players).chain(),
    );

    app.add_systems(
        Update,
        (
            input::handle_keyboard_input,
            systems::grab_cursor,
            systems::latch_player_input,
        )
            .chain()
            .run_if(in_state(GameState::Playing)),
    );

    // Looking around works while paused.
    app.add_systems(
        Update,
        (input::handle_look_input, camera::update_orbit_camera).chain(),
    );

    info!("Starting gravity sandbox, physics at {} Hz", FIXED_TIMESTEP_HZ);
    app.run();
}
