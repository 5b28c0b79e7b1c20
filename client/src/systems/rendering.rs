//! Rendering systems
//!
//! Lights and clear color. The camera itself belongs to the orbit rig.

use bevy::light::{light_consts::lux, CascadeShadowConfigBuilder, DirectionalLightShadowMap};
use bevy::prelude::*;

/// Marker for the sun directional light
#[derive(Component)]
pub struct SunLight;

/// One-time rendering setup.
pub fn setup_rendering(mut commands: Commands) {
    commands.insert_resource(DirectionalLightShadowMap { size: 2048 });
    commands.insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.9)));
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 300.0,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        SunLight,
        DirectionalLight {
            illuminance: lux::AMBIENT_DAYLIGHT,
            shadows_enabled: true,
            color: Color::srgb(1.0, 0.97, 0.9),
            ..default()
        },
        // Small scene: fewer, shorter cascades are plenty.
        CascadeShadowConfigBuilder {
            num_cascades: 2,
            maximum_distance: 80.0,
            first_cascade_far_bound: 15.0,
            ..default()
        }
        .build(),
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    info!("Client rendering initialized");
}
