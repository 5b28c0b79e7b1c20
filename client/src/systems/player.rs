//! Player character systems
//!
//! Spawning the ball character, feeding it input, and stepping its controller against
//! the rapier scene every fixed tick.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use sim::{CharacterController, GravityField, Layer, MotionState, OrbitCamera, PhysicsStep};

use crate::camera::{spawn_orbit_camera, OrbitRig};
use crate::config::SandboxConfig;
use crate::input::InputState;
use crate::physics::{collision_groups, gather_contacts, RapierQueries, SurfaceLayer};

use super::world::spawn_point;

pub const PLAYER_RADIUS: f32 = 0.5;

/// Falling further than this from the spawn point puts the player back on it.
const RESPAWN_DISTANCE: f32 = 250.0;

// =============================================================================
// COMPONENTS
// =============================================================================

#[derive(Component)]
pub struct Player;

/// Motion state from the last physics tick, kept to log transitions.
#[derive(Component, Default)]
pub struct PlayerMotion(pub MotionState);

// =============================================================================
// SPAWNING
// =============================================================================

pub fn spawn_player(
    mut commands: Commands,
    config: Res<SandboxConfig>,
    gravity: Res<GravityField>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let position = spawn_point(&gravity);

    let player = commands
        .spawn((
            Player,
            PlayerMotion::default(),
            CharacterController::new(config.controller.clone()),
            Mesh3d(meshes.add(Sphere::new(PLAYER_RADIUS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.9, 0.35, 0.2),
                ..default()
            })),
            Transform::from_translation(position),
            // Physics
            RigidBody::Dynamic,
            Collider::ball(PLAYER_RADIUS),
            Velocity::zero(),
            // Gravity comes from the controller, never from rapier.
            GravityScale(0.0),
            LockedAxes::ROTATION_LOCKED,
            // No friction: the controller owns tangential velocity.
            Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
            collision_groups(Layer::AGENT),
            SurfaceLayer(Layer::AGENT),
        ))
        .id();

    spawn_orbit_camera(&mut commands, player, position, config.camera.clone());

    info!("Spawned player at {:?}", position);
}

// =============================================================================
// INPUT
// =============================================================================

/// Hand this frame's input to the controller. Movement is relative to the camera.
pub fn latch_player_input(
    mut input_state: ResMut<InputState>,
    rigs: Query<(&OrbitRig, &Transform), Without<Player>>,
    mut players: Query<&mut CharacterController, With<Player>>,
) {
    for (rig, camera_transform) in rigs.iter() {
        let Ok(mut controller) = players.get_mut(rig.target) else {
            continue;
        };
        controller.set_move_input(input_state.movement);
        controller.set_input_space(Some(camera_transform.rotation));
        if input_state.jump {
            controller.request_jump();
        }
    }
    input_state.jump = false;
}

// =============================================================================
// PHYSICS TICK
// =============================================================================

/// Classify this tick's contacts and step every character controller.
pub fn step_players(
    rapier_context: ReadRapierContext,
    gravity: Res<GravityField>,
    time: Res<Time>,
    layers: Query<&SurfaceLayer>,
    mut players: Query<
        (Entity, &Transform, &mut Velocity, &mut CharacterController, &mut PlayerMotion),
        With<Player>,
    >,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let layer_of = |entity: Entity| layers.get(entity).map(|layer| layer.0).unwrap_or_default();
    let queries = RapierQueries {
        context: &context,
        layer_of,
    };
    let dt = time.delta_secs();

    for (entity, transform, mut velocity, mut controller, mut motion) in players.iter_mut() {
        let contacts = gather_contacts(&context, entity, layer_of);
        let report = controller.step(
            PhysicsStep {
                dt,
                position: transform.translation,
                velocity: velocity.linvel,
                contacts: &contacts,
                gravity: &gravity,
            },
            &queries,
        );
        velocity.linvel = report.velocity;

        if report.jumped {
            debug!("{entity}: jump (phase {})", controller.jump_state().phase);
        }
        if report.motion != motion.0 {
            debug!("{entity}: {:?} -> {:?}", motion.0, report.motion);
            motion.0 = report.motion;
        }
    }
}

/// Put players that fell off the world back on the spawn point.
pub fn respawn_fallen_players(
    gravity: Res<GravityField>,
    mut players: Query<(Entity, &mut Transform, &mut Velocity), With<Player>>,
    mut rigs: Query<(&OrbitRig, &mut OrbitCamera)>,
) {
    let spawn = spawn_point(&gravity);
    for (entity, mut transform, mut velocity) in players.iter_mut() {
        if transform.translation.distance(spawn) < RESPAWN_DISTANCE {
            continue;
        }
        info!("{entity} fell out of the world, respawning");
        transform.translation = spawn;
        *velocity = Velocity::zero();

        for (rig, mut camera) in rigs.iter_mut() {
            if rig.target == entity {
                camera.set_focus_target(spawn);
            }
        }
    }
}
