//! Loose physics props pulled by the sandbox gravity field.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use sim::{GravityBody, GravityField, Layer};

use crate::physics::{collision_groups, SurfaceLayer};
use crate::systems::spawn_point;

const CRATE_SIZE: f32 = 0.8;

/// Marker for sandbox prop entities
#[derive(Component)]
pub struct SandboxProp;

/// Plugin for gravity-driven props
pub struct PropsPlugin;

impl Plugin for PropsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_props);
        app.add_systems(FixedUpdate, apply_custom_gravity);
    }
}

/// Drop a small stack of crates near the spawn point. Every other crate floats to sleep.
fn spawn_props(
    mut commands: Commands,
    gravity: Res<GravityField>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let spawn = spawn_point(&gravity);
    let up = gravity.up(spawn);
    let frame = Quat::from_rotation_arc(Vec3::Y, up);

    let mesh = meshes.add(Cuboid::new(CRATE_SIZE, CRATE_SIZE, CRATE_SIZE));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.7, 0.5, 0.3),
        perceptual_roughness: 0.8,
        ..default()
    });
    let half = CRATE_SIZE * 0.5;

    for i in 0..6 {
        let offset = Vec3::new(-3.0 + (i % 3) as f32 * 1.2, 2.0 + (i / 3) as f32 * 1.5, 4.0);
        let body = if i % 2 == 0 {
            GravityBody::floating()
        } else {
            GravityBody::default()
        };
        commands.spawn((
            SandboxProp,
            body,
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(spawn + frame * offset).with_rotation(frame),
            RigidBody::Dynamic,
            Collider::cuboid(half, half, half),
            Velocity::zero(),
            GravityScale(0.0),
            Sleeping::default(),
            collision_groups(Layer::PROP),
            SurfaceLayer(Layer::PROP),
        ));
    }

    info!("Spawned sandbox props");
}

/// Feed each prop the field's gravity for this tick.
pub fn apply_custom_gravity(
    gravity: Res<GravityField>,
    time: Res<Time>,
    mut bodies: Query<(&Transform, &mut Velocity, &mut GravityBody, &Sleeping)>,
) {
    let dt = time.delta_secs();
    for (transform, mut velocity, mut body, sleeping) in bodies.iter_mut() {
        let g = gravity.gravity(transform.translation);
        if let Some(linvel) = body.step(velocity.linvel, sleeping.sleeping, g, dt) {
            velocity.linvel = linvel;
        }
    }
}
