//! World systems
//!
//! Static sandbox geometry. Uniform gravity gets a test course laid out relative to the
//! gravity axis; radial gravity gets a small planet around the field's origin.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use sim::{GravityField, GravityMode, Layer};

use crate::physics::{collision_groups, SurfaceLayer};

/// Radius of the planet spawned for radial gravity
pub const PLANET_RADIUS: f32 = 20.0;

/// Height above the surface the player spawns at
const SPAWN_HEIGHT: f32 = 2.0;

const STAIR_STEPS: usize = 8;

// =============================================================================
// COMPONENTS
// =============================================================================

/// Root entity for all static sandbox geometry
#[derive(Component)]
pub struct ClientWorldRoot;

/// Where players (re)spawn for the given gravity field.
pub fn spawn_point(gravity: &GravityField) -> Vec3 {
    match gravity.mode {
        GravityMode::Uniform { .. } => gravity.up(Vec3::ZERO) * SPAWN_HEIGHT,
        GravityMode::Radial { origin } => origin + Vec3::Y * (PLANET_RADIUS + SPAWN_HEIGHT),
    }
}

/// Orientation of the course: local `+Y` along the field's up axis.
fn course_frame(gravity: &GravityField) -> Transform {
    match gravity.mode {
        GravityMode::Uniform { .. } => {
            Transform::from_rotation(Quat::from_rotation_arc(Vec3::Y, gravity.up(Vec3::ZERO)))
        }
        GravityMode::Radial { origin } => Transform::from_translation(origin),
    }
}

// =============================================================================
// SPAWNING
// =============================================================================

struct Palette {
    ground: Handle<StandardMaterial>,
    ramp: Handle<StandardMaterial>,
    steep: Handle<StandardMaterial>,
    stairs: Handle<StandardMaterial>,
}

/// Spawn the static world
pub fn spawn_world(
    mut commands: Commands,
    world_roots: Query<Entity, With<ClientWorldRoot>>,
    gravity: Res<GravityField>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !world_roots.is_empty() {
        return;
    }

    let mut material = |r, g, b| {
        materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.9,
            ..default()
        })
    };
    let palette = Palette {
        ground: material(0.45, 0.5, 0.42),
        ramp: material(0.55, 0.55, 0.6),
        steep: material(0.6, 0.35, 0.3),
        stairs: material(0.75, 0.65, 0.45),
    };

    let root = commands
        .spawn((
            ClientWorldRoot,
            course_frame(&gravity),
            Visibility::default(),
        ))
        .id();

    match gravity.mode {
        GravityMode::Uniform { .. } => spawn_course(&mut commands, root, &mut meshes, &palette),
        GravityMode::Radial { .. } => spawn_planet(&mut commands, root, &mut meshes, &palette),
    }

    info!("Spawned sandbox world for {:?} gravity", gravity.mode);
}

fn spawn_block(
    commands: &mut Commands,
    root: Entity,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    transform: Transform,
    size: Vec3,
    layer: Layer,
) {
    let half = size * 0.5;
    let block = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(material.clone()),
            transform,
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y, half.z),
            collision_groups(layer),
            SurfaceLayer(layer),
        ))
        .id();
    commands.entity(root).add_child(block);
}

/// A slab tilted about X, rising toward -Z, with its low edge at `base`.
fn ramp_transform(base: Vec3, length: f32, thickness: f32, angle_deg: f32) -> Transform {
    let rotation = Quat::from_rotation_x(angle_deg.to_radians());
    let along = rotation * Vec3::NEG_Z;
    let below = rotation * Vec3::NEG_Y;
    Transform::from_translation(base + along * (length * 0.5) + below * (thickness * 0.5)).with_rotation(rotation)
}

fn spawn_course(commands: &mut Commands, root: Entity, meshes: &mut Assets<Mesh>, palette: &Palette) {
    // Ground
    spawn_block(
        commands,
        root,
        meshes,
        &palette.ground,
        Transform::from_xyz(0.0, -0.5, 0.0),
        Vec3::new(80.0, 1.0, 80.0),
        Layer::DEFAULT,
    );

    // Walkable ramp (20°) and a too-steep one (35°)
    spawn_block(
        commands,
        root,
        meshes,
        &palette.ramp,
        ramp_transform(Vec3::new(-8.0, 0.0, -6.0), 12.0, 1.0, 20.0),
        Vec3::new(4.0, 1.0, 12.0),
        Layer::DEFAULT,
    );
    spawn_block(
        commands,
        root,
        meshes,
        &palette.steep,
        ramp_transform(Vec3::new(-14.0, 0.0, -6.0), 12.0, 1.0, 35.0),
        Vec3::new(4.0, 1.0, 12.0),
        Layer::DEFAULT,
    );

    // Stairs: a 40° ramp collider on the stairs layer with step visuals on top, so the
    // character glides instead of catching on each step edge.
    let stairs_base = Vec3::new(8.0, 0.0, -6.0);
    let stairs_length = 10.0;
    let stairs_angle = 40f32.to_radians();
    spawn_block(
        commands,
        root,
        meshes,
        &palette.stairs,
        ramp_transform(stairs_base, stairs_length, 0.2, 40.0),
        Vec3::new(3.0, 0.2, stairs_length),
        Layer::STAIRS,
    );
    let rise = stairs_length * stairs_angle.sin();
    let run = stairs_length * stairs_angle.cos();
    let step_rise = rise / STAIR_STEPS as f32;
    let step_run = run / STAIR_STEPS as f32;
    let step_mesh = meshes.add(Cuboid::new(3.0, step_rise, step_run));
    for i in 0..STAIR_STEPS {
        let step = commands
            .spawn((
                Mesh3d(step_mesh.clone()),
                MeshMaterial3d(palette.stairs.clone()),
                Transform::from_translation(
                    stairs_base + Vec3::new(0.0, step_rise * (i as f32 + 0.5), -step_run * (i as f32 + 0.5)),
                ),
            ))
            .id();
        commands.entity(root).add_child(step);
    }

    // V-groove: two steep walls leaning into each other. Each alone is too steep to
    // stand on; wedged between them the character is supported.
    for side in [-1.0f32, 1.0] {
        let rotation = Quat::from_rotation_z(side * 55f32.to_radians());
        spawn_block(
            commands,
            root,
            meshes,
            &palette.steep,
            Transform::from_xyz(side * 1.6, 1.2, 10.0).with_rotation(rotation),
            Vec3::new(4.0, 0.5, 8.0),
            Layer::DEFAULT,
        );
    }

    // Wall for wall jumps
    spawn_block(
        commands,
        root,
        meshes,
        &palette.steep,
        Transform::from_xyz(16.0, 4.0, 8.0),
        Vec3::new(1.0, 8.0, 12.0),
        Layer::DEFAULT,
    );
}

fn spawn_planet(commands: &mut Commands, root: Entity, meshes: &mut Assets<Mesh>, palette: &Palette) {
    let planet = commands
        .spawn((
            Mesh3d(meshes.add(Sphere::new(PLANET_RADIUS).mesh().uv(64, 32))),
            MeshMaterial3d(palette.ground.clone()),
            Transform::default(),
            RigidBody::Fixed,
            Collider::ball(PLANET_RADIUS),
            collision_groups(Layer::DEFAULT),
            SurfaceLayer(Layer::DEFAULT),
        ))
        .id();
    commands.entity(root).add_child(planet);

    // Boulders scattered over the surface, half sunk in
    let directions = [
        Vec3::new(0.3, 1.0, -0.4),
        Vec3::new(-0.6, 0.8, 0.2),
        Vec3::new(1.0, 0.2, 0.5),
        Vec3::new(-0.2, -0.3, 1.0),
        Vec3::new(0.4, -1.0, -0.3),
        Vec3::new(-1.0, 0.1, -0.6),
    ];
    for direction in directions {
        let normal = direction.normalize();
        spawn_block(
            commands,
            root,
            meshes,
            &palette.ramp,
            Transform::from_translation(normal * PLANET_RADIUS)
                .with_rotation(Quat::from_rotation_arc(Vec3::Y, normal)),
            Vec3::new(3.0, 2.0, 3.0),
            Layer::DEFAULT,
        );
    }
}
