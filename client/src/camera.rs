//! Orbit camera system
//!
//! Runs the sim's [`OrbitCamera`] once per frame on real time, so the camera can still be
//! turned while the simulation is paused.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use sim::{CameraConfig, CameraFrame, GravityField, Layer, Lens, OrbitCamera};

use crate::input::InputState;
use crate::physics::{RapierQueries, SurfaceLayer};

/// FOV for the orbit view
const FOV_DEFAULT: f32 = 60.0_f32.to_radians();

/// Camera that follows a given entity.
#[derive(Component)]
pub struct OrbitRig {
    pub target: Entity,
}

pub fn spawn_orbit_camera(commands: &mut Commands, target: Entity, position: Vec3, config: CameraConfig) {
    commands.spawn((
        OrbitRig { target },
        OrbitCamera::new(config, position),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FOV_DEFAULT,
            ..default()
        }),
        Transform::from_translation(position + Vec3::new(0.0, 3.0, 5.0)).looking_at(position, Vec3::Y),
    ));
}

fn lens_of(projection: &Projection) -> Lens {
    match projection {
        Projection::Perspective(perspective) => Lens {
            near: perspective.near,
            vertical_fov: perspective.fov,
            aspect: perspective.aspect_ratio,
        },
        _ => Lens::default(),
    }
}

/// Update every orbit camera from its target's current position
pub fn update_orbit_camera(
    rapier_context: ReadRapierContext,
    gravity: Res<GravityField>,
    input_state: Res<InputState>,
    time: Res<Time<Real>>,
    layers: Query<&SurfaceLayer>,
    targets: Query<&Transform, Without<OrbitRig>>,
    mut cameras: Query<(&OrbitRig, &mut OrbitCamera, &mut Transform, &Projection)>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let queries = RapierQueries {
        context: &context,
        layer_of: |entity: Entity| layers.get(entity).map(|layer| layer.0).unwrap_or(Layer::DEFAULT),
    };

    for (rig, mut camera, mut transform, projection) in cameras.iter_mut() {
        let Ok(target) = targets.get(rig.target) else {
            continue;
        };

        let frame = CameraFrame {
            dt: time.delta_secs(),
            now: time.elapsed_secs(),
            target: target.translation,
            look_input: input_state.look,
            lens: lens_of(projection),
        };
        let pose = camera.update(&frame, &gravity, &queries);
        transform.translation = pose.position;
        transform.rotation = pose.rotation;
    }
}
