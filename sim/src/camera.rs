//! Orbit camera that follows a target around arbitrary gravity.
//!
//! The camera keeps its orbit angles in a gravity-aligned frame. That frame is rotated
//! incrementally every frame by the shortest arc from its previous up to the current up,
//! so walking around a planet turns the camera smoothly instead of snapping.

use bevy::prelude::*;

use crate::config::CameraConfig;
use crate::gravity::GravityField;
use crate::math::{delta_angle, heading_angle, move_towards_angle, orbit_rotation};
use crate::physics::PhysicsQueries;

/// Look input beyond this on either axis counts as manual rotation.
const LOOK_DEADZONE: f32 = 0.001;

/// Focus offsets below this are treated as centered.
const MIN_CENTERING_DISTANCE: f32 = 0.01;

/// Squared focus movement below this does not trigger automatic alignment.
const MIN_ALIGN_MOVEMENT_SQR: f32 = 0.0001;

/// Perspective parameters used to size the obstruction probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    pub near: f32,
    /// Vertical field of view, radians.
    pub vertical_fov: f32,
    /// Width over height.
    pub aspect: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            near: 0.1,
            vertical_fov: 45f32.to_radians(),
            aspect: 16.0 / 9.0,
        }
    }
}

impl Lens {
    /// Half extents of the near-plane rectangle (zero depth).
    pub fn near_half_extents(&self) -> Vec3 {
        let half_height = self.near * (0.5 * self.vertical_fov).tan();
        Vec3::new(half_height * self.aspect, half_height, 0.0)
    }
}

/// Input to one camera frame.
#[derive(Clone, Copy, Debug)]
pub struct CameraFrame {
    /// Unscaled frame time, seconds.
    pub dt: f32,
    /// Unscaled time since startup, seconds.
    pub now: f32,
    /// Current position of the followed object.
    pub target: Vec3,
    /// Look rates as (pitch, yaw), typically in `-1..=1`.
    pub look_input: Vec2,
    pub lens: Lens,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraOrbitState {
    pub focus_point: Vec3,
    pub previous_focus_point: Vec3,
    /// (pitch, yaw) in degrees.
    pub orbit_angles: Vec2,
    pub gravity_alignment: Quat,
    pub last_manual_rotation_time: f32,
}

#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    config: CameraConfig,
    state: CameraOrbitState,
    orbit_rotation: Quat,
}

impl OrbitCamera {
    pub fn new(config: CameraConfig, target: Vec3) -> Self {
        let config = config.sanitized();
        let orbit_angles = config.orbit_angles;
        Self {
            config,
            state: CameraOrbitState {
                focus_point: target,
                previous_focus_point: target,
                orbit_angles,
                gravity_alignment: Quat::IDENTITY,
                last_manual_rotation_time: 0.0,
            },
            orbit_rotation: orbit_rotation(orbit_angles),
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> &CameraOrbitState {
        &self.state
    }

    /// Move the focus onto a new target without easing, e.g. after a respawn.
    pub fn set_focus_target(&mut self, target: Vec3) {
        self.state.focus_point = target;
        self.state.previous_focus_point = target;
    }

    /// Jump straight to new orbit angles; they are constrained like any other rotation.
    pub fn set_orbit_angles(&mut self, angles: Vec2) {
        self.state.orbit_angles = self.config.constrain_angles(angles);
        self.orbit_rotation = orbit_rotation(self.state.orbit_angles);
    }

    pub fn update<Q: PhysicsQueries>(
        &mut self,
        frame: &CameraFrame,
        gravity: &GravityField,
        queries: &Q,
    ) -> CameraPose {
        self.update_gravity_alignment(gravity.up(self.state.focus_point));
        self.update_focus_point(frame.target, frame.dt);

        if self.manual_rotation(frame) || self.automatic_rotation(frame) {
            self.state.orbit_angles = self.config.constrain_angles(self.state.orbit_angles);
            self.orbit_rotation = orbit_rotation(self.state.orbit_angles);
        }

        let look_rotation = self.state.gravity_alignment * self.orbit_rotation;
        let look_direction = look_rotation * Vec3::NEG_Z;
        let look_position = self.state.focus_point - look_direction * self.config.distance;

        CameraPose {
            position: self.resolve_obstruction(frame, look_rotation, look_position, queries),
            rotation: look_rotation,
        }
    }

    fn update_gravity_alignment(&mut self, up: Vec3) {
        let alignment = self.state.gravity_alignment;
        let current_up = alignment * Vec3::Y;
        self.state.gravity_alignment = (Quat::from_rotation_arc(current_up, up) * alignment).normalize();
    }

    /// Follow the target with a dead zone of `focus_radius` and exponential recentering.
    fn update_focus_point(&mut self, target: Vec3, dt: f32) {
        self.state.previous_focus_point = self.state.focus_point;

        let radius = self.config.focus_radius;
        if radius <= 0.0 {
            self.state.focus_point = target;
            return;
        }

        let distance = target.distance(self.state.focus_point);
        let mut t = 1.0;
        if distance > MIN_CENTERING_DISTANCE && self.config.focus_centering > 0.0 {
            t = (1.0 - self.config.focus_centering).powf(dt);
        }
        if distance > radius {
            t = t.min(radius / distance);
        }
        self.state.focus_point = target.lerp(self.state.focus_point, t);
    }

    fn manual_rotation(&mut self, frame: &CameraFrame) -> bool {
        let input = frame.look_input;
        if input.x.abs() > LOOK_DEADZONE || input.y.abs() > LOOK_DEADZONE {
            self.state.orbit_angles += self.config.rotation_speed * frame.dt * input;
            self.state.last_manual_rotation_time = frame.now;
            return true;
        }
        false
    }

    /// Swing yaw behind the direction the focus is moving in, once the player stops
    /// steering the camera.
    fn automatic_rotation(&mut self, frame: &CameraFrame) -> bool {
        if frame.now - self.state.last_manual_rotation_time < self.config.align_delay {
            return false;
        }

        let aligned_delta = self.state.gravity_alignment.inverse()
            * (self.state.focus_point - self.state.previous_focus_point);
        // (right, forward) in the aligned frame.
        let movement = Vec2::new(aligned_delta.x, -aligned_delta.z);
        let movement_sqr = movement.length_squared();
        if movement_sqr < MIN_ALIGN_MOVEMENT_SQR {
            return false;
        }

        let heading = heading_angle(movement / movement_sqr.sqrt());
        let delta_abs = delta_angle(self.state.orbit_angles.y, heading).abs();
        let smooth_range = self.config.align_smooth_range;

        // Tiny movements rotate proportionally slower.
        let mut rotation_change = self.config.rotation_speed * frame.dt.min(movement_sqr);
        if delta_abs < smooth_range {
            rotation_change *= delta_abs / smooth_range;
        } else if 180.0 - delta_abs < smooth_range {
            // Moving toward the camera: don't whip around.
            rotation_change *= (180.0 - delta_abs) / smooth_range;
        }

        self.state.orbit_angles.y = move_towards_angle(self.state.orbit_angles.y, heading, rotation_change);
        true
    }

    /// Pull the camera in front of anything between it and the target.
    ///
    /// Sweeps the near-plane rectangle from the target toward where it would sit, so
    /// geometry never crosses the near plane.
    fn resolve_obstruction<Q: PhysicsQueries>(
        &self,
        frame: &CameraFrame,
        look_rotation: Quat,
        look_position: Vec3,
        queries: &Q,
    ) -> Vec3 {
        let look_direction = look_rotation * Vec3::NEG_Z;
        let rect_offset = look_direction * frame.lens.near;
        let rect_position = look_position + rect_offset;
        let cast_from = frame.target;
        let cast_line = rect_position - cast_from;
        let cast_distance = cast_line.length();
        if cast_distance <= f32::EPSILON {
            return look_position;
        }
        let cast_direction = cast_line / cast_distance;

        match queries.boxcast(
            cast_from,
            frame.lens.near_half_extents(),
            cast_direction,
            look_rotation,
            cast_distance,
            self.config.obstruction_mask,
        ) {
            Some(hit) => cast_from + cast_direction * hit.distance - rect_offset,
            None => look_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravity::STANDARD_GRAVITY;
    use crate::layers::LayerMask;
    use crate::physics::{BoxHit, NoObstacles, RayHit};

    const EPS: f32 = 1e-3;

    /// A wall at a fixed distance along every box cast.
    struct WallAt(f32);

    impl PhysicsQueries for WallAt {
        fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit> {
            None
        }

        fn boxcast(&self, _: Vec3, _: Vec3, _: Vec3, _: Quat, max_distance: f32, _: LayerMask) -> Option<BoxHit> {
            (self.0 < max_distance).then_some(BoxHit { distance: self.0 })
        }
    }

    fn frame(now: f32, target: Vec3) -> CameraFrame {
        CameraFrame {
            dt: 0.02,
            now,
            target,
            look_input: Vec2::ZERO,
            lens: Lens::default(),
        }
    }

    fn level_camera() -> OrbitCamera {
        OrbitCamera::new(
            CameraConfig {
                orbit_angles: Vec2::ZERO,
                focus_radius: 0.0,
                ..Default::default()
            },
            Vec3::ZERO,
        )
    }

    #[test]
    fn test_camera_sits_behind_focus() {
        let mut camera = level_camera();
        let pose = camera.update(&frame(0.0, Vec3::ZERO), &GravityField::default(), &NoObstacles);
        // Looking along -Z from 5 m behind.
        assert!((pose.position - Vec3::new(0.0, 0.0, 5.0)).length() < EPS);
        assert!((pose.rotation * Vec3::NEG_Z - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn test_obstruction_pulls_camera_in() {
        let mut camera = level_camera();
        let pose = camera.update(&frame(0.0, Vec3::ZERO), &GravityField::default(), &WallAt(2.0));
        // Near plane stops at the wall; the camera sits one near-distance behind it.
        let near = Lens::default().near;
        assert!((pose.position - Vec3::new(0.0, 0.0, 2.0 + near)).length() < EPS);
    }

    #[test]
    fn test_near_half_extents() {
        let lens = Lens {
            near: 1.0,
            vertical_fov: 90f32.to_radians(),
            aspect: 2.0,
        };
        let half = lens.near_half_extents();
        assert!((half - Vec3::new(2.0, 1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_manual_rotation_and_clamping() {
        let mut camera = level_camera();
        let mut f = frame(1.0, Vec3::ZERO);
        f.look_input = Vec2::new(1.0, -1.0);
        f.dt = 1.0;
        camera.update(&f, &GravityField::default(), &NoObstacles);
        let angles = camera.state().orbit_angles;
        // Pitch limited to 60, yaw -90 wrapped to 270.
        assert!((angles.x - 60.0).abs() < EPS);
        assert!((angles.y - 270.0).abs() < EPS);
        assert_eq!(camera.state().last_manual_rotation_time, 1.0);
    }

    #[test]
    fn test_look_input_deadzone() {
        let mut camera = level_camera();
        let mut f = frame(1.0, Vec3::ZERO);
        f.look_input = Vec2::new(0.0005, -0.0005);
        camera.update(&f, &GravityField::default(), &NoObstacles);
        assert_eq!(camera.state().orbit_angles, Vec2::ZERO);
    }

    #[test]
    fn test_set_orbit_angles_wraps_yaw() {
        let mut camera = level_camera();
        camera.set_orbit_angles(Vec2::new(0.0, 370.0));
        assert!((camera.state().orbit_angles.y - 10.0).abs() < EPS);
        camera.set_orbit_angles(Vec2::new(0.0, -10.0));
        assert!((camera.state().orbit_angles.y - 350.0).abs() < EPS);
    }

    #[test]
    fn test_focus_stays_within_radius() {
        let mut camera = OrbitCamera::new(
            CameraConfig {
                focus_radius: 1.0,
                focus_centering: 0.0,
                ..Default::default()
            },
            Vec3::ZERO,
        );
        let target = Vec3::new(10.0, 0.0, 0.0);
        camera.update(&frame(0.0, target), &GravityField::default(), &NoObstacles);
        let focus = camera.state().focus_point;
        assert!((focus.distance(target) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_focus_dead_zone_without_centering() {
        let mut camera = OrbitCamera::new(
            CameraConfig {
                focus_radius: 1.0,
                focus_centering: 0.0,
                ..Default::default()
            },
            Vec3::ZERO,
        );
        camera.update(&frame(0.0, Vec3::new(0.5, 0.0, 0.0)), &GravityField::default(), &NoObstacles);
        assert_eq!(camera.state().focus_point, Vec3::ZERO);
    }

    #[test]
    fn test_focus_recenters_over_time() {
        let mut camera = OrbitCamera::new(
            CameraConfig {
                focus_radius: 1.0,
                focus_centering: 0.5,
                ..Default::default()
            },
            Vec3::ZERO,
        );
        let target = Vec3::new(0.5, 0.0, 0.0);
        let mut f = frame(0.0, target);
        f.dt = 1.0;
        camera.update(&f, &GravityField::default(), &NoObstacles);
        // Half of the offset is removed per second.
        assert!((camera.state().focus_point.x - 0.25).abs() < EPS);
    }

    #[test]
    fn test_automatic_rotation_waits_for_delay() {
        let mut camera = level_camera();
        // Target moves to the right but we are still within the align delay.
        camera.update(&frame(1.0, Vec3::ZERO), &GravityField::default(), &NoObstacles);
        camera.update(&frame(1.02, Vec3::new(1.0, 0.0, 0.0)), &GravityField::default(), &NoObstacles);
        assert_eq!(camera.state().orbit_angles.y, 0.0);
    }

    #[test]
    fn test_automatic_rotation_turns_toward_heading() {
        let mut camera = level_camera();
        camera.update(&frame(10.0, Vec3::ZERO), &GravityField::default(), &NoObstacles);
        // Target moved right (+X): heading 90°, yaw should start turning clockwise.
        camera.update(&frame(10.02, Vec3::new(1.0, 0.0, 0.0)), &GravityField::default(), &NoObstacles);
        let yaw = camera.state().orbit_angles.y;
        assert!(yaw > 0.0 && yaw < 90.0, "yaw {yaw}");
    }

    #[test]
    fn test_automatic_rotation_ignores_moving_toward_camera() {
        let mut camera = level_camera();
        camera.update(&frame(10.0, Vec3::ZERO), &GravityField::default(), &NoObstacles);
        // Straight toward the camera (+Z): heading 180°, fully damped.
        camera.update(&frame(10.02, Vec3::new(0.0, 0.0, 1.0)), &GravityField::default(), &NoObstacles);
        assert!(camera.state().orbit_angles.y.abs() < EPS);
    }

    #[test]
    fn test_tiny_movement_does_not_realign() {
        let mut camera = level_camera();
        camera.update(&frame(10.0, Vec3::ZERO), &GravityField::default(), &NoObstacles);
        camera.update(&frame(10.02, Vec3::new(0.005, 0.0, 0.0)), &GravityField::default(), &NoObstacles);
        assert_eq!(camera.state().orbit_angles.y, 0.0);
    }

    #[test]
    fn test_gravity_alignment_follows_radial_up() {
        let planet = GravityField::radial(Vec3::ZERO, STANDARD_GRAVITY);
        let target = Vec3::new(10.0, 0.0, 0.0);
        let mut camera = OrbitCamera::new(
            CameraConfig {
                focus_radius: 0.0,
                ..Default::default()
            },
            target,
        );
        camera.update(&frame(0.0, target), &planet, &NoObstacles);
        let up = camera.state().gravity_alignment * Vec3::Y;
        assert!((up - Vec3::X).length() < EPS);

        // Walk a quarter around the planet; alignment keeps tracking.
        let mut pose = None;
        for i in 1..=90 {
            let angle = (i as f32).to_radians();
            let p = Vec3::new(angle.cos(), angle.sin(), 0.0) * 10.0;
            pose = Some(camera.update(&frame(i as f32 * 0.02, p), &planet, &NoObstacles));
        }
        let up = camera.state().gravity_alignment * Vec3::Y;
        assert!(up.dot(Vec3::Y) > 0.99);
        // The camera stays on the sky side of the target.
        let pose = pose.expect("updated");
        assert!(pose.position.y > 10.0);
    }

    #[test]
    fn test_set_focus_target_skips_easing() {
        let mut camera = OrbitCamera::new(CameraConfig::default(), Vec3::ZERO);
        let target = Vec3::new(0.0, 0.0, 100.0);
        camera.set_focus_target(target);
        camera.update(&frame(0.0, target), &GravityField::default(), &NoObstacles);
        assert_eq!(camera.state().focus_point, target);
        assert_eq!(camera.state().previous_focus_point, target);
    }
}
