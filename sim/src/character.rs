//! Velocity-driven character controller under arbitrary gravity.
//!
//! The controller never moves the body itself. Each physics tick it takes the body's
//! velocity as the engine left it, decides ground/steep/air state from the tick's contacts,
//! steers within the contact plane, applies jumps and gravity, and hands back the
//! velocity to write to the body.
//!
//! Order within one tick (see [`CharacterController::step`]):
//! - resync velocity, classify contacts against the local up axis
//! - grounded = touching ground, or snapped to ground, or wedged between steep walls
//! - steer along the contact plane
//! - consume a latched jump request
//! - integrate gravity, clear contacts

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::contact::{ContactSample, ContactState, SlopeLimits};
use crate::gravity::GravityField;
use crate::math::{move_towards, project_direction_on_plane};
use crate::physics::PhysicsQueries;

/// Motion state derived from the tick's contact counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionState {
    Grounded,
    /// Only touching surfaces too steep to stand on.
    Steep,
    #[default]
    Airborne,
}

impl MotionState {
    pub fn from_contacts(contacts: &ContactState) -> Self {
        if contacts.on_ground() {
            MotionState::Grounded
        } else if contacts.on_steep() {
            MotionState::Steep
        } else {
            MotionState::Airborne
        }
    }
}

/// Jump bookkeeping. Counters saturate instead of wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JumpState {
    /// 0 while grounded, then one more per jump since leaving the ground.
    pub phase: u32,
    pub steps_since_ground: u32,
    pub steps_since_jump: u32,
}

/// Input to one physics tick.
pub struct PhysicsStep<'a> {
    pub dt: f32,
    pub position: Vec3,
    /// Body velocity after the engine's last solve.
    pub velocity: Vec3,
    pub contacts: &'a [ContactSample],
    pub gravity: &'a GravityField,
}

/// Outcome of one physics tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Velocity to write back to the body.
    pub velocity: Vec3,
    pub motion: MotionState,
    pub jumped: bool,
}

/// Jump launch speed reaching `jump_height` against `gravity_magnitude`.
#[inline]
pub fn jump_speed(gravity_magnitude: f32, jump_height: f32) -> f32 {
    (2.0 * gravity_magnitude * jump_height).sqrt()
}

#[derive(Component, Clone, Debug)]
pub struct CharacterController {
    config: ControllerConfig,
    limits: SlopeLimits,

    velocity: Vec3,
    /// Wanted speed along the (right, forward) input axes.
    desired_velocity: Vec2,
    desired_jump: bool,
    /// Rotation whose right/forward define the input axes, usually the camera's.
    input_space: Option<Quat>,

    contacts: ContactState,
    contact_normal: Vec3,
    jump: JumpState,

    up_axis: Vec3,
    right_axis: Vec3,
    forward_axis: Vec3,
}

impl CharacterController {
    pub fn new(config: ControllerConfig) -> Self {
        let config = config.sanitized();
        let limits = SlopeLimits::from_angles(
            config.max_ground_angle,
            config.max_stairs_angle,
            config.stairs_mask,
        );
        Self {
            config,
            limits,
            velocity: Vec3::ZERO,
            desired_velocity: Vec2::ZERO,
            desired_jump: false,
            input_space: None,
            contacts: ContactState::default(),
            contact_normal: Vec3::Y,
            jump: JumpState::default(),
            up_axis: Vec3::Y,
            right_axis: Vec3::X,
            forward_axis: Vec3::NEG_Z,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    /// Contact normal chosen by the last tick (the up axis while airborne).
    pub fn contact_normal(&self) -> Vec3 {
        self.contact_normal
    }

    pub fn up_axis(&self) -> Vec3 {
        self.up_axis
    }

    // -------------------------------------------------------------------------
    // Input (latched between physics ticks)
    // -------------------------------------------------------------------------

    /// Desired velocity along the right (`x`) and forward (`y`) input axes.
    pub fn set_desired_velocity(&mut self, desired: Vec2) {
        self.desired_velocity = desired;
    }

    /// Stick-style input; clamped to unit length and scaled by `max_speed`.
    pub fn set_move_input(&mut self, input: Vec2) {
        self.desired_velocity = input.clamp_length_max(1.0) * self.config.max_speed;
    }

    pub fn set_input_space(&mut self, input_space: Option<Quat>) {
        self.input_space = input_space;
    }

    /// Request a jump on the next tick. Stays pending until a tick consumes it.
    pub fn request_jump(&mut self) {
        self.desired_jump = true;
    }

    pub fn jump_pending(&self) -> bool {
        self.desired_jump
    }

    // -------------------------------------------------------------------------
    // Physics tick
    // -------------------------------------------------------------------------

    pub fn step<Q: PhysicsQueries>(&mut self, step: PhysicsStep<'_>, queries: &Q) -> StepReport {
        let (gravity, up) = step.gravity.gravity_and_up(step.position);
        self.up_axis = up;
        self.update_input_axes();

        self.velocity = step.velocity;
        self.contacts = ContactState::classify(step.contacts, up, &self.limits);

        self.update_state(step.position, queries);
        self.adjust_velocity(step.dt);

        let jumped = std::mem::take(&mut self.desired_jump) && self.jump(gravity);

        self.velocity += gravity * step.dt;

        let report = StepReport {
            velocity: self.velocity,
            motion: MotionState::from_contacts(&self.contacts),
            jumped,
        };
        self.contacts.clear();
        report
    }

    fn update_input_axes(&mut self) {
        let (right, forward) = match self.input_space {
            Some(rotation) => (rotation * Vec3::X, rotation * Vec3::NEG_Z),
            None => (Vec3::X, Vec3::NEG_Z),
        };
        self.right_axis = project_direction_on_plane(right, self.up_axis);
        self.forward_axis = project_direction_on_plane(forward, self.up_axis);
    }

    fn update_state<Q: PhysicsQueries>(&mut self, position: Vec3, queries: &Q) {
        self.jump.steps_since_ground = self.jump.steps_since_ground.saturating_add(1);
        self.jump.steps_since_jump = self.jump.steps_since_jump.saturating_add(1);

        if self.contacts.on_ground()
            || self.snap_to_ground(position, queries)
            || self
                .contacts
                .promote_steep_to_ground(self.up_axis, self.limits.min_ground_dot)
        {
            self.jump.steps_since_ground = 0;
            // A jump issued last tick may still be touching the ground; don't refund it.
            if self.jump.steps_since_jump > 1 {
                self.jump.phase = 0;
            }
            if self.contacts.ground_count > 1 {
                // Ground normals only cancel out at a 90° limit; count that as flat ground.
                self.contacts.ground_normal =
                    self.contacts.ground_normal.try_normalize().unwrap_or(self.up_axis);
            }
            self.contact_normal = self.contacts.ground_normal;
        } else {
            self.contact_normal = self.up_axis;
        }
    }

    /// Keep the character glued to the ground over small bumps and crests.
    fn snap_to_ground<Q: PhysicsQueries>(&mut self, position: Vec3, queries: &Q) -> bool {
        if self.jump.steps_since_ground > 1 || self.jump.steps_since_jump <= 2 {
            return false;
        }
        let speed = self.velocity.length();
        if speed > self.config.max_snap_speed {
            return false;
        }
        let Some(hit) = queries.raycast(
            position,
            -self.up_axis,
            self.config.probe_distance,
            self.config.probe_mask,
        ) else {
            return false;
        };
        if self.up_axis.dot(hit.normal) < self.limits.min_dot(hit.layer) {
            return false;
        }

        self.contacts.ground_count = 1;
        self.contacts.ground_normal = hit.normal;
        let dot = self.velocity.dot(hit.normal);
        if dot > 0.0 {
            // Moving straight off the surface leaves nothing to redirect, so stop on it.
            let along_surface = self.velocity - hit.normal * dot;
            self.velocity = along_surface.try_normalize().map_or(Vec3::ZERO, |d| d * speed);
        }
        true
    }

    fn adjust_velocity(&mut self, dt: f32) {
        let x_axis = project_direction_on_plane(self.right_axis, self.contact_normal);
        let z_axis = project_direction_on_plane(self.forward_axis, self.contact_normal);

        let current_x = self.velocity.dot(x_axis);
        let current_z = self.velocity.dot(z_axis);

        let acceleration = if self.contacts.on_ground() {
            self.config.max_acceleration
        } else {
            self.config.max_air_acceleration
        };
        let max_speed_change = acceleration * dt;

        let new_x = move_towards(current_x, self.desired_velocity.x, max_speed_change);
        let new_z = move_towards(current_z, self.desired_velocity.y, max_speed_change);

        self.velocity += x_axis * (new_x - current_x) + z_axis * (new_z - current_z);
    }

    fn jump(&mut self, gravity: Vec3) -> bool {
        let direction = match MotionState::from_contacts(&self.contacts) {
            MotionState::Grounded => self.contact_normal,
            MotionState::Steep => {
                // Wall jumps don't spend an air jump.
                self.jump.phase = 0;
                // Between walls facing each other the push-offs cancel; jump straight up.
                self.contacts.steep_normal.try_normalize().unwrap_or(self.up_axis)
            }
            MotionState::Airborne
                if self.config.max_air_jumps > 0 && self.jump.phase <= self.config.max_air_jumps =>
            {
                // Falling off a ledge counts as having used the ground jump.
                if self.jump.phase == 0 {
                    self.jump.phase = 1;
                }
                self.contact_normal
            }
            MotionState::Airborne => return false,
        };

        self.jump.steps_since_jump = 0;
        self.jump.phase += 1;

        let mut speed = jump_speed(gravity.length(), self.config.jump_height);
        let direction = direction + self.up_axis;
        debug_assert!(
            direction.length_squared() > f32::EPSILON,
            "jump direction opposes the up axis"
        );
        let direction = direction.normalize_or_zero();
        let aligned_speed = self.velocity.dot(direction);
        if aligned_speed > 0.0 {
            speed = (speed - aligned_speed).max(0.0);
        }
        self.velocity += direction * speed;
        true
    }
}
