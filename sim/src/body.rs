//! Dynamic bodies driven by the gravity field instead of engine gravity.

use bevy::prelude::*;

/// Squared speed below which a floating body counts as resting.
const REST_SPEED_SQR: f32 = 0.0001;

/// Seconds at rest before gravity stops being applied.
const FLOAT_DELAY: f32 = 1.0;

/// A dynamic body pulled by the [`GravityField`](crate::GravityField) instead of the
/// engine's global gravity.
#[derive(Component, Clone, Debug, Default)]
pub struct GravityBody {
    /// Stop feeding gravity to a body that has been resting for a while so the physics
    /// engine can put it to sleep.
    pub float_to_sleep: bool,
    float_delay: f32,
}

impl GravityBody {
    pub fn floating() -> Self {
        Self {
            float_to_sleep: true,
            float_delay: 0.0,
        }
    }

    /// New velocity after one step, or `None` when gravity should be left out this step.
    pub fn step(&mut self, velocity: Vec3, asleep: bool, gravity: Vec3, dt: f32) -> Option<Vec3> {
        if self.float_to_sleep {
            if asleep {
                self.float_delay = 0.0;
                return None;
            }

            if velocity.length_squared() < REST_SPEED_SQR {
                self.float_delay += dt;
                if self.float_delay >= FLOAT_DELAY {
                    return None;
                }
            } else {
                self.float_delay = 0.0;
            }
        }

        Some(velocity + gravity * dt)
    }

    pub fn resting_for(&self) -> f32 {
        self.float_delay
    }
}
