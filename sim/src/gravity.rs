//! Custom gravity: a uniform or point-source field with a derived "up" axis.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Standard gravity in m/s^2, negative so it pulls along `-axis` / toward the source.
pub const STANDARD_GRAVITY: f32 = -9.81;

/// Where the reference direction of the field comes from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GravityMode {
    /// Same reference direction everywhere. `axis` must be unit length.
    Uniform { axis: Vec3 },
    /// Reference direction points from `origin` toward the sampled position.
    Radial { origin: Vec3 },
}

/// World gravity, read by every controller, camera and gravity body.
///
/// Gravity at a point is `reference * magnitude`. With the usual negative magnitude it
/// pulls against the reference direction, so "up" is the reference itself; a positive
/// magnitude flips both.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GravityField {
    pub mode: GravityMode,
    pub magnitude: f32,
}

impl Default for GravityField {
    fn default() -> Self {
        Self::uniform(Vec3::Y, STANDARD_GRAVITY)
    }
}

impl GravityField {
    pub fn uniform(axis: Vec3, magnitude: f32) -> Self {
        debug_assert!(axis.is_normalized(), "uniform gravity axis must be unit length");
        Self {
            mode: GravityMode::Uniform { axis },
            magnitude,
        }
    }

    pub fn radial(origin: Vec3, magnitude: f32) -> Self {
        Self {
            mode: GravityMode::Radial { origin },
            magnitude,
        }
    }

    /// Normalizes a uniform axis read from data. A zero axis falls back to `+Y`.
    pub fn sanitized(self) -> Self {
        match self.mode {
            GravityMode::Uniform { axis } => Self {
                mode: GravityMode::Uniform {
                    axis: axis.try_normalize().unwrap_or(Vec3::Y),
                },
                ..self
            },
            GravityMode::Radial { .. } => self,
        }
    }

    /// Unit reference direction at `position`.
    ///
    /// Radial fields are undefined at their origin; callers must not sample there.
    fn reference(&self, position: Vec3) -> Vec3 {
        match self.mode {
            GravityMode::Uniform { axis } => axis,
            GravityMode::Radial { origin } => {
                let offset = position - origin;
                debug_assert!(
                    offset.length_squared() > f32::EPSILON,
                    "sampled radial gravity at its source {origin}"
                );
                offset.normalize_or_zero()
            }
        }
    }

    #[inline]
    fn up_from_reference(&self, reference: Vec3) -> Vec3 {
        if self.magnitude < 0.0 {
            reference
        } else {
            -reference
        }
    }

    pub fn gravity(&self, position: Vec3) -> Vec3 {
        self.reference(position) * self.magnitude
    }

    pub fn up(&self, position: Vec3) -> Vec3 {
        self.up_from_reference(self.reference(position))
    }

    /// Gravity and up axis with a single normalization.
    pub fn gravity_and_up(&self, position: Vec3) -> (Vec3, Vec3) {
        let reference = self.reference(position);
        (reference * self.magnitude, self.up_from_reference(reference))
    }
}
