//! The slice of the physics engine the controller and camera need.
//!
//! Implemented by the client on top of rapier; tests use small stubs.

use bevy::prelude::*;

use crate::layers::{Layer, LayerMask};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub normal: Vec3,
    pub distance: f32,
    pub layer: Layer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxHit {
    pub distance: f32,
}

/// Directional scene queries. `direction` is always unit length.
pub trait PhysicsQueries {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit>;

    fn boxcast(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        orientation: Quat,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<BoxHit>;
}

/// Empty scene: every query misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObstacles;

impl PhysicsQueries for NoObstacles {
    fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit> {
        None
    }

    fn boxcast(&self, _: Vec3, _: Vec3, _: Vec3, _: Quat, _: f32, _: LayerMask) -> Option<BoxHit> {
        None
    }
}
