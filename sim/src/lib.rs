//! Gravity-aware character movement and orbit camera logic.
//!
//! Everything here is engine-agnostic data flow: the physics engine is reached only
//! through [`PhysicsQueries`], and the host loop drives two cadences explicitly:
//! - [`CharacterController::step`] once per fixed physics tick
//! - [`OrbitCamera::update`] once per rendered frame

pub mod body;
pub mod camera;
pub mod character;
pub mod config;
pub mod contact;
pub mod gravity;
pub mod layers;
pub mod math;
pub mod physics;

pub use body::GravityBody;
pub use camera::{CameraFrame, CameraOrbitState, CameraPose, Lens, OrbitCamera};
pub use character::{CharacterController, JumpState, MotionState, PhysicsStep, StepReport};
pub use config::{CameraConfig, ConfigError, ControllerConfig, SimConfig};
pub use contact::{ContactSample, ContactState, SlopeLimits, SurfaceKind};
pub use gravity::{GravityField, GravityMode};
pub use layers::{Layer, LayerMask};
pub use physics::{BoxHit, NoObstacles, PhysicsQueries, RayHit};

use std::time::Duration;

/// Physics tick rate. Controller tuning values (snap probe, accelerations) assume this.
pub const FIXED_TIMESTEP_HZ: f64 = 50.0;

pub fn tick_duration() -> Duration {
    Duration::from_secs_f64(1.0 / FIXED_TIMESTEP_HZ)
}
