//! Tunables for the controller and camera, loadable from RON.
//!
//! Every field has the documented range next to it. Out-of-range values are clamped once
//! by [`SimConfig::sanitized`] when loading, never reported at runtime.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gravity::GravityField;
use crate::layers::{Layer, LayerMask};
use crate::math::wrap_degrees;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Character movement tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Top input speed, m/s. `0..=100`
    pub max_speed: f32,
    /// Steering acceleration on ground, m/s^2. `0..=100`
    pub max_acceleration: f32,
    /// Steering acceleration while airborne or on steep surfaces, m/s^2. `0..=100`
    pub max_air_acceleration: f32,
    /// Apex height of a jump from rest, m. `0..=10`
    pub jump_height: f32,
    /// Extra jumps allowed before touching ground again. `0..=5`
    pub max_air_jumps: u32,
    /// Steepest walkable slope, degrees. `0..=90`
    pub max_ground_angle: f32,
    /// Steepest walkable slope on stairs layers, degrees. `0..=90`
    pub max_stairs_angle: f32,
    /// Above this speed the character is allowed to launch off slopes, m/s. `0..=100`
    pub max_snap_speed: f32,
    /// Length of the downward ground snapping probe, m. `>= 0`
    pub probe_distance: f32,
    pub probe_mask: LayerMask,
    pub stairs_mask: LayerMask,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            max_acceleration: 10.0,
            max_air_acceleration: 1.0,
            jump_height: 2.0,
            max_air_jumps: 0,
            max_ground_angle: 25.0,
            max_stairs_angle: 50.0,
            max_snap_speed: 100.0,
            probe_distance: 1.0,
            probe_mask: LayerMask::ALL.without(Layer::AGENT),
            stairs_mask: LayerMask::from_layers(&[Layer::STAIRS]),
        }
    }
}

impl ControllerConfig {
    pub fn sanitized(mut self) -> Self {
        self.max_speed = self.max_speed.clamp(0.0, 100.0);
        self.max_acceleration = self.max_acceleration.clamp(0.0, 100.0);
        self.max_air_acceleration = self.max_air_acceleration.clamp(0.0, 100.0);
        self.jump_height = self.jump_height.clamp(0.0, 10.0);
        self.max_air_jumps = self.max_air_jumps.min(5);
        self.max_ground_angle = self.max_ground_angle.clamp(0.0, 90.0);
        self.max_stairs_angle = self.max_stairs_angle.clamp(0.0, 90.0);
        self.max_snap_speed = self.max_snap_speed.clamp(0.0, 100.0);
        self.probe_distance = self.probe_distance.max(0.0);
        self
    }
}

/// Orbit camera tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the focus point, m. `1..=10`
    pub distance: f32,
    /// Focus may lag this far behind the target before being dragged along, m. `>= 0`
    pub focus_radius: f32,
    /// Fraction of the remaining focus offset removed per second. `0..=1`
    pub focus_centering: f32,
    /// Initial (pitch, yaw), degrees.
    pub orbit_angles: Vec2,
    /// Manual and automatic orbit speed, degrees/s. `1..=360`
    pub rotation_speed: f32,
    /// Pitch limits, degrees. `-89..=89`, max never below min.
    pub min_vertical_angle: f32,
    pub max_vertical_angle: f32,
    /// Idle seconds after manual input before automatic alignment kicks in. `>= 0`
    pub align_delay: f32,
    /// Heading differences below this many degrees rotate proportionally slower. `0..=90`
    pub align_smooth_range: f32,
    pub obstruction_mask: LayerMask,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            focus_radius: 1.0,
            focus_centering: 0.5,
            orbit_angles: Vec2::new(45.0, 0.0),
            rotation_speed: 90.0,
            min_vertical_angle: -30.0,
            max_vertical_angle: 60.0,
            align_delay: 5.0,
            align_smooth_range: 45.0,
            obstruction_mask: LayerMask::ALL.without(Layer::AGENT),
        }
    }
}

impl CameraConfig {
    pub fn sanitized(mut self) -> Self {
        self.distance = self.distance.clamp(1.0, 10.0);
        self.focus_radius = self.focus_radius.max(0.0);
        self.focus_centering = self.focus_centering.clamp(0.0, 1.0);
        self.rotation_speed = self.rotation_speed.clamp(1.0, 360.0);
        self.min_vertical_angle = self.min_vertical_angle.clamp(-89.0, 89.0);
        self.max_vertical_angle = self
            .max_vertical_angle
            .clamp(-89.0, 89.0)
            .max(self.min_vertical_angle);
        self.align_delay = self.align_delay.max(0.0);
        self.align_smooth_range = self.align_smooth_range.clamp(0.0, 90.0);
        self.orbit_angles = self.constrain_angles(self.orbit_angles);
        self
    }

    /// Clamp pitch into the vertical limits and wrap yaw into `[0, 360)`.
    pub fn constrain_angles(&self, angles: Vec2) -> Vec2 {
        Vec2::new(
            angles.x.clamp(self.min_vertical_angle, self.max_vertical_angle),
            wrap_degrees(angles.y),
        )
    }
}

/// Everything the sandbox reads at startup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub gravity: GravityField,
    pub controller: ControllerConfig,
    pub camera: CameraConfig,
}

impl SimConfig {
    pub fn sanitized(self) -> Self {
        Self {
            gravity: self.gravity.sanitized(),
            controller: self.controller.sanitized(),
            camera: self.camera.sanitized(),
        }
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = ron::from_str(text)?;
        Ok(config.sanitized())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravity::GravityMode;

    #[test]
    fn test_inverted_vertical_limits_are_clamped() {
        let camera = CameraConfig {
            min_vertical_angle: 20.0,
            max_vertical_angle: -40.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(camera.min_vertical_angle, 20.0);
        assert_eq!(camera.max_vertical_angle, 20.0);
        assert_eq!(camera.orbit_angles.x, 20.0);
    }

    #[test]
    fn test_constrain_angles_wraps_yaw() {
        let camera = CameraConfig::default();
        let a = camera.constrain_angles(Vec2::new(10.0, 370.0));
        assert!((a.y - 10.0).abs() < 1e-4);
        let b = camera.constrain_angles(Vec2::new(10.0, -10.0));
        assert!((b.y - 350.0).abs() < 1e-4);
        let c = camera.constrain_angles(Vec2::new(85.0, 0.0));
        assert_eq!(c.x, 60.0);
    }

    #[test]
    fn test_controller_ranges() {
        let controller = ControllerConfig {
            max_speed: 500.0,
            jump_height: -1.0,
            max_air_jumps: 12,
            max_ground_angle: 120.0,
            probe_distance: -3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(controller.max_speed, 100.0);
        assert_eq!(controller.jump_height, 0.0);
        assert_eq!(controller.max_air_jumps, 5);
        assert_eq!(controller.max_ground_angle, 90.0);
        assert_eq!(controller.probe_distance, 0.0);
    }

    #[test]
    fn test_parse_partial_ron() {
        let text = r#"(
            gravity: (
                mode: Radial(origin: (0.0, 0.0, 0.0)),
                magnitude: -9.81,
            ),
            controller: (
                max_air_jumps: 2,
                stairs_mask: 2,
            ),
            camera: (
                distance: 50.0,
            ),
        )"#;
        let config = SimConfig::from_ron_str(text).expect("valid config");
        assert_eq!(config.gravity.mode, GravityMode::Radial { origin: Vec3::ZERO });
        assert_eq!(config.controller.max_air_jumps, 2);
        assert!(config.controller.stairs_mask.contains(Layer::STAIRS));
        // Unspecified fields keep defaults, out-of-range ones are clamped.
        assert_eq!(config.controller.max_speed, 10.0);
        assert_eq!(config.camera.distance, 10.0);
    }

    #[test]
    fn test_uniform_axis_is_normalized_on_load() {
        let config =
            SimConfig::from_ron_str("(gravity: (mode: Uniform(axis: (0.0, 2.0, 0.0)), magnitude: -9.81))")
                .expect("valid config");
        let (gravity, up) = config.gravity.gravity_and_up(Vec3::ZERO);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!((gravity.y + 9.81).abs() < 1e-4);

        let zero = SimConfig::from_ron_str("(gravity: (mode: Uniform(axis: (0.0, 0.0, 0.0)), magnitude: -9.81))")
            .expect("valid config");
        assert_eq!(zero.gravity.up(Vec3::ZERO), Vec3::Y);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = SimConfig::from_ron_str("(controller: (max_speed: \"fast\"))").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::from_file("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
