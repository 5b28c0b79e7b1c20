//! Sandbox configuration loading
//!
//! The tuning file lives next to the other assets so bundled builds can ship it.

use std::path::PathBuf;

use bevy::prelude::*;
use sim::{CameraConfig, ControllerConfig, SimConfig};

pub const CONFIG_FILE: &str = "sandbox.ron";

/// Controller and camera tuning for everything spawned in the sandbox.
///
/// Gravity is split out into its own `GravityField` resource since every physics system
/// reads it.
#[derive(Resource, Clone, Debug, Default)]
pub struct SandboxConfig {
    pub controller: ControllerConfig,
    pub camera: CameraConfig,
}

/// Get the asset path - for bundled macOS apps, use path relative to executable
pub fn asset_dir() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled_assets = exe_dir.join("assets");
            if bundled_assets.exists() {
                info!("Using bundled assets at: {:?}", bundled_assets);
                return bundled_assets;
            }
        }
    }
    // Development: assets sit next to this crate's manifest
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Read `sandbox.ron` and install the gravity field and tuning resources.
///
/// A missing or broken file is not fatal: we log it and keep the defaults.
pub fn load_sandbox_config(mut commands: Commands) {
    let path = asset_dir().join(CONFIG_FILE);
    let config = match SimConfig::from_file(&path) {
        Ok(config) => {
            info!("Loaded sandbox config from {:?}", path);
            config
        }
        Err(err) => {
            warn!("{err}; using default sandbox config");
            SimConfig::default()
        }
    };

    info!(
        "Gravity: {:?} (magnitude {:.2})",
        config.gravity.mode, config.gravity.magnitude
    );

    commands.insert_resource(config.gravity);
    commands.insert_resource(SandboxConfig {
        controller: config.controller,
        camera: config.camera,
    });
}
