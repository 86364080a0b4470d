//! # Engine Configuration
//!
//! Every tunable the engine reads at startup lives here: world extent, terrain noise
//! parameters, camera defaults and the light marker. The configuration is loaded from a
//! JSON file (missing fields fall back to their defaults) and validated before any
//! chunk is generated, so a bad value stops the engine instead of producing a broken
//! world.

use std::{fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

/// Location of the configuration file relative to the working directory.
pub const CONFIG_PATH: &str = "assets/config.json";

/// Errors raised while loading or validating the engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The configuration file is not valid JSON for [`EngineConfig`].
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is outside of the range the engine can work with.
    #[error("invalid configuration value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: String,
    },
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk and world extents.
    pub world: WorldConfig,
    /// Terrain generator parameters.
    pub terrain: TerrainConfig,
    /// Camera defaults.
    pub camera: CameraConfig,
    /// Light marker placement.
    pub light: LightConfig,
}

/// Chunk and world dimensions.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a chunk in voxels (N).
    pub chunk_size: i32,
    /// Edge length of the world in chunks (W).
    pub world_size: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            world_size: 4,
        }
    }
}

/// Noise parameters for the terrain generator.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed shared by both noise fields.
    pub seed: u32,
    /// World-space Y below which the 3D density field decides solidity.
    pub elevation_threshold: i32,
    /// Density samples below this value are carved out as air.
    pub density_cutoff: f64,
    /// Scale applied to world coordinates before sampling the density field.
    pub density_scale: f64,
    /// Scale applied to world X/Z before sampling the surface height field.
    pub surface_scale: f64,
    /// Surface height where the height noise is zero.
    pub surface_base_height: f64,
    /// Maximum deviation of the surface from its base height.
    pub surface_amplitude: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            elevation_threshold: 24,
            density_cutoff: -0.2,
            density_scale: 0.08,
            surface_scale: 0.03,
            surface_base_height: 32.0,
            surface_amplitude: 8.0,
        }
    }
}

/// Camera defaults, mirrored by the reset key.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial position in world space.
    pub position: [f32; 3],
    /// Initial yaw in degrees.
    pub yaw_degrees: f32,
    /// Initial pitch in degrees.
    pub pitch_degrees: f32,
    /// Initial vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Mouse look sensitivity.
    pub sensitivity: f32,
    /// Near clipping plane.
    pub znear: f32,
    /// Far clipping plane.
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-8.0, 48.0, -8.0],
            yaw_degrees: 45.0,
            pitch_degrees: -20.0,
            fov_degrees: 45.0,
            speed: 10.0,
            sensitivity: 0.4,
            znear: 0.1,
            zfar: 500.0,
        }
    }
}

/// Light marker placement.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Initial light position.
    pub position: [f32; 3],
    /// Light color, linear RGB.
    pub color: [f32; 3],
    /// Whether the light starts orbiting the world.
    pub orbit: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [32.0, 80.0, 32.0],
            color: [1.0, 1.0, 1.0],
            orbit: true,
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from `path`, falling back to defaults when the file is
    /// absent. The result is validated before it is returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("No configuration at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => return Err(err.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from JSON text without validating it.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Checks every value the engine cannot recover from at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must lie in (0, 180)"));
        }
        if camera.znear <= 0.0 {
            return Err(invalid("camera.znear", "must be positive"));
        }
        if camera.zfar <= camera.znear {
            return Err(invalid("camera.zfar", "must be greater than camera.znear"));
        }
        if camera.speed < 0.0 || camera.sensitivity < 0.0 {
            return Err(invalid("camera.speed", "speed and sensitivity must not be negative"));
        }
        Ok(())
    }
}

impl WorldConfig {
    /// Rejects non-positive chunk or world extents, and extents whose cube does not fit
    /// in `i32`. Both cubes fitting keeps `chunk_size * world_size` in range too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size <= 0 {
            return Err(invalid(
                "world.chunk_size",
                &format!("must be positive, got {}", self.chunk_size),
            ));
        }
        if self.world_size <= 0 {
            return Err(invalid(
                "world.world_size",
                &format!("must be positive, got {}", self.world_size),
            ));
        }
        if cube(self.chunk_size).is_none() {
            return Err(invalid(
                "world.chunk_size",
                &format!("{}^3 voxels per chunk overflows i32", self.chunk_size),
            ));
        }
        if cube(self.world_size).is_none() {
            return Err(invalid(
                "world.world_size",
                &format!("{}^3 chunks overflows i32", self.world_size),
            ));
        }
        Ok(())
    }
}

fn cube(n: i32) -> Option<i32> {
    n.checked_mul(n)?.checked_mul(n)
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
