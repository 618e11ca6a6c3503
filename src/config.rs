//! Scene configuration, loaded from config.toml at startup.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Bouncy Figure".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// Device pixel ratios above this are clamped when sizing the surface.
    pub max_pixel_ratio: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.5, 0.0, 5.0],
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub directional_color: u32,
    pub directional_intensity: f32,
    /// The directional light shines from here toward the origin.
    pub directional_position: [f32; 3],
    pub background_color: u32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0x9eaeff,
            ambient_intensity: 0.5,
            directional_color: 0xffffff,
            directional_intensity: 0.8,
            directional_position: [5.0, 5.0, 5.0],
            background_color: 0x000000,
        }
    }
}

/// Gesture animation tuning. Angles in degrees, durations in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    pub jump_height: f32,
    pub jump_duration: f32,
    pub arm_swing: f32,
    pub turn_step: f32,
    pub max_yaw: f32,
    pub turn_duration: f32,
    /// Frame gaps longer than this (ms) are treated as `adjusted_lag_ms`.
    pub lag_threshold_ms: u64,
    pub adjusted_lag_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            jump_height: 1.5,
            jump_duration: 0.3,
            arm_swing: 90.0,
            turn_step: 90.0,
            max_yaw: 90.0,
            turn_duration: 0.1,
            lag_threshold_ms: 500,
            adjusted_lag_ms: 33,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub lights: LightConfig,
    pub motion: MotionConfig,
}

impl Config {
    /// Load from `path`. Missing fields fall back to defaults; a missing file
    /// is created with the defaults.
    pub fn load_or_create(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config from {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config found, creating default at {}", path.display());
                let default = Self::default();
                if let Err(e) = default.save(path) {
                    log::warn!("Could not write default config: {}", e);
                }
                default
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs::write(path, toml_string)?;
        Ok(())
    }
}
