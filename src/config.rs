use crate::scene::SceneTuning;
use crate::worm::WormConstants;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Wormloop".to_string(), width: 1920, height: 1080 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ControlsConfig {
    #[serde(default = "ControlsConfig::default_tap_threshold_ms")]
    pub tap_threshold_ms: u64,
    #[serde(default = "ControlsConfig::default_rate_sens")]
    pub rate_sens: f32,
    #[serde(default = "ControlsConfig::default_padding_sens")]
    pub padding_sens: f32,
    #[serde(default = "ControlsConfig::default_axis_sens")]
    pub yaw_sens: f32,
    #[serde(default = "ControlsConfig::default_axis_sens")]
    pub pitch_sens: f32,
    #[serde(default = "ControlsConfig::default_axis_sens")]
    pub roll_sens: f32,
    #[serde(default = "ControlsConfig::default_axis_sens")]
    pub spin_sens: f32,
}

impl ControlsConfig {
    const fn default_tap_threshold_ms() -> u64 {
        500
    }

    fn default_rate_sens() -> f32 {
        1.0 / 8.0
    }

    fn default_padding_sens() -> f32 {
        1.0
    }

    fn default_axis_sens() -> f32 {
        1.0 / 8.0
    }

    pub fn tap_threshold(&self) -> Duration {
        Duration::from_millis(self.tap_threshold_ms)
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            tap_threshold_ms: Self::default_tap_threshold_ms(),
            rate_sens: Self::default_rate_sens(),
            padding_sens: Self::default_padding_sens(),
            yaw_sens: Self::default_axis_sens(),
            pitch_sens: Self::default_axis_sens(),
            roll_sens: Self::default_axis_sens(),
            spin_sens: Self::default_axis_sens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_zoom_step")]
    pub zoom_step: f32,
    #[serde(default = "CameraConfig::default_zoom_floor")]
    pub zoom_floor: f32,
    #[serde(default = "CameraConfig::default_initial_zoom")]
    pub initial_zoom: f32,
    #[serde(default = "CameraConfig::default_polar_margin")]
    pub polar_margin: f32,
    #[serde(default = "CameraConfig::default_fov_y_degrees")]
    pub fov_y_degrees: f32,
    #[serde(default = "CameraConfig::default_near")]
    pub near: f32,
    #[serde(default = "CameraConfig::default_far")]
    pub far: f32,
}

impl CameraConfig {
    const fn default_zoom_step() -> f32 {
        2.0
    }

    const fn default_zoom_floor() -> f32 {
        1.0
    }

    const fn default_initial_zoom() -> f32 {
        300.0
    }

    const fn default_polar_margin() -> f32 {
        0.05
    }

    const fn default_fov_y_degrees() -> f32 {
        75.0
    }

    const fn default_near() -> f32 {
        0.1
    }

    const fn default_far() -> f32 {
        1000.0
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_step: Self::default_zoom_step(),
            zoom_floor: Self::default_zoom_floor(),
            initial_zoom: Self::default_initial_zoom(),
            polar_margin: Self::default_polar_margin(),
            fov_y_degrees: Self::default_fov_y_degrees(),
            near: Self::default_near(),
            far: Self::default_far(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WormConfig {
    #[serde(default = "WormConfig::default_lateral_offset")]
    pub lateral_offset: f32,
    #[serde(default = "WormConfig::default_lookahead_arclength")]
    pub lookahead_arclength: f32,
    #[serde(default = "WormConfig::default_frame_samples")]
    pub frame_samples: usize,
}

impl WormConfig {
    // Tuned empirically against the catalog's curve scale; configuration,
    // not a derived formula.
    const fn default_lateral_offset() -> f32 {
        15.0
    }

    const fn default_lookahead_arclength() -> f32 {
        30.0
    }

    const fn default_frame_samples() -> usize {
        100
    }
}

impl Default for WormConfig {
    fn default() -> Self {
        Self {
            lateral_offset: Self::default_lateral_offset(),
            lookahead_arclength: Self::default_lookahead_arclength(),
            frame_samples: Self::default_frame_samples(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub worm: WormConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("[config] {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn scene_tuning(&self) -> SceneTuning {
        SceneTuning {
            yaw_sens: self.controls.yaw_sens,
            pitch_sens: self.controls.pitch_sens,
            roll_sens: self.controls.roll_sens,
            spin_sens: self.controls.spin_sens,
            zoom_step: self.camera.zoom_step,
            zoom_floor: self.camera.zoom_floor,
            initial_zoom: self.camera.initial_zoom,
        }
    }

    pub fn worm_constants(&self) -> WormConstants {
        WormConstants {
            lateral_offset: self.worm.lateral_offset,
            lookahead_arclength: self.worm.lookahead_arclength,
            frame_samples: self.worm.frame_samples,
        }
    }
}
