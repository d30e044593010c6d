use crate::camera3d::Camera3D;
use crate::wrap_angle;
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;
use std::time::Instant;

/// Step a selection index through a fixed catalog with wraparound in either
/// direction. Empty catalogs pin the index at 0.
pub fn step_index(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        if index + 1 >= len {
            0
        } else {
            index + 1
        }
    } else if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

/// Accumulated axis rates, grouped by the stick that feeds them. Camera pair
/// rides the left stick, segment-spin pair the right.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContinuousRates {
    pub camera_yaw: f32,
    pub camera_pitch: f32,
    pub segment_roll: f32,
    pub segment_pitch: f32,
}

/// Sensitivities and zoom behaviour for one scene, lifted from configuration
/// at construction.
#[derive(Debug, Clone, Copy)]
pub struct SceneTuning {
    pub yaw_sens: f32,
    pub pitch_sens: f32,
    pub roll_sens: f32,
    pub spin_sens: f32,
    pub zoom_step: f32,
    pub zoom_floor: f32,
    pub initial_zoom: f32,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            yaw_sens: 0.125,
            pitch_sens: 0.125,
            roll_sens: 0.125,
            spin_sens: 0.125,
            zoom_step: 2.0,
            zoom_floor: 1.0,
            initial_zoom: 300.0,
        }
    }
}

/// Every mutation of scene state goes through this reducer input, so event
/// handlers never capture stale snapshots of the parameters they update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneAction {
    NextModel,
    PrevModel,
    NextCurve,
    PrevCurve,
    NextImage,
    PrevImage,
    CameraYawDelta(f32),
    CameraPitchDelta(f32),
    SegmentRollDelta(f32),
    SegmentPitchDelta(f32),
    ResetCameraRates,
    ResetSegmentRates,
    ZoomInHeld(bool),
    ZoomOutHeld(bool),
}

/// Per-scene mutable state: catalog selections, accumulated rates and zoom.
/// Exclusively owned by the enclosing scene layer; the animation engine reads
/// it every tick but never mutates it.
#[derive(Debug, Clone)]
pub struct SceneParams {
    model_len: usize,
    curve_len: usize,
    image_len: usize,
    model_index: usize,
    curve_index: usize,
    image_index: usize,
    pub rates: ContinuousRates,
    zoom: f32,
    zoom_in_held: bool,
    zoom_out_held: bool,
    curve_changed_at: Instant,
    tuning: SceneTuning,
}

impl SceneParams {
    /// Out-of-range initial indices are reduced modulo the catalog length
    /// rather than rejected.
    pub fn new(
        model_len: usize,
        curve_len: usize,
        image_len: usize,
        initial_model: usize,
        tuning: SceneTuning,
    ) -> Self {
        Self {
            model_len,
            curve_len,
            image_len,
            model_index: reduce(initial_model, model_len),
            curve_index: 0,
            image_index: 0,
            rates: ContinuousRates::default(),
            zoom: tuning.initial_zoom.max(tuning.zoom_floor),
            zoom_in_held: false,
            zoom_out_held: false,
            curve_changed_at: Instant::now(),
            tuning,
        }
    }

    pub fn apply(&mut self, action: SceneAction) {
        match action {
            SceneAction::NextModel => {
                self.model_index = step_index(self.model_index, self.model_len, true)
            }
            SceneAction::PrevModel => {
                self.model_index = step_index(self.model_index, self.model_len, false)
            }
            SceneAction::NextCurve => {
                self.curve_index = step_index(self.curve_index, self.curve_len, true);
                self.curve_changed_at = Instant::now();
            }
            SceneAction::PrevCurve => {
                self.curve_index = step_index(self.curve_index, self.curve_len, false);
                self.curve_changed_at = Instant::now();
            }
            SceneAction::NextImage => {
                self.image_index = step_index(self.image_index, self.image_len, true)
            }
            SceneAction::PrevImage => {
                self.image_index = step_index(self.image_index, self.image_len, false)
            }
            SceneAction::CameraYawDelta(v) => self.rates.camera_yaw += v * self.tuning.yaw_sens,
            SceneAction::CameraPitchDelta(v) => {
                self.rates.camera_pitch += v * self.tuning.pitch_sens
            }
            SceneAction::SegmentRollDelta(v) => {
                self.rates.segment_roll += v * self.tuning.roll_sens
            }
            SceneAction::SegmentPitchDelta(v) => {
                self.rates.segment_pitch += v * self.tuning.spin_sens
            }
            SceneAction::ResetCameraRates => {
                self.rates.camera_yaw = 0.0;
                self.rates.camera_pitch = 0.0;
            }
            SceneAction::ResetSegmentRates => {
                self.rates.segment_roll = 0.0;
                self.rates.segment_pitch = 0.0;
            }
            SceneAction::ZoomInHeld(held) => self.zoom_in_held = held,
            SceneAction::ZoomOutHeld(held) => self.zoom_out_held = held,
        }
    }

    /// Fixed zoom step per tick while either zoom button is held. The floor
    /// is a hard lower bound; the camera never reaches or crosses the origin.
    pub fn tick_zoom(&mut self) {
        if self.zoom_in_held {
            self.zoom = (self.zoom - self.tuning.zoom_step).max(self.tuning.zoom_floor);
        }
        if self.zoom_out_held {
            self.zoom += self.tuning.zoom_step;
        }
    }

    pub fn model_index(&self) -> usize {
        self.model_index
    }

    pub fn curve_index(&self) -> usize {
        self.curve_index
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn curve_changed_at(&self) -> Instant {
        self.curve_changed_at
    }
}

fn reduce(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index % len
    }
}

/// Camera placement for chain mode: spherical coordinates about the origin
/// with radius = zoom. The polar angle swings sinusoidally on the accumulated
/// pitch phase so motion reverses smoothly at the poles; azimuth advances
/// linearly on the yaw rate. Clamped away from the gimbal singularity by the
/// polar margin.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    azimuth: f32,
    polar_phase: f32,
    polar_margin: f32,
    fov_y_radians: f32,
    near: f32,
    far: f32,
}

impl OrbitRig {
    pub fn new(polar_margin: f32, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self {
            azimuth: 0.0,
            polar_phase: 0.0,
            polar_margin: polar_margin.clamp(0.001, FRAC_PI_2 - 0.001),
            fov_y_radians,
            near,
            far,
        }
    }

    pub fn advance(&mut self, rates: &ContinuousRates, dt: f32) {
        self.azimuth = wrap_angle(self.azimuth + rates.camera_yaw * dt);
        self.polar_phase += rates.camera_pitch * dt;
    }

    pub fn camera(&self, zoom: f32) -> Camera3D {
        let span = FRAC_PI_2 - self.polar_margin;
        let polar = FRAC_PI_2 + self.polar_phase.sin() * span;
        let position = Vec3::new(
            zoom * polar.sin() * self.azimuth.cos(),
            zoom * polar.cos(),
            zoom * polar.sin() * self.azimuth.sin(),
        );
        Camera3D::new(position, Vec3::ZERO, self.fov_y_radians, self.near, self.far)
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }
}
