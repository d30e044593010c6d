use crate::camera3d::Camera3D;
use crate::worm::SegmentFrame;
use glam::Quat;

/// What a 3D scene layer contributes this frame: either the segment chain or
/// one spinning model.
#[derive(Debug, Clone)]
pub enum SceneContent {
    Chain(Vec<SegmentFrame>),
    Single { orientation: Quat, scale: f32 },
}

/// One overlay layer's draw submission. Plain data only; the renderer behind
/// the boundary is opaque to the core.
#[derive(Debug, Clone)]
pub enum LayerFrame {
    Video { path: String, playback_rate: f32, padding_vw: f32 },
    Scene { model: String, background: Option<String>, camera: Camera3D, content: SceneContent },
}

/// Everything visible this tick, bottom layer first.
#[derive(Debug, Clone, Default)]
pub struct FramePacket {
    pub layers: Vec<LayerFrame>,
}

/// Boundary to the external rasterizing collaborator.
pub trait Renderer {
    fn present(&mut self, frame: &FramePacket);
}

/// Swallows frames; used headless and in tests.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _frame: &FramePacket) {}
}

/// Records the most recent packet so tests can assert on submissions.
#[derive(Debug, Default)]
pub struct CaptureRenderer {
    pub last: Option<FramePacket>,
    pub presented: usize,
}

impl Renderer for CaptureRenderer {
    fn present(&mut self, frame: &FramePacket) {
        self.last = Some(frame.clone());
        self.presented += 1;
    }
}
