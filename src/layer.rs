use crate::config::AppConfig;
use crate::curve::{CurveDef, SingleModel};
use crate::focus::FocusState;
use crate::gamepad::{Axis, Button, Control, ControlEvent, InputRouter, SubscriptionSet};
use crate::renderer::{FramePacket, LayerFrame, SceneContent};
use crate::scene::{OrbitRig, SceneAction, SceneParams};
use crate::worm::{WormAnimator, WormConstants};
use glam::{EulerRot, Quat};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// One overlay in the composition. Ticked every display frame; contributes a
/// draw submission only while visible.
pub trait OverlayLayer {
    fn tick(&mut self, dt: f32, elapsed: f32);
    fn frame(&self) -> Option<LayerFrame>;
}

/// Independent overlay layers stacked in z-order (insertion order, bottom
/// first). Dropping the stack drops every layer, which releases all gamepad
/// subscriptions.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn OverlayLayer>>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, layer: impl OverlayLayer + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn tick(&mut self, dt: f32, elapsed: f32) {
        for layer in self.layers.iter_mut() {
            layer.tick(dt, elapsed);
        }
    }

    pub fn compose(&self) -> FramePacket {
        FramePacket { layers: self.layers.iter().filter_map(|layer| layer.frame()).collect() }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

struct VideoInner {
    focus: FocusState,
    paths: Vec<String>,
    path_index: usize,
    rate: f32,
    padding: f32,
    rate_sens: f32,
    padding_sens: f32,
}

/// Full-screen looping video overlay. While its focus button is held, the
/// d-pad cycles the clip, the left stick X nudges playback rate (applied as
/// 2^rate) and the right stick Y grows/shrinks the letterbox padding.
pub struct VideoLayer {
    inner: Rc<RefCell<VideoInner>>,
    _subs: SubscriptionSet,
}

impl VideoLayer {
    pub fn mount(
        router: &Rc<RefCell<InputRouter>>,
        focus_button: Button,
        paths: Vec<String>,
        initial_path_index: usize,
        initial_padding: f32,
        config: &AppConfig,
    ) -> Self {
        let path_index = if paths.is_empty() { 0 } else { initial_path_index % paths.len() };
        let inner = Rc::new(RefCell::new(VideoInner {
            focus: FocusState::with_threshold(true, config.controls.tap_threshold()),
            paths,
            path_index,
            rate: 0.0,
            padding: initial_padding.max(0.0),
            rate_sens: config.controls.rate_sens,
            padding_sens: config.controls.padding_sens,
        }));
        let mut subs = SubscriptionSet::new(router.clone());

        let cell = inner.clone();
        subs.subscribe(Control::Button(focus_button), move |ev| {
            let mut inner = cell.borrow_mut();
            match ev {
                ControlEvent::Activated => inner.focus.press(Instant::now()),
                ControlEvent::Released => {
                    inner.focus.release(Instant::now());
                }
                ControlEvent::Changed(_) => {}
            }
        });

        let cell = inner.clone();
        subs.subscribe(Control::Button(Button::Right), move |ev| {
            let mut inner = cell.borrow_mut();
            if inner.focus.focused() && ev == ControlEvent::Activated {
                inner.path_index = crate::scene::step_index(inner.path_index, inner.paths.len(), true);
            }
        });
        let cell = inner.clone();
        subs.subscribe(Control::Button(Button::Left), move |ev| {
            let mut inner = cell.borrow_mut();
            if inner.focus.focused() && ev == ControlEvent::Activated {
                inner.path_index =
                    crate::scene::step_index(inner.path_index, inner.paths.len(), false);
            }
        });

        let cell = inner.clone();
        subs.subscribe(Control::Axis(Axis::LeftX), move |ev| {
            let mut inner = cell.borrow_mut();
            if let ControlEvent::Changed(v) = ev {
                if inner.focus.focused() {
                    let delta = v * inner.rate_sens;
                    inner.rate += delta;
                }
            }
        });
        let cell = inner.clone();
        subs.subscribe(Control::Axis(Axis::RightY), move |ev| {
            let mut inner = cell.borrow_mut();
            if let ControlEvent::Changed(v) = ev {
                if inner.focus.focused() {
                    let delta = v * inner.padding_sens;
                    inner.padding = (inner.padding + delta).max(0.0);
                }
            }
        });

        Self { inner, _subs: subs }
    }

    pub fn path_index(&self) -> usize {
        self.inner.borrow().path_index
    }

    pub fn playback_rate(&self) -> f32 {
        2.0f32.powf(self.inner.borrow().rate)
    }

    pub fn padding(&self) -> f32 {
        self.inner.borrow().padding
    }

    pub fn visible(&self) -> bool {
        self.inner.borrow().focus.visible()
    }

    pub fn focused(&self) -> bool {
        self.inner.borrow().focus.focused()
    }
}

impl OverlayLayer for VideoLayer {
    fn tick(&mut self, _dt: f32, _elapsed: f32) {}

    fn frame(&self) -> Option<LayerFrame> {
        let inner = self.inner.borrow();
        if !inner.focus.visible() {
            return None;
        }
        let path = inner.paths.get(inner.path_index).cloned()?;
        Some(LayerFrame::Video {
            path,
            playback_rate: 2.0f32.powf(inner.rate),
            padding_vw: inner.padding,
        })
    }
}

struct WormInner {
    focus: FocusState,
    params: SceneParams,
}

/// 3D scene overlay: a worm chain riding the selected curve, or one model
/// spun in place for `Single` catalog entries. While focused, the d-pad
/// cycles model (left/right) and curve (up/down), x/y cycle the background
/// image, plus/minus hold zoom, the left stick orbits the camera and the
/// right stick spins the chain; releasing a stick button zeroes that stick's
/// pair of accumulated rates.
pub struct WormLayer {
    inner: Rc<RefCell<WormInner>>,
    rig: OrbitRig,
    animator: Option<WormAnimator>,
    curves: Vec<CurveDef>,
    models: Vec<String>,
    images: Vec<String>,
    constants: WormConstants,
    active_curve: usize,
    group_pitch: f32,
    group_yaw: f32,
    current: Option<LayerFrame>,
    _subs: SubscriptionSet,
}

impl WormLayer {
    pub fn mount(
        router: &Rc<RefCell<InputRouter>>,
        focus_button: Button,
        models: Vec<String>,
        images: Vec<String>,
        curves: Vec<CurveDef>,
        initial_model_index: usize,
        config: &AppConfig,
    ) -> Self {
        let inner = Rc::new(RefCell::new(WormInner {
            focus: FocusState::with_threshold(true, config.controls.tap_threshold()),
            params: SceneParams::new(
                models.len(),
                curves.len(),
                images.len(),
                initial_model_index,
                config.scene_tuning(),
            ),
        }));
        let mut subs = SubscriptionSet::new(router.clone());

        let cell = inner.clone();
        subs.subscribe(Control::Button(focus_button), move |ev| {
            let mut inner = cell.borrow_mut();
            match ev {
                ControlEvent::Activated => inner.focus.press(Instant::now()),
                ControlEvent::Released => {
                    inner.focus.release(Instant::now());
                }
                ControlEvent::Changed(_) => {}
            }
        });

        // Discrete selection controls, live only while focused.
        let selections = [
            (Button::Right, SceneAction::NextModel),
            (Button::Left, SceneAction::PrevModel),
            (Button::Up, SceneAction::NextCurve),
            (Button::Down, SceneAction::PrevCurve),
            (Button::X, SceneAction::NextImage),
            (Button::Y, SceneAction::PrevImage),
        ];
        for (button, action) in selections {
            let cell = inner.clone();
            subs.subscribe(Control::Button(button), move |ev| {
                let mut inner = cell.borrow_mut();
                if inner.focus.focused() && ev == ControlEvent::Activated {
                    inner.params.apply(action);
                }
            });
        }

        // Zoom holds: engaging requires focus, disengaging never does, so a
        // focus release mid-zoom cannot wedge the button down.
        let zoom_holds = [(Button::Plus, true), (Button::Minus, false)];
        for (button, zoom_in) in zoom_holds {
            let cell = inner.clone();
            subs.subscribe(Control::Button(button), move |ev| {
                let mut inner = cell.borrow_mut();
                let action = |held| {
                    if zoom_in {
                        SceneAction::ZoomInHeld(held)
                    } else {
                        SceneAction::ZoomOutHeld(held)
                    }
                };
                match ev {
                    ControlEvent::Activated if inner.focus.focused() => inner.params.apply(action(true)),
                    ControlEvent::Released => inner.params.apply(action(false)),
                    _ => {}
                }
            });
        }

        let axes = [
            (Axis::LeftX, SceneAction::CameraYawDelta as fn(f32) -> SceneAction),
            (Axis::LeftY, SceneAction::CameraPitchDelta),
            (Axis::RightX, SceneAction::SegmentRollDelta),
            (Axis::RightY, SceneAction::SegmentPitchDelta),
        ];
        for (axis, make_action) in axes {
            let cell = inner.clone();
            subs.subscribe(Control::Axis(axis), move |ev| {
                let mut inner = cell.borrow_mut();
                if let ControlEvent::Changed(v) = ev {
                    if inner.focus.focused() {
                        inner.params.apply(make_action(v));
                    }
                }
            });
        }

        // Stick-button releases always zero the paired rates.
        let resets = [
            (Button::LeftStick, SceneAction::ResetCameraRates),
            (Button::RightStick, SceneAction::ResetSegmentRates),
        ];
        for (button, action) in resets {
            let cell = inner.clone();
            subs.subscribe(Control::Button(button), move |ev| {
                if ev == ControlEvent::Released {
                    cell.borrow_mut().params.apply(action);
                }
            });
        }

        let constants = config.worm_constants();
        let animator = match curves.first() {
            Some(CurveDef::Chain(chain)) => Some(WormAnimator::new(chain.clone(), constants)),
            _ => None,
        };
        let rig = OrbitRig::new(
            config.camera.polar_margin,
            config.camera.fov_y_degrees.to_radians(),
            config.camera.near,
            config.camera.far,
        );

        Self {
            inner,
            rig,
            animator,
            curves,
            models,
            images,
            constants,
            active_curve: 0,
            group_pitch: 0.0,
            group_yaw: 0.0,
            current: None,
            _subs: subs,
        }
    }

    /// Rebuilds the animator for a newly selected chain curve. Runs before
    /// any frame math in the tick, so the sampled table can never be read
    /// stale after a swap.
    fn sync_curve_selection(&mut self, selected: usize) {
        if selected == self.active_curve {
            return;
        }
        self.active_curve = selected;
        if let Some(CurveDef::Chain(chain)) = self.curves.get(selected) {
            match self.animator.as_mut() {
                Some(animator) => animator.set_curve(chain.clone()),
                None => self.animator = Some(WormAnimator::new(chain.clone(), self.constants)),
            }
        }
    }

    fn selected_curve(&self) -> Option<&CurveDef> {
        self.curves.get(self.active_curve)
    }

    pub fn model_index(&self) -> usize {
        self.inner.borrow().params.model_index()
    }

    pub fn curve_index(&self) -> usize {
        self.inner.borrow().params.curve_index()
    }

    pub fn image_index(&self) -> usize {
        self.inner.borrow().params.image_index()
    }

    pub fn zoom(&self) -> f32 {
        self.inner.borrow().params.zoom()
    }

    pub fn visible(&self) -> bool {
        self.inner.borrow().focus.visible()
    }

    pub fn focused(&self) -> bool {
        self.inner.borrow().focus.focused()
    }

    pub fn curve_changed_at(&self) -> Instant {
        self.inner.borrow().params.curve_changed_at()
    }

    pub fn animator(&self) -> Option<&WormAnimator> {
        self.animator.as_ref()
    }
}

impl OverlayLayer for WormLayer {
    fn tick(&mut self, dt: f32, elapsed: f32) {
        let (rates, zoom, selected, model_index, image_index) = {
            let mut inner = self.inner.borrow_mut();
            inner.params.tick_zoom();
            (
                inner.params.rates,
                inner.params.zoom(),
                inner.params.curve_index(),
                inner.params.model_index(),
                inner.params.image_index(),
            )
        };

        self.rig.advance(&rates, dt);
        self.group_pitch += rates.segment_pitch * dt;
        self.group_yaw += rates.segment_roll * dt;
        self.sync_curve_selection(selected);

        let group = Quat::from_euler(EulerRot::XYZ, self.group_pitch, self.group_yaw, 0.0);
        let single_scale = match self.selected_curve() {
            Some(CurveDef::Single(SingleModel { scale, .. })) => Some(*scale),
            Some(CurveDef::Chain(_)) => None,
            None => Some(1.0),
        };
        let content = match (single_scale, self.animator.as_mut()) {
            (None, Some(animator)) => {
                let frames = animator
                    .advance(elapsed)
                    .iter()
                    .map(|frame| crate::worm::SegmentFrame {
                        position: group * frame.position,
                        orientation: group * frame.orientation,
                    })
                    .collect();
                SceneContent::Chain(frames)
            }
            (scale, _) => {
                SceneContent::Single { orientation: group, scale: scale.unwrap_or(1.0) }
            }
        };

        self.current = Some(LayerFrame::Scene {
            model: self.models.get(model_index).cloned().unwrap_or_default(),
            background: self.images.get(image_index).cloned(),
            camera: self.rig.camera(zoom),
            content,
        });
    }

    fn frame(&self) -> Option<LayerFrame> {
        if self.inner.borrow().focus.visible() {
            self.current.clone()
        } else {
            None
        }
    }
}
