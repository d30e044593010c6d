use crate::assets::{self, AssetCatalog};
use crate::config::AppConfig;
use crate::curve::builtin_curves;
use crate::gamepad::{Button, GamepadSource, InputRouter, NullSource};
use crate::layer::{LayerStack, VideoLayer, WormLayer};
use crate::renderer::{NullRenderer, Renderer};
use crate::time::{FramePacer, Time};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

const TICK_RATE_HZ: f32 = 60.0;
const SECOND_VIDEO_PADDING: f32 = 25.0;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub assets_dir: PathBuf,
    /// Stop after this many seconds; `None` runs until killed, which is the
    /// normal installation mode.
    pub run_seconds: Option<f32>,
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { assets_dir: PathBuf::from("public"), run_seconds: None, seed: None }
    }
}

/// The assembled installation: input router, overlay stack and frame clock.
/// Single-threaded cooperative model; one tick per display frame, and every
/// callback in a tick runs to completion before the next begins.
pub struct App<S: GamepadSource, R: Renderer> {
    router: Rc<RefCell<InputRouter>>,
    stack: LayerStack,
    source: S,
    renderer: R,
    time: Time,
}

impl<S: GamepadSource, R: Renderer> App<S, R> {
    pub fn new(config: &AppConfig, catalog: AssetCatalog, source: S, renderer: R, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let router = Rc::new(RefCell::new(InputRouter::new()));
        let stack = build_stack(&router, config, catalog, &mut rng);
        Self { router, stack, source, renderer, time: Time::new() }
    }

    pub fn router(&self) -> &Rc<RefCell<InputRouter>> {
        &self.router
    }

    pub fn layer_count(&self) -> usize {
        self.stack.len()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// One cooperative frame: drain the device, dispatch through the router,
    /// tick every layer, hand the composed packet to the renderer.
    pub fn tick(&mut self) {
        self.time.tick();
        for event in self.source.drain() {
            self.router.borrow_mut().dispatch(event);
        }
        self.stack.tick(self.time.delta_seconds(), self.time.elapsed_seconds());
        self.renderer.present(&self.stack.compose());
    }

    pub fn run(&mut self, run_seconds: Option<f32>) {
        self.source.start();
        let mut pacer = FramePacer::new(TICK_RATE_HZ);
        loop {
            pacer.begin_frame();
            self.tick();
            if let Some(limit) = run_seconds {
                if self.time.elapsed_seconds() >= limit {
                    break;
                }
            }
            pacer.wait();
        }
        self.source.stop();
    }
}

/// The installation's fixed composition: two full-screen video layers (focus
/// on zl and l, the second one letterboxed) under one worm scene layer
/// (focus on r), each starting on a random catalog entry.
fn build_stack(
    router: &Rc<RefCell<InputRouter>>,
    config: &AppConfig,
    catalog: AssetCatalog,
    rng: &mut impl Rng,
) -> LayerStack {
    eprintln!(
        "[stage] composing layers: video '{}', video '{}', worm '{}'",
        Button::Zl.label(),
        Button::L.label(),
        Button::R.label()
    );
    let mut stack = LayerStack::new();
    stack.push(VideoLayer::mount(
        router,
        Button::Zl,
        catalog.videos.clone(),
        assets::random_index(catalog.videos.len(), rng),
        0.0,
        config,
    ));
    stack.push(VideoLayer::mount(
        router,
        Button::L,
        catalog.videos.clone(),
        assets::random_index(catalog.videos.len(), rng),
        SECOND_VIDEO_PADDING,
        config,
    ));
    stack.push(WormLayer::mount(
        router,
        Button::R,
        catalog.models.clone(),
        catalog.images.clone(),
        builtin_curves(),
        assets::random_index(catalog.models.len(), rng),
        config,
    ));
    stack
}

/// Headless entry point: no device attached means the router simply has
/// nothing to dispatch and every layer stays in its default state.
pub fn run_with_overrides(options: RunOptions) -> Result<()> {
    let config = AppConfig::load_or_default("config/app.json");
    let catalog = AssetCatalog::scan(&options.assets_dir)?;
    let mut app = App::new(&config, catalog, NullSource, NullRenderer, options.seed);
    app.run(options.run_seconds);
    Ok(())
}
