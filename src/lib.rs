pub mod app;
pub mod assets;
pub mod camera3d;
pub mod cli;
pub mod config;
pub mod curve;
pub mod focus;
pub mod gamepad;
pub mod layer;
pub mod renderer;
pub mod scene;
pub mod time;
pub mod worm;

pub use app::{run_with_overrides, App, RunOptions};

pub(crate) fn wrap_angle(mut radians: f32) -> f32 {
    let two_pi = 2.0 * std::f32::consts::PI;
    while radians > std::f32::consts::PI {
        radians -= two_pi;
    }
    while radians < -std::f32::consts::PI {
        radians += two_pi;
    }
    radians
}
