use std::time::{Duration, Instant};

/// Frame clock: delta since the previous tick plus time since startup. The
/// elapsed value is what drives loop phase, so it must come from the same
/// clock as the deltas.
pub struct Time {
    start: Instant,
    last: Instant,
    pub delta: Duration,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now, delta: Duration::ZERO }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last;
        self.last = now;
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.last.duration_since(self.start).as_secs_f32()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperative frame pacing for the single-threaded tick loop: sleep out
/// whatever remains of the display frame budget.
pub struct FramePacer {
    budget: Duration,
    frame_started: Instant,
}

impl FramePacer {
    pub fn new(target_hz: f32) -> Self {
        let hz = target_hz.max(1.0);
        Self { budget: Duration::from_secs_f32(1.0 / hz), frame_started: Instant::now() }
    }

    pub fn begin_frame(&mut self) {
        self.frame_started = Instant::now();
    }

    pub fn wait(&self) {
        let used = self.frame_started.elapsed();
        if used < self.budget {
            std::thread::sleep(self.budget - used);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_advances_with_ticks() {
        let mut time = Time::new();
        std::thread::sleep(Duration::from_millis(2));
        time.tick();
        assert!(time.delta_seconds() > 0.0);
        assert!(time.elapsed_seconds() >= time.delta_seconds());
    }
}
