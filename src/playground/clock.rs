//! Monotonic frame clock.

use std::time::Instant;

/// Measures real time between frames. `tick` returns the seconds elapsed
/// since the previous tick, or since construction for the first one.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        FrameClock { start: now, last: now }
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn tick_measures_elapsed_time() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();
        assert!(delta >= 0.009, "measured {delta}");
        // the next tick starts from now, not from construction
        let immediate = clock.tick();
        assert!(immediate < delta);
    }
}
