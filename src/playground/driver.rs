//! Frame pacing behind a trait, so the loop can run against wall-clock
//! time in the binary and against hand-driven frames in tests.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Interval, MissedTickBehavior};

/// The main loop asks the scheduler before every frame and stops when it
/// declines.
#[async_trait]
pub trait FrameScheduler: Send {
    /// Wait until the next frame should run. `false` ends the loop.
    async fn next_frame(&mut self) -> bool;
}

/// Wall-clock pacing at a fixed rate, with an optional total frame budget.
/// Late frames are delayed rather than bursted, so a stall produces a few
/// slow frames instead of a flurry of instant ones.
pub struct FixedRateScheduler {
    interval: Interval,
    frames_left: Option<u64>,
}

impl FixedRateScheduler {
    pub fn new(frames_per_second: f32) -> Self {
        let period = Duration::from_secs_f32(1.0 / frames_per_second.max(1.0));
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        FixedRateScheduler {
            interval,
            frames_left: None,
        }
    }

    /// Stop after `frames` frames instead of running forever.
    #[must_use]
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frames_left = Some(frames);
        self
    }
}

#[async_trait]
impl FrameScheduler for FixedRateScheduler {
    async fn next_frame(&mut self) -> bool {
        if let Some(left) = self.frames_left.as_mut() {
            if *left == 0 {
                return false;
            }
            *left -= 1;
        }
        self.interval.tick().await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frame_budget_limits_the_loop() {
        let mut scheduler = FixedRateScheduler::new(1000.0).with_frame_budget(3);
        let mut frames = 0;
        while scheduler.next_frame().await {
            frames += 1;
        }
        assert_eq!(frames, 3);
    }
}
