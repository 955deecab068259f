//! Frame and delay awaitables on the tokio clock
//!
//! These need a tokio runtime with the time driver enabled.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::scheduler::LoopConfig;

/// Frame rate used by [`next_frame`]
pub const DEFAULT_FPS: u32 = 60;

/// Fixed-rate frame source yielding millisecond timestamps.
///
/// Timestamps are measured from the clock's creation and the first frame
/// lands one period after it. Late frames are skipped, not replayed.
pub struct FrameClock {
    interval: Interval,
    origin: Instant,
    period: Duration,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        let period = frame_period(fps);
        let origin = Instant::now();
        let mut interval = tokio::time::interval_at(origin + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            interval,
            origin,
            period,
        }
    }

    /// Clock ticking at the loop's `target_fps`
    pub fn from_config(config: &LoopConfig) -> Self {
        Self::new(config.target_fps)
    }

    /// Wait for the next frame and return its timestamp in milliseconds
    pub async fn next_frame(&mut self) -> f64 {
        let at = self.interval.tick().await;
        at.duration_since(self.origin).as_secs_f64() * 1000.0
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Duration of one frame at `fps` (at least one frame per second)
pub fn frame_period(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

/// Resolve on the next frame at [`DEFAULT_FPS`]
pub async fn next_frame() {
    tokio::time::sleep(frame_period(DEFAULT_FPS)).await;
}

/// Resolve after `duration`
pub async fn delay(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_period() {
        assert_eq!(frame_period(50), Duration::from_millis(20));
        assert_eq!(frame_period(0), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_clock_timestamps() {
        let mut clock = FrameClock::new(50);
        let first = clock.next_frame().await;
        let second = clock.next_frame().await;
        let third = clock.next_frame().await;

        assert!((first - 20.0).abs() < 1e-3);
        assert!((second - 40.0).abs() < 1e-3);
        assert!((third - 60.0).abs() < 1e-3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_waits_for_duration() {
        let before = Instant::now();
        delay(Duration::from_millis(250)).await;
        assert!(before.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_frame_waits_one_period() {
        let before = Instant::now();
        next_frame().await;
        assert!(before.elapsed() >= frame_period(DEFAULT_FPS));
    }
}
