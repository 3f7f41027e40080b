use crate::adapters::ManualScheduler;
use crate::core::count_up::CountUp;
use crate::core::CountUpState;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Fires an animator's pending frames on a fixed tokio interval, standing in
/// for the browser's animation-frame loop.
#[derive(Debug, Clone, Copy)]
pub struct FrameLoop {
    interval: Duration,
}

impl FrameLoop {
    pub fn new(interval: Duration) -> Self {
        // tokio 的 interval 不接受 0
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs until no frame is pending and returns how many frames fired.
    /// `on_render` sees every published state change.
    pub async fn run<F>(&self, count_up: &mut CountUp<ManualScheduler>, mut on_render: F) -> usize
    where
        F: FnMut(&CountUpState),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let started = Instant::now();
        let mut frames = 0;

        while count_up.scheduler().has_pending() {
            ticker.tick().await;
            let now_ms = started.elapsed().as_secs_f64() * 1000.0;

            for handle in count_up.scheduler_mut().take_pending() {
                frames += 1;
                if let Some(state) = count_up.on_frame(handle, now_ms) {
                    on_render(&state);
                }
            }
        }

        tracing::debug!("Frame loop finished after {} frames", frames);
        frames
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::from_millis(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::count_up::CountUpOptions;

    #[tokio::test]
    async fn test_run_drives_animation_to_target() {
        let options = CountUpOptions {
            duration_ms: 60.0,
            ..CountUpOptions::default()
        };
        let mut count_up = CountUp::new(1000.0, options, ManualScheduler::new());
        let mut seen = Vec::new();

        let frames = FrameLoop::from_millis(2)
            .run(&mut count_up, |state| seen.push(state.raw_value))
            .await;

        assert!(frames >= 2);
        assert_eq!(seen.last().copied(), Some(1000.0));
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(!count_up.state().is_animating);
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_disabled() {
        let options = CountUpOptions {
            enabled: false,
            ..CountUpOptions::default()
        };
        let mut count_up = CountUp::new(5.0, options, ManualScheduler::new());

        let frames = FrameLoop::default().run(&mut count_up, |_| {}).await;

        assert_eq!(frames, 0);
        assert_eq!(count_up.state().raw_value, 5.0);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        assert_eq!(FrameLoop::from_millis(0).interval(), Duration::from_millis(1));
    }
}
