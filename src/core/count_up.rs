use crate::core::easing::{ease_out_cubic, progress};
use crate::core::format::format_plain;
use crate::domain::model::{CountUpState, FrameHandle};
use crate::domain::ports::FrameScheduler;

pub const DEFAULT_DURATION_MS: f64 = 2000.0;
pub const DEFAULT_RESTART_EPSILON: f64 = 0.01;

pub type Formatter = Box<dyn Fn(f64) -> String + Send>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountUpOptions {
    pub duration_ms: f64,
    pub enabled: bool,
    /// 目標值變動超過此門檻才會重新播放動畫
    pub restart_epsilon: f64,
}

impl Default for CountUpOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            enabled: true,
            restart_epsilon: DEFAULT_RESTART_EPSILON,
        }
    }
}

/// Animates a displayed number from 0 to a target over a fixed duration.
///
/// The animator never runs on its own: it asks the scheduler for a frame and
/// the host calls [`CountUp::on_frame`] with that handle and a timestamp in
/// milliseconds. Frames whose handle is no longer pending (cancelled by a
/// restart or by [`CountUp::dispose`]) are ignored, so a late callback can
/// never write state.
pub struct CountUp<S: FrameScheduler> {
    scheduler: S,
    options: CountUpOptions,
    formatter: Option<Formatter>,
    target: f64,
    count: f64,
    is_animating: bool,
    start_time: Option<f64>,
    pending: Option<FrameHandle>,
    renders: usize,
    disposed: bool,
}

impl<S: FrameScheduler> CountUp<S> {
    pub fn new(target: f64, options: CountUpOptions, scheduler: S) -> Self {
        let mut count_up = Self {
            scheduler,
            options,
            formatter: None,
            target,
            count: 0.0,
            is_animating: false,
            start_time: None,
            pending: None,
            renders: 0,
            disposed: false,
        };
        count_up.start();
        count_up
    }

    pub fn with_formatter(mut self, formatter: impl Fn(f64) -> String + Send + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn state(&self) -> CountUpState {
        CountUpState {
            display_value: self.display(self.count),
            raw_value: self.count,
            is_animating: self.is_animating,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn options(&self) -> CountUpOptions {
        self.options
    }

    /// Number of state updates published so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// 畫格回呼。只有顯示的整數值改變時才回傳新狀態
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp_ms: f64) -> Option<CountUpState> {
        if self.pending != Some(handle) {
            tracing::trace!("Ignoring stale frame {:?}", handle);
            return None;
        }
        self.pending = None;

        let start = *self.start_time.get_or_insert(timestamp_ms);
        let fraction = progress(timestamp_ms - start, self.options.duration_ms);

        if fraction >= 1.0 {
            let changed = self.update(self.target, false);
            tracing::debug!("Count-up reached target {} after {} renders", self.target, self.renders);
            return changed.then(|| self.state());
        }

        let next = (self.target * ease_out_cubic(fraction)).floor();
        self.pending = Some(self.scheduler.request_frame());
        self.update(next, true).then(|| self.state())
    }

    pub fn set_target(&mut self, target: f64) {
        if self.disposed {
            return;
        }
        let previous = self.target;
        self.target = target;

        if !self.options.enabled || !target.is_finite() {
            self.cancel_pending();
            self.update(target, false);
            return;
        }

        if !previous.is_finite() || (target - previous).abs() > self.options.restart_epsilon {
            tracing::debug!("Count-up target changed from {} to {}, restarting", previous, target);
            self.start();
        } else if !self.is_animating {
            self.update(target, false);
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.disposed || self.options.enabled == enabled {
            return;
        }
        self.options.enabled = enabled;
        self.start();
    }

    /// Cancels any pending frame. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.cancel_pending();
        self.disposed = true;
    }

    fn start(&mut self) {
        self.cancel_pending();
        self.start_time = None;

        if !self.options.enabled || !self.target.is_finite() {
            self.update(self.target, false);
            return;
        }

        self.update(0.0, true);
        self.pending = Some(self.scheduler.request_frame());
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn update(&mut self, count: f64, is_animating: bool) -> bool {
        let same_count = self.count == count || (self.count.is_nan() && count.is_nan());
        if same_count && self.is_animating == is_animating {
            return false;
        }
        self.count = count;
        self.is_animating = is_animating;
        self.renders += 1;
        true
    }

    fn display(&self, value: f64) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => format_plain(value),
        }
    }
}

impl<S: FrameScheduler> Drop for CountUp<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
