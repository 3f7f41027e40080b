use crate::domain::model::FrameHandle;
use crate::domain::ports::FrameScheduler;
use std::collections::BTreeSet;

/// Frame scheduler for hosts that fire frames themselves: requested frames
/// queue up until [`ManualScheduler::take_pending`] hands them out.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出所有待觸發的畫格，依排程順序
    pub fn take_pending(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn requested_count(&self) -> usize {
        self.requested
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.insert(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.remove(&handle) {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_pending_drains_in_order() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_eq!(scheduler.take_pending(), vec![a, b]);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.request_frame();
        scheduler.cancel_frame(handle);
        scheduler.cancel_frame(handle);
        scheduler.cancel_frame(FrameHandle(99));
        assert_eq!(scheduler.cancelled_count(), 1);
        assert!(scheduler.take_pending().is_empty());
    }
}
