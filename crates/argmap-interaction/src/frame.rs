//! One-slot animation-frame scheduler.
//!
//! Scheduling while a task is pending replaces it, so at most one queued
//! move is ever applied per frame and the latest one wins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(u64);

#[derive(Debug)]
pub struct FrameQueue<T> {
    next_handle: u64,
    pending: Option<(FrameHandle, T)>,
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameQueue<T> {
    pub fn new() -> Self {
        Self {
            next_handle: 0,
            pending: None,
        }
    }

    /// Queue `task` for the next frame, cancelling whatever was pending.
    pub fn schedule(&mut self, task: T) -> FrameHandle {
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        if let Some((replaced, _)) = self.pending.replace((handle, task)) {
            tracing::trace!(?replaced, ?handle, "coalesced pending frame");
        }
        handle
    }

    /// Called on the frame tick; hands out the pending task, if any.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(_, task)| task)
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending_handle(&self) -> Option<FrameHandle> {
        self.pending.as_ref().map(|(handle, _)| *handle)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_schedule_wins() {
        let mut queue = FrameQueue::new();
        let first = queue.schedule(1);
        let second = queue.schedule(2);
        assert_ne!(first, second);
        assert_eq!(queue.pending_handle(), Some(second));
        assert_eq!(queue.take(), Some(2));
        assert_eq!(queue.take(), None);
    }

    #[test]
    fn test_cancel() {
        let mut queue = FrameQueue::new();
        assert!(!queue.cancel());
        queue.schedule("move");
        assert!(queue.is_pending());
        assert!(queue.cancel());
        assert!(!queue.is_pending());
        assert_eq!(queue.take(), None);
    }
}
