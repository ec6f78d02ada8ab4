#![forbid(unsafe_code)]

//! Per-frame coalescing of visual updates.
//!
//! Pointer moves arrive far more often than a host can paint. Without
//! coalescing, every move would trigger an indicator repaint.
//!
//! [`FrameCoalescer`] keeps at most one pending update:
//! - The first push schedules a frame (the caller should ask the host for
//!   one).
//! - Later pushes replace the pending input and do nothing else.
//! - The frame callback takes the latest input.
//!
//! Only visual feedback goes through the coalescer. State that must survive
//! to a commit is tracked elsewhere, so discarding a pending update never
//! loses a position.
//!
//! # Usage
//!
//! ```
//! use colgrip_core::frame_coalescer::{FrameCoalescer, Scheduling};
//!
//! let mut coalescer = FrameCoalescer::new();
//! assert_eq!(coalescer.push(10), Scheduling::RequestFrame);
//! assert_eq!(coalescer.push(20), Scheduling::AlreadyPending);
//!
//! // The frame callback only sees the latest value.
//! assert_eq!(coalescer.take(), Some(20));
//! assert_eq!(coalescer.take(), None);
//! ```

/// What the caller should do after pushing an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduling {
    /// Nothing was pending; the host should schedule one frame.
    RequestFrame,
    /// A frame is already scheduled; the pending input was replaced.
    AlreadyPending,
}

/// Latest-wins buffer holding at most one pending update.
///
/// # Thread Safety
///
/// `FrameCoalescer` is not thread-safe. It lives on the single input/paint
/// thread that owns the resize controller.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    replaced: u64,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            replaced: 0,
        }
    }
}

impl<T> FrameCoalescer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `update` as the pending input.
    pub fn push(&mut self, update: T) -> Scheduling {
        match self.pending.replace(update) {
            None => Scheduling::RequestFrame,
            Some(_) => {
                self.replaced = self.replaced.saturating_add(1);
                Scheduling::AlreadyPending
            }
        }
    }

    /// Take the pending input for the current frame.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Check if an update is waiting for a frame.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Borrow the pending input without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Number of updates that were overwritten before being painted.
    #[must_use]
    pub fn replaced_count(&self) -> u64 {
        self.replaced
    }

    /// Discard the pending input, e.g. when a session ends before its frame.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
