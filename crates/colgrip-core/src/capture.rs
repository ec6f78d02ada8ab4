#![forbid(unsafe_code)]

//! Input-capture port.
//!
//! While a column boundary is being dragged, every move/up event for the
//! initiating pointer must reach the resize controller even when the pointer
//! leaves the handle. Hosts provide that routing through [`InputCapture`]:
//! web hosts map it to `setPointerCapture()` / `releasePointerCapture()`,
//! native toolkits to a pointer grab, terminal hosts to a synthetic grab.
//!
//! The controller releases every capture it acquired on all exit paths
//! (commit, cancel, lost capture, teardown).

use std::collections::BTreeSet;

use crate::event::PointerId;

/// Host routing of pointer events to the active resize session.
pub trait InputCapture {
    /// Route all events of `pointer` to the session.
    ///
    /// Returns `false` if the host could not capture the pointer. The session
    /// still proceeds; only a successfully acquired capture is released.
    fn acquire(&mut self, pointer: PointerId) -> bool;

    /// Stop routing events of `pointer` to the session.
    fn release(&mut self, pointer: PointerId);
}

/// Capture command recorded for hosts that apply capture asynchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCommand {
    Acquire { pointer: PointerId },
    Release { pointer: PointerId },
}

/// [`InputCapture`] implementation that records commands.
///
/// Hosts that cannot capture synchronously (for example a JS bridge) drain
/// the recorded commands after each dispatch and apply them natively.
#[derive(Debug, Clone, Default)]
pub struct CaptureLog {
    commands: Vec<CaptureCommand>,
    held: BTreeSet<PointerId>,
    refuse: bool,
}

impl CaptureLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log whose `acquire` always reports failure.
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Commands recorded so far, oldest first.
    #[must_use]
    pub fn commands(&self) -> &[CaptureCommand] {
        &self.commands
    }

    /// Take all recorded commands.
    pub fn drain(&mut self) -> Vec<CaptureCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Whether `pointer` is currently captured.
    #[must_use]
    pub fn is_held(&self, pointer: PointerId) -> bool {
        self.held.contains(&pointer)
    }

    /// Whether any pointer is currently captured.
    #[must_use]
    pub fn any_held(&self) -> bool {
        !self.held.is_empty()
    }
}

impl InputCapture for CaptureLog {
    fn acquire(&mut self, pointer: PointerId) -> bool {
        self.commands.push(CaptureCommand::Acquire { pointer });
        if self.refuse {
            tracing::debug!(%pointer, "pointer capture refused");
            return false;
        }
        self.held.insert(pointer);
        true
    }

    fn release(&mut self, pointer: PointerId) {
        self.commands.push(CaptureCommand::Release { pointer });
        self.held.remove(&pointer);
    }
}

impl<C: InputCapture + ?Sized> InputCapture for &mut C {
    fn acquire(&mut self, pointer: PointerId) -> bool {
        (**self).acquire(pointer)
    }

    fn release(&mut self, pointer: PointerId) {
        (**self).release(pointer);
    }
}

/// Capture port for hosts without pointer capture (e.g. keyboard-only).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl InputCapture for NoCapture {
    fn acquire(&mut self, _pointer: PointerId) -> bool {
        false
    }

    fn release(&mut self, _pointer: PointerId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(raw: u32) -> PointerId {
        PointerId::new(raw).expect("test pointer id must be non-zero")
    }

    #[test]
    fn log_records_acquire_and_release() {
        let mut log = CaptureLog::new();
        assert!(log.acquire(pointer(3)));
        assert!(log.is_held(pointer(3)));
        log.release(pointer(3));
        assert!(!log.any_held());
        assert_eq!(
            log.drain(),
            vec![
                CaptureCommand::Acquire { pointer: pointer(3) },
                CaptureCommand::Release { pointer: pointer(3) },
            ]
        );
        assert!(log.commands().is_empty());
    }

    #[test]
    fn refusing_log_never_holds() {
        let mut log = CaptureLog::refusing();
        assert!(!log.acquire(pointer(1)));
        assert!(!log.is_held(pointer(1)));
        assert_eq!(log.commands().len(), 1);
    }

    #[test]
    fn no_capture_reports_failure() {
        let mut capture = NoCapture;
        assert!(!capture.acquire(pointer(9)));
        capture.release(pointer(9));
    }
}
