#![forbid(unsafe_code)]

//! Resize lifecycle events and per-input dispatch records.
//!
//! [`ResizeEnd`] is the only event a persistence layer needs: it fires once
//! per session, after the width store holds the final widths.

use colgrip_core::event::PointerId;
use colgrip_layout::{CancelReason, ColumnId, NoopReason, ResizePolicy};
use serde::{Deserialize, Serialize};

/// A resize session started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeBegin {
    pub column_id: ColumnId,
    pub column_index: usize,
    pub pointer: PointerId,
    pub start_width: u32,
    /// Policy in effect for this session (after last-column fallback).
    pub policy: ResizePolicy,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Pointer released.
    Commit,
    /// Arrow-key step.
    Keyboard,
    /// Interrupted; widths soft-committed at the last known position.
    Canceled(CancelReason),
}

impl EndReason {
    #[must_use]
    pub const fn is_cancel(self) -> bool {
        matches!(self, Self::Canceled(_))
    }
}

/// A resize session ended and its widths were committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeEnd {
    pub column_id: ColumnId,
    pub column_index: usize,
    pub width: u32,
    /// Neighbour's committed width under `fit`.
    pub next_column_width: Option<u32>,
    /// `width - start_width`.
    pub delta: i32,
    /// Change applied to the host width (0 under `fit`).
    pub host_width_delta: i32,
    pub reason: EndReason,
}

/// Lifecycle event queued by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResizeEvent {
    Begin(ResizeBegin),
    End(ResizeEnd),
}

/// Live drag position after one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeUpdate {
    pub column_id: ColumnId,
    pub width: u32,
    pub next_width: Option<u32>,
    pub indicator_x: i32,
    /// Whether this move asked the host for a frame.
    pub frame_requested: bool,
}

/// Deterministic reason why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    ButtonNotAllowed,
    /// Pointer input used the id reserved for keyboard sequences.
    ReservedPointerId,
    UnknownColumn,
    ColumnNotResizable,
    ActiveSessionInProgress,
    NoActiveSession,
    PointerMismatch,
    KeyRelease,
    UnhandledKey,
}

impl From<NoopReason> for IgnoredReason {
    fn from(reason: NoopReason) -> Self {
        match reason {
            NoopReason::IdleWithoutActiveDrag => Self::NoActiveSession,
            NoopReason::ActiveDragAlreadyInProgress => Self::ActiveSessionInProgress,
            NoopReason::PointerMismatch => Self::PointerMismatch,
        }
    }
}

/// Outcome of one controller entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeDispatch {
    Began(ResizeBegin),
    Updated(ResizeUpdate),
    Ended(ResizeEnd),
    Ignored(IgnoredReason),
}

impl ResizeDispatch {
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    #[must_use]
    pub const fn ignored_reason(&self) -> Option<IgnoredReason> {
        match self {
            Self::Ignored(reason) => Some(*reason),
            _ => None,
        }
    }

    /// The end event, if this dispatch finished a session.
    #[must_use]
    pub fn ended(&self) -> Option<&ResizeEnd> {
        match self {
            Self::Ended(end) => Some(end),
            _ => None,
        }
    }
}
