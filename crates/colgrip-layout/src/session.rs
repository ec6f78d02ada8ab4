//! Drag session geometry and the resize lifecycle machine.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle
//!    \------> Idle (commit/cancel from Armed)
//! ```
//!
//! The machine only tracks positions and decides transitions; it never
//! touches the width store, the host, or capture. Every applied input yields
//! a [`ResizeTransition`], including explicit no-ops, so callers can log the
//! exact reason an input was ignored.

use colgrip_core::direction::TextDirection;
use colgrip_core::event::PointerId;
use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::constraint::{self, ColumnExtent, ResizePolicy, Resolution};

/// Producer of a session's input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Pointer,
    /// Begin/move/end synthesized from one arrow-key press.
    Keyboard,
}

/// Geometry and identity of one resize gesture.
///
/// Start widths are measured from the live layout when the session begins
/// and are never re-read from the width store mid-drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSession {
    pub column_id: ColumnId,
    pub column_index: usize,
    pub next_column_id: Option<ColumnId>,
    pub pointer: PointerId,
    pub source: InputSource,
    pub start_x: i32,
    pub current_x: i32,
    pub active: ColumnExtent,
    pub next: Option<ColumnExtent>,
    /// Policy requested by configuration.
    pub requested_policy: ResizePolicy,
    /// Policy in effect for this session.
    pub policy: ResizePolicy,
    /// Direction captured at session start.
    pub direction: TextDirection,
}

/// Parameters for [`DragSession::new`].
#[derive(Debug, Clone)]
pub struct SessionStart {
    pub column_id: ColumnId,
    pub column_index: usize,
    pub pointer: PointerId,
    pub source: InputSource,
    pub start_x: i32,
    pub active: ColumnExtent,
    /// Right neighbour id and geometry, if the column has one.
    pub next: Option<(ColumnId, ColumnExtent)>,
    pub policy: ResizePolicy,
    pub direction: TextDirection,
}

impl DragSession {
    /// Build a session, downgrading `fit` to `expand` for the last column.
    ///
    /// Under `expand` the neighbour plays no part and is dropped.
    #[must_use]
    pub fn new(start: SessionStart) -> Self {
        let (policy, next) = match (start.policy, start.next) {
            (ResizePolicy::Fit, Some(next)) => (ResizePolicy::Fit, Some(next)),
            (ResizePolicy::Fit, None) => {
                tracing::debug!(
                    column = %start.column_id,
                    "last column has no neighbour; fit resize falls back to expand"
                );
                (ResizePolicy::Expand, None)
            }
            (ResizePolicy::Expand, _) => (ResizePolicy::Expand, None),
        };
        let (next_column_id, next) = next.map_or((None, None), |(id, extent)| {
            (Some(id), Some(extent))
        });
        Self {
            column_id: start.column_id,
            column_index: start.column_index,
            next_column_id,
            pointer: start.pointer,
            source: start.source,
            start_x: start.start_x,
            current_x: start.start_x,
            active: start.active,
            next,
            requested_policy: start.policy,
            policy,
            direction: start.direction,
        }
    }

    #[must_use]
    pub fn start_width(&self) -> u32 {
        self.active.start_width
    }

    #[must_use]
    pub fn next_start_width(&self) -> Option<u32> {
        self.next.map(|next| next.start_width)
    }

    /// Whether a `fit` request was downgraded to `expand`.
    #[must_use]
    pub fn fell_back_to_expand(&self) -> bool {
        self.requested_policy == ResizePolicy::Fit && self.policy == ResizePolicy::Expand
    }

    /// Accumulated screen-space delta since the session started.
    #[must_use]
    pub fn screen_delta(&self) -> i32 {
        self.current_x.saturating_sub(self.start_x)
    }

    /// Accumulated delta in growth direction (mirrored for RTL).
    #[must_use]
    pub fn logical_delta(&self) -> i32 {
        self.direction.mirror(self.screen_delta())
    }

    /// Clamped widths for the current position.
    #[must_use]
    pub fn resolve(&self) -> Resolution {
        constraint::resolve(self.policy, self.logical_delta(), self.active, self.next)
    }

    /// Screen coordinate of the drag indicator for `resolution`.
    ///
    /// The clamped logical delta is mirrored back into screen space, so the
    /// indicator stops where the clamp stops even if the pointer keeps going.
    #[must_use]
    pub fn indicator_x(&self, resolution: &Resolution) -> i32 {
        self.start_x
            .saturating_add(self.direction.mirror(resolution.applied_delta))
    }
}

/// Externally visible lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePhase {
    Idle,
    Armed,
    Dragging,
}

/// Canonical reasons a session ends without a pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    EscapeKey,
    PointerCancel,
    FocusLost,
    Blur,
    LostCapture,
    Programmatic,
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
}

/// Input accepted by [`ResizeMachine::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeInput {
    /// A qualifying pointer-down with the session's measured geometry.
    Begin(DragSession),
    Move { pointer: PointerId, x: i32 },
    Release { pointer: PointerId, x: i32 },
    /// `pointer: None` cancels whatever session is active.
    Cancel {
        pointer: Option<PointerId>,
        reason: CancelReason,
    },
}

/// A session that reached a terminal transition, with its final widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finished {
    pub session: DragSession,
    pub resolution: Resolution,
}

/// Effect emitted by one lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ResizeEffect {
    Armed {
        column_id: ColumnId,
        pointer: PointerId,
        start_width: u32,
    },
    DragStarted {
        resolution: Resolution,
        indicator_x: i32,
    },
    DragUpdated {
        resolution: Resolution,
        indicator_x: i32,
    },
    Committed(Finished),
    Canceled {
        reason: CancelReason,
        finished: Finished,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One state-machine transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeTransition {
    pub transition_id: u64,
    pub from: ResizePhase,
    pub to: ResizePhase,
    pub effect: ResizeEffect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum MachineState {
    #[default]
    Idle,
    Armed(DragSession),
    Dragging(DragSession),
}

impl MachineState {
    const fn phase(&self) -> ResizePhase {
        match self {
            Self::Idle => ResizePhase::Idle,
            Self::Armed(_) => ResizePhase::Armed,
            Self::Dragging(_) => ResizePhase::Dragging,
        }
    }
}

/// Lifecycle machine holding the single active session.
#[derive(Debug, Clone, Default)]
pub struct ResizeMachine {
    state: MachineState,
    transition_counter: u64,
}

impl ResizeMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> ResizePhase {
        self.state.phase()
    }

    /// Whether a session is Armed or Dragging.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, MachineState::Idle)
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            MachineState::Idle => None,
            MachineState::Armed(session) | MachineState::Dragging(session) => Some(session),
        }
    }

    /// Unconditionally return to Idle.
    ///
    /// Safety valve for teardown paths. Returns the cancel transition if a
    /// session was active, `None` otherwise.
    pub fn force_cancel(&mut self) -> Option<ResizeTransition> {
        let from = self.state.phase();
        match std::mem::take(&mut self.state) {
            MachineState::Idle => None,
            MachineState::Armed(session) | MachineState::Dragging(session) => {
                let resolution = session.resolve();
                Some(self.record(
                    from,
                    ResizeEffect::Canceled {
                        reason: CancelReason::Programmatic,
                        finished: Finished {
                            session,
                            resolution,
                        },
                    },
                ))
            }
        }
    }

    /// Apply one input.
    pub fn apply(&mut self, input: ResizeInput) -> ResizeTransition {
        let from = self.state.phase();
        let state = std::mem::take(&mut self.state);
        let (state, effect) = Self::step(state, input);
        self.state = state;
        self.record(from, effect)
    }

    fn step(state: MachineState, input: ResizeInput) -> (MachineState, ResizeEffect) {
        match (state, input) {
            (MachineState::Idle, ResizeInput::Begin(session)) => {
                let effect = ResizeEffect::Armed {
                    column_id: session.column_id.clone(),
                    pointer: session.pointer,
                    start_width: session.start_width(),
                };
                (MachineState::Armed(session), effect)
            }
            (MachineState::Idle, _) => (
                MachineState::Idle,
                ResizeEffect::Noop {
                    reason: NoopReason::IdleWithoutActiveDrag,
                },
            ),
            (state, ResizeInput::Begin(_)) => (
                state,
                ResizeEffect::Noop {
                    reason: NoopReason::ActiveDragAlreadyInProgress,
                },
            ),
            (MachineState::Armed(session), ResizeInput::Move { pointer, x })
                if pointer == session.pointer =>
            {
                Self::moved(session, x, true)
            }
            (MachineState::Dragging(session), ResizeInput::Move { pointer, x })
                if pointer == session.pointer =>
            {
                Self::moved(session, x, false)
            }
            (
                MachineState::Armed(mut session) | MachineState::Dragging(mut session),
                ResizeInput::Release { pointer, x },
            ) if pointer == session.pointer => {
                session.current_x = x;
                let resolution = session.resolve();
                (
                    MachineState::Idle,
                    ResizeEffect::Committed(Finished {
                        session,
                        resolution,
                    }),
                )
            }
            (
                MachineState::Armed(session) | MachineState::Dragging(session),
                ResizeInput::Cancel { pointer, reason },
            ) if pointer.is_none_or(|pointer| pointer == session.pointer) => {
                let resolution = session.resolve();
                (
                    MachineState::Idle,
                    ResizeEffect::Canceled {
                        reason,
                        finished: Finished {
                            session,
                            resolution,
                        },
                    },
                )
            }
            (state, _) => (
                state,
                ResizeEffect::Noop {
                    reason: NoopReason::PointerMismatch,
                },
            ),
        }
    }

    fn moved(mut session: DragSession, x: i32, started: bool) -> (MachineState, ResizeEffect) {
        session.current_x = x;
        let resolution = session.resolve();
        let indicator_x = session.indicator_x(&resolution);
        let effect = if started {
            ResizeEffect::DragStarted {
                resolution,
                indicator_x,
            }
        } else {
            ResizeEffect::DragUpdated {
                resolution,
                indicator_x,
            }
        };
        (MachineState::Dragging(session), effect)
    }

    fn record(&mut self, from: ResizePhase, effect: ResizeEffect) -> ResizeTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        ResizeTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.phase(),
            effect,
        }
    }
}
