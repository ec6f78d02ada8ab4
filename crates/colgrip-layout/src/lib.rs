#![forbid(unsafe_code)]

//! Column geometry, width constraints, and the resize session machine.
//!
//! - [`column`]: column identity, per-type default bounds, resolved column set.
//! - [`width_store`]: current width per column plus sticky left offsets.
//! - [`constraint`]: pure clamping for the `fit` and `expand` policies.
//! - [`session`]: drag session geometry and the `Idle -> Armed -> Dragging`
//!   lifecycle machine.

pub mod column;
pub mod constraint;
pub mod session;
pub mod width_store;

pub use column::{
    ColumnId, ColumnModelError, ColumnSet, ColumnSpec, ColumnType, TypeDefaults, WidthBounds,
};
pub use constraint::{ColumnExtent, ResizePolicy, Resolution};
pub use session::{
    CancelReason, DragSession, Finished, InputSource, NoopReason, ResizeEffect, ResizeInput,
    ResizeMachine, ResizePhase, ResizeTransition, SessionStart,
};
pub use width_store::{ColumnGeometry, WidthEntry, WidthSnapshot, WidthStore};
