#![forbid(unsafe_code)]

//! Drag controller and host ports for interactive column resizing.
//!
//! The [`DragController`] drives one grid's resize interactions through
//! three host-provided ports:
//!
//! - [`RenderPort`] receives paint instructions ([`CssVariablePort`] keeps
//!   them as CSS custom properties).
//! - [`InputCapture`](colgrip_core::capture::InputCapture) routes a
//!   pointer's events to the active session.
//! - [`ColumnHost`] measures the live layout ([`MeasuredLayout`] is a
//!   map-backed implementation).
//!
//! Configuration lives in [`ResizeConfig`]; with the default
//! `resize-config` feature it loads from TOML or JSON.

pub mod config;
pub mod controller;
pub mod events;
pub mod host;
pub mod render;

pub use config::{ResizeConfig, ResizeConfigError};
pub use controller::DragController;
pub use events::{
    EndReason, IgnoredReason, ResizeBegin, ResizeDispatch, ResizeEnd, ResizeEvent, ResizeUpdate,
};
pub use host::{ColumnHost, MeasuredLayout};
pub use render::{CssVariablePort, DragIndicator, RenderPort};
