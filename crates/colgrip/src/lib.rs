#![forbid(unsafe_code)]

//! colgrip public facade crate.
//!
//! Re-exports the types a grid integration needs from the internal crates
//! and offers [`ResizerBuilder`], which validates column and resize
//! configuration before building a [`DragController`].

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use colgrip_core::capture::{CaptureCommand, CaptureLog, InputCapture, NoCapture};
pub use colgrip_core::direction::TextDirection;
pub use colgrip_core::event::{
    KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton, PointerId, PointerPosition,
};

// --- Layout re-exports -----------------------------------------------------

pub use colgrip_layout::{
    CancelReason, ColumnGeometry, ColumnId, ColumnModelError, ColumnSet, ColumnSpec, ColumnType,
    ResizePhase, ResizePolicy, WidthBounds, WidthEntry, WidthSnapshot, WidthStore,
};

// --- Widget re-exports -----------------------------------------------------

pub use colgrip_widgets::{
    ColumnHost, CssVariablePort, DragController, DragIndicator, EndReason, IgnoredReason,
    MeasuredLayout, RenderPort, ResizeBegin, ResizeConfig, ResizeConfigError, ResizeDispatch,
    ResizeEnd, ResizeEvent, ResizeUpdate,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for colgrip setup.
#[derive(Debug)]
pub enum Error {
    /// Resize configuration failed to load or validate.
    Config(ResizeConfigError),
    /// Column specs are inconsistent.
    Columns(ColumnModelError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "resize config: {err}"),
            Self::Columns(err) => write!(f, "column config: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Columns(err) => Some(err),
        }
    }
}

impl From<ResizeConfigError> for Error {
    fn from(err: ResizeConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ColumnModelError> for Error {
    fn from(err: ColumnModelError) -> Self {
        Self::Columns(err)
    }
}

/// Standard result type for colgrip setup APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Builder ---------------------------------------------------------------

/// Strict construction path for [`DragController`].
///
/// [`DragController::new`] repairs bad input with warnings; the builder
/// rejects it instead.
#[derive(Debug, Clone, Default)]
pub struct ResizerBuilder {
    config: ResizeConfig,
    columns: Vec<ColumnSpec>,
    measured: Option<std::collections::BTreeMap<ColumnId, u32>>,
}

impl ResizerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: ResizeConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: ResizePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    #[must_use]
    pub fn column(mut self, spec: ColumnSpec) -> Self {
        self.columns.push(spec);
        self
    }

    #[must_use]
    pub fn columns(mut self, specs: impl IntoIterator<Item = ColumnSpec>) -> Self {
        self.columns.extend(specs);
        self
    }

    /// Initial widths measured by the host before the first paint.
    #[must_use]
    pub fn measured(mut self, widths: impl IntoIterator<Item = (ColumnId, u32)>) -> Self {
        self.measured = Some(widths.into_iter().collect());
        self
    }

    /// Validate and build an initialized controller.
    pub fn build<R, C, H>(self, render: R, capture: C, host: H) -> Result<DragController<R, C, H>>
    where
        R: RenderPort,
        C: InputCapture,
        H: ColumnHost,
    {
        ColumnSet::validate(&self.columns)?;
        let config = self.config.validated()?;
        let mut controller = DragController::new(config, self.columns, render, capture, host);
        controller.initialize(self.measured.as_ref());
        tracing::debug!(
            columns = controller.columns().len(),
            "column resizer built"
        );
        Ok(controller)
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CancelReason, ColumnId, ColumnSpec, ColumnType, CssVariablePort, DragController,
        EndReason, Error, KeyCode, KeyEvent, MeasuredLayout, PointerButton, PointerId,
        PointerPosition, ResizeConfig, ResizeDispatch, ResizePolicy, ResizerBuilder, Result,
        TextDirection,
    };

    pub use crate::{core, layout, widgets};
}

pub use colgrip_core as core;
pub use colgrip_layout as layout;
pub use colgrip_widgets as widgets;
