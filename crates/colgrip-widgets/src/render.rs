#![forbid(unsafe_code)]

//! Render port: how the resize controller talks to the host's paint layer.
//!
//! The controller never touches host elements directly. It issues the calls
//! below and the host decides how to apply them (CSS custom properties,
//! retained widget geometry, terminal cell widths).
//!
//! [`CssVariablePort`] is the reference implementation: it keeps the
//! resulting custom-property map so web hosts can flush it onto the grid
//! element, and it doubles as the inspection surface in tests.

use std::collections::BTreeMap;

use colgrip_layout::{ColumnGeometry, ColumnId};
use serde::{Deserialize, Serialize};

/// Transient drag indicator painted while a boundary is dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragIndicator {
    pub column_id: ColumnId,
    /// Screen-space x of the boundary after clamping.
    pub x: i32,
    /// Clamped width the column would commit to at this position.
    pub width: u32,
    /// Clamped neighbour width under `fit`.
    pub next_width: Option<u32>,
}

/// Paint instructions issued by the resize controller.
pub trait RenderPort {
    /// Show or move the drag indicator.
    fn paint_indicator(&mut self, indicator: &DragIndicator);

    /// Hide the drag indicator. Must be idempotent.
    fn clear_indicator(&mut self);

    /// Apply committed widths and sticky left offsets of all columns.
    fn apply_geometry(&mut self, columns: &[ColumnGeometry]);

    /// Apply the host container's total width.
    fn apply_host_width(&mut self, width: u32);

    /// Enter or leave resizing mode (cursor override, selection suppression).
    fn set_resizing(&mut self, active: bool);

    /// Ask the host to call the controller's `on_frame` once before the next
    /// paint.
    fn request_frame(&mut self);
}

/// Custom property holding the indicator's x coordinate.
pub const INDICATOR_X_PROPERTY: &str = "--colgrip-indicator-x";
/// Custom property holding the host container width.
pub const HOST_WIDTH_PROPERTY: &str = "--colgrip-host-width";

/// Custom property name for a column's width.
#[must_use]
pub fn width_property(id: &ColumnId) -> String {
    format!("--colgrip-{id}-width")
}

/// Custom property name for a column's sticky left offset.
#[must_use]
pub fn left_property(id: &ColumnId) -> String {
    format!("--colgrip-{id}-left")
}

/// [`RenderPort`] that maintains CSS custom properties.
#[derive(Debug, Clone, Default)]
pub struct CssVariablePort {
    properties: BTreeMap<String, String>,
    indicator: Option<DragIndicator>,
    resizing: bool,
    frame_requests: u64,
    geometry_paints: u64,
}

impl CssVariablePort {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a custom property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// All custom properties, sorted by name.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Width property of `id` parsed back to a number.
    #[must_use]
    pub fn column_width(&self, id: &ColumnId) -> Option<u32> {
        self.px_value(&width_property(id))
    }

    #[must_use]
    pub fn column_left(&self, id: &ColumnId) -> Option<u32> {
        self.px_value(&left_property(id))
    }

    #[must_use]
    pub fn host_width(&self) -> Option<u32> {
        self.px_value(HOST_WIDTH_PROPERTY)
    }

    #[must_use]
    pub fn indicator(&self) -> Option<&DragIndicator> {
        self.indicator.as_ref()
    }

    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        self.resizing
    }

    /// Number of `request_frame` calls so far.
    #[must_use]
    pub const fn frame_requests(&self) -> u64 {
        self.frame_requests
    }

    /// Number of `apply_geometry` calls so far.
    #[must_use]
    pub const fn geometry_paints(&self) -> u64 {
        self.geometry_paints
    }

    /// Render the properties as a CSS declaration block body.
    #[must_use]
    pub fn to_style(&self) -> String {
        self.properties
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn px_value(&self, name: &str) -> Option<u32> {
        self.property(name)?.strip_suffix("px")?.parse().ok()
    }

    fn set_px(&mut self, name: String, value: impl std::fmt::Display) {
        self.properties.insert(name, format!("{value}px"));
    }
}

impl RenderPort for CssVariablePort {
    fn paint_indicator(&mut self, indicator: &DragIndicator) {
        self.set_px(INDICATOR_X_PROPERTY.to_owned(), indicator.x);
        self.indicator = Some(indicator.clone());
    }

    fn clear_indicator(&mut self) {
        self.properties.remove(INDICATOR_X_PROPERTY);
        self.indicator = None;
    }

    fn apply_geometry(&mut self, columns: &[ColumnGeometry]) {
        for column in columns {
            self.set_px(width_property(&column.id), column.width);
            self.set_px(left_property(&column.id), column.left);
        }
        self.geometry_paints += 1;
    }

    fn apply_host_width(&mut self, width: u32) {
        self.set_px(HOST_WIDTH_PROPERTY.to_owned(), width);
    }

    fn set_resizing(&mut self, active: bool) {
        self.resizing = active;
    }

    fn request_frame(&mut self) {
        self.frame_requests += 1;
    }
}

impl<R: RenderPort + ?Sized> RenderPort for &mut R {
    fn paint_indicator(&mut self, indicator: &DragIndicator) {
        (**self).paint_indicator(indicator);
    }

    fn clear_indicator(&mut self) {
        (**self).clear_indicator();
    }

    fn apply_geometry(&mut self, columns: &[ColumnGeometry]) {
        (**self).apply_geometry(columns);
    }

    fn apply_host_width(&mut self, width: u32) {
        (**self).apply_host_width(width);
    }

    fn set_resizing(&mut self, active: bool) {
        (**self).set_resizing(active);
    }

    fn request_frame(&mut self) {
        (**self).request_frame();
    }
}
