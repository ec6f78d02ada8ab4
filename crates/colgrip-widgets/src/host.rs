#![forbid(unsafe_code)]

//! Host measurement port.
//!
//! Start widths of a drag are measured from the live layout rather than the
//! width store, because the store is only written at commit points and the
//! host may have reflowed since.

use std::collections::BTreeMap;

use colgrip_core::direction::TextDirection;
use colgrip_layout::ColumnId;

/// Read access to the host's live layout.
pub trait ColumnHost {
    /// Rendered width of a column header, or `None` if it is not laid out.
    fn measure_width(&self, id: &ColumnId) -> Option<u32>;

    /// Direction the grid is currently laid out in.
    fn direction(&self) -> TextDirection;

    /// Measured widths of `ids`, skipping columns that are not laid out.
    fn measure_all<'a>(&self, ids: impl IntoIterator<Item = &'a ColumnId>) -> BTreeMap<ColumnId, u32>
    where
        Self: Sized,
    {
        ids.into_iter()
            .filter_map(|id| self.measure_width(id).map(|width| (id.clone(), width)))
            .collect()
    }
}

/// Map-backed [`ColumnHost`].
///
/// Native hosts refresh it after each layout pass; tests use it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasuredLayout {
    widths: BTreeMap<ColumnId, u32>,
    direction: TextDirection,
}

impl MeasuredLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout with the given widths.
    #[must_use]
    pub fn from_widths<I, K>(widths: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<ColumnId>,
    {
        Self {
            widths: widths
                .into_iter()
                .map(|(id, width)| (id.into(), width))
                .collect(),
            direction: TextDirection::Ltr,
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn set_direction(&mut self, direction: TextDirection) {
        self.direction = direction;
    }

    pub fn set_width(&mut self, id: impl Into<ColumnId>, width: u32) {
        self.widths.insert(id.into(), width);
    }

    /// Drop a column from the layout (e.g. it was hidden).
    pub fn remove(&mut self, id: &str) {
        self.widths.remove(id);
    }

    #[must_use]
    pub fn widths(&self) -> &BTreeMap<ColumnId, u32> {
        &self.widths
    }
}

impl ColumnHost for MeasuredLayout {
    fn measure_width(&self, id: &ColumnId) -> Option<u32> {
        self.widths.get(id).copied()
    }

    fn direction(&self) -> TextDirection {
        self.direction
    }
}

impl<H: ColumnHost + ?Sized> ColumnHost for &H {
    fn measure_width(&self, id: &ColumnId) -> Option<u32> {
        (**self).measure_width(id)
    }

    fn direction(&self) -> TextDirection {
        (**self).direction()
    }
}
