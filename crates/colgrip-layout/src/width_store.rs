//! Current width of every column.
//!
//! [`WidthStore`] is plain storage: it performs no clamping. The resize
//! controller clamps before writing and is the only writer during the
//! widget's lifetime; renderers read it continuously.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::column::{ColumnId, ColumnSet};

/// One column's committed width plus its sticky left offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnGeometry {
    pub id: ColumnId,
    pub index: usize,
    pub width: u32,
    /// Sum of the widths of all columns before this one.
    pub left: u32,
}

/// `{ columnId, width }` entry of a [`WidthSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthEntry {
    pub id: ColumnId,
    pub width: u32,
}

/// Ordered widths, the unit of external persistence and bulk restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthSnapshot {
    pub columns: Vec<WidthEntry>,
}

impl WidthSnapshot {
    #[must_use]
    pub fn width(&self, id: &str) -> Option<u32> {
        self.columns
            .iter()
            .find(|entry| entry.id.as_str() == id)
            .map(|entry| entry.width)
    }
}

/// Width per column identifier in canonical left-to-right order.
#[derive(Debug, Clone, Default)]
pub struct WidthStore {
    order: Vec<ColumnId>,
    widths: FxHashMap<ColumnId, u32>,
}

impl WidthStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed order and widths.
    ///
    /// Columns with a usable measurement (present and non-zero) take it;
    /// everything else falls back to the configured initial width. A missing
    /// measurement table is logged and treated as "nothing measured".
    pub fn initialize(&mut self, columns: &ColumnSet, measured: Option<&BTreeMap<ColumnId, u32>>) {
        if measured.is_none() && !columns.is_empty() {
            tracing::warn!(
                columns = columns.len(),
                "column measurement unavailable; seeding widths from configuration"
            );
        }

        self.order.clear();
        self.widths.clear();
        for id in columns.ids() {
            let measured_width = measured
                .and_then(|widths| widths.get(id))
                .copied()
                .filter(|&width| width > 0);
            let width = match measured_width {
                Some(width) => width,
                None => {
                    if measured.is_some() {
                        tracing::debug!(column = %id, "no measured width; using initial width");
                    }
                    columns.initial_width(id.as_str()).unwrap_or(0)
                }
            };
            self.order.push(id.clone());
            self.widths.insert(id.clone(), width);
        }
    }

    /// Width of `id`, or 0 if the column has never been measured or seeded.
    #[must_use]
    pub fn get(&self, id: &str) -> u32 {
        self.widths.get(id).copied().unwrap_or(0)
    }

    /// Overwrite one width. Unknown ids are appended to the order.
    pub fn set(&mut self, id: &ColumnId, width: u32) {
        if self.widths.insert(id.clone(), width).is_none() {
            self.order.push(id.clone());
        }
    }

    /// Overwrite several widths.
    pub fn set_many<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (ColumnId, u32)>,
    {
        for (id, width) in entries {
            self.set(&id, width);
        }
    }

    /// Overwrite widths from a persisted snapshot.
    pub fn restore(&mut self, snapshot: &WidthSnapshot) {
        self.set_many(
            snapshot
                .columns
                .iter()
                .map(|entry| (entry.id.clone(), entry.width)),
        );
    }

    /// Ordered widths for persistence.
    #[must_use]
    pub fn to_snapshot(&self) -> WidthSnapshot {
        WidthSnapshot {
            columns: self
                .order
                .iter()
                .map(|id| WidthEntry {
                    id: id.clone(),
                    width: self.get(id.as_str()),
                })
                .collect(),
        }
    }

    /// Ordered geometry including cumulative left offsets.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ColumnGeometry> {
        let mut left = 0u32;
        self.order
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let width = self.get(id.as_str());
                let geometry = ColumnGeometry {
                    id: id.clone(),
                    index,
                    width,
                    left,
                };
                left = left.saturating_add(width);
                geometry
            })
            .collect()
    }

    /// Left offset of `id`, i.e. the summed width of the columns before it.
    #[must_use]
    pub fn left_of(&self, id: &str) -> Option<u32> {
        let index = self.index_of(id)?;
        Some(
            self.order[..index]
                .iter()
                .fold(0u32, |acc, id| acc.saturating_add(self.get(id.as_str()))),
        )
    }

    #[must_use]
    pub fn total_width(&self) -> u32 {
        self.order
            .iter()
            .fold(0u32, |acc, id| acc.saturating_add(self.get(id.as_str())))
    }

    #[must_use]
    pub fn order(&self) -> &[ColumnId] {
        &self.order
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|column| column.as_str() == id)
    }

    #[must_use]
    pub fn next_of(&self, id: &str) -> Option<&ColumnId> {
        self.order.get(self.index_of(id)? + 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
