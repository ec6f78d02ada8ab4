//! Column identity and width bounds.
//!
//! The grid's configuration model hands over one [`ColumnSpec`] per visible
//! column. Anything a `ColumnSpec` leaves out is filled from a static per-type
//! table, and a global minimum-width floor raises every minimum. The result
//! is a [`ColumnSet`]: the ordered, resolved view the resize engine works
//! against for the lifetime of a session.

use std::borrow::Borrow;
use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Stable identifier of a grid column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for ColumnId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl Borrow<str> for ColumnId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Content category of a column, used to look up default widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    /// Row-selection checkbox column.
    Selection,
    /// Per-row action buttons.
    Actions,
}

/// Default `{min, max, initial}` widths for a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefaults {
    pub min_width: u32,
    pub max_width: Option<u32>,
    pub initial_width: u32,
}

impl ColumnType {
    /// Static default table.
    #[must_use]
    pub const fn defaults(self) -> TypeDefaults {
        match self {
            Self::Text => TypeDefaults {
                min_width: 80,
                max_width: None,
                initial_width: 160,
            },
            Self::Number => TypeDefaults {
                min_width: 60,
                max_width: None,
                initial_width: 100,
            },
            Self::Date => TypeDefaults {
                min_width: 100,
                max_width: None,
                initial_width: 140,
            },
            Self::Boolean => TypeDefaults {
                min_width: 48,
                max_width: Some(160),
                initial_width: 72,
            },
            Self::Selection => TypeDefaults {
                min_width: 32,
                max_width: Some(64),
                initial_width: 40,
            },
            Self::Actions => TypeDefaults {
                min_width: 60,
                max_width: Some(320),
                initial_width: 96,
            },
        }
    }
}

/// Resolved width range of one column.
///
/// `max` is advisory configuration; `None` means unbounded. Construction
/// guarantees `max >= min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthBounds {
    pub min: u32,
    pub max: Option<u32>,
}

impl WidthBounds {
    /// Build bounds, raising `max` to `min` if they are inverted.
    #[must_use]
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self {
            min,
            max: max.map(|max| max.max(min)),
        }
    }

    /// Bounds with only a minimum.
    #[must_use]
    pub const fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    /// Clamp a (possibly negative or oversized) candidate into the bounds.
    ///
    /// The minimum wins if the range is somehow inverted.
    #[must_use]
    pub fn clamp(self, candidate: i64) -> u32 {
        let upper = self.max.map_or(i64::from(u32::MAX), i64::from);
        let clamped = candidate.min(upper).max(i64::from(self.min));
        u32::try_from(clamped).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn contains(self, width: u32) -> bool {
        width >= self.min && self.max.is_none_or(|max| width <= max)
    }
}

impl Default for WidthBounds {
    fn default() -> Self {
        Self::at_least(0)
    }
}

fn default_resizable() -> bool {
    true
}

/// Per-column configuration supplied by the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: ColumnId,
    #[serde(default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub initial_width: Option<u32>,
    /// Whether the column's resize handle is enabled.
    #[serde(default = "default_resizable")]
    pub resizable: bool,
}

impl ColumnSpec {
    /// A resizable column of the given type with no explicit widths.
    #[must_use]
    pub fn new(id: impl Into<ColumnId>, column_type: ColumnType) -> Self {
        Self {
            id: id.into(),
            column_type,
            min_width: None,
            max_width: None,
            initial_width: None,
            resizable: true,
        }
    }

    /// Shorthand for a text column.
    #[must_use]
    pub fn text(id: impl Into<ColumnId>) -> Self {
        Self::new(id, ColumnType::Text)
    }

    #[must_use]
    pub fn min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    #[must_use]
    pub fn max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    #[must_use]
    pub fn initial_width(mut self, width: u32) -> Self {
        self.initial_width = Some(width);
        self
    }

    #[must_use]
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Validate the explicit bounds of this spec.
    pub fn validate(&self) -> Result<(), ColumnModelError> {
        let defaults = self.column_type.defaults();
        let min = self.min_width.unwrap_or(defaults.min_width);
        if let Some(max) = self.max_width.or(defaults.max_width)
            && max < min
        {
            return Err(ColumnModelError::InvalidBounds {
                id: self.id.clone(),
                min,
                max,
            });
        }
        Ok(())
    }
}

/// Configuration-model failures reported by [`ColumnSet::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnModelError {
    DuplicateId { id: ColumnId },
    InvalidBounds { id: ColumnId, min: u32, max: u32 },
}

impl fmt::Display for ColumnModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "duplicate column id `{id}`"),
            Self::InvalidBounds { id, min, max } => {
                write!(f, "column `{id}` has max width {max} below min width {min}")
            }
        }
    }
}

impl std::error::Error for ColumnModelError {}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedColumn {
    spec: ColumnSpec,
    bounds: WidthBounds,
    initial_width: u32,
}

impl ResolvedColumn {
    fn resolve(spec: ColumnSpec, min_width_floor: u32) -> Self {
        let defaults = spec.column_type.defaults();
        let min = spec.min_width.unwrap_or(defaults.min_width).max(min_width_floor);
        let max = spec.max_width.or(defaults.max_width);
        if let Some(max) = max
            && max < min
        {
            tracing::warn!(
                column = %spec.id,
                min,
                max,
                "column max width below min width; raising max to min"
            );
        }
        let bounds = WidthBounds::new(min, max);
        let initial_width = bounds.clamp(i64::from(
            spec.initial_width.unwrap_or(defaults.initial_width),
        ));
        Self {
            spec,
            bounds,
            initial_width,
        }
    }
}

/// Ordered, resolved column configuration.
///
/// Adjacency (the "next" column of the `fit` policy) follows this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<ResolvedColumn>,
    min_width_floor: u32,
}

impl ColumnSet {
    /// Resolve `specs` against the type table and `min_width_floor`.
    ///
    /// Inconsistent bounds are repaired (max raised to min) with a warning;
    /// use [`ColumnSet::validate`] to reject them instead.
    #[must_use]
    pub fn new(specs: impl IntoIterator<Item = ColumnSpec>, min_width_floor: u32) -> Self {
        let columns = specs
            .into_iter()
            .map(|spec| ResolvedColumn::resolve(spec, min_width_floor))
            .collect();
        Self {
            columns,
            min_width_floor,
        }
    }

    /// Check raw specs for duplicate ids and inverted bounds.
    pub fn validate<'a>(
        specs: impl IntoIterator<Item = &'a ColumnSpec>,
    ) -> Result<(), ColumnModelError> {
        let mut seen = FxHashSet::default();
        for spec in specs {
            if !seen.insert(spec.id.clone()) {
                return Err(ColumnModelError::DuplicateId {
                    id: spec.id.clone(),
                });
            }
            spec.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn min_width_floor(&self) -> u32 {
        self.min_width_floor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &ColumnId> + '_ {
        self.columns.iter().map(|column| &column.spec.id)
    }

    /// Column specs in display order.
    pub fn specs(&self) -> impl Iterator<Item = &ColumnSpec> + '_ {
        self.columns.iter().map(|column| &column.spec)
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.spec.id.as_str() == id)
    }

    #[must_use]
    pub fn spec(&self, id: &str) -> Option<&ColumnSpec> {
        self.index_of(id).map(|index| &self.columns[index].spec)
    }

    /// The column immediately after `id` in display order.
    #[must_use]
    pub fn next_of(&self, id: &str) -> Option<&ColumnSpec> {
        let index = self.index_of(id)?;
        self.columns.get(index + 1).map(|column| &column.spec)
    }

    /// Resolved bounds; unknown columns get the floor as their only bound.
    #[must_use]
    pub fn bounds(&self, id: &str) -> WidthBounds {
        self.index_of(id).map_or_else(
            || WidthBounds::at_least(self.min_width_floor),
            |index| self.columns[index].bounds,
        )
    }

    /// Resolved initial width, already inside the column's bounds.
    #[must_use]
    pub fn initial_width(&self, id: &str) -> Option<u32> {
        self.index_of(id)
            .map(|index| self.columns[index].initial_width)
    }

    #[must_use]
    pub fn is_resizable(&self, id: &str) -> bool {
        self.spec(id).is_some_and(|spec| spec.resizable)
    }
}
