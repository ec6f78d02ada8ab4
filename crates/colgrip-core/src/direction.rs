#![forbid(unsafe_code)]

//! Document directionality and horizontal mirroring.
//!
//! Resize deltas are computed in screen space (`pointer.x - start.x`). In a
//! right-to-left document a column's trailing edge sits on its left, so the
//! sign of the delta is inverted before it reaches the constraint engine and
//! inverted back when a clamped delta is turned into a screen coordinate.

use serde::{Deserialize, Serialize};

/// Horizontal document direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Map a host RTL flag onto a direction.
    #[must_use]
    pub const fn from_rtl(rtl: bool) -> Self {
        if rtl { Self::Rtl } else { Self::Ltr }
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// Convert a screen-space delta into a logical (growth) delta.
    ///
    /// Applying this twice yields the original value (for anything above
    /// `i32::MIN`), so the same function converts a logical delta back into
    /// screen space.
    #[must_use]
    pub const fn mirror(self, delta: i32) -> i32 {
        match self {
            Self::Ltr => delta,
            Self::Rtl => delta.saturating_neg(),
        }
    }
}
