//! Width clamping for the two resize policies.
//!
//! Every function here is pure. Inputs are the geometry measured when the
//! session started plus the accumulated logical delta (already mirrored for
//! right-to-left documents); outputs are widths that never violate a
//! column's bounds.
//!
//! # Policies
//!
//! - **fit**: the grid's total width is constant. The dragged column and its
//!   right neighbour co-vary, so `width + next_width` always equals the sum
//!   of their start widths.
//! - **expand**: only the dragged column changes and the host grows or
//!   shrinks by exactly `width - start_width`.
//!
//! Arithmetic runs in `i64` so extreme deltas cannot wrap.

use serde::{Deserialize, Serialize};

use crate::column::WidthBounds;

/// Resize policy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Redistribute width between the column and its right neighbour.
    Fit,
    /// Grow or shrink the column and the host together.
    #[default]
    Expand,
}

/// A column's start width together with its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnExtent {
    pub start_width: u32,
    pub bounds: WidthBounds,
}

impl ColumnExtent {
    #[must_use]
    pub const fn new(start_width: u32, bounds: WidthBounds) -> Self {
        Self {
            start_width,
            bounds,
        }
    }
}

/// Clamped outcome of applying a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Policy that produced this result (fit falls back to expand without a
    /// neighbour).
    pub policy: ResizePolicy,
    pub width: u32,
    /// Neighbour width; only present under `fit`.
    pub next_width: Option<u32>,
    /// `width - start_width` after clamping.
    pub applied_delta: i32,
    /// Change the host container's total width must receive.
    pub host_delta: i32,
}

fn saturating_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Legal logical-delta interval for a fit-mode pair, or `None` when the
/// start geometry leaves no delta that satisfies both columns' bounds.
#[must_use]
pub fn fit_delta_range(active: ColumnExtent, next: ColumnExtent) -> Option<(i64, i64)> {
    let start = i64::from(active.start_width);
    let next_start = i64::from(next.start_width);

    let mut low = i64::from(active.bounds.min) - start;
    let mut high = next_start - i64::from(next.bounds.min);
    if let Some(next_max) = next.bounds.max {
        low = low.max(next_start - i64::from(next_max));
    }
    if let Some(max) = active.bounds.max {
        high = high.min(i64::from(max) - start);
    }

    (low <= high).then_some((low, high))
}

/// Fit policy: the pair's combined width is conserved.
#[must_use]
pub fn fit(delta: i32, active: ColumnExtent, next: ColumnExtent) -> Resolution {
    let start = i64::from(active.start_width);
    let next_start = i64::from(next.start_width);

    let (width, next_width) = match fit_delta_range(active, next) {
        Some((low, high)) => {
            let delta = i64::from(delta).clamp(low, high);
            // Both results lie inside their bounds because `delta` does.
            (
                active.bounds.clamp(start + delta),
                next.bounds.clamp(next_start - delta),
            )
        }
        None => {
            // Start geometry already violates a bound; bounds win over
            // conservation.
            tracing::debug!(
                start_width = active.start_width,
                next_start_width = next.start_width,
                "fit resize has no legal delta; clamping columns independently"
            );
            (
                active.bounds.clamp(start + i64::from(delta)),
                next.bounds.clamp(next_start - i64::from(delta)),
            )
        }
    };

    Resolution {
        policy: ResizePolicy::Fit,
        width,
        next_width: Some(next_width),
        applied_delta: saturating_i32(i64::from(width) - start),
        host_delta: saturating_i32(
            (i64::from(width) + i64::from(next_width)) - (start + next_start),
        ),
    }
}

/// Expand policy: only the active column changes.
#[must_use]
pub fn expand(delta: i32, active: ColumnExtent) -> Resolution {
    let start = i64::from(active.start_width);
    let width = active.bounds.clamp(start + i64::from(delta));
    let applied = saturating_i32(i64::from(width) - start);
    Resolution {
        policy: ResizePolicy::Expand,
        width,
        next_width: None,
        applied_delta: applied,
        host_delta: applied,
    }
}

/// Apply `policy`, falling back to expand when fit has no neighbour.
#[must_use]
pub fn resolve(
    policy: ResizePolicy,
    delta: i32,
    active: ColumnExtent,
    next: Option<ColumnExtent>,
) -> Resolution {
    match (policy, next) {
        (ResizePolicy::Fit, Some(next)) => fit(delta, active, next),
        _ => expand(delta, active),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(start: u32, min: u32) -> ColumnExtent {
        ColumnExtent::new(start, WidthBounds::at_least(min))
    }

    #[test]
    fn fit_basic_drag() {
        let result = fit(50, extent(200, 50), extent(300, 50));
        assert_eq!(result.width, 250);
        assert_eq!(result.next_width, Some(250));
        assert_eq!(result.applied_delta, 50);
        assert_eq!(result.host_delta, 0);
    }

    #[test]
    fn fit_clamps_neighbour_at_minimum() {
        let result = fit(1000, extent(200, 50), extent(300, 50));
        assert_eq!(result.width, 450);
        assert_eq!(result.next_width, Some(50));
        assert_eq!(result.applied_delta, 250);
    }

    #[test]
    fn fit_clamps_active_at_minimum() {
        let result = fit(-1000, extent(200, 50), extent(300, 50));
        assert_eq!(result.width, 50);
        assert_eq!(result.next_width, Some(450));
    }

    #[test]
    fn fit_respects_both_maxima() {
        let active = ColumnExtent::new(200, WidthBounds::new(50, Some(260)));
        let next = ColumnExtent::new(300, WidthBounds::new(50, Some(320)));

        let grow = fit(100, active, next);
        assert_eq!((grow.width, grow.next_width), (260, Some(240)));

        let shrink = fit(-100, active, next);
        // Neighbour may only grow to 320, so the column stops at 180.
        assert_eq!((shrink.width, shrink.next_width), (180, Some(320)));
    }

    #[test]
    fn fit_with_inconsistent_start_clamps_independently() {
        // Both columns already below their minimum.
        let result = fit(0, extent(10, 50), extent(20, 50));
        assert_eq!(result.width, 50);
        assert_eq!(result.next_width, Some(50));
        assert!(fit_delta_range(extent(10, 50), extent(20, 50)).is_none());
    }

    #[test]
    fn expand_growth_reports_host_delta() {
        let result = expand(80, extent(200, 50));
        assert_eq!(result.width, 280);
        assert_eq!(result.host_delta, 80);
        assert_eq!(result.next_width, None);
    }

    #[test]
    fn expand_clamps_to_min_and_max() {
        let bounded = ColumnExtent::new(200, WidthBounds::new(50, Some(240)));
        assert_eq!(expand(-500, bounded).width, 50);
        assert_eq!(expand(-500, bounded).host_delta, -150);
        assert_eq!(expand(500, bounded).width, 240);
    }

    #[test]
    fn expand_never_goes_negative_on_extreme_delta() {
        let result = expand(i32::MIN, extent(200, 0));
        assert_eq!(result.width, 0);
        assert_eq!(result.applied_delta, -200);
    }

    #[test]
    fn resolve_falls_back_to_expand_without_neighbour() {
        let result = resolve(ResizePolicy::Fit, 40, extent(300, 50), None);
        assert_eq!(result.policy, ResizePolicy::Expand);
        assert_eq!(result.width, 340);
        assert_eq!(result.host_delta, 40);
    }

    #[test]
    fn resolve_expand_ignores_neighbour() {
        let result = resolve(
            ResizePolicy::Expand,
            40,
            extent(200, 50),
            Some(extent(300, 50)),
        );
        assert_eq!(result.next_width, None);
        assert_eq!(result.width, 240);
    }
}
