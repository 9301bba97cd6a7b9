//! Nearest-value snapping onto a stop grid.
//!
//! Distance is measured in stops (`|log2(value) − log2(candidate)|`), not
//! linearly: 1/88 s snaps to 1/64 on a full-stop grid even though it is
//! numerically closer to 1/128. Exact equidistance resolves to the lower
//! candidate.
//!
//! Values beyond either end of the grid clamp to that end and carry a
//! [`Clamp`] marker. Clamping is not an error: the boundary is still the best
//! available setting, and the caller decides how to surface it.

use crate::stops::{ON_GRID_TOLERANCE, Stop, StopGrid};
use serde::Serialize;

/// Two distances closer than this (in stops) count as a tie.
const TIE_TOLERANCE: f64 = 1e-12;

/// Which end of the grid a value was clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Clamp {
    /// The value was smaller than the grid minimum.
    Below,
    /// The value was larger than the grid maximum.
    Above,
}

/// The result of snapping a value onto a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    /// Index of the chosen stop within the grid.
    pub index: usize,
    pub stop: Stop,
    /// Set when the value lay outside the grid.
    pub clamp: Option<Clamp>,
}

/// Snap `value` onto the nearest stop of `grid`.
///
/// Returns `None` for an empty grid, or when `value` is not positive and
/// finite (no setting is nearest to those).
pub fn snap(value: f64, grid: &StopGrid) -> Option<Snapped> {
    if !(value > 0.0 && value.is_finite()) {
        return None;
    }
    let stops = grid.stops();
    let last = stops.len().checked_sub(1)?;
    let target = value.log2();

    if target < stops[0].value.log2() - ON_GRID_TOLERANCE {
        return Some(Snapped {
            index: 0,
            stop: stops[0],
            clamp: Some(Clamp::Below),
        });
    }
    if target > stops[last].value.log2() + ON_GRID_TOLERANCE {
        return Some(Snapped {
            index: last,
            stop: stops[last],
            clamp: Some(Clamp::Above),
        });
    }

    // Grid is ascending: only a strictly closer candidate may replace the
    // current best, so ties keep the lower one.
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, stop) in stops.iter().enumerate() {
        let distance = (target - stop.value.log2()).abs();
        if distance < best_distance - TIE_TOLERANCE {
            best = i;
            best_distance = distance;
        }
    }
    tracing::trace!(
        value,
        label = stops[best].label,
        distance = best_distance,
        "snapped onto {} grid",
        grid.kind()
    );
    Some(Snapped {
        index: best,
        stop: stops[best],
        clamp: None,
    })
}
