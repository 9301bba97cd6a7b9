//! Exposure chart: the ISO needed at a fixed aperture for each combination of
//! shutter speed and light condition.
//!
//! The default chart is the classic Sunny 16 table, f/16 across EV 11–16 and
//! 1/4000 s … 1/30 s:
//!
//! ```text
//!          EV 11   EV 12   EV 13   EV 14   EV 15   EV 16
//! 1/4000   51200   25600   12800    6400    3200    1600
//! 1/125     1600     800     400     200     100      50
//! 1/30       400     200     100      50      25     <25
//! ```
//!
//! Each cell keeps the full [`Solution`], so clamped cells stay
//! distinguishable from exact ones.

use crate::ev::ComputationError;
use crate::solver::{Lock, Solution, SolveError, solve};
use crate::stops::{Stop, generate_grid};
use crate::types::{ParameterKind, StopIncrement};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Light conditions (EV) shown by the default chart.
pub const DEFAULT_EVS: RangeInclusive<i32> = 11..=16;

/// Shutter speeds shown by the default chart, fastest first.
pub const DEFAULT_SHUTTERS: [&str; 8] = [
    "1/4000", "1/2000", "1/1000", "1/500", "1/250", "1/125", "1/60", "1/30",
];

/// Aperture of the default chart.
pub const DEFAULT_APERTURE: &str = "f/16";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub aperture: Stop,
    pub increment: StopIncrement,
    /// Column headings.
    pub evs: Vec<i32>,
    pub rows: Vec<ChartRow>,
}

/// One shutter speed and its ISO for every EV column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub shutter: Stop,
    pub cells: Vec<Solution>,
}

fn on_grid(kind: ParameterKind, value: f64, increment: StopIncrement) -> Result<Stop, SolveError> {
    generate_grid(kind, increment)
        .stop_at(value)
        .ok_or_else(|| {
            ComputationError::NotOnGrid {
                kind,
                value,
                increment,
            }
            .into()
        })
}

/// Solve ISO for every `(shutter, ev)` pair at a fixed aperture.
///
/// `aperture` and every entry of `shutters` must be exact values on the
/// grids for `increment`.
pub fn exposure_chart(
    aperture: f64,
    evs: &[i32],
    shutters: &[f64],
    increment: StopIncrement,
) -> Result<Chart, SolveError> {
    let aperture_stop = on_grid(ParameterKind::Aperture, aperture, increment)?;
    let rows = shutters
        .iter()
        .map(|&shutter| -> Result<ChartRow, SolveError> {
            let shutter_stop = on_grid(ParameterKind::Shutter, shutter, increment)?;
            let locks = [
                Lock::new(ParameterKind::Aperture, aperture),
                Lock::new(ParameterKind::Shutter, shutter),
            ];
            let cells = evs
                .iter()
                .map(|&ev| solve(f64::from(ev), increment, &locks))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ChartRow {
                shutter: shutter_stop,
                cells,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Chart {
        aperture: aperture_stop,
        increment,
        evs: evs.to_vec(),
        rows,
    })
}

/// The default shutter column as exact values.
pub fn default_shutters(increment: StopIncrement) -> Vec<f64> {
    let grid = generate_grid(ParameterKind::Shutter, increment);
    DEFAULT_SHUTTERS
        .iter()
        .filter_map(|label| grid.find_label(label))
        .map(|stop| stop.value)
        .collect()
}

/// The chart for `aperture` over the default EVs and shutter speeds.
pub fn chart_for_aperture(aperture: f64, increment: StopIncrement) -> Result<Chart, SolveError> {
    let evs: Vec<i32> = DEFAULT_EVS.collect();
    exposure_chart(aperture, &evs, &default_shutters(increment), increment)
}
