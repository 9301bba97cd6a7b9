//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Solve
//!
//! ```text
//! EV 15 (Sunny), full stops
//!     ISO: 100 (locked)
//!     Aperture: f/16 (locked)
//!     Shutter Speed: 1/125
//! ```
//!
//! A clamped result is flagged on its line and followed by the advisory:
//!
//! ```text
//! EV 1 (Distant city skyline at night), full stops
//!     ISO: 100 (locked)
//!     Aperture: f/16 (locked)
//!     Shutter Speed: 30" (out of range)
//! Warning: Calculated shutter speed (130s) is slower than available. ...
//! ```
//!
//! ## Stops
//!
//! ```text
//! Aperture (full stops)
//! 001 f/1
//! 002 f/1.4
//! ...
//! ```
//!
//! ## Ev
//!
//! ```text
//! EV  21  Extreme highlights: sunlit snow at high altitude
//! ...
//! EV  -6  Starlight, away from city lights
//! ```
//!
//! ## Chart
//!
//! Cells beyond the ISO range show the boundary with `<` or `>`:
//!
//! ```text
//! ISO at f/16, full stops
//!          EV 11   EV 12   EV 13   EV 14   EV 15   EV 16
//! 1/4000   51200   25600   12800    6400    3200    1600
//! 1/30       400     200     100      50      25     <25
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. `--json` output bypasses these and goes
//! through [`print_json`].

use crate::chart::Chart;
use crate::light::{self, LightCondition};
use crate::snap::Clamp;
use crate::solver::Solution;
use crate::stops::{Stop, StopGrid};
use crate::types::{ParameterKind, StopIncrement};
use serde::Serialize;

const CHART_COLUMN: usize = 7;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `"EV 15 (Sunny)"` for whole EVs in the table, `"EV 12.5"` otherwise.
fn ev_heading(ev: f64) -> String {
    let description = (ev.fract() == 0.0)
        .then(|| light::describe(ev as i32))
        .flatten();
    match description {
        Some(d) => format!("EV {ev} ({d})"),
        None => format!("EV {ev}"),
    }
}

// ============================================================================
// Solve
// ============================================================================

/// Format a solver result alongside the two locked inputs.
///
/// Lines are ordered ISO, aperture, shutter regardless of which was derived.
pub fn format_solution(
    ev: f64,
    increment: StopIncrement,
    locked: &[(ParameterKind, Stop)],
    solution: &Solution,
) -> Vec<String> {
    let mut lines = vec![format!("{}, {increment} stops", ev_heading(ev))];
    for kind in ParameterKind::ALL {
        let line = if let Some((_, stop)) = locked.iter().find(|(k, _)| *k == kind) {
            format!("{}{}: {} (locked)", indent(1), kind.title(), stop.label)
        } else if kind == solution.kind() {
            let flag = if solution.is_clamped() {
                " (out of range)"
            } else {
                ""
            };
            format!(
                "{}{}: {}{flag}",
                indent(1),
                kind.title(),
                solution.stop().label
            )
        } else {
            continue;
        };
        lines.push(line);
    }
    if let Some(warning) = solution.warning() {
        lines.push(format!("Warning: {warning}"));
    }
    lines
}

pub fn print_solution(
    ev: f64,
    increment: StopIncrement,
    locked: &[(ParameterKind, Stop)],
    solution: &Solution,
) {
    for line in format_solution(ev, increment, locked, solution) {
        println!("{}", line);
    }
}

// ============================================================================
// Stops
// ============================================================================

/// Format a grid as a numbered list of markings.
pub fn format_stops(grid: &StopGrid) -> Vec<String> {
    let mut lines = vec![format!("{} ({} stops)", grid.kind().title(), grid.increment())];
    lines.extend(
        grid.stops()
            .iter()
            .enumerate()
            .map(|(i, stop)| format!("{} {}", format_index(i + 1), stop.label)),
    );
    lines
}

pub fn print_stops(grid: &StopGrid) {
    for line in format_stops(grid) {
        println!("{}", line);
    }
}

// ============================================================================
// Ev
// ============================================================================

pub fn format_ev_options(conditions: &[LightCondition]) -> Vec<String> {
    conditions
        .iter()
        .map(|c| format!("EV {:>3}  {}", c.ev, c.description))
        .collect()
}

pub fn print_ev_options(conditions: &[LightCondition]) {
    for line in format_ev_options(conditions) {
        println!("{}", line);
    }
}

// ============================================================================
// Chart
// ============================================================================

fn chart_cell(solution: &Solution) -> String {
    let label = solution.stop().label;
    match solution.clamp() {
        None => label.to_string(),
        Some(Clamp::Below) => format!("<{label}"),
        Some(Clamp::Above) => format!(">{label}"),
    }
}

/// Format a chart as a fixed-width table, one row per shutter speed.
pub fn format_chart(chart: &Chart) -> Vec<String> {
    let shutter_width = chart
        .rows
        .iter()
        .map(|r| r.shutter.label.len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "ISO at {}, {} stops",
        chart.aperture.label, chart.increment
    )];

    let mut header = " ".repeat(shutter_width);
    for ev in &chart.evs {
        header.push_str(&format!(" {:>CHART_COLUMN$}", format!("EV {ev}")));
    }
    lines.push(header);

    for row in &chart.rows {
        let mut line = format!("{:<shutter_width$}", row.shutter.label);
        for cell in &row.cells {
            line.push_str(&format!(" {:>CHART_COLUMN$}", chart_cell(cell)));
        }
        lines.push(line);
    }
    lines
}

pub fn print_chart(chart: &Chart) {
    for line in format_chart(chart) {
        println!("{}", line);
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Print any result as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
