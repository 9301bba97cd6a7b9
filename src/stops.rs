//! Stop grids for aperture, shutter speed, and ISO.
//!
//! Every grid is built from a third-stop scale anchored on a full stop:
//!
//! | Kind | Range | Exact value at third-stop index `k` |
//! |------|-------|-------------------------------------|
//! | Aperture | f/1 … f/32 | `2^(k/6)` |
//! | Shutter | 1/8000 s … 30 s | `2^(k/3)` seconds |
//! | ISO | 25 … 102400 | `100 · 2^(k/3)` |
//!
//! Full-stop grids take every third element of the third-stop scale, so the
//! full-stop sequence is always a subsequence of the third-stop one.
//!
//! ## Exact Values vs. Markings
//!
//! Cameras mark stops with rounded numbers: `1/125` is really `2^-7 = 1/128`,
//! `f/5.6` is really `2^2.5 ≈ 5.657`. Each [`Stop`] pairs the exact value
//! (what arithmetic uses) with the conventional marking (what people read).
//! The marking is a fixed table entry, never derived from the value, and the
//! value is never parsed back out of the marking. Doing arithmetic on the
//! markings drifts by several percent across a handful of stops.

use crate::types::{ParameterKind, StopIncrement};
use serde::Serialize;

/// Two values closer than this (in stops) are the same grid position.
pub const ON_GRID_TOLERANCE: f64 = 1e-9;

const APERTURE_MARKINGS: [&str; 31] = [
    "f/1", "f/1.1", "f/1.2", "f/1.4", "f/1.6", "f/1.8", "f/2", "f/2.2", "f/2.5", "f/2.8",
    "f/3.2", "f/3.5", "f/4", "f/4.5", "f/5", "f/5.6", "f/6.3", "f/7.1", "f/8", "f/9", "f/10",
    "f/11", "f/13", "f/14", "f/16", "f/18", "f/20", "f/22", "f/25", "f/29", "f/32",
];

const SHUTTER_MARKINGS: [&str; 55] = [
    "1/8000", "1/6400", "1/5000", "1/4000", "1/3200", "1/2500", "1/2000", "1/1600", "1/1250",
    "1/1000", "1/800", "1/640", "1/500", "1/400", "1/320", "1/250", "1/200", "1/160", "1/125",
    "1/100", "1/80", "1/60", "1/50", "1/40", "1/30", "1/25", "1/20", "1/15", "1/13", "1/10",
    "1/8", "1/6", "1/5", "1/4", "1/3", "1/2.5", "1/2", "1/1.6", "1/1.3", "1\"", "1.3\"",
    "1.6\"", "2\"", "2.5\"", "3.2\"", "4\"", "5\"", "6\"", "8\"", "10\"", "13\"", "15\"",
    "20\"", "25\"", "30\"",
];

const ISO_MARKINGS: [&str; 37] = [
    "25", "32", "40", "50", "64", "80", "100", "125", "160", "200", "250", "320", "400", "500",
    "640", "800", "1000", "1250", "1600", "2000", "2500", "3200", "4000", "5000", "6400",
    "8000", "10000", "12800", "16000", "20000", "25600", "32000", "40000", "51200", "64000",
    "80000", "102400",
];

/// A third-stop scale: its markings, and the third-stop index of the first one.
struct Scale {
    first_third: i32,
    markings: &'static [&'static str],
}

impl Scale {
    fn of(kind: ParameterKind) -> Self {
        match kind {
            ParameterKind::Aperture => Self {
                first_third: 0,
                markings: &APERTURE_MARKINGS,
            },
            ParameterKind::Shutter => Self {
                first_third: -39,
                markings: &SHUTTER_MARKINGS,
            },
            ParameterKind::Iso => Self {
                first_third: -6,
                markings: &ISO_MARKINGS,
            },
        }
    }
}

/// Exact value of a parameter at a given third-stop index relative to the
/// reference point (f/1, 1 s, ISO 100).
fn exact_value(kind: ParameterKind, third: i32) -> f64 {
    let thirds = f64::from(third);
    match kind {
        // One aperture stop is a factor of √2 in f-number.
        ParameterKind::Aperture => (thirds / 6.0).exp2(),
        ParameterKind::Shutter => (thirds / 3.0).exp2(),
        ParameterKind::Iso => 100.0 * (thirds / 3.0).exp2(),
    }
}

/// One legal value on a stop grid: the exact number plus its marking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stop {
    /// Exact value used in all arithmetic.
    pub value: f64,
    /// Conventional marking, e.g. `"f/5.6"`, `"1/125"`, `"30\""`, `"400"`.
    pub label: &'static str,
}

/// The ordered, strictly increasing set of legal values for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopGrid {
    kind: ParameterKind,
    increment: StopIncrement,
    stops: Vec<Stop>,
}

impl StopGrid {
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn increment(&self) -> StopIncrement {
        self.increment
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Smallest value (widest aperture, fastest shutter, lowest ISO).
    pub fn min(&self) -> Option<Stop> {
        self.stops.first().copied()
    }

    /// Largest value (narrowest aperture, slowest shutter, highest ISO).
    pub fn max(&self) -> Option<Stop> {
        self.stops.last().copied()
    }

    /// Index of the grid element equal to `value` (within [`ON_GRID_TOLERANCE`] stops).
    pub fn position(&self, value: f64) -> Option<usize> {
        if !(value > 0.0 && value.is_finite()) {
            return None;
        }
        let target = value.log2();
        self.stops
            .iter()
            .position(|stop| (stop.value.log2() - target).abs() <= ON_GRID_TOLERANCE)
    }

    /// The grid element equal to `value`, if there is one.
    pub fn stop_at(&self, value: f64) -> Option<Stop> {
        self.position(value).map(|i| self.stops[i])
    }

    pub fn contains(&self, value: f64) -> bool {
        self.position(value).is_some()
    }

    /// Resolve a user-typed marking to its grid element.
    ///
    /// Prefixes and suffixes that people commonly type are ignored:
    /// - aperture: `"f/16"`, `"F16"`, `"16"`
    /// - shutter: `"1/125"`, `"2\""`, `"2s"`, `"2"`
    /// - ISO: `"400"`, `"ISO 400"`
    ///
    /// Numeric spellings also match (`"5.60"` finds `f/5.6`).
    pub fn find_label(&self, text: &str) -> Option<Stop> {
        let wanted = normalize_marking(self.kind, text);
        let wanted_number = wanted.parse::<f64>().ok();
        self.stops.iter().copied().find(|stop| {
            let have = normalize_marking(self.kind, stop.label);
            have == wanted
                || matches!(
                    (wanted_number, have.parse::<f64>().ok()),
                    (Some(a), Some(b)) if a == b
                )
        })
    }
}

fn normalize_marking(kind: ParameterKind, text: &str) -> String {
    let lowered = text.trim().to_ascii_lowercase();
    let stripped = match kind {
        ParameterKind::Aperture => lowered
            .strip_prefix("f/")
            .or_else(|| lowered.strip_prefix('f'))
            .unwrap_or(lowered.as_str()),
        ParameterKind::Shutter => lowered
            .strip_suffix('"')
            .or_else(|| lowered.strip_suffix('s'))
            .unwrap_or(lowered.as_str()),
        ParameterKind::Iso => lowered.strip_prefix("iso").unwrap_or(lowered.as_str()),
    };
    stripped.trim().to_string()
}

/// Build the grid of legal values for `kind` at the given increment.
pub fn generate_grid(kind: ParameterKind, increment: StopIncrement) -> StopGrid {
    let scale = Scale::of(kind);
    let stops = scale
        .markings
        .iter()
        .enumerate()
        .step_by(increment.thirds_per_step())
        .map(|(i, &label)| {
            let third = scale.first_third + i as i32;
            Stop {
                value: exact_value(kind, third),
                label,
            }
        })
        .collect();
    StopGrid {
        kind,
        increment,
        stops,
    }
}

/// `(exact value, marking)` pairs for populating a selection control.
pub fn get_stop_options(kind: ParameterKind, increment: StopIncrement) -> Vec<(f64, &'static str)> {
    generate_grid(kind, increment)
        .stops
        .into_iter()
        .map(|stop| (stop.value, stop.label))
        .collect()
}
