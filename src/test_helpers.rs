//! Shared test utilities for building locks and looking up stops.
//!
//! Tests name stops by their markings (`"f/16"`, `"1/125"`) and these helpers
//! resolve them to exact grid values, panicking with a readable message when a
//! marking is not on the requested grid.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let locks = [iso(100.0), aperture_label("f/16", StopIncrement::Full)];
//! let solution = solve(15.0, StopIncrement::Full, &locks).unwrap();
//! ```

use crate::solver::Lock;
use crate::stops::{Stop, generate_grid};
use crate::types::{ParameterKind, StopIncrement};

/// Look up a stop by marking, panicking if absent.
pub fn stop(kind: ParameterKind, label: &str, increment: StopIncrement) -> Stop {
    generate_grid(kind, increment)
        .find_label(label)
        .unwrap_or_else(|| panic!("{label} is not a {increment}-stop {kind}"))
}

fn lock_label(kind: ParameterKind, label: &str, increment: StopIncrement) -> Lock {
    Lock::new(kind, stop(kind, label, increment).value)
}

/// Lock ISO at an exact value. Full stops are round numbers (100, 200, 400 …).
pub fn iso(value: f64) -> Lock {
    Lock::new(ParameterKind::Iso, value)
}

pub fn iso_label(label: &str, increment: StopIncrement) -> Lock {
    lock_label(ParameterKind::Iso, label, increment)
}

pub fn aperture_label(label: &str, increment: StopIncrement) -> Lock {
    lock_label(ParameterKind::Aperture, label, increment)
}

pub fn shutter_label(label: &str, increment: StopIncrement) -> Lock {
    lock_label(ParameterKind::Shutter, label, increment)
}
