//! Exposure solver: lock two parameters, derive the third.
//!
//! ```text
//! locks ──► validate (exactly two kinds, values on grid)
//!       ──► EV arithmetic for the unlocked kind      (raw value)
//!       ──► snap onto the unlocked kind's grid        (Matched | OutOfRange)
//! ```
//!
//! Every abnormal condition maps onto exactly one outcome:
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | `Ok(Solution::Matched)` | result lies on the grid |
//! | `Ok(Solution::OutOfRange)` | result clamped to a grid boundary (a warning) |
//! | `Err(SolveError::LockCount)` | not exactly two distinct parameters locked |
//! | `Err(SolveError::Computation)` | invalid input or non-physical result |
//!
//! Grids are regenerated from the increment on every call; nothing is cached
//! or shared between calls.

use crate::ev::{self, ComputationError};
use crate::snap::{Clamp, snap};
use crate::stops::{Stop, generate_grid};
use crate::types::{ParameterKind, StopIncrement};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Please lock exactly two parameters to calculate the third ({locked} locked)")]
    LockCount { locked: usize },
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

/// A parameter held fixed for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lock {
    pub kind: ParameterKind,
    /// Exact grid value (not the marking).
    pub value: f64,
}

impl Lock {
    pub fn new(kind: ParameterKind, value: f64) -> Self {
        Self { kind, value }
    }

    /// Lock the stop marked `label` on the `kind` grid for `increment`.
    pub fn from_label(kind: ParameterKind, label: &str, increment: StopIncrement) -> Option<Self> {
        generate_grid(kind, increment)
            .find_label(label)
            .map(|stop| Self::new(kind, stop.value))
    }
}

/// The derived parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Solution {
    /// The computed value snapped onto the grid.
    Matched {
        kind: ParameterKind,
        /// Unsnapped value from the EV relation.
        raw: f64,
        stop: Stop,
    },
    /// The computed value lies beyond the grid; `stop` is the nearest boundary.
    OutOfRange {
        kind: ParameterKind,
        raw: f64,
        stop: Stop,
        clamp: Clamp,
    },
}

impl Solution {
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::Matched { kind, .. } | Self::OutOfRange { kind, .. } => *kind,
        }
    }

    pub fn raw(&self) -> f64 {
        match self {
            Self::Matched { raw, .. } | Self::OutOfRange { raw, .. } => *raw,
        }
    }

    pub fn stop(&self) -> Stop {
        match self {
            Self::Matched { stop, .. } | Self::OutOfRange { stop, .. } => *stop,
        }
    }

    pub fn clamp(&self) -> Option<Clamp> {
        match self {
            Self::Matched { .. } => None,
            Self::OutOfRange { clamp, .. } => Some(*clamp),
        }
    }

    pub fn is_clamped(&self) -> bool {
        self.clamp().is_some()
    }

    /// How far (in stops) the raw value lies from the returned stop.
    pub fn stops_off(&self) -> f64 {
        ev::stops_between(self.kind(), self.stop().value, self.raw())
    }

    /// Advisory message for an out-of-range result, `None` when matched.
    pub fn warning(&self) -> Option<String> {
        let Self::OutOfRange {
            kind,
            raw,
            stop,
            clamp,
        } = *self
        else {
            return None;
        };
        let (computed, direction, advice) = match (kind, clamp) {
            (ParameterKind::Aperture, Clamp::Below) => (
                format!("aperture f/{}", format_significant(raw, 2)),
                "wider",
                "Try increasing ISO or using a slower shutter speed.",
            ),
            (ParameterKind::Aperture, Clamp::Above) => (
                format!("aperture f/{}", format_significant(raw, 2)),
                "narrower",
                "Try decreasing ISO or using a faster shutter speed.",
            ),
            (ParameterKind::Shutter, Clamp::Below) => (
                format!("shutter speed ({}s)", format_significant(raw, 2)),
                "faster",
                "Try decreasing ISO or using a narrower aperture.",
            ),
            (ParameterKind::Shutter, Clamp::Above) => (
                format!("shutter speed ({}s)", format_significant(raw, 2)),
                "slower",
                "Try increasing ISO or using a wider aperture.",
            ),
            (ParameterKind::Iso, Clamp::Below) => (
                format!("ISO {raw:.0}"),
                "lower",
                "Try using a narrower aperture or a faster shutter speed.",
            ),
            (ParameterKind::Iso, Clamp::Above) => (
                format!("ISO {raw:.0}"),
                "higher",
                "Try using a wider aperture or a slower shutter speed.",
            ),
        };
        Some(format!(
            "Calculated {computed} is {direction} than available. {advice} Closest available: {}.",
            stop.label
        ))
    }
}

/// Round to `digits` significant digits for display (`128.0` → `"130"`).
pub(crate) fn format_significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits - 1 - magnitude;
    let rounded = if shift >= 0 {
        let factor = 10f64.powi(shift);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-shift);
        (value / factor).round() * factor
    };
    let decimals = shift.max(0) as usize;
    format!("{rounded:.decimals$}")
}

fn check_lock(lock: &Lock, increment: StopIncrement) -> Result<(), ComputationError> {
    if !(lock.value > 0.0 && lock.value.is_finite()) {
        return Err(ComputationError::NonPositiveInput {
            kind: lock.kind,
            value: lock.value,
        });
    }
    if !generate_grid(lock.kind, increment).contains(lock.value) {
        return Err(ComputationError::NotOnGrid {
            kind: lock.kind,
            value: lock.value,
            increment,
        });
    }
    Ok(())
}

/// Derive the unlocked parameter from `ev` and two locked ones.
///
/// # Examples
/// ```
/// # use sunny16::solver::{solve, Lock};
/// # use sunny16::types::{ParameterKind, StopIncrement};
/// let locks = [
///     Lock::new(ParameterKind::Iso, 100.0),
///     Lock::new(ParameterKind::Aperture, 16.0),
/// ];
/// let solution = solve(15.0, StopIncrement::Full, &locks).unwrap();
/// assert_eq!(solution.kind(), ParameterKind::Shutter);
/// assert_eq!(solution.stop().label, "1/125");
/// ```
pub fn solve(ev: f64, increment: StopIncrement, locks: &[Lock]) -> Result<Solution, SolveError> {
    let [first, second] = locks else {
        return Err(SolveError::LockCount {
            locked: locks.len(),
        });
    };
    if first.kind == second.kind {
        return Err(SolveError::LockCount { locked: 1 });
    }
    if !ev.is_finite() {
        return Err(ComputationError::InvalidEv(ev).into());
    }
    for lock in locks {
        check_lock(lock, increment)?;
    }

    let locked = |kind: ParameterKind| locks.iter().find(|l| l.kind == kind).map(|l| l.value);
    let (kind, raw) = match (
        locked(ParameterKind::Iso),
        locked(ParameterKind::Aperture),
        locked(ParameterKind::Shutter),
    ) {
        (Some(iso), Some(aperture), None) => {
            (ParameterKind::Shutter, ev::shutter_for(ev, aperture, iso)?)
        }
        (Some(iso), None, Some(shutter)) => {
            (ParameterKind::Aperture, ev::aperture_for(ev, shutter, iso)?)
        }
        (None, Some(aperture), Some(shutter)) => {
            (ParameterKind::Iso, ev::iso_for(ev, aperture, shutter)?)
        }
        _ => return Err(SolveError::LockCount { locked: 1 }),
    };
    debug!(ev, %increment, %kind, raw, "solved unlocked parameter");

    let grid = generate_grid(kind, increment);
    let snapped = snap(raw, &grid).ok_or(ComputationError::NonPhysicalResult { kind, value: raw })?;
    let solution = match snapped.clamp {
        None => Solution::Matched {
            kind,
            raw,
            stop: snapped.stop,
        },
        Some(clamp) => {
            debug!(%kind, raw, label = snapped.stop.label, ?clamp, "result outside grid");
            Solution::OutOfRange {
                kind,
                raw,
                stop: snapped.stop,
                clamp,
            }
        }
    };
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use approx::assert_relative_eq;

    const FULL: StopIncrement = StopIncrement::Full;
    const THIRD: StopIncrement = StopIncrement::Third;

    // =========================================================================
    // Sunny 16 scenarios
    // =========================================================================

    #[test]
    fn bright_sun_f16_iso100_gives_one_125th() {
        let locks = [iso(100.0), aperture_label("f/16", FULL)];
        let solution = solve(15.0, FULL, &locks).unwrap();
        assert_eq!(solution.kind(), ParameterKind::Shutter);
        assert_eq!(solution.stop().label, "1/125");
        assert!(!solution.is_clamped());
        assert_eq!(solution.warning(), None);
    }

    #[test]
    fn bright_sun_one_125th_iso100_gives_f16_exactly() {
        let locks = [iso(100.0), shutter_label("1/125", FULL)];
        let solution = solve(15.0, FULL, &locks).unwrap();
        assert_eq!(solution.kind(), ParameterKind::Aperture);
        assert_eq!(solution.stop().label, "f/16");
        assert_eq!(solution.raw(), 16.0);
        assert_eq!(solution.stops_off(), 0.0);
    }

    #[test]
    fn bright_sun_f8_one_125th_gives_iso_25() {
        // Two stops wider than Sunny 16 means two stops less sensitivity.
        let locks = [aperture_label("f/8", FULL), shutter_label("1/125", FULL)];
        let solution = solve(15.0, FULL, &locks).unwrap();
        assert_eq!(solution.kind(), ParameterKind::Iso);
        assert_eq!(solution.stop().label, "25");
        assert_relative_eq!(solution.raw(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn lock_order_does_not_matter() {
        let a = solve(15.0, FULL, &[iso(100.0), aperture_label("f/16", FULL)]).unwrap();
        let b = solve(15.0, FULL, &[aperture_label("f/16", FULL), iso(100.0)]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn third_stops_refine_the_answer() {
        // EV 14 at f/11, ISO 100: t = 128 / 16384 = 1/128 → 1/125 on either grid,
        // but EV 14.33 lands a third of a stop faster.
        let locks = [iso(100.0), aperture_label("f/11", THIRD)];
        let solution = solve(14.0 + 1.0 / 3.0, THIRD, &locks).unwrap();
        assert_eq!(solution.stop().label, "1/160");
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let locks = [shutter_label("1/60", THIRD), aperture_label("f/5.6", THIRD)];
        assert_eq!(solve(9.0, THIRD, &locks), solve(9.0, THIRD, &locks));
    }

    // =========================================================================
    // Range warnings
    // =========================================================================

    #[test]
    fn very_dim_scene_clamps_to_slowest_shutter() {
        let locks = [iso(100.0), aperture_label("f/16", FULL)];
        let solution = solve(1.0, FULL, &locks).unwrap();
        assert_eq!(solution.kind(), ParameterKind::Shutter);
        assert_eq!(solution.clamp(), Some(Clamp::Above));
        assert_eq!(solution.stop().label, "30\"");
        assert_eq!(solution.raw(), 128.0);
        assert_relative_eq!(solution.stops_off(), -2.0, epsilon = 1e-12);
        assert_eq!(
            solution.warning().unwrap(),
            "Calculated shutter speed (130s) is slower than available. \
             Try increasing ISO or using a wider aperture. Closest available: 30\"."
        );
    }

    #[test]
    fn very_bright_scene_clamps_to_fastest_shutter() {
        let locks = [iso_label("102400", FULL), aperture_label("f/1", FULL)];
        let solution = solve(21.0, FULL, &locks).unwrap();
        assert_eq!(solution.clamp(), Some(Clamp::Below));
        assert_eq!(solution.stop().label, "1/8000");
        assert!(solution.warning().unwrap().contains("faster than available"));
    }

    #[test]
    fn aperture_wider_than_lens_clamps_to_f1() {
        let locks = [iso(100.0), shutter_label("1/8000", FULL)];
        let solution = solve(5.0, FULL, &locks).unwrap();
        assert_eq!(solution.kind(), ParameterKind::Aperture);
        assert_eq!(solution.clamp(), Some(Clamp::Below));
        assert_eq!(solution.stop().label, "f/1");
        let warning = solution.warning().unwrap();
        assert!(warning.starts_with("Calculated aperture f/0.063 is wider than available."));
        assert!(warning.contains("Try increasing ISO"));
    }

    #[test]
    fn iso_out_of_range_both_ways() {
        let high = solve(
            -6.0,
            FULL,
            &[aperture_label("f/32", FULL), shutter_label("1/8000", FULL)],
        )
        .unwrap();
        assert_eq!(high.clamp(), Some(Clamp::Above));
        assert_eq!(high.stop().label, "102400");
        assert!(high.warning().unwrap().contains("is higher than available"));

        let low = solve(
            21.0,
            FULL,
            &[aperture_label("f/1", FULL), shutter_label("30\"", FULL)],
        )
        .unwrap();
        assert_eq!(low.clamp(), Some(Clamp::Below));
        assert_eq!(low.stop().label, "25");
        assert!(low.warning().unwrap().contains("is lower than available"));
    }

    // =========================================================================
    // Lock count
    // =========================================================================

    #[test]
    fn zero_one_or_three_locks_is_a_lock_count_error() {
        assert_eq!(
            solve(15.0, FULL, &[]),
            Err(SolveError::LockCount { locked: 0 })
        );
        assert_eq!(
            solve(15.0, FULL, &[iso(100.0)]),
            Err(SolveError::LockCount { locked: 1 })
        );
        let three = [
            iso(100.0),
            aperture_label("f/16", FULL),
            shutter_label("1/125", FULL),
        ];
        assert_eq!(
            solve(15.0, FULL, &three),
            Err(SolveError::LockCount { locked: 3 })
        );
    }

    #[test]
    fn same_kind_locked_twice_is_a_lock_count_error() {
        let locks = [iso(100.0), iso(200.0)];
        assert_eq!(
            solve(15.0, FULL, &locks),
            Err(SolveError::LockCount { locked: 1 })
        );
    }

    #[test]
    fn lock_count_is_checked_before_values() {
        let locks = [Lock::new(ParameterKind::Iso, -1.0)];
        assert_eq!(
            solve(f64::NAN, FULL, &locks),
            Err(SolveError::LockCount { locked: 1 })
        );
    }

    #[test]
    fn exactly_two_locks_never_fail_on_count() {
        for increment in [FULL, THIRD] {
            for (a, b) in [
                (ParameterKind::Iso, ParameterKind::Aperture),
                (ParameterKind::Iso, ParameterKind::Shutter),
                (ParameterKind::Aperture, ParameterKind::Shutter),
            ] {
                for first in generate_grid(a, increment).stops() {
                    for second in generate_grid(b, increment).stops() {
                        let locks = [Lock::new(a, first.value), Lock::new(b, second.value)];
                        for ev in [-6.0, 0.0, 8.5, 15.0, 21.0] {
                            assert!(
                                solve(ev, increment, &locks).is_ok(),
                                "{a} {} + {b} {} at EV {ev}",
                                first.label,
                                second.label
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn lock_count_message_names_the_count() {
        let err = SolveError::LockCount { locked: 3 };
        assert_eq!(
            err.to_string(),
            "Please lock exactly two parameters to calculate the third (3 locked)"
        );
    }

    // =========================================================================
    // Computation errors
    // =========================================================================

    #[test]
    fn non_positive_lock_is_a_computation_error() {
        let locks = [Lock::new(ParameterKind::Iso, 0.0), aperture_label("f/16", FULL)];
        assert_eq!(
            solve(15.0, FULL, &locks),
            Err(SolveError::Computation(ComputationError::NonPositiveInput {
                kind: ParameterKind::Iso,
                value: 0.0
            }))
        );
    }

    #[test]
    fn off_grid_lock_is_a_computation_error() {
        let locks = [iso(150.0), aperture_label("f/16", FULL)];
        assert!(matches!(
            solve(15.0, FULL, &locks),
            Err(SolveError::Computation(ComputationError::NotOnGrid {
                kind: ParameterKind::Iso,
                ..
            }))
        ));

        // Markings are not exact values: the "125" stop is really 100·2^(1/3).
        let marked = [iso(125.0), aperture_label("f/16", THIRD)];
        assert!(matches!(
            solve(15.0, THIRD, &marked),
            Err(SolveError::Computation(ComputationError::NotOnGrid { .. }))
        ));
    }

    #[test]
    fn third_stop_lock_rejected_on_full_grid() {
        let third_iso = Lock::from_label(ParameterKind::Iso, "125", THIRD).unwrap();
        let locks = [third_iso, aperture_label("f/16", FULL)];
        assert!(matches!(
            solve(15.0, FULL, &locks),
            Err(SolveError::Computation(ComputationError::NotOnGrid {
                increment: StopIncrement::Full,
                ..
            }))
        ));
        assert!(solve(15.0, THIRD, &[third_iso, aperture_label("f/16", THIRD)]).is_ok());
    }

    #[test]
    fn non_finite_ev_is_a_computation_error() {
        let locks = [iso(100.0), aperture_label("f/16", FULL)];
        assert_eq!(
            solve(f64::INFINITY, FULL, &locks),
            Err(SolveError::Computation(ComputationError::InvalidEv(
                f64::INFINITY
            )))
        );
    }

    #[test]
    fn overflowing_ev_is_a_computation_error_not_a_warning() {
        let locks = [iso(100.0), aperture_label("f/16", FULL)];
        assert!(matches!(
            solve(5000.0, FULL, &locks),
            Err(SolveError::Computation(ComputationError::NonPhysicalResult {
                kind: ParameterKind::Shutter,
                ..
            }))
        ));
    }

    #[test]
    fn extreme_but_representable_result_clamps() {
        // 2^-1012 s is a normal f64, far faster than 1/8000.
        let locks = [iso(100.0), aperture_label("f/16", FULL)];
        let solution = solve(1020.0, FULL, &locks).unwrap();
        assert_eq!(solution.clamp(), Some(Clamp::Below));
        assert_eq!(solution.stop().label, "1/8000");
        assert_eq!(solution.raw(), (-1012.0_f64).exp2());
    }

    #[test]
    fn core_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::stops::StopGrid>();
        assert_send_sync::<Lock>();
        assert_send_sync::<Solution>();
        assert_send_sync::<SolveError>();
        assert_send_sync::<crate::chart::Chart>();
        assert_send_sync::<crate::config::CalculatorConfig>();
    }

    // =========================================================================
    // Serialization and formatting
    // =========================================================================

    #[test]
    fn solution_serializes_with_status_tag() {
        let locks = [iso(100.0), aperture_label("f/16", FULL)];
        let json = serde_json::to_string(&solve(15.0, FULL, &locks).unwrap()).unwrap();
        assert!(json.contains("\"status\":\"matched\""));
        assert!(json.contains("\"kind\":\"shutter\""));
        assert!(json.contains("\"label\":\"1/125\""));

        let clamped = serde_json::to_string(&solve(1.0, FULL, &locks).unwrap()).unwrap();
        assert!(clamped.contains("\"status\":\"out_of_range\""));
        assert!(clamped.contains("\"clamp\":\"above\""));
    }

    #[test]
    fn significant_digit_formatting() {
        assert_eq!(format_significant(128.0, 2), "130");
        assert_eq!(format_significant(0.00012207, 2), "0.00012");
        assert_eq!(format_significant(1.0, 2), "1.0");
        assert_eq!(format_significant(45.0, 2), "45");
    }

    #[test]
    fn lock_from_label_uses_exact_value() {
        let lock = Lock::from_label(ParameterKind::Shutter, "1/125", FULL).unwrap();
        assert_eq!(lock.value, 1.0 / 128.0);
        assert!(Lock::from_label(ParameterKind::Shutter, "1/100", FULL).is_none());
    }
}
