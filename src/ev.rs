//! Exposure-value arithmetic.
//!
//! All functions are pure and work on exact values (f-number `N`, shutter time
//! `t` in seconds, ISO `S`), never on display markings. EV is the scene
//! brightness referenced to ISO 100, so the settings that expose it correctly
//! satisfy one relation:
//!
//! ```text
//! EV = log2(N² / t) − log2(S / 100)
//! ```
//!
//! A brighter scene (higher EV) needs a narrower aperture, a faster shutter,
//! or a lower ISO. The solve forms are its three rearrangements:
//!
//! | Unknown | Form |
//! |---------|------|
//! | shutter | `t = N² / (2^EV · S/100)` |
//! | aperture | `N = sqrt(t · 2^EV · S/100)` |
//! | ISO | `S = 100 · N² / (t · 2^EV)` |
//!
//! # Examples
//! ```
//! # use sunny16::ev::{exposure_value, shutter_for};
//! // Sunny 16: f/16 at ISO 100 in bright sun (EV 15) needs 1/128 s.
//! assert_eq!(shutter_for(15.0, 16.0, 100.0).unwrap(), 1.0 / 128.0);
//! assert_eq!(exposure_value(16.0, 1.0 / 128.0, 100.0).unwrap(), 15.0);
//! ```

use crate::types::{ParameterKind, StopIncrement};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Invalid {kind}: {value} is not a positive number")]
    NonPositiveInput { kind: ParameterKind, value: f64 },
    #[error("Invalid exposure value: {0} is not a finite number")]
    InvalidEv(f64),
    #[error("Calculated {kind} is not a physical value ({value})")]
    NonPhysicalResult { kind: ParameterKind, value: f64 },
    #[error("Invalid {kind}: {value} is not a standard {increment}-stop value")]
    NotOnGrid {
        kind: ParameterKind,
        value: f64,
        increment: StopIncrement,
    },
}

fn positive(kind: ParameterKind, value: f64) -> Result<f64, ComputationError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::NonPositiveInput { kind, value })
    }
}

fn finite_ev(ev: f64) -> Result<f64, ComputationError> {
    if ev.is_finite() {
        Ok(ev)
    } else {
        Err(ComputationError::InvalidEv(ev))
    }
}

fn physical(kind: ParameterKind, value: f64) -> Result<f64, ComputationError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::NonPhysicalResult { kind, value })
    }
}

/// Scene EV (at ISO 100) that an (aperture, shutter, ISO) triple exposes correctly.
pub fn exposure_value(aperture: f64, shutter: f64, iso: f64) -> Result<f64, ComputationError> {
    let n = positive(ParameterKind::Aperture, aperture)?;
    let t = positive(ParameterKind::Shutter, shutter)?;
    let s = positive(ParameterKind::Iso, iso)?;
    let ev = (n * n / t).log2() - (s / 100.0).log2();
    finite_ev(ev)
}

/// Shutter time (seconds) giving `ev` at the given aperture and ISO.
pub fn shutter_for(ev: f64, aperture: f64, iso: f64) -> Result<f64, ComputationError> {
    let ev = finite_ev(ev)?;
    let n = positive(ParameterKind::Aperture, aperture)?;
    let s = positive(ParameterKind::Iso, iso)?;
    physical(
        ParameterKind::Shutter,
        (2.0 * n.log2() - ev - (s / 100.0).log2()).exp2(),
    )
}

/// F-number giving `ev` at the given shutter time and ISO.
pub fn aperture_for(ev: f64, shutter: f64, iso: f64) -> Result<f64, ComputationError> {
    let ev = finite_ev(ev)?;
    let t = positive(ParameterKind::Shutter, shutter)?;
    let s = positive(ParameterKind::Iso, iso)?;
    physical(
        ParameterKind::Aperture,
        ((t.log2() + ev + (s / 100.0).log2()) / 2.0).exp2(),
    )
}

/// ISO giving `ev` at the given aperture and shutter time.
pub fn iso_for(ev: f64, aperture: f64, shutter: f64) -> Result<f64, ComputationError> {
    let ev = finite_ev(ev)?;
    let n = positive(ParameterKind::Aperture, aperture)?;
    let t = positive(ParameterKind::Shutter, shutter)?;
    physical(
        ParameterKind::Iso,
        100.0 * (2.0 * n.log2() - t.log2() - ev).exp2(),
    )
}

/// Signed distance in stops from `from` to `to` for the given parameter.
///
/// Positive means `to` admits less light (narrower aperture, faster shutter)
/// or, for ISO, is more sensitive.
pub fn stops_between(kind: ParameterKind, from: f64, to: f64) -> f64 {
    let ratio = (to / from).log2();
    match kind {
        ParameterKind::Aperture => 2.0 * ratio,
        ParameterKind::Shutter => -ratio,
        ParameterKind::Iso => ratio,
    }
}
