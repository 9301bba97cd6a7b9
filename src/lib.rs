//! # Sunny 16
//!
//! An exposure calculator for film and digital photography. Given a light
//! condition in EV and any two of ISO, aperture, and shutter speed, it derives
//! the third and snaps it to a value a real camera can actually set.
//!
//! # How a Calculation Flows
//!
//! ```text
//! 1. Grid     kind + increment   →  StopGrid   (legal values with markings)
//! 2. Solve    EV + two locks     →  raw value  (EV = log2(N²/t) − log2(S/100))
//! 3. Snap     raw value + grid   →  Solution   (nearest stop, or a clamp warning)
//! ```
//!
//! Every stage is a pure function. The only I/O in the crate is reading
//! `sunny16.toml` and printing results, both driven from the binary.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`stops`] | Full- and third-stop grids for each parameter, with camera markings |
//! | [`ev`] | The EV relation and its three solve forms |
//! | [`snap`] | Nearest-grid-value lookup in log space, with range clamping |
//! | [`solver`] | Lock validation, derivation of the free parameter, out-of-range advice |
//! | [`light`] | Standard light conditions from EV −6 to 21 |
//! | [`chart`] | ISO tables over shutter speed × EV at a fixed aperture |
//! | [`config`] | `sunny16.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Shared enums (`ParameterKind`, `StopIncrement`) |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Exact Values, Fixed Markings
//!
//! Grid values are exact powers of two (f/11 is `2^3.5`, 1/125 is `2^-7`), so
//! a full stop is always exactly one EV and the arithmetic round-trips without
//! drift. The numbers printed on a camera are rounded conventions and come
//! from fixed tables. Both are carried together in [`stops::Stop`].
//!
//! ## Snapping in Stops
//!
//! "Nearest" is measured in log2 space. 1/88 s is closer to 1/60 than to 1/125
//! in stops even though it is closer to 1/125 linearly, and stops are what a
//! photographer means by "close".
//!
//! ## Explicit Locks
//!
//! The solver takes the locked parameters as a slice rather than flags on a
//! form. Anything other than exactly two distinct kinds is a
//! [`solver::SolveError::LockCount`] error.

pub mod chart;
pub mod config;
pub mod ev;
pub mod light;
pub mod output;
pub mod snap;
pub mod solver;
pub mod stops;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
