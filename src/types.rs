//! Shared types used across the grid, solver, and output modules.
//!
//! These are small `Copy` enums that travel through every stage of a
//! calculation and are serialized verbatim into `--json` output and
//! `sunny16.toml`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid density shared by all three parameter grids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StopIncrement {
    /// One value per stop (f/8, f/11, f/16 …).
    #[default]
    Full,
    /// Three values per stop (f/8, f/9, f/10, f/11 …).
    Third,
}

impl StopIncrement {
    /// How many third-stop positions one grid step spans.
    pub fn thirds_per_step(self) -> usize {
        match self {
            Self::Full => 3,
            Self::Third => 1,
        }
    }
}

impl fmt::Display for StopIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Third => f.write_str("third"),
        }
    }
}

/// One of the three exposure parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Iso,
    Aperture,
    Shutter,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 3] = [Self::Iso, Self::Aperture, Self::Shutter];

    /// Heading used when presenting a result ("Shutter Speed: 1/125").
    pub fn title(self) -> &'static str {
        match self {
            Self::Iso => "ISO",
            Self::Aperture => "Aperture",
            Self::Shutter => "Shutter Speed",
        }
    }
}

/// Lowercase name for use inside sentences.
impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iso => f.write_str("ISO"),
            Self::Aperture => f.write_str("aperture"),
            Self::Shutter => f.write_str("shutter speed"),
        }
    }
}
