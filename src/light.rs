//! Standard light conditions, one per whole EV (at ISO 100).
//!
//! The descriptions follow common exposure charts. EV 15 is the Sunny 16
//! reference: f/16 at 1/ISO seconds in bright direct sun.

use serde::Serialize;
use std::ops::RangeInclusive;

/// Whole EVs covered by the light-condition table.
pub const EV_RANGE: RangeInclusive<i32> = -6..=21;

/// EV of the Sunny 16 reference scene.
pub const SUNNY_16_EV: i32 = 15;

/// One row of the light-condition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightCondition {
    pub ev: i32,
    pub description: &'static str,
}

const CONDITIONS: [(i32, &str); 28] = [
    (21, "Extreme highlights: sunlit snow at high altitude"),
    (20, "Sunlight reflected off water or glass"),
    (19, "Direct sun on white surfaces"),
    (18, "Bright sun on light sand"),
    (17, "Bright sun on snow, distinct shadows"),
    (16, "Snow/Sand"),
    (15, "Sunny"),
    (14, "Slight Overcast"),
    (13, "Overcast"),
    (12, "Heavy Overcast"),
    (11, "Open Shade/Sunset"),
    (10, "Just after sunset"),
    (9, "Twilight; neon signs"),
    (8, "Floodlit stadium; bright city streets"),
    (7, "Indoor sports; stage shows"),
    (6, "Bright interior lighting"),
    (5, "Average home interior at night"),
    (4, "Candlelit close-up; holiday lights"),
    (3, "Fireworks; floodlit buildings"),
    (2, "Distant lit buildings"),
    (1, "Distant city skyline at night"),
    (0, "Dim ambient light"),
    (-1, "Deep twilight"),
    (-2, "Snow under full moon"),
    (-3, "Landscape under full moon"),
    (-4, "Landscape under half moon"),
    (-5, "Landscape under crescent moon"),
    (-6, "Starlight, away from city lights"),
];

/// All light conditions, brightest first.
pub fn ev_options() -> Vec<LightCondition> {
    CONDITIONS
        .iter()
        .map(|&(ev, description)| LightCondition { ev, description })
        .collect()
}

/// Description of a whole EV, if it is in the table.
pub fn describe(ev: i32) -> Option<&'static str> {
    CONDITIONS
        .iter()
        .find(|&&(e, _)| e == ev)
        .map(|&(_, description)| description)
}
