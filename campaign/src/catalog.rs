//! Fixed catalogs attached to sampled combinations: weight profiles and
//! enemy starting offsets.

use std::fmt;

use crate::space::Combination;
use crate::value::ParamValue;

/// Config key of the boundary enforcer weight.
pub const BOUNDARY_WEIGHT: &str = "BOUNDARY_WEIGHT";
/// Config key of the runaway enforcer weight.
pub const RUNAWAY_WEIGHT: &str = "RUNAWAY_WEIGHT";
/// Config key of the missile enforcer weight.
pub const MISSILE_WEIGHT: &str = "MISSILE_WEIGHT";

/// Relative weights of the three competing enforcers.
///
/// `FLIGHT_WEIGHT` is never varied and is not part of a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightProfile {
    pub boundary: ParamValue,
    pub runaway: ParamValue,
    pub missile: ParamValue,
}

impl WeightProfile {
    const fn new(boundary: ParamValue, runaway: ParamValue, missile: ParamValue) -> Self {
        Self {
            boundary,
            runaway,
            missile,
        }
    }

    /// Returns the `(config key, weight)` pairs of the profile.
    pub const fn entries(&self) -> [(&'static str, ParamValue); 3] {
        [
            (BOUNDARY_WEIGHT, self.boundary),
            (RUNAWAY_WEIGHT, self.runaway),
            (MISSILE_WEIGHT, self.missile),
        ]
    }

    /// Merges the weight keys into `combination`.
    pub fn apply(&self, combination: &mut Combination) {
        for (key, value) in self.entries() {
            combination.set(key, value);
        }
    }
}

impl fmt::Display for WeightProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "boundary {} : runaway {} : missile {}",
            self.boundary, self.runaway, self.missile
        )
    }
}

const ONE: ParamValue = ParamValue::Int(1);
const ONE_HALF: ParamValue = ParamValue::Float(1.5);
const TWO: ParamValue = ParamValue::Int(2);
const THREE: ParamValue = ParamValue::Int(3);

/// Ratios 1:1:1, 1:1.5:2 and 1:2:3 over every assignment of ratio to
/// enforcer.
pub const WEIGHT_CATALOG: [WeightProfile; 13] = [
    WeightProfile::new(ONE, ONE, ONE),
    // 1 : 1.5 : 2
    WeightProfile::new(ONE, ONE_HALF, TWO),
    WeightProfile::new(ONE, TWO, ONE_HALF),
    WeightProfile::new(ONE_HALF, ONE, TWO),
    WeightProfile::new(TWO, ONE, ONE_HALF),
    WeightProfile::new(TWO, ONE_HALF, ONE),
    WeightProfile::new(ONE_HALF, TWO, ONE),
    // 1 : 2 : 3
    WeightProfile::new(ONE, TWO, THREE),
    WeightProfile::new(ONE, THREE, TWO),
    WeightProfile::new(TWO, ONE, THREE),
    WeightProfile::new(THREE, ONE, TWO),
    WeightProfile::new(THREE, TWO, ONE),
    WeightProfile::new(TWO, THREE, ONE),
];

/// Enemy start offset relative to the ego drone, which always starts at the
/// origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartOffset {
    pub x: i32,
    pub y: i32,
}

impl StartOffset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Renders as `x,y`, the form the simulation reads from `enemy_start_pos`.
impl fmt::Display for StartOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Eight compass offsets at each of the distances 5, 1 and 10.
pub const POSITION_CATALOG: [StartOffset; 24] = [
    StartOffset::new(5, 5),
    StartOffset::new(5, 0),
    StartOffset::new(0, 5),
    StartOffset::new(-5, 5),
    StartOffset::new(5, -5),
    StartOffset::new(-5, -5),
    StartOffset::new(-5, 0),
    StartOffset::new(0, -5),
    StartOffset::new(1, 1),
    StartOffset::new(1, 0),
    StartOffset::new(0, 1),
    StartOffset::new(-1, 1),
    StartOffset::new(1, -1),
    StartOffset::new(-1, -1),
    StartOffset::new(-1, 0),
    StartOffset::new(0, -1),
    StartOffset::new(10, 10),
    StartOffset::new(10, 0),
    StartOffset::new(0, 10),
    StartOffset::new(-10, 10),
    StartOffset::new(10, -10),
    StartOffset::new(-10, -10),
    StartOffset::new(-10, 0),
    StartOffset::new(0, -10),
];

/// Returns the start offset for the case at `index`, cycling the catalog.
pub const fn position_for(index: usize) -> StartOffset {
    POSITION_CATALOG[index % POSITION_CATALOG.len()]
}
