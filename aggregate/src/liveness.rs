//! Enemy drone liveness check over `statestore.log`.
//!
//! Each tick is a comma-separated row. Columns 6 to 8 hold the enemy drone's
//! position and columns 9 to 11 its velocity. Rows with two or fewer fields
//! are headers or markers and are skipped.

use std::fmt;

use campaign::Reason;

use crate::error::ParseError;
use crate::options::AggregateOptions;

const POSITION_COLUMN: usize = 6;
const VELOCITY_COLUMN: usize = 9;
const MIN_FIELDS: usize = VELOCITY_COLUMN + 3;

/// Enemy drone state at one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSample {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

/// Parses the enemy drone samples of a state store log.
pub fn parse_statestore(text: &str) -> Result<Vec<StateSample>, ParseError> {
    let mut samples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() <= 2 {
            continue;
        }
        if fields.len() < MIN_FIELDS {
            return Err(ParseError::new(
                idx + 1,
                format!("expected at least {MIN_FIELDS} fields, found {}", fields.len()),
            ));
        }
        samples.push(StateSample {
            position: triple(&fields[POSITION_COLUMN..], idx + 1)?,
            velocity: triple(&fields[VELOCITY_COLUMN..], idx + 1)?,
        });
    }
    Ok(samples)
}

fn triple(fields: &[&str], line: usize) -> Result<[f64; 3], ParseError> {
    let mut out = [0.0; 3];
    for (slot, raw) in out.iter_mut().zip(fields) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| ParseError::new(line, format!("invalid number {raw:?}")))?;
    }
    Ok(out)
}

fn l1(vector: [f64; 3]) -> f64 {
    vector.iter().map(|component| component.abs()).sum()
}

/// Outcome of the liveness heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    /// Too few ticks with a meaningful velocity.
    VelocitiesTooLow,
    /// Enough velocity but too little total displacement.
    DidNotMoveEnough,
}

impl Liveness {
    /// Diagnostic reason for a suspect run, `None` when alive.
    pub const fn reason(self) -> Option<Reason> {
        match self {
            Self::Alive => None,
            Self::VelocitiesTooLow => Some(Reason::LowVelocity),
            Self::DidNotMoveEnough => Some(Reason::LowDisplacement),
        }
    }
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alive => f.write_str("enemy drone moved"),
            Self::VelocitiesTooLow => f.write_str("velocities too low"),
            Self::DidNotMoveEnough => f.write_str("didn't move enough"),
        }
    }
}

/// Motion statistics of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivenessReport {
    pub ticks: usize,
    /// Ticks whose velocity L1 norm reached the threshold.
    pub moving_ticks: usize,
    /// Sum of L1 distances between consecutive positions.
    pub displacement: f64,
    pub verdict: Liveness,
}

/// Checks whether the enemy drone actually flew during a run.
pub fn check_enemy_drone_alive(
    samples: &[StateSample],
    options: &AggregateOptions,
) -> LivenessReport {
    let moving_ticks = samples
        .iter()
        .filter(|sample| l1(sample.velocity) >= options.velocity_threshold)
        .count();
    let displacement = samples
        .windows(2)
        .map(|pair| {
            l1([
                pair[1].position[0] - pair[0].position[0],
                pair[1].position[1] - pair[0].position[1],
                pair[1].position[2] - pair[0].position[2],
            ])
        })
        .sum();

    let verdict = if moving_ticks < options.min_moving_ticks {
        Liveness::VelocitiesTooLow
    } else if displacement < options.min_displacement {
        Liveness::DidNotMoveEnough
    } else {
        Liveness::Alive
    };
    LivenessReport {
        ticks: samples.len(),
        moving_ticks,
        displacement,
        verdict,
    }
}
