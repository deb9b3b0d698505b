//! Starting-level inference from dosing history.
//!
//! With too little history the pipeline starts conservatively at level 2 and
//! skips trend transitions. With usable history, the starting level is the
//! one whose table dose at the current glucose sits closest to the most
//! recent prior dose.

use crate::dose::resolve_dose;
use crate::table::DoseTable;
use crate::types::{AlgorithmKind, Level, PatientSnapshot};

/// Conservative default when history is absent or unusable.
const DEFAULT_LEVEL: Level = 2;

/// Where the pipeline starts, and whether trend transitions apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartingLevel {
    /// Defaulted; the level is final before dose lookup.
    Fixed(Level),
    /// Inferred from dosing history; trend transitions apply next.
    Matched(Level),
}

impl StartingLevel {
    pub fn level(&self) -> Level {
        match self {
            StartingLevel::Fixed(level) | StartingLevel::Matched(level) => *level,
        }
    }
}

/// Infer the starting severity level for a snapshot.
pub fn starting_level(
    snapshot: &PatientSnapshot,
    algorithm: AlgorithmKind,
    table: &DoseTable,
) -> StartingLevel {
    if snapshot.glucose.valid_count() <= 1 {
        tracing::info!("0 or 1 valid glucose readings, defaulting to level {}", DEFAULT_LEVEL);
        return StartingLevel::Fixed(DEFAULT_LEVEL);
    }

    if !snapshot.doses.has_any() {
        tracing::info!("No prior insulin recorded, starting at level {}", DEFAULT_LEVEL);
        return StartingLevel::Fixed(DEFAULT_LEVEL);
    }

    // Conservative restart on dual inotropes; basal-bolus has no such override.
    if algorithm == AlgorithmKind::IvInfusion && snapshot.dual_inotropes {
        tracing::info!("Dual inotropes, restarting at level {}", DEFAULT_LEVEL);
        return StartingLevel::Fixed(DEFAULT_LEVEL);
    }

    let current = snapshot.glucose.current_reading(algorithm);
    let prior = snapshot.doses.most_recent();
    let matched = match_nearest_level(table, algorithm, current, prior);
    tracing::info!(
        "Matched prior dose {} to starting level {} at glucose {}",
        prior,
        matched,
        current
    );
    StartingLevel::Matched(matched)
}

/// Find the level whose resolved dose is numerically closest to the prior
/// dose, scanning levels in table order. Ties keep the first minimum seen.
fn match_nearest_level(
    table: &DoseTable,
    algorithm: AlgorithmKind,
    glucose: f64,
    prior_dose: f64,
) -> Level {
    let mut best = DEFAULT_LEVEL;
    let mut min_diff = f64::INFINITY;

    for level in table.for_algorithm(algorithm).levels() {
        let dose = resolve_dose(table, algorithm, level.level, glucose);
        let diff = (dose - prior_dose).abs();
        if diff < min_diff {
            min_diff = diff;
            best = level.level;
        }
    }

    best
}
