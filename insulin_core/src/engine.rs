//! Recommendation engine orchestrating the decision pipeline.
//!
//! Sequences normalization, algorithm selection, level inference, trend
//! transition, dose resolution, and recheck timing into one result. Any
//! validation failure short-circuits before the first algorithmic step; there
//! are no retries and no partial results.

use crate::level::{starting_level, StartingLevel};
use crate::table::DoseTable;
use crate::types::{PatientSnapshot, Recommendation};
use crate::{dose, normalize, selector, timing, transition, Result};
use serde_json::Value;

/// Compute a recommendation from a raw request record.
pub fn recommend(raw: &Value, table: &DoseTable) -> Result<Recommendation> {
    let snapshot = normalize::normalize_request(raw)?;
    tracing::debug!("Normalized snapshot: {:?}", snapshot);
    Ok(recommend_for_snapshot(&snapshot, table))
}

/// Compute a recommendation for an already-normalized snapshot.
pub fn recommend_for_snapshot(snapshot: &PatientSnapshot, table: &DoseTable) -> Recommendation {
    let algorithm = selector::select_algorithm(snapshot);

    let level = match starting_level(snapshot, algorithm, table) {
        StartingLevel::Fixed(level) => level,
        StartingLevel::Matched(level) => {
            transition::apply_transition(algorithm, level, snapshot.glucose.as_slice())
        }
    };

    let current = snapshot.glucose.current_reading(algorithm);
    let dose_value = dose::resolve_dose(table, algorithm, level, current);
    let action = dose::action_label(algorithm, dose_value);
    let next_check_hours = timing::next_check_hours(algorithm, snapshot);

    tracing::info!(
        "Recommendation: {:?} level {} dose {} {} ({}), next check in {}h",
        algorithm,
        level,
        dose_value,
        algorithm.unit(),
        action,
        next_check_hours
    );

    Recommendation {
        dose: dose_value,
        route_label: algorithm.route_label().into(),
        next_check_hours,
        algorithm_used: algorithm,
        level,
        action: action.into(),
        unit: algorithm.unit().into(),
    }
}
