//! Dose resolution and action labels.
//!
//! Lookup never refuses a dose: a level absent from the table yields a
//! hard-coded fallback, and a glucose value matching no declared range yields
//! the level's first entry.

use crate::table::DoseTable;
use crate::types::{AlgorithmKind, Level};

/// IV rate when the requested level is absent from the table, IU/hr.
const IV_FALLBACK_RATE: f64 = 1.0;

/// Basal dose when the requested level is absent from the table, IU.
const BASAL_FALLBACK_DOSE: f64 = 2.0;

/// Resolve the dose for (algorithm, level, current glucose).
pub fn resolve_dose(
    table: &DoseTable,
    algorithm: AlgorithmKind,
    level: Level,
    glucose: f64,
) -> f64 {
    let fallback = match algorithm {
        AlgorithmKind::IvInfusion => IV_FALLBACK_RATE,
        AlgorithmKind::BasalBolus => BASAL_FALLBACK_DOSE,
    };

    let Some(level_doses) = table.for_algorithm(algorithm).level(level) else {
        return fallback;
    };

    level_doses
        .entries
        .iter()
        .find(|entry| entry.range.contains(glucose))
        .or_else(|| level_doses.entries.first())
        .map(|entry| entry.dose)
        .unwrap_or(fallback)
}

/// Qualitative action label for a resolved dose.
///
/// The two bucketings are independent per family and must stay that way.
pub fn action_label(algorithm: AlgorithmKind, dose: f64) -> &'static str {
    match algorithm {
        AlgorithmKind::IvInfusion => iv_action(dose),
        AlgorithmKind::BasalBolus => basal_action(dose),
    }
}

fn iv_action(rate: f64) -> &'static str {
    if rate == 0.0 {
        "Turn off insulin"
    } else if rate <= 1.0 {
        "Maintain current rate"
    } else if rate >= 40.0 {
        "Maximum rate"
    } else {
        "Increase rate"
    }
}

fn basal_action(dose: f64) -> &'static str {
    if dose == 0.0 {
        "No insulin"
    } else if dose <= 2.0 {
        "Low dose"
    } else if dose <= 6.0 {
        "Medium dose"
    } else if dose <= 12.0 {
        "High dose"
    } else if dose <= 20.0 {
        "Very high dose"
    } else {
        "Critical dose"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{build_default_table, GlucoseRange};

    #[test]
    fn test_resolve_matches_declared_range() {
        let table = build_default_table();
        assert_eq!(
            resolve_dose(&table, AlgorithmKind::IvInfusion, 3, 175.0),
            2.0
        );
        assert_eq!(
            resolve_dose(&table, AlgorithmKind::BasalBolus, 6, 320.0),
            16.0
        );
    }

    #[test]
    fn test_resolve_first_match_wins_on_overlap() {
        let mut table = build_default_table();
        table.iv.push_entry(3, GlucoseRange::new(151.0, 200.0), 9.0);
        // Overlapping second entry for level 3; the stored-first one wins.
        assert_eq!(
            resolve_dose(&table, AlgorithmKind::IvInfusion, 3, 175.0),
            2.0
        );
    }

    #[test]
    fn test_resolve_unmatched_glucose_takes_first_entry() {
        let table = build_default_table();
        // Level 2's only range is 111-150; 400 matches nothing.
        assert_eq!(
            resolve_dose(&table, AlgorithmKind::IvInfusion, 2, 400.0),
            1.0
        );
        assert_eq!(
            resolve_dose(&table, AlgorithmKind::BasalBolus, 3, 0.0),
            4.0
        );
    }

    #[test]
    fn test_resolve_missing_level_uses_family_fallback() {
        let table = build_default_table();
        assert_eq!(
            resolve_dose(&table, AlgorithmKind::IvInfusion, 99, 175.0),
            1.0
        );
        assert_eq!(
            resolve_dose(&table, AlgorithmKind::BasalBolus, 99, 175.0),
            2.0
        );
    }

    #[test]
    fn test_iv_action_buckets() {
        assert_eq!(action_label(AlgorithmKind::IvInfusion, 0.0), "Turn off insulin");
        assert_eq!(action_label(AlgorithmKind::IvInfusion, 0.5), "Maintain current rate");
        assert_eq!(action_label(AlgorithmKind::IvInfusion, 1.0), "Maintain current rate");
        assert_eq!(action_label(AlgorithmKind::IvInfusion, 2.0), "Increase rate");
        assert_eq!(action_label(AlgorithmKind::IvInfusion, 39.9), "Increase rate");
        assert_eq!(action_label(AlgorithmKind::IvInfusion, 40.0), "Maximum rate");
    }

    #[test]
    fn test_basal_action_buckets() {
        assert_eq!(action_label(AlgorithmKind::BasalBolus, 0.0), "No insulin");
        assert_eq!(action_label(AlgorithmKind::BasalBolus, 2.0), "Low dose");
        assert_eq!(action_label(AlgorithmKind::BasalBolus, 6.0), "Medium dose");
        assert_eq!(action_label(AlgorithmKind::BasalBolus, 12.0), "High dose");
        assert_eq!(action_label(AlgorithmKind::BasalBolus, 16.0), "Very high dose");
        assert_eq!(action_label(AlgorithmKind::BasalBolus, 21.0), "Critical dose");
    }
}
