//! Algorithm-family selection.
//!
//! Chooses between the IV infusion and basal-bolus algorithms from the
//! patient's route, dual-inotrope status, and recent glucose trend. Pure and
//! total: every snapshot selects exactly one family.

use crate::types::{AlgorithmKind, PatientSnapshot, Route};

/// An SC reading above this counts as severe hyperglycemia.
const SEVERE_HYPERGLYCEMIA: f64 = 350.0;

/// Severe readings (of 5) needed to escalate an SC patient to IV.
const SEVERE_COUNT_FOR_IV: usize = 2;

/// Controlled band GRBS1-4 must hold for an IV patient to de-escalate.
const CONTROLLED_MIN: f64 = 150.0;
const CONTROLLED_MAX: f64 = 180.0;

/// Select the algorithm family for a normalized snapshot.
///
/// Rule order: dual inotropes force IV; SC escalates to IV only on persistent
/// severe hyperglycemia; IV de-escalates only once the last four readings are
/// all controlled.
pub fn select_algorithm(snapshot: &PatientSnapshot) -> AlgorithmKind {
    if snapshot.dual_inotropes {
        tracing::info!("Dual inotropes present, selecting IV infusion");
        return AlgorithmKind::IvInfusion;
    }

    match snapshot.route {
        Route::Sc => {
            // Untaken (0) readings never exceed the threshold.
            let severe_count = snapshot
                .glucose
                .as_slice()
                .iter()
                .filter(|g| **g > SEVERE_HYPERGLYCEMIA)
                .count();

            if severe_count >= SEVERE_COUNT_FOR_IV {
                tracing::info!(
                    "SC route with {} readings above {}, escalating to IV infusion",
                    severe_count,
                    SEVERE_HYPERGLYCEMIA
                );
                AlgorithmKind::IvInfusion
            } else {
                tracing::info!("SC route without persistent severe hyperglycemia, selecting basal-bolus");
                AlgorithmKind::BasalBolus
            }
        }
        Route::Iv => {
            let controlled = snapshot.glucose.as_slice()[..4]
                .iter()
                .all(|g| (CONTROLLED_MIN..=CONTROLLED_MAX).contains(g));

            if controlled {
                tracing::info!(
                    "IV route with GRBS1-4 all in {}-{}, de-escalating to basal-bolus",
                    CONTROLLED_MIN,
                    CONTROLLED_MAX
                );
                AlgorithmKind::BasalBolus
            } else {
                tracing::info!("IV route not yet controlled, continuing IV infusion");
                AlgorithmKind::IvInfusion
            }
        }
    }
}
