//! Next glucose check timing.

use crate::types::{AlgorithmKind, DietOrder, PatientSnapshot};

/// Band GRBS1-4 must hold for an IV patient to stretch to two-hourly checks.
const IV_CONTROLLED_MIN: f64 = 140.0;
const IV_CONTROLLED_MAX: f64 = 180.0;

/// Hours until the next glucose check.
///
/// IV: hourly, or two-hourly once the last four readings are controlled.
/// Basal-bolus: four-hourly for fasting (NPO) patients, six-hourly otherwise.
pub fn next_check_hours(algorithm: AlgorithmKind, snapshot: &PatientSnapshot) -> u32 {
    match algorithm {
        AlgorithmKind::IvInfusion => {
            let controlled = snapshot.glucose.as_slice()[..4]
                .iter()
                .all(|g| (IV_CONTROLLED_MIN..=IV_CONTROLLED_MAX).contains(g));
            if controlled {
                2
            } else {
                1
            }
        }
        AlgorithmKind::BasalBolus => match snapshot.diet_order {
            DietOrder::Npo => 4,
            DietOrder::Other => 6,
        },
    }
}
