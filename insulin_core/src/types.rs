//! Core domain types for the Gdose insulin advisory system.
//!
//! This module defines the fundamental types used throughout the pipeline:
//! - Glucose reading series and prior-dose history
//! - Patient snapshot (the normalized request)
//! - Algorithm families and severity levels
//! - The recommendation output record

use serde::{Deserialize, Serialize};

/// Number of glucose readings carried per request, most recent first.
pub const GLUCOSE_SLOTS: usize = 5;

/// Number of prior insulin doses carried per request, most recent first.
pub const DOSE_SLOTS: usize = 4;

/// Severity/intensity index into a per-algorithm dose table.
pub type Level = u32;

// ============================================================================
// Request-side types
// ============================================================================

/// Insulin administration route as reported for the patient.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Iv,
    Sc,
}

/// Diet order in effect for the patient.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DietOrder {
    #[serde(rename = "NPO")]
    Npo,
    #[serde(rename = "others")]
    Other,
}

/// Ordered glucose readings in mg/dL, index 0 = most recent.
///
/// A reading of exactly 0 means "not taken" and is excluded from valid-reading
/// counts.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct GlucoseSeries(pub [f64; GLUCOSE_SLOTS]);

impl GlucoseSeries {
    /// The most recent reading, taken or not.
    pub fn most_recent(&self) -> f64 {
        self.0[0]
    }

    /// Number of readings actually taken (> 0).
    pub fn valid_count(&self) -> usize {
        self.0.iter().filter(|g| **g > 0.0).count()
    }

    /// The first taken (> 0) reading, scanning from most recent.
    pub fn first_valid(&self) -> Option<f64> {
        self.0.iter().copied().find(|g| *g > 0.0)
    }

    /// The reading the dose lookup keys on for the given algorithm family.
    ///
    /// IV prefers the most recent nonzero reading, falling back to the first
    /// nonzero one, then 0. Basal-bolus uses the most recent slot as-is.
    pub fn current_reading(&self, algorithm: AlgorithmKind) -> f64 {
        match algorithm {
            AlgorithmKind::IvInfusion => {
                if self.0[0] > 0.0 {
                    self.0[0]
                } else {
                    self.first_valid().unwrap_or(0.0)
                }
            }
            AlgorithmKind::BasalBolus => self.0[0],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Ordered prior insulin doses, index 0 = most recent. 0 means none recorded.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct DoseHistory(pub [f64; DOSE_SLOTS]);

impl DoseHistory {
    /// The most recent prior dose slot, recorded or not.
    pub fn most_recent(&self) -> f64 {
        self.0[0]
    }

    /// True if any prior dose was actually recorded (> 0).
    pub fn has_any(&self) -> bool {
        self.0.iter().any(|d| *d > 0.0)
    }
}

/// Normalized, validated request. Constructed once by the input normalizer,
/// consumed by the pipeline, and discarded; nothing persists across requests.
#[derive(Clone, Debug, Serialize)]
pub struct PatientSnapshot {
    pub glucose: GlucoseSeries,
    pub doses: DoseHistory,
    /// Accepted and validated but not read by any computation yet.
    pub has_ckd: bool,
    pub dual_inotropes: bool,
    pub route: Route,
    pub diet_order: DietOrder,
}

// ============================================================================
// Result-side types
// ============================================================================

/// The algorithm family a recommendation was computed with.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    #[serde(rename = "IV Infusion")]
    IvInfusion,
    #[serde(rename = "Basal Bolus")]
    BasalBolus,
}

impl AlgorithmKind {
    /// Dose unit string for this family.
    pub fn unit(&self) -> &'static str {
        match self {
            AlgorithmKind::IvInfusion => "IU/hr",
            AlgorithmKind::BasalBolus => "IU",
        }
    }

    /// Human-facing administration route label for this family.
    pub fn route_label(&self) -> &'static str {
        match self {
            AlgorithmKind::IvInfusion => "iv",
            AlgorithmKind::BasalBolus => "subcutaneous",
        }
    }
}

/// The sole output artifact: one complete dosing recommendation.
///
/// Serialized field names are the wire contract consumed by callers.
#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
    #[serde(rename = "Suggested_insulin_dose")]
    pub dose: f64,
    #[serde(rename = "Suggested_route")]
    pub route_label: String,
    #[serde(rename = "next_grbs_after")]
    pub next_check_hours: u32,
    pub algorithm_used: AlgorithmKind,
    pub level: Level,
    pub action: String,
    pub unit: String,
}
