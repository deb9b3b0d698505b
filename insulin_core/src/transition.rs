//! Trend-based level transitions.
//!
//! Applies only when the starting level was inferred from dosing history;
//! defaulted levels skip this stage entirely. Readings arrive most recent
//! first; fewer than two readings (by length, not by value) means no change.

use crate::types::{AlgorithmKind, Level};

/// Transition ceiling for IV levels.
///
/// Fixed at 5 even when a supplied table defines more IV levels; taller
/// tables are flagged at load time, never silently accommodated here.
pub const IV_MAX_LEVEL: Level = 5;

/// Transition ceiling for basal-bolus levels.
pub const BASAL_MAX_LEVEL: Level = 7;

const MIN_LEVEL: Level = 1;

/// IV moves up above this glucose when not falling fast.
const IV_UP_THRESHOLD: f64 = 150.0;

/// IV moves down below this glucose.
const IV_DOWN_THRESHOLD: f64 = 110.0;

/// A drop of at most this much between readings still counts as "not falling".
const IV_DROP_TOLERANCE: f64 = 60.0;

/// Basal moves up when at least this many readings exceed 180.
const BASAL_HIGH_COUNT: usize = 2;

const BASAL_HIGH_THRESHOLD: f64 = 180.0;
const BASAL_LOW_THRESHOLD: f64 = 140.0;

/// Apply the trend rules for the given algorithm family.
pub fn apply_transition(algorithm: AlgorithmKind, level: Level, readings: &[f64]) -> Level {
    match algorithm {
        AlgorithmKind::IvInfusion => iv_transition(level, readings),
        AlgorithmKind::BasalBolus => basal_transition(level, readings),
    }
}

/// IV trend rules: the two most recent readings decide.
fn iv_transition(level: Level, readings: &[f64]) -> Level {
    if readings.len() < 2 {
        return level;
    }

    let current = readings[0];
    let previous = readings[1];

    // Up: still high, and rising or falling by no more than the tolerance.
    if current > IV_UP_THRESHOLD
        && (current > previous || previous - current <= IV_DROP_TOLERANCE)
    {
        let next = (level + 1).min(IV_MAX_LEVEL);
        tracing::debug!("IV transition: moving up from level {} to {}", level, next);
        return next;
    }

    if current < IV_DOWN_THRESHOLD {
        let next = level.saturating_sub(1).max(MIN_LEVEL);
        tracing::debug!("IV transition: moving down from level {} to {}", level, next);
        return next;
    }

    tracing::debug!("IV transition: holding level {}", level);
    level
}

/// Basal-bolus trend rules: counts over the whole series decide.
fn basal_transition(level: Level, readings: &[f64]) -> Level {
    if readings.len() < 2 {
        return level;
    }

    let above_high = readings
        .iter()
        .filter(|g| **g > BASAL_HIGH_THRESHOLD)
        .count();
    // Untaken (0) readings are not hypoglycemia.
    let below_low = readings
        .iter()
        .filter(|g| **g > 0.0 && **g < BASAL_LOW_THRESHOLD)
        .count();

    if above_high >= BASAL_HIGH_COUNT {
        let next = (level + 1).min(BASAL_MAX_LEVEL);
        tracing::debug!(
            "Basal transition: {} readings above {}, moving up from level {} to {}",
            above_high,
            BASAL_HIGH_THRESHOLD,
            level,
            next
        );
        return next;
    }

    if below_low >= 1 {
        let next = level.saturating_sub(1).max(MIN_LEVEL);
        tracing::debug!(
            "Basal transition: reading below {}, moving down from level {} to {}",
            BASAL_LOW_THRESHOLD,
            level,
            next
        );
        return next;
    }

    tracing::debug!("Basal transition: holding level {}", level);
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iv_moves_up_when_rising_above_threshold() {
        assert_eq!(iv_transition(3, &[200.0, 180.0, 0.0, 0.0, 0.0]), 4);
    }

    #[test]
    fn test_iv_moves_up_on_slow_fall() {
        // Still above 150 and only 60 below the previous reading.
        assert_eq!(iv_transition(3, &[160.0, 220.0, 0.0, 0.0, 0.0]), 4);
    }

    #[test]
    fn test_iv_holds_on_fast_fall() {
        // Above 150 but dropped 61; hold.
        assert_eq!(iv_transition(3, &[160.0, 221.0, 0.0, 0.0, 0.0]), 3);
    }

    #[test]
    fn test_iv_moves_down_below_threshold() {
        assert_eq!(iv_transition(3, &[100.0, 120.0, 0.0, 0.0, 0.0]), 2);
    }

    #[test]
    fn test_iv_holds_in_target_band() {
        assert_eq!(iv_transition(3, &[130.0, 140.0, 0.0, 0.0, 0.0]), 3);
        assert_eq!(iv_transition(3, &[110.0, 140.0, 0.0, 0.0, 0.0]), 3);
        assert_eq!(iv_transition(3, &[150.0, 140.0, 0.0, 0.0, 0.0]), 3);
    }

    #[test]
    fn test_iv_clamps_at_ceiling_and_floor() {
        assert_eq!(iv_transition(5, &[300.0, 250.0, 0.0, 0.0, 0.0]), 5);
        assert_eq!(iv_transition(1, &[90.0, 100.0, 0.0, 0.0, 0.0]), 1);
    }

    #[test]
    fn test_iv_short_series_holds() {
        assert_eq!(iv_transition(3, &[300.0]), 3);
        assert_eq!(iv_transition(3, &[]), 3);
    }

    #[test]
    fn test_basal_moves_up_on_two_high_readings() {
        assert_eq!(basal_transition(3, &[200.0, 190.0, 170.0, 160.0, 150.0]), 4);
    }

    #[test]
    fn test_basal_holds_on_single_high_reading() {
        assert_eq!(basal_transition(3, &[200.0, 170.0, 160.0, 150.0, 145.0]), 3);
    }

    #[test]
    fn test_basal_moves_down_on_any_low_reading() {
        assert_eq!(basal_transition(3, &[130.0, 150.0, 160.0, 170.0, 180.0]), 2);
    }

    #[test]
    fn test_basal_untaken_readings_are_not_low() {
        assert_eq!(basal_transition(3, &[150.0, 160.0, 0.0, 0.0, 0.0]), 3);
    }

    #[test]
    fn test_basal_up_wins_over_down() {
        // Two highs and one low: up rule fires first.
        assert_eq!(basal_transition(3, &[200.0, 190.0, 130.0, 150.0, 160.0]), 4);
    }

    #[test]
    fn test_basal_clamps_at_ceiling_and_floor() {
        assert_eq!(basal_transition(7, &[300.0, 290.0, 280.0, 270.0, 260.0]), 7);
        assert_eq!(basal_transition(1, &[120.0, 150.0, 160.0, 170.0, 180.0]), 1);
    }

    #[test]
    fn test_basal_short_series_holds() {
        assert_eq!(basal_transition(3, &[200.0]), 3);
    }

    #[test]
    fn test_apply_transition_dispatches() {
        let readings = [200.0, 190.0, 170.0, 160.0, 150.0];
        assert_eq!(apply_transition(AlgorithmKind::IvInfusion, 3, &readings), 4);
        assert_eq!(apply_transition(AlgorithmKind::BasalBolus, 3, &readings), 4);
    }
}
