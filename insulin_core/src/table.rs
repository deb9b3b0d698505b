//! Dose table model and built-in defaults.
//!
//! A dose table maps severity levels to ordered lists of (glucose range,
//! dose) entries, one table per algorithm family. Tables are built once at
//! startup and read-only afterwards; every pipeline call receives the table
//! by reference.

use crate::types::{AlgorithmKind, Level};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::Serialize;

/// Upper bound substituted for open-ended ">N" ranges.
pub const OPEN_RANGE_MAX: f64 = 1000.0;

/// Inclusive glucose interval in mg/dL.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct GlucoseRange {
    pub min: f64,
    pub max: f64,
}

impl GlucoseRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both ends inclusive.
    pub fn contains(&self, glucose: f64) -> bool {
        self.min <= glucose && glucose <= self.max
    }
}

/// Parse a glucose range string.
///
/// Grammar: `"<N"` means [0, N]; `">N"` means [N, 1000]; `"A-B"` means [A, B].
pub fn parse_glucose_range(text: &str) -> Result<GlucoseRange> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('<') {
        Ok(GlucoseRange::new(0.0, parse_bound(rest)?))
    } else if let Some(rest) = text.strip_prefix('>') {
        Ok(GlucoseRange::new(parse_bound(rest)?, OPEN_RANGE_MAX))
    } else if let Some((lo, hi)) = text.split_once('-') {
        Ok(GlucoseRange::new(parse_bound(lo)?, parse_bound(hi)?))
    } else {
        Err(Error::Table(format!(
            "Unrecognized glucose range '{}'",
            text
        )))
    }
}

fn parse_bound(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::Table(format!("Invalid glucose bound '{}'", raw.trim())))
}

/// One (glucose range, dose) row within a level.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct DoseEntry {
    pub range: GlucoseRange,
    pub dose: f64,
}

/// All dose entries declared for one level, in declaration order.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LevelDoses {
    pub level: Level,
    pub entries: Vec<DoseEntry>,
}

/// Per-algorithm dose table.
///
/// Levels are kept in insertion order, not sorted: the nearest-level search
/// tie-breaks on the first minimum encountered, so iteration order is part of
/// the table's observable behavior.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct AlgorithmTable {
    levels: Vec<LevelDoses>,
}

impl AlgorithmTable {
    /// Append an entry, creating the level on first sight.
    pub fn push_entry(&mut self, level: Level, range: GlucoseRange, dose: f64) {
        match self.levels.iter_mut().find(|l| l.level == level) {
            Some(existing) => existing.entries.push(DoseEntry { range, dose }),
            None => self.levels.push(LevelDoses {
                level,
                entries: vec![DoseEntry { range, dose }],
            }),
        }
    }

    pub fn level(&self, level: Level) -> Option<&LevelDoses> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Levels in insertion order.
    pub fn levels(&self) -> impl Iterator<Item = &LevelDoses> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn max_level(&self) -> Option<Level> {
        self.levels.iter().map(|l| l.level).max()
    }
}

/// The complete dose table: one algorithm table per family.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct DoseTable {
    pub iv: AlgorithmTable,
    pub basal: AlgorithmTable,
}

impl DoseTable {
    pub fn for_algorithm(&self, algorithm: AlgorithmKind) -> &AlgorithmTable {
        match algorithm {
            AlgorithmKind::IvInfusion => &self.iv,
            AlgorithmKind::BasalBolus => &self.basal,
        }
    }

    /// Validate the table for consistency.
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, table) in [("IV", &self.iv), ("Basal", &self.basal)] {
            if table.is_empty() {
                errors.push(format!("{} table has no levels", name));
            }
            for level in table.levels() {
                if level.level == 0 {
                    errors.push(format!("{} table declares level 0", name));
                }
                if level.entries.is_empty() {
                    errors.push(format!(
                        "{} table level {} has no dose entries",
                        name, level.level
                    ));
                }
                for entry in &level.entries {
                    if entry.range.min > entry.range.max {
                        errors.push(format!(
                            "{} table level {}: range min {} > max {}",
                            name, level.level, entry.range.min, entry.range.max
                        ));
                    }
                    if entry.dose < 0.0 {
                        errors.push(format!(
                            "{} table level {}: negative dose {}",
                            name, level.level, entry.dose
                        ));
                    }
                }
            }
        }

        errors
    }
}

/// Cached default table - built once and reused across all operations
static DEFAULT_TABLE: Lazy<DoseTable> = Lazy::new(build_default_table_internal);

/// Get a reference to the cached built-in default table
///
/// Prefer this over `build_default_table()` outside of tests; the table is
/// built once and shared.
pub fn get_default_table() -> &'static DoseTable {
    &DEFAULT_TABLE
}

/// Build the built-in default table.
///
/// **Note**: For production use, prefer `get_default_table()` which returns a
/// cached reference. This function is retained for testing and custom table
/// construction.
pub fn build_default_table() -> DoseTable {
    build_default_table_internal()
}

fn build_default_table_internal() -> DoseTable {
    let mut table = DoseTable::default();

    // IV infusion: rates in IU/hr
    table.iv.push_entry(1, GlucoseRange::new(0.0, 110.0), 0.0);
    table.iv.push_entry(2, GlucoseRange::new(111.0, 150.0), 1.0);
    table.iv.push_entry(3, GlucoseRange::new(151.0, 200.0), 2.0);
    table.iv.push_entry(4, GlucoseRange::new(201.0, 250.0), 3.0);
    table.iv.push_entry(5, GlucoseRange::new(251.0, 300.0), 4.0);

    // Basal-bolus: discrete doses in IU
    table.basal.push_entry(1, GlucoseRange::new(0.0, 140.0), 0.0);
    table.basal.push_entry(2, GlucoseRange::new(141.0, 180.0), 2.0);
    table.basal.push_entry(3, GlucoseRange::new(181.0, 220.0), 4.0);
    table.basal.push_entry(4, GlucoseRange::new(221.0, 260.0), 6.0);
    table.basal.push_entry(5, GlucoseRange::new(261.0, 300.0), 8.0);
    table.basal.push_entry(6, GlucoseRange::new(301.0, 350.0), 16.0);
    table.basal.push_entry(7, GlucoseRange::new(351.0, 1000.0), 12.0);

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upper_bounded_range() {
        let range = parse_glucose_range("<110").unwrap();
        assert_eq!(range, GlucoseRange::new(0.0, 110.0));
    }

    #[test]
    fn test_parse_lower_bounded_range() {
        let range = parse_glucose_range(">400").unwrap();
        assert_eq!(range, GlucoseRange::new(400.0, OPEN_RANGE_MAX));
    }

    #[test]
    fn test_parse_explicit_range() {
        let range = parse_glucose_range("110-129").unwrap();
        assert_eq!(range, GlucoseRange::new(110.0, 129.0));
        let range = parse_glucose_range(" 151 - 200 ").unwrap();
        assert_eq!(range, GlucoseRange::new(151.0, 200.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_glucose_range("high").is_err());
        assert!(parse_glucose_range("<abc").is_err());
        assert!(parse_glucose_range("").is_err());
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = GlucoseRange::new(141.0, 180.0);
        assert!(range.contains(141.0));
        assert!(range.contains(180.0));
        assert!(!range.contains(140.9));
        assert!(!range.contains(180.1));
    }

    #[test]
    fn test_default_table_shape() {
        let table = build_default_table();
        assert_eq!(table.iv.len(), 5);
        assert_eq!(table.basal.len(), 7);
        assert_eq!(table.iv.max_level(), Some(5));
        assert_eq!(table.basal.max_level(), Some(7));
    }

    #[test]
    fn test_default_table_validates() {
        let errors = build_default_table().validate();
        assert!(
            errors.is_empty(),
            "Default table has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_push_entry_preserves_insertion_order() {
        let mut table = AlgorithmTable::default();
        table.push_entry(3, GlucoseRange::new(0.0, 100.0), 1.0);
        table.push_entry(1, GlucoseRange::new(0.0, 100.0), 2.0);
        table.push_entry(3, GlucoseRange::new(101.0, 200.0), 3.0);

        let levels: Vec<Level> = table.levels().map(|l| l.level).collect();
        assert_eq!(levels, vec![3, 1]);
        assert_eq!(table.level(3).unwrap().entries.len(), 2);
    }

    #[test]
    fn test_validate_flags_bad_entries() {
        let mut table = DoseTable::default();
        table.iv.push_entry(0, GlucoseRange::new(200.0, 100.0), -1.0);
        table.basal.push_entry(1, GlucoseRange::new(0.0, 140.0), 0.0);

        let errors = table.validate();
        assert!(errors.iter().any(|e| e.contains("level 0")));
        assert!(errors.iter().any(|e| e.contains("min 200 > max 100")));
        assert!(errors.iter().any(|e| e.contains("negative dose")));
    }

    #[test]
    fn test_validate_flags_empty_tables() {
        let errors = DoseTable::default().validate();
        assert!(errors.iter().any(|e| e.contains("IV table has no levels")));
        assert!(errors
            .iter()
            .any(|e| e.contains("Basal table has no levels")));
    }
}
