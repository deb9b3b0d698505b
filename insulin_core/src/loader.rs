//! CSV dose table loading.
//!
//! The table source is a CSV record stream with headers
//! `algorithm,level,grbs_range,dose`. Any unreadable file or malformed row
//! abandons the whole load and falls back to the built-in default table;
//! loading problems never propagate to recommendation callers.

use crate::table::{build_default_table, parse_glucose_range, DoseTable};
use crate::transition::IV_MAX_LEVEL;
use crate::{Level, Result};
use serde::Deserialize;
use std::path::Path;

/// CSV row format for dose table entries
#[derive(Debug, Deserialize)]
struct TableRow {
    algorithm: String,
    level: Level,
    grbs_range: String,
    dose: f64,
}

/// Load a dose table from a CSV file, strictly.
///
/// Any IO, CSV, or range-grammar failure fails the whole load.
pub fn load_table(path: &Path) -> Result<DoseTable> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut table = DoseTable::default();
    for result in reader.deserialize::<TableRow>() {
        let row = result?;
        let range = parse_glucose_range(&row.grbs_range)?;
        match row.algorithm.as_str() {
            "IV" => table.iv.push_entry(row.level, range, row.dose),
            "Basal" => table.basal.push_entry(row.level, range, row.dose),
            other => {
                tracing::warn!("Ignoring row with unknown algorithm '{}'", other);
            }
        }
    }

    if let Some(max) = table.iv.max_level() {
        if max > IV_MAX_LEVEL {
            // Transitions clamp at IV_MAX_LEVEL; taller tables are only
            // reachable where a level is pinned directly.
            tracing::warn!(
                "IV table defines level {} but transitions stop at {}",
                max,
                IV_MAX_LEVEL
            );
        }
    }

    tracing::info!(
        "Loaded dose table from {:?} ({} IV levels, {} basal levels)",
        path,
        table.iv.len(),
        table.basal.len()
    );

    Ok(table)
}

/// Load a dose table from a CSV file, falling back to the built-in defaults.
pub fn load_table_or_default(path: &Path) -> DoseTable {
    match load_table(path) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(
                "Failed to load dose table from {:?}: {}. Using default values.",
                path,
                e
            );
            build_default_table()
        }
    }
}
