#![forbid(unsafe_code)]

//! Core decision pipeline for the Gdose insulin advisory system.
//!
//! This crate provides:
//! - Domain types (glucose series, dose history, patient snapshot)
//! - Dose table model and CSV loader
//! - Input normalization
//! - Algorithm selection, level inference and transitions
//! - Dose resolution and recheck timing
//! - The recommendation engine tying the above together

pub mod types;
pub mod error;
pub mod table;
pub mod loader;
pub mod config;
pub mod logging;
pub mod normalize;
pub mod selector;
pub mod level;
pub mod transition;
pub mod dose;
pub mod timing;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use table::{build_default_table, get_default_table, AlgorithmTable, DoseEntry, DoseTable, GlucoseRange};
pub use loader::load_table_or_default;
pub use config::Config;
pub use normalize::normalize_request;
pub use selector::select_algorithm;
pub use engine::recommend;
