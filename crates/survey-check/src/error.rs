//! Error types for survey checks.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running a check or loading a check plan.
#[derive(Debug, Error)]
pub enum CheckError {
    // === Lookup Errors ===
    /// A feature or filter column is not present in the table.
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    // === Type Errors ===
    /// Interval checks need numeric cells.
    #[error("column '{column}' row {row}: value '{value}' is not numeric")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Filter cells must coerce to a boolean.
    #[error("filter column '{column}' row {row}: value '{value}' is not boolean")]
    NotBoolean {
        column: String,
        row: usize,
        value: String,
    },

    // === Rule Errors ===
    /// Interval rule without `min` and `max`.
    #[error("interval check for '{feature}' needs at least one of min or max")]
    MissingBounds { feature: String },

    /// Interval rule with unusable bounds.
    #[error("interval check for '{feature}' has invalid bounds: {reason}")]
    InvalidBounds { feature: String, reason: String },

    /// Spread rule without feature columns.
    #[error("spread check '{name}' has no feature columns")]
    EmptyFeatureGroup { name: String },

    /// Spread rule listing its filter column among the features.
    #[error("spread check '{name}' lists filter column '{filter}' as a feature")]
    FilterInFeatureGroup { name: String, filter: String },

    /// Spread rule naming one feature column twice.
    #[error("spread check '{name}' lists column '{column}' more than once")]
    RepeatedFeature { name: String, column: String },

    /// A flag column name equals one of the check's input columns.
    #[error("check '{name}' would overwrite input column '{column}' with a flag")]
    FlagShadowsInput { name: String, column: String },

    // === Plan Errors ===
    /// Failed to read a check plan file.
    #[error("failed to read check plan {path}: {source}")]
    PlanRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Check plan is not valid TOML or does not match the plan schema.
    #[error("failed to parse check plan {path}: {message}")]
    PlanParse { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for CheckError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for check operations.
pub type Result<T> = std::result::Result<T, CheckError>;
