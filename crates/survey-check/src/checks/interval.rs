//! Interval check: missingness and numeric range of a single column.

use polars::prelude::{AnyValue, DataFrame};
use tracing::{debug, info_span};

use super::{assign_all, cell, lookup};
use crate::error::{CheckError, Result};
use crate::flags::{FlagColumn, FlagKind, flag_column_name};
use crate::value::{any_to_string, is_missing, parse_f64};

/// Admissible range of an interval feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Integers `min..=max`.
    Closed { min: f64, max: f64 },
    /// Any value `>= min`.
    AtLeast(f64),
    /// Any value `<= max`.
    AtMost(f64),
}

impl Bounds {
    /// Build bounds from optional limits.
    ///
    /// At least one limit is required. When both are given the range is
    /// integer-stepped, so both must be integral and `min <= max`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::MissingBounds`] when neither limit is given and
    /// [`CheckError::InvalidBounds`] for unusable limits.
    pub fn from_limits(feature: &str, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        let invalid = |reason: String| CheckError::InvalidBounds {
            feature: feature.to_string(),
            reason,
        };
        for limit in [min, max].into_iter().flatten() {
            if !limit.is_finite() {
                return Err(invalid(format!("limit {limit} is not finite")));
            }
        }
        match (min, max) {
            (Some(min), Some(max)) => {
                if min.fract() != 0.0 || max.fract() != 0.0 {
                    return Err(invalid(format!(
                        "range {min}..={max} must have integer limits"
                    )));
                }
                if min > max {
                    return Err(invalid(format!("min {min} is greater than max {max}")));
                }
                Ok(Bounds::Closed { min, max })
            }
            (Some(min), None) => Ok(Bounds::AtLeast(min)),
            (None, Some(max)) => Ok(Bounds::AtMost(max)),
            (None, None) => Err(CheckError::MissingBounds {
                feature: feature.to_string(),
            }),
        }
    }

    /// Whether a present numeric value violates the bounds.
    pub fn violated_by(&self, value: f64) -> bool {
        match *self {
            Bounds::Closed { min, max } => !(value.fract() == 0.0 && value >= min && value <= max),
            Bounds::AtLeast(min) => value < min,
            Bounds::AtMost(max) => value > max,
        }
    }
}

/// Rule for a numeric (single-column) feature.
#[derive(Debug, Clone)]
pub struct IntervalRule {
    pub feature: String,
    pub bounds: Bounds,
}

impl IntervalRule {
    pub fn new(feature: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            feature: feature.into(),
            bounds,
        }
    }

    pub fn flag_columns(&self) -> Vec<String> {
        vec![
            flag_column_name(&self.feature, FlagKind::Missing),
            flag_column_name(&self.feature, FlagKind::Values),
        ]
    }
}

/// Numeric reading of a present cell; `None` when the cell is not a number.
fn numeric_value(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(s),
        _ => None,
    }
}

/// Flag missing cells and values outside the rule's bounds.
///
/// Adds `err_<feature>_missing` and `err_<feature>_values`. Missing cells are
/// never flagged as out of range.
///
/// # Errors
///
/// Returns [`CheckError::ColumnNotFound`] if the feature column is absent and
/// [`CheckError::NotNumeric`] on the first present cell that is not a number.
pub fn check_interval(df: &mut DataFrame, rule: &IntervalRule) -> Result<Vec<FlagColumn>> {
    let span = info_span!("interval", feature = %rule.feature);
    let _guard = span.enter();

    let column = lookup(df, &rule.feature)?;
    let height = df.height();
    let mut missing = Vec::with_capacity(height);
    let mut values = Vec::with_capacity(height);

    for idx in 0..height {
        let value = cell(column, idx);
        if is_missing(&value) {
            missing.push(true);
            values.push(false);
            continue;
        }
        let Some(number) = numeric_value(&value) else {
            return Err(CheckError::NotNumeric {
                column: rule.feature.clone(),
                row: idx,
                value: any_to_string(&value),
            });
        };
        missing.push(false);
        values.push(rule.bounds.violated_by(number));
    }

    let flags = vec![
        FlagColumn::new(&rule.feature, FlagKind::Missing, missing),
        FlagColumn::new(&rule.feature, FlagKind::Values, values),
    ];
    assign_all(df, &flags)?;

    debug!(
        rows = height,
        missing = flags[0].flagged(),
        out_of_range = flags[1].flagged(),
        "interval check complete"
    );
    Ok(flags)
}
