//! Cell values and admissible value sets.
//!
//! Cells are compared through a canonical string key so that a plan value of
//! `1` matches an `Int64` cell `1`, a `Float64` cell `1.0` and a string cell
//! `" 1 "` alike.

use std::collections::BTreeSet;
use std::fmt;

use polars::prelude::AnyValue;
use serde::{Deserialize, Serialize};

/// Converts a Polars `AnyValue` to its canonical string form.
///
/// Returns an empty string for `Null`. Numbers are rendered without trailing
/// zeros, text is trimmed.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use survey_check::any_to_string;
///
/// assert_eq!(any_to_string(&AnyValue::Null), "");
/// assert_eq!(any_to_string(&AnyValue::Float64(2.0)), "2");
/// assert_eq!(any_to_string(&AnyValue::String(" dk ")), "dk");
/// ```
pub fn any_to_string(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(*v)),
        AnyValue::Float64(v) => format_numeric(*v),
        AnyValue::String(s) => s.trim().to_string(),
        AnyValue::StringOwned(s) => s.trim().to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number without a fractional part when integral.
///
/// # Examples
///
/// ```
/// use survey_check::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(1.50), "1.5");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        // Integral values print without ".0"; -0.0 collapses to "0".
        return format!("{}", v as i64);
    }
    format!("{v}")
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Returns true for null cells, blank strings and NaN.
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => s.trim().is_empty(),
        AnyValue::StringOwned(s) => s.trim().is_empty(),
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        _ => false,
    }
}

/// Canonical keys of every value held by a cell.
///
/// A list cell yields one key per non-missing element; a missing cell yields
/// none.
pub fn cell_keys(value: &AnyValue<'_>) -> Vec<String> {
    if is_missing(value) {
        return Vec::new();
    }
    match value {
        AnyValue::List(series) => (0..series.len())
            .filter_map(|idx| series.get(idx).ok())
            .filter(|inner| !is_missing(inner))
            .map(|inner| any_to_string(&inner))
            .collect(),
        other => vec![any_to_string(other)],
    }
}

/// One admissible value of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CheckValue {
    /// Canonical key used for membership tests.
    pub fn key(&self) -> String {
        match self {
            CheckValue::Int(v) => v.to_string(),
            CheckValue::Float(v) => format_numeric(*v),
            CheckValue::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for CheckValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<i64> for CheckValue {
    fn from(value: i64) -> Self {
        CheckValue::Int(value)
    }
}

impl From<i32> for CheckValue {
    fn from(value: i32) -> Self {
        CheckValue::Int(i64::from(value))
    }
}

impl From<f64> for CheckValue {
    fn from(value: f64) -> Self {
        CheckValue::Float(value)
    }
}

impl From<&str> for CheckValue {
    fn from(value: &str) -> Self {
        CheckValue::Text(value.to_string())
    }
}

impl From<String> for CheckValue {
    fn from(value: String) -> Self {
        CheckValue::Text(value)
    }
}

/// Ordered set of admissible values, deduplicated by canonical key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CheckValue>", into = "Vec<CheckValue>")]
pub struct ValueSet {
    values: Vec<CheckValue>,
    keys: BTreeSet<String>,
}

impl ValueSet {
    /// Create a set from any iterator of values.
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CheckValue>,
    {
        let mut set = Self::default();
        for value in values {
            set.insert(value.into());
        }
        set
    }

    /// Insert a value unless an equal key is already present.
    pub fn insert(&mut self, value: CheckValue) {
        if self.keys.insert(value.key()) {
            self.values.push(value);
        }
    }

    /// Check membership of a canonical key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Check whether any value held by the cell is in the set.
    pub fn matches(&self, cell: &AnyValue<'_>) -> bool {
        cell_keys(cell).iter().any(|key| self.contains_key(key))
    }

    /// Values in insertion order.
    pub fn values(&self) -> &[CheckValue] {
        &self.values
    }

    /// Canonical keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.values.iter().map(CheckValue::key)
    }

    /// Values of `self` that are not in `other`.
    pub fn difference(&self, other: &ValueSet) -> ValueSet {
        ValueSet::new(
            self.values
                .iter()
                .filter(|value| !other.contains_key(&value.key()))
                .cloned(),
        )
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<CheckValue>> for ValueSet {
    fn from(values: Vec<CheckValue>) -> Self {
        ValueSet::new(values)
    }
}

impl From<ValueSet> for Vec<CheckValue> {
    fn from(set: ValueSet) -> Self {
        set.values
    }
}
