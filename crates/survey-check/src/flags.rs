//! Flag column naming and assignment.

use std::fmt;

use polars::prelude::{DataFrame, NamedFrom, Series};
use serde::Serialize;

use crate::error::Result;

/// Kind of violation recorded by a flag column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// Cell (or the whole feature group) is missing.
    Missing,
    /// Value outside the admissible set or range.
    Values,
    /// Membership in the admissible set (true means valid).
    IsValid,
    /// Feature group answered by a respondent who should have skipped it.
    Answered,
    /// Exclusive option selected alongside a substantive one.
    Na,
    /// Same value selected in two columns of a feature group.
    Duplicates,
}

impl FlagKind {
    /// Suffix used in the flag column name.
    pub fn suffix(self) -> &'static str {
        match self {
            FlagKind::Missing => "missing",
            FlagKind::Values => "values",
            FlagKind::IsValid => "is_valid",
            FlagKind::Answered => "answered",
            FlagKind::Na => "NA",
            FlagKind::Duplicates => "duplicates",
        }
    }

    /// Whether a `true` cell in this column marks a violation.
    pub fn is_violation(self) -> bool {
        !matches!(self, FlagKind::IsValid)
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Name of the flag column for a feature and check kind.
///
/// Violation flags follow `err_<feature>_<kind>`; the membership flag is
/// `<feature>_is_valid` so its inverted polarity shows in the name.
///
/// # Examples
///
/// ```
/// use survey_check::{FlagKind, flag_column_name};
///
/// assert_eq!(flag_column_name("V3", FlagKind::Missing), "err_V3_missing");
/// assert_eq!(flag_column_name("V25", FlagKind::Na), "err_V25_NA");
/// assert_eq!(flag_column_name("V3", FlagKind::IsValid), "V3_is_valid");
/// ```
pub fn flag_column_name(feature: &str, kind: FlagKind) -> String {
    if kind.is_violation() {
        format!("err_{feature}_{}", kind.suffix())
    } else {
        format!("{feature}_{}", kind.suffix())
    }
}

/// A computed flag column, one value per row.
#[derive(Debug, Clone)]
pub struct FlagColumn {
    pub name: String,
    pub feature: String,
    pub kind: FlagKind,
    pub values: Vec<bool>,
}

impl FlagColumn {
    pub fn new(feature: &str, kind: FlagKind, values: Vec<bool>) -> Self {
        Self {
            name: flag_column_name(feature, kind),
            feature: feature.to_string(),
            kind,
            values,
        }
    }

    /// Number of rows set to `true`.
    pub fn flagged(&self) -> usize {
        self.values.iter().filter(|flag| **flag).count()
    }

    /// Add the column to the table, replacing a previous run's column.
    pub fn assign(&self, df: &mut DataFrame) -> Result<()> {
        let series = Series::new(self.name.as_str().into(), self.values.as_slice());
        df.with_column(series)?;
        Ok(())
    }
}
