//! Category check: missingness and membership of a single column.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use super::{assign_all, cell, lookup};
use crate::error::Result;
use crate::flags::{FlagColumn, FlagKind, flag_column_name};
use crate::value::{ValueSet, is_missing};

/// Meaning of the values flag produced by a category check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuesPolarity {
    /// `err_<feature>_values`: true for a present value outside the set.
    #[default]
    Violation,
    /// `<feature>_is_valid`: true for a value inside the set.
    Membership,
}

impl ValuesPolarity {
    fn kind(self) -> FlagKind {
        match self {
            ValuesPolarity::Violation => FlagKind::Values,
            ValuesPolarity::Membership => FlagKind::IsValid,
        }
    }
}

/// Rule for a categorical (single-column) feature.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub feature: String,
    pub valid_values: ValueSet,
    pub polarity: ValuesPolarity,
}

impl CategoryRule {
    pub fn new(feature: impl Into<String>, valid_values: ValueSet) -> Self {
        Self {
            feature: feature.into(),
            valid_values,
            polarity: ValuesPolarity::default(),
        }
    }

    #[must_use]
    pub fn with_polarity(mut self, polarity: ValuesPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn flag_columns(&self) -> Vec<String> {
        vec![
            flag_column_name(&self.feature, FlagKind::Missing),
            flag_column_name(&self.feature, self.polarity.kind()),
        ]
    }
}

/// Flag missing cells and cells outside (or inside) the valid-value set.
///
/// Adds `err_<feature>_missing` and, depending on the rule's polarity, either
/// `err_<feature>_values` or `<feature>_is_valid`.
///
/// # Errors
///
/// Returns [`CheckError::ColumnNotFound`](crate::CheckError::ColumnNotFound)
/// if the feature column is absent.
pub fn check_category(df: &mut DataFrame, rule: &CategoryRule) -> Result<Vec<FlagColumn>> {
    let span = info_span!("category", feature = %rule.feature);
    let _guard = span.enter();

    let column = lookup(df, &rule.feature)?;
    let height = df.height();
    let mut missing = Vec::with_capacity(height);
    let mut values = Vec::with_capacity(height);

    for idx in 0..height {
        let value = cell(column, idx);
        let absent = is_missing(&value);
        let member = !absent && rule.valid_values.matches(&value);
        missing.push(absent);
        values.push(match rule.polarity {
            ValuesPolarity::Violation => !absent && !member,
            ValuesPolarity::Membership => member,
        });
    }

    let flags = vec![
        FlagColumn::new(&rule.feature, FlagKind::Missing, missing),
        FlagColumn::new(&rule.feature, rule.polarity.kind(), values),
    ];
    assign_all(df, &flags)?;

    debug!(
        rows = height,
        missing = flags[0].flagged(),
        values = flags[1].flagged(),
        "category check complete"
    );
    Ok(flags)
}
