//! Check modules.
//!
//! Each module implements one survey check. A check reads its feature
//! columns, computes one or more [`FlagColumn`]s and appends them to the
//! table it was given.

pub mod category;
pub mod interval;
pub mod spread;

use polars::prelude::{AnyValue, Column, DataFrame};

use crate::error::{CheckError, Result};
use crate::flags::FlagColumn;

pub use category::{CategoryRule, ValuesPolarity, check_category};
pub use interval::{Bounds, IntervalRule, check_interval};
pub use spread::{SpreadRule, check_spread};

/// A validated check, ready to run against a table.
#[derive(Debug, Clone)]
pub enum Rule {
    Category(CategoryRule),
    Interval(IntervalRule),
    Spread(SpreadRule),
}

impl Rule {
    /// Short name of the check kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Category(_) => "category",
            Rule::Interval(_) => "interval",
            Rule::Spread(_) => "spread",
        }
    }

    /// Feature (or feature group) name used as flag column prefix.
    pub fn feature(&self) -> &str {
        match self {
            Rule::Category(rule) => &rule.feature,
            Rule::Interval(rule) => &rule.feature,
            Rule::Spread(rule) => &rule.name,
        }
    }

    /// Run the check and append its flag columns to `df`.
    pub fn apply(&self, df: &mut DataFrame) -> Result<Vec<FlagColumn>> {
        match self {
            Rule::Category(rule) => check_category(df, rule),
            Rule::Interval(rule) => check_interval(df, rule),
            Rule::Spread(rule) => check_spread(df, rule),
        }
    }

    /// Names of the flag columns this check adds.
    pub fn flag_columns(&self) -> Vec<String> {
        match self {
            Rule::Category(rule) => rule.flag_columns(),
            Rule::Interval(rule) => rule.flag_columns(),
            Rule::Spread(rule) => rule.flag_columns(),
        }
    }
}

/// Look up a column by exact name.
fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| CheckError::ColumnNotFound {
        column: name.to_string(),
    })
}

/// Read one cell, treating out-of-range reads as null.
fn cell(column: &Column, idx: usize) -> AnyValue<'_> {
    column.get(idx).unwrap_or(AnyValue::Null)
}

fn assign_all(df: &mut DataFrame, flags: &[FlagColumn]) -> Result<()> {
    for flag in flags {
        flag.assign(df)?;
    }
    Ok(())
}
