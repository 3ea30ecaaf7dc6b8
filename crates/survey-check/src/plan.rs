//! Declarative check plans.
//!
//! A plan lists the checks to run over one survey table, in order:
//!
//! ```toml
//! [[check]]
//! kind = "category"
//! feature = "V3"
//! values = [1, 2, 3]
//!
//! [[check]]
//! kind = "interval"
//! feature = "V5"
//! min = 18
//! max = 99
//!
//! [[check]]
//! kind = "spread"
//! name = "V25"
//! features = ["V25.1", "V25.2", "V25.3"]
//! filter = "F25"
//! values = [1, 2, 3, 4, 5, 6, 7, 8]
//! na_values = [8]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::checks::{
    Bounds, CategoryRule, IntervalRule, Rule, SpreadRule, ValuesPolarity,
};
use crate::error::{CheckError, Result};
use crate::report::FlagReport;
use crate::value::ValueSet;

/// One `[[check]]` entry of a plan file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckSpec {
    Category {
        feature: String,
        values: ValueSet,
        #[serde(default)]
        polarity: ValuesPolarity,
    },
    Interval {
        feature: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    Spread {
        name: String,
        features: Vec<String>,
        filter: Option<String>,
        #[serde(default)]
        values: ValueSet,
        na_values: Option<ValueSet>,
    },
}

impl CheckSpec {
    /// Validate the entry into a runnable rule.
    ///
    /// # Errors
    ///
    /// Bound errors for interval entries, feature-group errors for spread
    /// entries.
    pub fn to_rule(&self) -> Result<Rule> {
        match self {
            CheckSpec::Category {
                feature,
                values,
                polarity,
            } => Ok(Rule::Category(
                CategoryRule::new(feature.clone(), values.clone()).with_polarity(*polarity),
            )),
            CheckSpec::Interval { feature, min, max } => {
                let bounds = Bounds::from_limits(feature, *min, *max)?;
                Ok(Rule::Interval(IntervalRule::new(feature.clone(), bounds)))
            }
            CheckSpec::Spread {
                name,
                features,
                filter,
                values,
                na_values,
            } => {
                let mut rule =
                    SpreadRule::new(name.clone(), features.clone()).with_valid_values(values.clone());
                if let Some(filter) = filter {
                    rule = rule.with_filter(filter.clone());
                }
                if let Some(na_values) = na_values {
                    rule = rule.with_na_values(na_values.clone());
                }
                rule.validate()?;
                Ok(Rule::Spread(rule))
            }
        }
    }
}

/// Ordered list of checks for one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckPlan {
    #[serde(default, rename = "check")]
    pub checks: Vec<CheckSpec>,
}

impl CheckPlan {
    /// Parse a plan from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Read and parse a plan file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CheckError::PlanRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|err| CheckError::PlanParse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Validate every entry, failing on the first bad one.
    pub fn rules(&self) -> Result<Vec<Rule>> {
        self.checks.iter().map(CheckSpec::to_rule).collect()
    }

    /// Flag columns the plan adds, in order, without touching any data.
    pub fn flag_columns(&self) -> Result<Vec<String>> {
        Ok(self
            .rules()?
            .iter()
            .flat_map(Rule::flag_columns)
            .collect())
    }
}

/// Run every check of the plan against `df`, appending flag columns.
///
/// All entries are validated before the first check runs. Execution stops at
/// the first failing check; flag columns of earlier checks stay in `df`.
pub fn run_plan(df: &mut DataFrame, plan: &CheckPlan) -> Result<FlagReport> {
    let rules = plan.rules()?;
    let span = info_span!("run_plan", checks = rules.len(), rows = df.height());
    let _guard = span.enter();

    let mut report = FlagReport::new(df.height());
    let mut seen = BTreeSet::new();
    for rule in &rules {
        for column in rule.flag_columns() {
            if !seen.insert(column.clone()) {
                warn!(%column, "flag column produced by more than one check, keeping the last");
            }
        }
        let flags = rule.apply(df)?;
        report.record(rule, &flags);
    }

    info!(
        flag_columns = report.flags.len(),
        flagged_cells = report.total_flagged(),
        "check plan complete"
    );
    Ok(report)
}
