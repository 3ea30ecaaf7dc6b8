//! Spread check for multi-select questions.
//!
//! A spread feature is one survey item stored across several columns, one per
//! selected option (`V25.1`..`V25.8`). An optional boolean filter column says
//! which respondents were routed to the item. The check produces:
//!
//! - `err_<name>_missing`: routed respondent answered nothing
//! - `err_<name>_answered`: respondent who should have skipped answered anyway
//! - `err_<name>_NA`: exclusive option ("don't know", "none of the above")
//!   selected together with a substantive option
//! - `err_<name>_duplicates`: the same option selected in two columns
//!
//! Rows outside a partition get `false` for the partition's flag: `missing`
//! is only raised for routed rows and `answered` only for the others. Without
//! a filter column every row counts as routed.

use std::collections::HashSet;

use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::{debug, info_span, warn};

use super::{assign_all, cell, lookup};
use crate::error::{CheckError, Result};
use crate::flags::{FlagColumn, FlagKind, flag_column_name};
use crate::value::{ValueSet, any_to_string, cell_keys, is_missing};

/// Rule for a multi-column feature group.
#[derive(Debug, Clone)]
pub struct SpreadRule {
    /// Prefix for the flag columns.
    pub name: String,
    /// Feature group columns, in order.
    pub features: Vec<String>,
    /// Boolean routing column; `None` routes every row to the item.
    pub filter: Option<String>,
    pub valid_values: ValueSet,
    /// Options exclusive with every other valid option.
    pub na_values: Option<ValueSet>,
}

impl SpreadRule {
    pub fn new<I, S>(name: impl Into<String>, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            features: features.into_iter().map(Into::into).collect(),
            filter: None,
            valid_values: ValueSet::default(),
            na_values: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_valid_values(mut self, values: ValueSet) -> Self {
        self.valid_values = values;
        self
    }

    #[must_use]
    pub fn with_na_values(mut self, values: ValueSet) -> Self {
        self.na_values = Some(values);
        self
    }

    /// Reject rules that cannot be evaluated on any table.
    ///
    /// # Errors
    ///
    /// [`CheckError::EmptyFeatureGroup`], [`CheckError::RepeatedFeature`],
    /// [`CheckError::FilterInFeatureGroup`] or [`CheckError::FlagShadowsInput`].
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(CheckError::EmptyFeatureGroup {
                name: self.name.clone(),
            });
        }
        let mut seen = HashSet::with_capacity(self.features.len());
        for feature in &self.features {
            if !seen.insert(feature.as_str()) {
                return Err(CheckError::RepeatedFeature {
                    name: self.name.clone(),
                    column: feature.clone(),
                });
            }
        }
        if let Some(filter) = &self.filter
            && self.features.iter().any(|feature| feature == filter)
        {
            return Err(CheckError::FilterInFeatureGroup {
                name: self.name.clone(),
                filter: filter.clone(),
            });
        }
        // Flags are written with replace semantics; an input must never be one.
        let shadows_input = |column: &String| {
            seen.contains(column.as_str()) || self.filter.as_ref() == Some(column)
        };
        if let Some(column) = self.flag_columns().into_iter().find(shadows_input) {
            return Err(CheckError::FlagShadowsInput {
                name: self.name.clone(),
                column,
            });
        }
        Ok(())
    }

    pub fn flag_columns(&self) -> Vec<String> {
        self.flag_kinds()
            .into_iter()
            .map(|kind| flag_column_name(&self.name, kind))
            .collect()
    }

    fn flag_kinds(&self) -> Vec<FlagKind> {
        let mut kinds = vec![FlagKind::Missing, FlagKind::Answered];
        if self.na_values.is_some() {
            kinds.push(FlagKind::Na);
        }
        kinds.push(FlagKind::Duplicates);
        kinds
    }
}

/// Coerce a present filter cell to a boolean.
fn coerce_bool(value: &AnyValue<'_>) -> Option<bool> {
    match value {
        AnyValue::Boolean(b) => Some(*b),
        AnyValue::String(_) | AnyValue::StringOwned(_) => {
            match any_to_string(value).to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "y" => Some(true),
                "false" | "0" | "no" | "n" => Some(false),
                _ => None,
            }
        }
        other => match any_to_string(other).as_str() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        },
    }
}

/// Routing of every row; missing filter cells are not routed.
fn eligibility(column: Option<&Column>, filter: &str, height: usize) -> Result<Vec<bool>> {
    let Some(column) = column else {
        return Ok(vec![true; height]);
    };
    let mut eligible = Vec::with_capacity(height);
    for idx in 0..height {
        let value = cell(column, idx);
        if is_missing(&value) {
            eligible.push(false);
            continue;
        }
        let Some(flag) = coerce_bool(&value) else {
            return Err(CheckError::NotBoolean {
                column: filter.to_string(),
                row: idx,
                value: any_to_string(&value),
            });
        };
        eligible.push(flag);
    }
    Ok(eligible)
}

/// True when some valid value is present in two distinct columns of the row.
fn has_duplicate(cells: &[Vec<String>], valid_keys: &[String]) -> bool {
    for (i, left) in cells.iter().enumerate() {
        for right in &cells[i + 1..] {
            if valid_keys
                .iter()
                .any(|key| left.contains(key) && right.contains(key))
            {
                return true;
            }
        }
    }
    false
}

/// Check a multi-select feature group against its routing filter.
///
/// Adds `err_<name>_missing`, `err_<name>_answered`, `err_<name>_duplicates`
/// and, when the rule has NA values, `err_<name>_NA`.
///
/// # Errors
///
/// Returns [`CheckError::ColumnNotFound`] for an absent feature or filter
/// column, [`CheckError::NotBoolean`] for a filter cell that is not boolean,
/// and the errors of [`SpreadRule::validate`].
pub fn check_spread(df: &mut DataFrame, rule: &SpreadRule) -> Result<Vec<FlagColumn>> {
    let span = info_span!("spread", name = %rule.name, columns = rule.features.len());
    let _guard = span.enter();

    rule.validate()?;
    if rule.valid_values.is_empty() {
        warn!("no valid values given, duplicate check will not flag any row");
    }

    let table: &DataFrame = df;
    let height = table.height();
    let columns = rule
        .features
        .iter()
        .map(|feature| lookup(table, feature))
        .collect::<Result<Vec<_>>>()?;
    let filter_column = rule
        .filter
        .as_deref()
        .map(|filter| lookup(table, filter))
        .transpose()?;
    let eligible = eligibility(
        filter_column,
        rule.filter.as_deref().unwrap_or_default(),
        height,
    )?;

    let valid_keys: Vec<String> = rule.valid_values.keys().collect();
    let exclusive = rule
        .na_values
        .as_ref()
        .map(|na| (na, rule.valid_values.difference(na)));

    let mut missing = Vec::with_capacity(height);
    let mut answered = Vec::with_capacity(height);
    let mut contradictory = Vec::with_capacity(height);
    let mut duplicates = Vec::with_capacity(height);

    for (idx, routed) in eligible.iter().copied().enumerate() {
        let cells: Vec<Vec<String>> = columns
            .iter()
            .map(|column| cell_keys(&cell(column, idx)))
            .collect();
        let nothing_selected = cells.iter().all(Vec::is_empty);

        missing.push(routed && nothing_selected);
        answered.push(!routed && !nothing_selected);

        if let Some((na, battle)) = &exclusive {
            let keys = || cells.iter().flatten();
            let has_na = keys().any(|key| na.contains_key(key));
            let has_battle = keys().any(|key| battle.contains_key(key));
            contradictory.push(has_na && has_battle);
        }

        duplicates.push(has_duplicate(&cells, &valid_keys));
    }

    let mut flags = vec![
        FlagColumn::new(&rule.name, FlagKind::Missing, missing),
        FlagColumn::new(&rule.name, FlagKind::Answered, answered),
    ];
    if exclusive.is_some() {
        flags.push(FlagColumn::new(&rule.name, FlagKind::Na, contradictory));
    }
    flags.push(FlagColumn::new(&rule.name, FlagKind::Duplicates, duplicates));
    assign_all(df, &flags)?;

    for flag in &flags {
        debug!(column = %flag.name, flagged = flag.flagged(), "spread flag computed");
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(coerce_bool(&AnyValue::Boolean(true)), Some(true));
        assert_eq!(coerce_bool(&AnyValue::Int64(0)), Some(false));
        assert_eq!(coerce_bool(&AnyValue::Float64(1.0)), Some(true));
        assert_eq!(coerce_bool(&AnyValue::String(" Yes ")), Some(true));
        assert_eq!(coerce_bool(&AnyValue::String("N")), Some(false));
        assert_eq!(coerce_bool(&AnyValue::Int64(2)), None);
        assert_eq!(coerce_bool(&AnyValue::String("maybe")), None);
    }

    #[test]
    fn test_has_duplicate_pairs_distinct_columns() {
        let valid = keys(&["1", "2", "3"]);
        assert!(has_duplicate(&[keys(&["2"]), keys(&["5"]), keys(&["2"])], &valid));
        assert!(!has_duplicate(&[keys(&["1"]), keys(&["2"]), keys(&["3"])], &valid));
        // 5 repeats but is not a valid value
        assert!(!has_duplicate(&[keys(&["5"]), keys(&["5"])], &valid));
        // repeats inside one list cell do not count
        assert!(!has_duplicate(&[keys(&["1", "1"]), keys(&[])], &valid));
    }

    #[test]
    fn test_flag_columns_follow_na_presence() {
        let rule = SpreadRule::new("V25", ["V25.1", "V25.2"]);
        assert_eq!(
            rule.flag_columns(),
            vec!["err_V25_missing", "err_V25_answered", "err_V25_duplicates"]
        );
        let rule = rule.with_na_values(ValueSet::new([8]));
        assert_eq!(rule.flag_columns().len(), 4);
    }

    #[test]
    fn test_validate_rejects_filter_in_group() {
        let rule = SpreadRule::new("V25", ["V25.1", "F25"]).with_filter("F25");
        assert!(matches!(
            rule.validate(),
            Err(CheckError::FilterInFeatureGroup { .. })
        ));
        let rule = SpreadRule::new("V25", Vec::<String>::new());
        assert!(matches!(
            rule.validate(),
            Err(CheckError::EmptyFeatureGroup { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_repeated_feature() {
        let rule = SpreadRule::new("Q", ["A", "A", "B"]);
        assert!(matches!(
            rule.validate(),
            Err(CheckError::RepeatedFeature { ref column, .. }) if column == "A"
        ));
    }

    #[test]
    fn test_validate_rejects_flag_named_like_input() {
        let rule = SpreadRule::new("Q", ["err_Q_missing", "B"]);
        assert!(matches!(
            rule.validate(),
            Err(CheckError::FlagShadowsInput { ref column, .. }) if column == "err_Q_missing"
        ));
        let rule = SpreadRule::new("Q", ["A", "B"]).with_filter("err_Q_answered");
        assert!(matches!(
            rule.validate(),
            Err(CheckError::FlagShadowsInput { .. })
        ));
    }
}
