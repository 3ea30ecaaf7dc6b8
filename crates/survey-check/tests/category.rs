//! Tests for the category check.

use polars::prelude::*;
use survey_check::{CategoryRule, CheckError, ValueSet, ValuesPolarity, check_category};

fn flags(df: &DataFrame, name: &str) -> Vec<Option<bool>> {
    df.column(name).unwrap().bool().unwrap().into_iter().collect()
}

fn survey() -> DataFrame {
    DataFrame::new(vec![
        Series::new("id".into(), vec![101i64, 102, 103, 104]).into(),
        Series::new("V3".into(), vec![Some(1i64), Some(4), None, Some(3)]).into(),
    ])
    .unwrap()
}

#[test]
fn test_missing_flag_marks_null_cells() {
    let mut df = survey();
    let rule = CategoryRule::new("V3", ValueSet::new([1, 2, 3]));

    check_category(&mut df, &rule).unwrap();

    assert_eq!(
        flags(&df, "err_V3_missing"),
        vec![Some(false), Some(false), Some(true), Some(false)]
    );
}

#[test]
fn test_values_flag_marks_violations_by_default() {
    let mut df = survey();
    let rule = CategoryRule::new("V3", ValueSet::new([1, 2, 3]));

    check_category(&mut df, &rule).unwrap();

    // 4 is outside the set; the null row is left to the missing flag
    assert_eq!(
        flags(&df, "err_V3_values"),
        vec![Some(false), Some(true), Some(false), Some(false)]
    );
}

#[test]
fn test_membership_polarity_marks_valid_values() {
    let mut df = survey();
    let rule = CategoryRule::new("V3", ValueSet::new([1, 2, 3]))
        .with_polarity(ValuesPolarity::Membership);

    check_category(&mut df, &rule).unwrap();

    assert!(df.column("err_V3_values").is_err());
    assert_eq!(
        flags(&df, "V3_is_valid"),
        vec![Some(true), Some(false), Some(false), Some(true)]
    );
}

#[test]
fn test_string_categories() {
    let mut df = DataFrame::new(vec![
        Series::new("region".into(), vec![Some("north"), Some("South"), Some(" "), None]).into(),
    ])
    .unwrap();
    let rule = CategoryRule::new("region", ValueSet::new(["north", "south"]));

    check_category(&mut df, &rule).unwrap();

    assert_eq!(
        flags(&df, "err_region_missing"),
        vec![Some(false), Some(false), Some(true), Some(true)]
    );
    // membership is case-sensitive
    assert_eq!(
        flags(&df, "err_region_values"),
        vec![Some(false), Some(true), Some(false), Some(false)]
    );
}

#[test]
fn test_existing_columns_are_kept() {
    let mut df = survey();
    let rule = CategoryRule::new("V3", ValueSet::new([1]));

    check_category(&mut df, &rule).unwrap();

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["id", "V3", "err_V3_missing", "err_V3_values"]);
    assert_eq!(df.height(), 4);
}

#[test]
fn test_unknown_column() {
    let mut df = survey();
    let rule = CategoryRule::new("V99", ValueSet::new([1]));

    let err = check_category(&mut df, &rule).unwrap_err();

    assert!(matches!(err, CheckError::ColumnNotFound { column } if column == "V99"));
}
