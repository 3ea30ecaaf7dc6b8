//! Tests for the interval check.

use polars::prelude::*;
use survey_check::{Bounds, CheckError, IntervalRule, check_interval};

fn flags(df: &DataFrame, name: &str) -> Vec<Option<bool>> {
    df.column(name).unwrap().bool().unwrap().into_iter().collect()
}

fn ages() -> DataFrame {
    DataFrame::new(vec![
        Series::new("V5".into(), vec![Some(3i64), Some(6), None, Some(1), Some(5), Some(0)]).into(),
    ])
    .unwrap()
}

#[test]
fn test_closed_range() {
    let mut df = ages();
    let rule = IntervalRule::new("V5", Bounds::Closed { min: 1.0, max: 5.0 });

    check_interval(&mut df, &rule).unwrap();

    assert_eq!(
        flags(&df, "err_V5_values"),
        vec![
            Some(false),
            Some(true),
            Some(false),
            Some(false),
            Some(false),
            Some(true)
        ]
    );
    assert_eq!(
        flags(&df, "err_V5_missing"),
        vec![
            Some(false),
            Some(false),
            Some(true),
            Some(false),
            Some(false),
            Some(false)
        ]
    );
}

#[test]
fn test_closed_range_rejects_fractions() {
    let mut df = DataFrame::new(vec![
        Series::new("V5".into(), vec![2.0f64, 2.5, 5.0]).into(),
    ])
    .unwrap();
    let rule = IntervalRule::new("V5", Bounds::Closed { min: 1.0, max: 5.0 });

    check_interval(&mut df, &rule).unwrap();

    assert_eq!(
        flags(&df, "err_V5_values"),
        vec![Some(false), Some(true), Some(false)]
    );
}

#[test]
fn test_min_only() {
    let mut df = ages();
    let rule = IntervalRule::new("V5", Bounds::AtLeast(3.0));

    check_interval(&mut df, &rule).unwrap();

    assert_eq!(
        flags(&df, "err_V5_values"),
        vec![
            Some(false),
            Some(false),
            Some(false),
            Some(true),
            Some(false),
            Some(true)
        ]
    );
}

#[test]
fn test_max_only() {
    let mut df = ages();
    let rule = IntervalRule::new("V5", Bounds::AtMost(5.0));

    check_interval(&mut df, &rule).unwrap();

    assert_eq!(
        flags(&df, "err_V5_values"),
        vec![
            Some(false),
            Some(true),
            Some(false),
            Some(false),
            Some(false),
            Some(false)
        ]
    );
}

#[test]
fn test_numeric_strings_are_parsed() {
    let mut df = DataFrame::new(vec![
        Series::new("V5".into(), vec![Some("4"), Some(" 7 "), Some(""), None]).into(),
    ])
    .unwrap();
    let rule = IntervalRule::new("V5", Bounds::AtMost(5.0));

    check_interval(&mut df, &rule).unwrap();

    assert_eq!(
        flags(&df, "err_V5_values"),
        vec![Some(false), Some(true), Some(false), Some(false)]
    );
    assert_eq!(
        flags(&df, "err_V5_missing"),
        vec![Some(false), Some(false), Some(true), Some(true)]
    );
}

#[test]
fn test_non_numeric_value_fails() {
    let mut df = DataFrame::new(vec![
        Series::new("V5".into(), vec!["4", "dk"]).into(),
    ])
    .unwrap();
    let rule = IntervalRule::new("V5", Bounds::AtLeast(0.0));

    let err = check_interval(&mut df, &rule).unwrap_err();

    assert!(matches!(
        err,
        CheckError::NotNumeric { row: 1, ref value, .. } if value == "dk"
    ));
    assert!(df.column("err_V5_values").is_err());
}
