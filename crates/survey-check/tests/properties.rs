//! Row-wise properties of the checks.

use polars::prelude::*;
use proptest::prelude::*;
use survey_check::{
    Bounds, CategoryRule, IntervalRule, SpreadRule, ValueSet, check_category, check_interval,
    check_spread,
};

fn bools(df: &DataFrame, name: &str) -> Vec<bool> {
    df.column(name)
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .map(|flag| flag.unwrap())
        .collect()
}

fn cells() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::of(0i64..8), 1..40)
}

proptest! {
    #[test]
    fn category_missing_iff_null(values in cells()) {
        let mut df = DataFrame::new(vec![Series::new("V".into(), values.clone()).into()]).unwrap();
        check_category(&mut df, &CategoryRule::new("V", ValueSet::new([1, 2, 3]))).unwrap();

        let missing = bools(&df, "err_V_missing");
        let invalid = bools(&df, "err_V_values");
        for (idx, value) in values.iter().enumerate() {
            prop_assert_eq!(missing[idx], value.is_none());
            let expected = matches!(value, Some(v) if !(1..=3).contains(v));
            prop_assert_eq!(invalid[idx], expected);
        }
    }

    #[test]
    fn interval_closed_matches_inclusive_range(values in cells()) {
        let mut df = DataFrame::new(vec![Series::new("V".into(), values.clone()).into()]).unwrap();
        let rule = IntervalRule::new("V", Bounds::Closed { min: 1.0, max: 5.0 });
        check_interval(&mut df, &rule).unwrap();

        let invalid = bools(&df, "err_V_values");
        for (idx, value) in values.iter().enumerate() {
            let expected = matches!(value, Some(v) if !(1..=5).contains(v));
            prop_assert_eq!(invalid[idx], expected);
        }
    }

    #[test]
    fn spread_is_idempotent(
        a in cells(),
        seed in any::<u64>(),
    ) {
        let height = a.len();
        let b: Vec<Option<i64>> = a.iter().rev().copied().collect();
        let filter: Vec<Option<bool>> = (0..height)
            .map(|idx| match (seed >> (idx % 64)) & 3 {
                0 => None,
                1 => Some(false),
                _ => Some(true),
            })
            .collect();
        let mut df = DataFrame::new(vec![
            Series::new("A".into(), a).into(),
            Series::new("B".into(), b).into(),
            Series::new("F".into(), filter).into(),
        ])
        .unwrap();
        let rule = SpreadRule::new("Q", ["A", "B"])
            .with_filter("F")
            .with_valid_values(ValueSet::new([1, 2, 3, 4]))
            .with_na_values(ValueSet::new([4]));

        check_spread(&mut df, &rule).unwrap();
        let first = df.clone();
        check_spread(&mut df, &rule).unwrap();

        prop_assert!(df.equals_missing(&first));
        let missing = bools(&df, "err_Q_missing");
        let answered = bools(&df, "err_Q_answered");
        for idx in 0..height {
            prop_assert!(!(missing[idx] && answered[idx]));
        }
    }
}
