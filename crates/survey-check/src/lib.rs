//! Survey data quality checks.
//!
//! Each check takes a survey table (rows are respondents) and appends boolean
//! flag columns named `err_<feature>_<kind>`:
//!
//! - [`check_category`]: missing cells and values outside a valid-value set
//! - [`check_interval`]: missing cells and values outside a numeric range
//! - [`check_spread`]: multi-select items split over several columns, with a
//!   routing filter, exclusive options and duplicate selections
//!
//! Checks borrow the table mutably for the duration of the call and only add
//! columns; existing columns and rows are left untouched. Flags depend only on
//! the feature and filter columns, so running a check twice yields the same
//! flags.

pub mod checks;
pub mod error;
pub mod flags;
pub mod plan;
pub mod report;
pub mod value;

pub use checks::{
    Bounds, CategoryRule, IntervalRule, Rule, SpreadRule, ValuesPolarity, check_category,
    check_interval, check_spread,
};
pub use error::{CheckError, Result};
pub use flags::{FlagColumn, FlagKind, flag_column_name};
pub use plan::{CheckPlan, CheckSpec, run_plan};
pub use report::{FlagReport, FlagSummary};
pub use value::{
    CheckValue, ValueSet, any_to_string, cell_keys, format_numeric, is_missing, parse_f64,
};
