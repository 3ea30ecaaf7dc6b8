use std::path::PathBuf;

use survey_check::FlagReport;

/// Inputs of one `run` invocation.
#[derive(Debug, Clone, Default)]
pub struct CheckJob {
    pub data: PathBuf,
    pub plan: PathBuf,
    /// Flagged CSV destination (default: `<stem>_checked.csv` beside `data`).
    pub output: Option<PathBuf>,
    pub index_column: Option<String>,
    pub null_values: Vec<String>,
    pub report_json: Option<PathBuf>,
    /// Run the checks without writing any file.
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct CheckResult {
    pub data: PathBuf,
    pub plan: PathBuf,
    /// Written CSV, `None` on dry runs.
    pub output: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    /// Width of the input table, before flag columns.
    pub columns: usize,
    pub report: FlagReport,
}

impl CheckResult {
    pub fn has_flags(&self) -> bool {
        !self.report.is_clean()
    }
}
