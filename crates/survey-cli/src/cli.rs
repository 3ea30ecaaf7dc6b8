//! CLI argument definitions for the survey checker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use survey_cli::types::CheckJob;

#[derive(Parser)]
#[command(
    name = "survey-check",
    version,
    about = "Survey data quality checks - flag missing, invalid and contradictory answers",
    long_about = "Run a check plan over a survey CSV table.\n\n\
                  Every check appends boolean err_<feature>_<kind> columns;\n\
                  existing columns and rows are left untouched."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow respondent identifiers in trace logs (redacted otherwise).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a check plan over a survey CSV file.
    Run(RunArgs),

    /// List the flag columns a check plan adds.
    Columns(ColumnsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Survey table with a single header row.
    #[arg(value_name = "DATA_CSV")]
    pub data: PathBuf,

    /// Check plan (TOML with [[check]] entries).
    #[arg(long = "plan", value_name = "PLAN_TOML")]
    pub plan: PathBuf,

    /// Flagged CSV destination (default: <DATA>_checked.csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Respondent-id column; must be complete and unique.
    #[arg(long = "index-column", value_name = "COLUMN")]
    pub index_column: Option<String>,

    /// Cell content read as missing, e.g. "NA" (repeatable).
    #[arg(long = "null-value", value_name = "VALUE")]
    pub null_values: Vec<String>,

    /// Also write the flag counts as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Run the checks and print the summary without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with status 1 when any violation is flagged.
    #[arg(long = "fail-on-flags")]
    pub fail_on_flags: bool,
}

impl RunArgs {
    pub fn to_job(&self) -> CheckJob {
        CheckJob {
            data: self.data.clone(),
            plan: self.plan.clone(),
            output: self.output.clone(),
            index_column: self.index_column.clone(),
            null_values: self.null_values.clone(),
            report_json: self.report_json.clone(),
            dry_run: self.dry_run,
        }
    }
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Check plan (TOML with [[check]] entries).
    #[arg(long = "plan", value_name = "PLAN_TOML")]
    pub plan: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
