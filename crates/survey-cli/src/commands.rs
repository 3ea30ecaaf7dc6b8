use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use polars::prelude::DataFrame;
use survey_check::{CheckPlan, FlagReport, any_to_string, run_plan};
use survey_ingest::{ReadOptions, read_survey_csv, write_survey_csv};
use tracing::{info, info_span, trace};

use crate::logging::redact_value;
use crate::summary::{apply_table_style, header_cell};
use crate::types::{CheckJob, CheckResult};

/// Print the flag columns a plan adds, without reading any data.
pub fn run_columns(plan_path: &Path) -> Result<()> {
    let plan = CheckPlan::load(plan_path).context("load check plan")?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Feature"),
        header_cell("Flag column"),
    ]);
    apply_table_style(&mut table);
    for rule in plan.rules().context("validate check plan")? {
        for column in rule.flag_columns() {
            table.add_row(vec![
                rule.kind().to_string(),
                rule.feature().to_string(),
                column,
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

/// Load a survey table, run the plan over it and write the flagged table.
pub fn run_check(job: &CheckJob) -> Result<CheckResult> {
    let span = info_span!("run", data = %job.data.display());
    let _guard = span.enter();

    let plan = CheckPlan::load(&job.plan).context("load check plan")?;
    // Fail on a bad plan before touching the data file.
    plan.rules().context("validate check plan")?;

    let mut options = ReadOptions::default().with_null_values(job.null_values.iter().cloned());
    if let Some(index) = &job.index_column {
        options = options.with_index_column(index.clone());
    }
    let mut df = read_survey_csv(&job.data, &options)
        .with_context(|| format!("read {}", job.data.display()))?;
    let columns = df.width();

    let report = run_plan(&mut df, &plan).context("run check plan")?;
    if let Some(index) = &job.index_column {
        trace_first_flagged(&df, &report, index)?;
    }

    let mut result = CheckResult {
        data: job.data.clone(),
        plan: job.plan.clone(),
        output: None,
        report_json: None,
        columns,
        report,
    };
    if job.dry_run {
        info!("dry run, no files written");
        return Ok(result);
    }

    let output = job
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&job.data));
    write_survey_csv(&mut df, &output)
        .with_context(|| format!("write {}", output.display()))?;
    result.output = Some(output);

    if let Some(path) = &job.report_json {
        write_report_json(&result.report, path)?;
        result.report_json = Some(path.clone());
    }
    Ok(result)
}

/// `<stem>_checked.csv` next to the input file.
pub fn default_output_path(data: &Path) -> PathBuf {
    let stem = data
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "survey".to_string());
    data.with_file_name(format!("{stem}_checked.csv"))
}

fn write_report_json(report: &FlagReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("serialize flag report")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "flag report written");
    Ok(())
}

/// Log the first flagged respondent of every violation column.
fn trace_first_flagged(df: &DataFrame, report: &FlagReport, index: &str) -> Result<()> {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return Ok(());
    }
    let ids = df.column(index)?;
    for summary in report.flags.iter().filter(|s| s.kind.is_violation() && s.flagged > 0) {
        let flags = df.column(&summary.column)?.bool()?;
        let Some(row) = flags.into_iter().position(|flag| flag == Some(true)) else {
            continue;
        };
        let id = any_to_string(&ids.get(row)?);
        trace!(
            column = %summary.column,
            row,
            respondent = redact_value(&id),
            "first flagged respondent"
        );
    }
    Ok(())
}
