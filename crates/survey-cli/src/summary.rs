use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_check::{FlagReport, FlagSummary};

use crate::types::CheckResult;

pub fn print_summary(result: &CheckResult) {
    println!("{}", data_line(result));
    println!("Plan: {}", result.plan.display());
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run)"),
    }
    if let Some(path) = &result.report_json {
        println!("Report: {}", path.display());
    }
    println!("{}", summary_table(&result.report));
}

fn data_line(result: &CheckResult) -> String {
    format!(
        "Data: {} ({} rows, {} columns)",
        result.data.display(),
        result.report.rows,
        result.columns
    )
}

/// One row per flag column plus a total over violation columns.
pub fn summary_table(report: &FlagReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Flag column"),
        header_cell("Check"),
        header_cell("Feature"),
        header_cell("Flagged"),
        header_cell("Share"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for summary in &report.flags {
        table.add_row(vec![
            flag_cell(summary),
            Cell::new(&summary.check),
            Cell::new(&summary.feature),
            count_cell(summary),
            dim_cell(format_share(summary.share(report.rows))),
        ]);
    }
    let total = report.total_flagged();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!("{} rows", report.rows)).add_attribute(Attribute::Bold),
        if total > 0 {
            Cell::new(total)
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell(total)
        },
        dim_cell("-"),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn format_share(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

// Membership columns count valid rows, so they are never colored as errors.
fn count_cell(summary: &FlagSummary) -> Cell {
    match summary.flagged {
        0 => dim_cell(0),
        value if summary.kind.is_violation() => Cell::new(value)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        value => Cell::new(value).fg(Color::Green),
    }
}

fn flag_cell(summary: &FlagSummary) -> Cell {
    Cell::new(&summary.column)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
