//! Per-column flag counts of a check run.

use serde::Serialize;

use crate::checks::Rule;
use crate::flags::{FlagColumn, FlagKind};

/// Count of `true` cells in one flag column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagSummary {
    pub column: String,
    pub check: String,
    pub feature: String,
    pub kind: FlagKind,
    pub flagged: usize,
}

impl FlagSummary {
    /// Share of rows flagged, in `0.0..=1.0`.
    pub fn share(&self, rows: usize) -> f64 {
        if rows == 0 {
            0.0
        } else {
            self.flagged as f64 / rows as f64
        }
    }
}

/// Flag counts for every column added by a plan run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagReport {
    pub rows: usize,
    pub flags: Vec<FlagSummary>,
}

impl FlagReport {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            flags: Vec::new(),
        }
    }

    /// Append the columns produced by one rule.
    pub fn record(&mut self, rule: &Rule, flags: &[FlagColumn]) {
        for flag in flags {
            self.flags.push(FlagSummary {
                column: flag.name.clone(),
                check: rule.kind().to_string(),
                feature: rule.feature().to_string(),
                kind: flag.kind,
                flagged: flag.flagged(),
            });
        }
    }

    /// Number of flagged cells across violation columns.
    ///
    /// Membership columns (`<feature>_is_valid`) are not counted.
    pub fn total_flagged(&self) -> usize {
        self.flags
            .iter()
            .filter(|summary| summary.kind.is_violation())
            .map(|summary| summary.flagged)
            .sum()
    }

    /// True when no violation column has a flagged row.
    pub fn is_clean(&self) -> bool {
        self.total_flagged() == 0
    }
}
