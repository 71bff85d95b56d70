//! Per-file and per-batch results.

use serde::Serialize;
use std::path::PathBuf;
use uscript_lint::{LintResult, Severity};

/// Totals accumulated over one or more batch runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// Files that were parsed and linted.
    pub files: usize,
    /// Files that could not be read.
    pub failed: usize,
    /// Files left untouched because the run was cancelled.
    pub skipped: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Problems that carry an autofix.
    pub fixable: usize,
}

impl Counters {
    pub(crate) fn record(&mut self, report: &FileReport) {
        if report.error.is_some() {
            self.failed += 1;
            return;
        }
        self.files += 1;
        for result in &report.results {
            match result.severity {
                Severity::Error => self.errors += 1,
                Severity::Warning => self.warnings += 1,
            }
            if result.is_fixable() {
                self.fixable += 1;
            }
        }
    }
}

/// The outcome of linting one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Problems sorted by line, then column.
    pub results: Vec<LintResult>,
    /// Set when the file could not be read; `results` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub(crate) fn linted(path: PathBuf, mut results: Vec<LintResult>) -> Self {
        results.sort_by_key(LintResult::position);
        Self {
            path,
            results,
            error: None,
        }
    }

    pub(crate) fn failed(path: PathBuf, error: impl ToString) -> Self {
        Self {
            path,
            results: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Whether the file failed to load or has an error-severity problem.
    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.results.iter().any(LintResult::is_error)
    }
}

/// Reports of one batch run, in discovery order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// True when the run stopped before every file was processed.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn has_errors(&self) -> bool {
        self.files.iter().any(FileReport::has_errors)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.files
            .iter()
            .flat_map(|file| &file.results)
            .filter(|result| result.severity == severity)
            .count()
    }
}
