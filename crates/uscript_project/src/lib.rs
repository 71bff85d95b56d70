//! uscript_project: Batch parsing, linting and fixing of source files.
//!
//! A [`Program`] owns the file list discovered from a [`ProjectConfig`] and a
//! worker pool. Each file is read, parsed and linted independently; the
//! batch keeps going when a file cannot be read and stops taking new files
//! once its [`CancelFlag`] is raised.

pub mod discover;
pub mod report;

pub use discover::discover_source_files;
pub use report::{BatchReport, Counters, FileReport};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uscript_editor::{apply_edits_counted, fixes};
use uscript_lint::{lint_file, LintResult};
use uscript_options::{find_config_file, load_project_config, ConfigError, ProjectConfig};
use uscript_parser::parse_source;

/// Upper bound on lint-and-fix rounds for one file.
pub const MAX_FIX_PASSES: usize = 10;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Shared flag for stopping a batch between files.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of fixing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub text: String,
    /// Edits applied over all passes.
    pub applied: usize,
    pub passes: usize,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// A set of source files and the settings to check them with.
pub struct Program {
    config: ProjectConfig,
    files: Vec<PathBuf>,
    pool: rayon::ThreadPool,
}

impl Program {
    /// Discover the files under `root` named by `config`.
    pub fn new(root: &Path, config: ProjectConfig) -> Result<Self, ProjectError> {
        let files = discover_source_files(root, &config);
        Self::with_files(files, config)
    }

    /// Use an explicit file list; `config.include` is ignored.
    pub fn with_files(files: Vec<PathBuf>, config: ProjectConfig) -> Result<Self, ProjectError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = config.jobs.filter(|&jobs| jobs > 0) {
            builder = builder.num_threads(jobs);
        }
        let pool = builder.build()?;
        debug!(files = files.len(), threads = pool.current_num_threads(), "program created");
        Ok(Self { config, files, pool })
    }

    /// Find `uscript.json` above `start`, load it and discover files
    /// relative to its directory. Without a configuration file the defaults
    /// apply and `start` is the root.
    pub fn load(start: &Path) -> Result<Self, ProjectError> {
        match find_config_file(start) {
            Some(path) => {
                let config = load_project_config(&path)?;
                let root = path.parent().unwrap_or(start);
                info!(config = %path.display(), "using project configuration");
                Self::new(root, config)
            }
            None => Self::new(start, ProjectConfig::default()),
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Parse and lint every file.
    ///
    /// Reports come back in file order. Files not started before
    /// `cancel` was raised are counted as skipped and have no report.
    pub fn run(&self, cancel: &CancelFlag, counters: &mut Counters) -> BatchReport {
        info!(files = self.files.len(), "linting");
        let reports: Vec<Option<FileReport>> = self.pool.install(|| {
            self.files
                .par_iter()
                .map(|path| {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    Some(self.check_file(path))
                })
                .collect()
        });

        let mut batch = BatchReport::default();
        for report in reports {
            match report {
                Some(report) => {
                    counters.record(&report);
                    batch.files.push(report);
                }
                None => {
                    counters.skipped += 1;
                    batch.cancelled = true;
                }
            }
        }
        debug!(?counters, "batch finished");
        batch
    }

    /// Lint source text as if it were the file at `path`.
    pub fn lint_source(&self, path: &Path, text: &str) -> Vec<LintResult> {
        let ast = parse_source(text);
        lint_file(&ast, &self.config.lint, path)
    }

    /// Read the file at `path` and apply every autofix until none remain.
    pub fn fix(&self, path: &Path) -> Result<FixOutcome, ProjectError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.fix_source(path, &text))
    }

    /// Apply autofixes to `text`, relinting after each pass since one fix
    /// can shift or enable another.
    pub fn fix_source(&self, path: &Path, text: &str) -> FixOutcome {
        let mut outcome = FixOutcome {
            text: text.to_string(),
            applied: 0,
            passes: 0,
        };
        while outcome.passes < MAX_FIX_PASSES {
            let edits = fixes(&self.lint_source(path, &outcome.text));
            if edits.is_empty() {
                break;
            }
            let applied = apply_edits_counted(&outcome.text, &edits);
            outcome.passes += 1;
            if applied.text == outcome.text {
                break;
            }
            outcome.applied += applied.applied;
            outcome.text = applied.text;
        }
        if outcome.passes == MAX_FIX_PASSES {
            warn!(path = %path.display(), "fixes did not settle");
        }
        outcome
    }

    fn check_file(&self, path: &Path) -> FileReport {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let results = self.lint_source(path, &text);
                debug!(path = %path.display(), problems = results.len(), "checked");
                FileReport::linted(path.to_path_buf(), results)
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot read file");
                FileReport::failed(path.to_path_buf(), err)
            }
        }
    }
}
