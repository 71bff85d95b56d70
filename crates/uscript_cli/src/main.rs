//! usc: Lint and fix UnrealScript classes.
//!
//! Usage:
//!   usc [options] [path...]
//!
//! Without paths the files listed by the nearest `uscript.json` are checked.
//! The exit status is non-zero when any error-severity problem is reported
//! or no source file was found.

use clap::{Parser as ClapParser, ValueEnum};
use indexmap::IndexMap;
use miette::{bail, IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uscript_lint::{LintResult, Severity};
use uscript_options::{find_config_file, load_project_config, ProjectConfig, CONFIG_FILE_NAME};
use uscript_project::{discover_source_files, BatchReport, CancelFlag, Counters, FileReport, Program};

#[derive(ClapParser, Debug)]
#[command(name = "usc", version, about = "usc - UnrealScript linter and formatter")]
struct Cli {
    /// Source files or directories to check.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to uscript.json.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Apply autofixes in place before reporting.
    #[arg(long)]
    fix: bool,

    /// Worker threads.
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    format: Format,

    /// Print problem counts per rule.
    #[arg(long)]
    statistics: bool,

    /// List the files that would be checked.
    #[arg(long = "list-files")]
    list_files: bool,

    /// Write a default uscript.json to the current directory.
    #[arg(long)]
    init: bool,

    /// Disable colored output.
    #[arg(long = "no-color")]
    no_color: bool,

    /// Increase log output (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.init {
        run_init()?;
        return Ok(ExitCode::SUCCESS);
    }

    let start = Instant::now();
    let program = load_program(&cli)?;

    if program.files().is_empty() {
        print_error("No source files found.", use_color(&cli));
        return Ok(ExitCode::FAILURE);
    }

    if cli.list_files {
        for file in program.files() {
            println!("{}", display_path(file));
        }
    }

    if cli.fix {
        run_fix(&program);
    }

    let mut counters = Counters::default();
    let batch = program.run(&CancelFlag::new(), &mut counters);

    match cli.format {
        Format::Json => print_json(&batch, &counters)?,
        Format::Pretty => {
            let color = use_color(&cli);
            for report in &batch.files {
                print_file_report(report, color);
            }
            if cli.statistics {
                print_statistics(&batch, color);
            }
            print_summary(&counters, color, start);
        }
    }

    Ok(if batch.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "usc=warn,uscript_project=warn",
        1 => "usc=debug,uscript_project=debug,uscript_lint=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_init() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() {
        bail!("A {CONFIG_FILE_NAME} file already exists in the current directory.");
    }
    let mut text = serde_json::to_string_pretty(&ProjectConfig::default()).into_diagnostic()?;
    text.push('\n');
    std::fs::write(path, text)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create {CONFIG_FILE_NAME}"))?;
    println!("Successfully created a {CONFIG_FILE_NAME} file.");
    Ok(())
}

/// Resolve the configuration and the file list from the command line.
fn load_program(cli: &Cli) -> Result<Program> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let config_path = match &cli.config {
        Some(path) if !path.is_file() => bail!("configuration file {} not found", path.display()),
        Some(path) => Some(path.clone()),
        None => find_config_file(&cwd),
    };

    let (root, mut config) = match config_path {
        Some(path) => {
            let config = load_project_config(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to load {}", path.display()))?;
            info!(config = %path.display(), "using project configuration");
            let root = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.clone());
            (root, config)
        }
        None => (cwd, ProjectConfig::default()),
    };
    if cli.jobs.is_some() {
        config.jobs = cli.jobs;
    }

    let program = if cli.paths.is_empty() {
        Program::new(&root, config)
    } else {
        let scan = ProjectConfig {
            include: vec![".".to_string()],
            ..config.clone()
        };
        let mut files = Vec::new();
        for path in &cli.paths {
            if path.is_dir() {
                files.extend(discover_source_files(path, &scan));
            } else {
                files.push(path.clone());
            }
        }
        files.sort();
        files.dedup();
        Program::with_files(files, config)
    };
    program.into_diagnostic()
}

fn run_fix(program: &Program) {
    let mut fixed = 0;
    for path in program.files() {
        match program.fix(path) {
            Ok(outcome) if outcome.changed() => match std::fs::write(path, &outcome.text) {
                Ok(()) => {
                    debug!(path = %path.display(), edits = outcome.applied, passes = outcome.passes, "fixed");
                    fixed += 1;
                }
                Err(err) => warn!(path = %path.display(), %err, "cannot write fixed file"),
            },
            Ok(_) => {}
            // Reported again by the lint run.
            Err(err) => debug!(%err, "skipping fix"),
        }
    }
    info!(files = fixed, "applied fixes");
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: &'a [FileReport],
    counters: &'a Counters,
}

fn print_json(batch: &BatchReport, counters: &Counters) -> Result<()> {
    let output = JsonOutput {
        files: &batch.files,
        counters,
    };
    let text = serde_json::to_string_pretty(&output).into_diagnostic()?;
    println!("{text}");
    Ok(())
}

fn print_file_report(report: &FileReport, color: bool) {
    let path = display_path(&report.path);
    if let Some(error) = &report.error {
        print_error(&format!("{path}: {error}"), color);
        return;
    }
    if report.results.is_empty() {
        return;
    }
    let source = std::fs::read_to_string(&report.path).unwrap_or_default();
    let lines: Vec<&str> = source.lines().collect();
    for result in &report.results {
        print_result(&path, result, lines.get(result.line as usize).copied(), color);
    }
}

fn print_result(path: &str, result: &LintResult, line: Option<&str>, color: bool) {
    let (tint, label) = match result.severity {
        Severity::Error => (RED, "error"),
        Severity::Warning => (YELLOW, "warning"),
    };
    let position = format!("{}:{}:{}", path, result.line + 1, result.column + 1);
    if color {
        eprintln!(
            "{CYAN}{position}{RESET}: {BOLD}{tint}{label}{RESET}: {} {GRAY}[{}]{RESET}",
            result.message, result.rule
        );
    } else {
        eprintln!("{position}: {label}: {} [{}]", result.message, result.rule);
    }

    let Some(line) = line else {
        return;
    };
    let number = (result.line + 1).to_string();
    let gutter = " ".repeat(number.len());
    let (pad, carets) = underline(line, result.column as usize, result.length as usize);
    if color {
        eprintln!("{GRAY}{number} |{RESET} {line}");
        eprintln!("{GRAY}{gutter} |{RESET} {pad}{tint}{carets}{RESET}");
    } else {
        eprintln!("{number} | {line}");
        eprintln!("{gutter} | {pad}{carets}");
    }
}

/// Padding that lines up with `column` (keeping tabs) and the carets under
/// `length` bytes of `line`.
fn underline(line: &str, column: usize, length: usize) -> (String, String) {
    let column = column.min(line.len());
    let pad = line
        .get(..column)
        .unwrap_or_default()
        .chars()
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    let width = line
        .get(column..(column + length).min(line.len()))
        .map_or(0, |covered| covered.chars().count())
        .max(1);
    (pad, "^".repeat(width))
}

fn print_statistics(batch: &BatchReport, color: bool) {
    let mut per_rule: IndexMap<&str, usize> = IndexMap::new();
    for result in batch.files.iter().flat_map(|file| &file.results) {
        *per_rule.entry(result.rule).or_default() += 1;
    }
    per_rule.sort_by(|_, a, _, b| b.cmp(a));
    for (rule, count) in per_rule {
        if color {
            eprintln!("{count:>6}  {CYAN}{rule}{RESET}");
        } else {
            eprintln!("{count:>6}  {rule}");
        }
    }
}

fn print_summary(counters: &Counters, color: bool, start: Instant) {
    let problems = counters.errors + counters.warnings;
    let files = counters.files + counters.failed;
    let mut summary = format!(
        "Found {} error{} and {} warning{} in {} file{}.",
        counters.errors,
        plural(counters.errors),
        counters.warnings,
        plural(counters.warnings),
        files,
        plural(files)
    );
    if counters.fixable > 0 {
        summary.push_str(&format!(" {} fixable with --fix.", counters.fixable));
    }
    if color {
        let tint = if counters.errors > 0 { RED } else if problems > 0 { YELLOW } else { GRAY };
        eprintln!("\n{tint}{summary}{RESET}");
        eprintln!("{GRAY}Done in {:.2}s.{RESET}", start.elapsed().as_secs_f64());
    } else {
        eprintln!("\n{summary}");
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn print_error(msg: &str, color: bool) {
    if color {
        eprintln!("{BOLD}{RED}error{RESET}: {msg}");
    } else {
        eprintln!("error: {msg}");
    }
}

/// Path relative to the working directory when it lies below it.
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn use_color(cli: &Cli) -> bool {
    !cli.no_color && cli.format == Format::Pretty && stderr_is_terminal()
}

fn stderr_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true
    }
}
