//! Directory-to-directory conversion.
//!
//! Selects ODS files under a source directory with include/exclude globs,
//! skips those whose CSV output is newer than the input, and converts the rest
//! one by one. A failing file is logged and counted; the batch carries on.
//!
//! # Example
//!
//! ```no_run
//! use ods2csv::batch::{convert_dir, BatchOptions};
//!
//! let options = BatchOptions::new("data/sheets")
//!     .with_dest_dir("data/csv")
//!     .with_exclude("draft-*");
//!
//! let report = convert_dir(&options)?;
//! println!("{}", report.summary());
//! # Ok::<(), ods2csv::Error>(())
//! ```

mod options;

pub use options::{BatchOptions, DEFAULT_INCLUDE};

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// `*` and `?` do not match across directory separators.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A file that failed to convert.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// Input file path
    pub path: PathBuf,
    /// Error description
    pub message: String,
}

/// Outcome of a batch conversion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Files converted successfully
    pub converted: usize,
    /// Files that failed to convert
    pub failed: usize,
    /// Files skipped because their output was up to date
    pub skipped: usize,
    /// Details of each failure
    pub failures: Vec<FileFailure>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl BatchReport {
    /// True if no file failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// One-line summary of the batch.
    pub fn summary(&self) -> String {
        if self.is_success() {
            format!(
                "{} file(s) converted in {} ms; {} unmodified file(s) skipped.",
                self.converted, self.duration_ms, self.skipped
            )
        } else {
            format!(
                "{} file(s) failed to convert, while {} succeeded. Total duration is {} ms.",
                self.failed, self.converted, self.duration_ms
            )
        }
    }

    /// Serialize the report as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Convert every selected ODS file under `options.source_dir`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] before converting anything when a
/// directory is unusable or a pattern does not parse. Per-file failures are
/// reported in the [`BatchReport`], not as an error.
pub fn convert_dir(options: &BatchOptions) -> Result<BatchReport> {
    let source_dir = options.source_dir.as_path();
    let dest_dir = options.effective_dest_dir();

    check_dir("Source directory", source_dir, true, false)?;
    check_dir("Destination directory", dest_dir, false, true)?;

    let includes = compile_patterns(&options.includes)?;
    let excludes = compile_patterns(&options.excludes)?;

    tracing::info!(
        source = %source_dir.display(),
        dest = %dest_dir.display(),
        "converting directory"
    );

    let start = Instant::now();
    let mut report = BatchReport::default();

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let input = entry.path();
        let relative = match input.strip_prefix(source_dir) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        if !is_selected(relative, &includes, &excludes) {
            continue;
        }

        let output = output_path(dest_dir, relative);

        if !options.force && is_up_to_date(input, &output) {
            tracing::info!(file = %relative.display(), "skipping, output file is newer");
            report.skipped += 1;
            continue;
        }

        let file_start = Instant::now();
        match convert_one(input, &output) {
            Ok(()) => {
                tracing::info!(
                    file = %relative.display(),
                    elapsed_ms = file_start.elapsed().as_millis() as u64,
                    "converted"
                );
                report.converted += 1;
            }
            Err(e) => {
                tracing::error!(file = %input.display(), error = %e, "failed to convert");
                report.failed += 1;
                report.failures.push(FileFailure {
                    path: input.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!("{}", report.summary());
    Ok(report)
}

fn convert_one(input: &Path, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    crate::convert_file(input, output)
}

/// Check that `path` is an existing directory with the required access.
fn check_dir(description: &str, path: &Path, must_read: bool, must_write: bool) -> Result<()> {
    let invalid = |problem: &str| {
        Err(Error::InvalidArgument(format!(
            "{} (\"{}\") {}",
            description,
            path.display(),
            problem
        )))
    };

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return invalid("does not exist."),
    };
    if !metadata.is_dir() {
        return invalid("is not a directory.");
    }
    if must_read && fs::read_dir(path).is_err() {
        return invalid("is not readable.");
    }
    if must_write && metadata.permissions().readonly() {
        return invalid("is not writable.");
    }
    Ok(())
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p)
                .map_err(|e| Error::InvalidArgument(format!("invalid pattern \"{}\": {}", p, e)))
        })
        .collect()
}

fn is_selected(relative: &Path, includes: &[Pattern], excludes: &[Pattern]) -> bool {
    includes
        .iter()
        .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
        && !excludes
            .iter()
            .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
}

/// Map an input path to its CSV output: a trailing `.ods` becomes `.csv`,
/// any other name gets `.csv` appended.
fn output_path(dest_dir: &Path, relative: &Path) -> PathBuf {
    let mut target = dest_dir.join(relative);
    if target.extension().is_some_and(|ext| ext == "ods") {
        target.set_extension("csv");
        target
    } else {
        let mut name = target.into_os_string();
        name.push(".csv");
        PathBuf::from(name)
    }
}

/// An output is up to date if it exists and is strictly newer than its input.
fn is_up_to_date(input: &Path, output: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|m| m.modified()).ok();
    match (modified(input), modified(output)) {
        (Some(input), Some(output)) => output > input,
        _ => false,
    }
}
