//! Batch conversion options.

use std::path::{Path, PathBuf};

/// Default pattern selecting the files to convert.
pub const DEFAULT_INCLUDE: &str = "*.ods";

/// Options for converting a directory of ODS files.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory to read `.ods` files from
    pub source_dir: PathBuf,

    /// Directory to write `.csv` files to; the source directory when `None`
    pub dest_dir: Option<PathBuf>,

    /// Glob patterns (relative to the source directory) of files to convert
    pub includes: Vec<String>,

    /// Glob patterns of files to leave out even when included
    pub excludes: Vec<String>,

    /// Convert even when the CSV file is newer than the ODS file
    pub force: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

impl BatchOptions {
    /// Create options for a source directory with default settings.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: None,
            includes: vec![DEFAULT_INCLUDE.to_string()],
            excludes: Vec::new(),
            force: false,
        }
    }

    /// Set the destination directory.
    pub fn with_dest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dest_dir = Some(dir.into());
        self
    }

    /// Replace the include patterns.
    pub fn with_includes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Add an exclude pattern.
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Convert files even if their output looks up to date.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// The directory outputs are written to.
    pub fn effective_dest_dir(&self) -> &Path {
        self.dest_dir.as_deref().unwrap_or(&self.source_dir)
    }
}
