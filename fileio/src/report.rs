//! Processing report types.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::encoding::Encoding;
use crate::error::FileError;

/// What happened to one input file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct FileOutcome {
    /// The input file.
    pub file: PathBuf,
    /// Encoding chosen by the detector.
    pub encoding: Encoding,
    /// The `.processed` file, when one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Why the file was skipped, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FileError>,
}

impl FileOutcome {
    #[must_use]
    pub fn processed(file: impl Into<PathBuf>, encoding: Encoding, output: PathBuf) -> Self {
        Self {
            file: file.into(),
            encoding,
            output: Some(output),
            error: None,
        }
    }

    #[must_use]
    pub fn skipped(file: impl Into<PathBuf>, encoding: Encoding, error: FileError) -> Self {
        Self {
            file: file.into(),
            encoding,
            output: None,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a processing run.
///
/// A run always completes; `ok` is false when at least one file was skipped.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ProcessingReport {
    /// The watched folder.
    pub folder: PathBuf,
    /// Number of files written to a `.processed` output.
    pub processed_files: usize,
    /// Number of files skipped because of a per-file error.
    pub skipped_files: usize,
    /// Whether every file picked up was processed.
    pub ok: bool,
    /// One entry per file, in processing order.
    pub outcomes: Vec<FileOutcome>,
}

impl ProcessingReport {
    #[must_use]
    pub fn new(folder: &Path) -> Self {
        Self {
            folder: folder.to_path_buf(),
            processed_files: 0,
            skipped_files: 0,
            ok: true,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        if outcome.is_processed() {
            self.processed_files += 1;
        } else {
            self.skipped_files += 1;
            self.ok = false;
        }
        self.outcomes.push(outcome);
    }

    /// Total number of files picked up (processed + skipped).
    #[must_use]
    pub fn files_attempted(&self) -> usize {
        self.processed_files + self.skipped_files
    }

    /// Errors of skipped files, in processing order.
    pub fn errors(&self) -> impl Iterator<Item = &FileError> {
        self.outcomes.iter().filter_map(|o| o.error.as_ref())
    }
}
