//! Error types for folder processing.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// The kind of per-file failure that made the loop skip a file.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum FileErrorKind {
    /// No BOM or structural signal allowed a confident encoding choice.
    EncodingUnknown,
    /// The bytes could not be decoded with the detected encoding.
    DecodeFailure,
    /// The file exceeded the configured maximum size limit.
    FileTooLarge,
    /// A transformation stage rejected the text.
    TransformFailure,
    /// The output file could not be encoded or persisted.
    WriteFailure,
    /// An I/O error occurred while reading the input file.
    IoError,
}

impl FileErrorKind {
    /// Short label used in log lines and the human report.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::EncodingUnknown => "unknown encoding",
            Self::DecodeFailure => "decode failure",
            Self::FileTooLarge => "file too large",
            Self::TransformFailure => "transform failure",
            Self::WriteFailure => "write failure",
            Self::IoError => "io error",
        }
    }
}

/// A per-file error: the file was skipped and no output was written for it.
///
/// These never abort a run. The processing loop records them in the
/// `ProcessingReport` and moves on to the next file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Error)]
#[error("{}: [{}] {message}", .file.display(), .kind.label())]
#[non_exhaustive]
pub struct FileError {
    /// The file that was skipped (input path, or output path for write failures).
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: FileErrorKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FileError {
    /// Build a new per-file error.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind,
            message: message.into(),
        }
    }

    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        self.to_string()
    }
}

/// Errors raised by a single transformation stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("Stage `{0}` is misconfigured: {1}")]
    InvalidConfiguration(&'static str, String),
}

/// Errors raised while building a `Transformer`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The wrap width must be at least one word per line.
    #[error("Invalid wrap width {0}: words per line must be a positive integer")]
    InvalidWrapWidth(usize),
    /// An empty search token would match between every character.
    #[error("Search token must not be empty")]
    EmptySearchToken,
}

/// Fatal errors that stop a run before any file is processed.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Folder does not exist: {}", .0.display())]
    FolderMissing(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid exclude glob pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
