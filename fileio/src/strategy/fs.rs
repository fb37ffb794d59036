//! Filesystem collaborators.
//!
//! `FolderExplorer` discovers files directly inside the watched folder and
//! remembers what it already handed out. `FsByteIo` reads files with a bounded
//! read and writes results through a temporary file in the target directory,
//! renamed into place only once fully written.
//!
//! Discovery rules:
//! - Only direct children of the folder; no recursion
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Device files, pipes, and sockets are skipped
//! - Outputs (`*.processed`) and our own temporary files are never picked up

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use glob::Pattern;
use tempfile::Builder;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::FolderConfig;
use crate::encoding::Encoding;
use crate::error::{FileError, FileErrorKind, ProcessError};
use crate::strategy::{ByteIo, FileSupply, SourceFile};

/// Name prefix of in-flight output files.
pub const TEMP_PREFIX: &str = ".fileio-";

/// Check if a path matches any of the exclude patterns
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Compile exclude globs, failing on the first invalid one.
///
/// # Errors
///
/// Returns `ProcessError::InvalidExcludePattern` for a malformed glob.
pub fn compile_excludes(exclude: &[String]) -> Result<Vec<Pattern>, ProcessError> {
    exclude
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| ProcessError::InvalidExcludePattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// File supply over a single folder, re-scanned on every call.
///
/// Each call lists the folder again and returns the first path (in sorted
/// order) not handed out before, so files that show up mid-run are picked up
/// too, and files written by the run itself are filtered by suffix.
#[derive(Debug)]
pub struct FolderExplorer {
    folder: PathBuf,
    output_suffix: String,
    follow_links: bool,
    exclude: Vec<Pattern>,
    seen: HashSet<PathBuf>,
}

impl FolderExplorer {
    /// # Errors
    ///
    /// Returns an error if the folder does not exist, is not a directory, or
    /// an exclude pattern is invalid.
    pub fn new(config: &FolderConfig) -> Result<Self, ProcessError> {
        if !config.folder.exists() {
            return Err(ProcessError::FolderMissing(config.folder.clone()));
        }
        if !config.folder.is_dir() {
            return Err(ProcessError::NotADirectory(config.folder.clone()));
        }

        Ok(Self {
            folder: config.folder.clone(),
            output_suffix: config.output_suffix.clone(),
            follow_links: config.follow_links,
            exclude: compile_excludes(&config.exclude)?,
            seen: HashSet::new(),
        })
    }

    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Number of files handed out so far.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    fn is_candidate_name(&self, name: &str) -> bool {
        !name.starts_with(TEMP_PREFIX)
            && (self.output_suffix.is_empty() || !name.ends_with(&self.output_suffix))
    }

    /// Current qualifying files, sorted.
    fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry_result in WalkDir::new(&self.folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
        {
            let entry = match entry_result {
                Ok(e) => e,
                Err(walk_err) => {
                    warn!("Directory traversal error: {walk_err}");
                    continue;
                }
            };

            // Regular files only: symlinks (unless followed), devices, pipes
            // and sockets all fail this check.
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let name = entry.file_name().to_string_lossy();
            if !self.is_candidate_name(&name) || matches_exclude(path, &self.exclude) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        files
    }
}

impl FileSupply for FolderExplorer {
    fn next_file(&mut self) -> Option<SourceFile> {
        for path in self.scan() {
            if self.seen.contains(&path) {
                continue;
            }
            self.seen.insert(path.clone());
            if let Some(file) = SourceFile::new(path) {
                return Some(file);
            }
        }
        None
    }
}

/// Byte I/O on the local filesystem.
#[derive(Debug, Clone, Copy)]
pub struct FsByteIo {
    max_file_size: u64,
}

impl FsByteIo {
    #[must_use]
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }
}

impl Default for FsByteIo {
    fn default() -> Self {
        Self::new(FolderConfig::default().max_file_size)
    }
}

impl ByteIo for FsByteIo {
    fn read(&self, file: &SourceFile) -> Result<Vec<u8>, FileError> {
        read_file_bounded(file.path(), self.max_file_size)
    }

    fn encode_and_write(
        &self,
        path: &Path,
        text: &str,
        encoding: Encoding,
    ) -> Result<(), FileError> {
        let write_err = |message: String| FileError::new(path, FileErrorKind::WriteFailure, message);

        let bytes = encoding
            .encode(text)
            .map_err(|e| write_err(format!("Cannot encode as {encoding}: {e}")))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".partial")
            .tempfile_in(dir)
            .map_err(|e| write_err(format!("Failed to create temporary file: {e}")))?;

        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| write_err(format!("Failed to write file: {e}")))?;

        tmp.persist(path)
            .map_err(|e| write_err(format!("Failed to persist file: {}", e.error)))?;

        Ok(())
    }
}

/// Read a file using a bounded read, enforcing `max_file_size`.
///
/// Reads at most `max_file_size + 1` bytes so an oversized file is detected
/// without buffering all of it.
///
/// # Errors
///
/// Returns a `FileError` if the file cannot be opened or read, or exceeds
/// `max_file_size`.
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<Vec<u8>, FileError> {
    let file = std::fs::File::open(path).map_err(|e| {
        FileError::new(path, FileErrorKind::IoError, format!("Failed to open file: {e}"))
    })?;

    let mut buffer = Vec::new();
    file.take(max_file_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| {
            FileError::new(path, FileErrorKind::IoError, format!("Failed to read file: {e}"))
        })?;

    if buffer.len() as u64 > max_file_size {
        return Err(FileError::new(
            path,
            FileErrorKind::FileTooLarge,
            format!("File exceeds maximum size of {max_file_size} bytes"),
        ));
    }

    Ok(buffer)
}
