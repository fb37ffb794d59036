//! Collaborators of the processing loop.
//!
//! The loop only talks to a `FileSupply` (which file is next) and a `ByteIo`
//! (bytes in, text out, text in, bytes out). The filesystem implementation of
//! both lives in `fs`; tests swap in their own.

pub mod fs;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::encoding::Encoding;
use crate::error::{FileError, FileErrorKind};

/// A filesystem entry picked up for processing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    path: PathBuf,
    dir: PathBuf,
    name: OsString,
}

impl SourceFile {
    /// Returns `None` for paths without a file name (`/`, `..`).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_os_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Some(Self { path, dir, name })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parent directory; `.` for a bare file name.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base name, lossily converted for display.
    #[must_use]
    pub fn name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }

    /// `<name><suffix>`, e.g. `notes.txt` → `notes.txt.processed`.
    #[must_use]
    pub fn output_name(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.name())
    }

    /// `<dir>/<name><suffix>`, e.g. `notes.txt` → `notes.txt.processed`.
    #[must_use]
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        let mut name = self.name.clone();
        name.push(suffix);
        self.dir.join(name)
    }
}

/// Yields every qualifying file exactly once per run, then `None`.
pub trait FileSupply {
    fn next_file(&mut self) -> Option<SourceFile>;
}

/// Raw byte access plus the text codec.
pub trait ByteIo {
    /// Read every byte of the file.
    ///
    /// # Errors
    ///
    /// Returns a `FileError` if the file cannot be read or is too large.
    fn read(&self, file: &SourceFile) -> Result<Vec<u8>, FileError>;

    /// Read the whole file and decode it.
    ///
    /// # Errors
    ///
    /// Returns a `FileError` if the file cannot be read, is too large, or its
    /// bytes are not valid in `encoding`.
    fn decode(&self, file: &SourceFile, encoding: Encoding) -> Result<String, FileError> {
        let bytes = self.read(file)?;
        decode_bytes(file.path(), &bytes, encoding)
    }

    /// Encode `text` and persist it at `path`. Either the whole file is
    /// written or nothing is.
    ///
    /// # Errors
    ///
    /// Returns a `FileError` of kind `WriteFailure` if encoding or writing fails.
    fn encode_and_write(&self, path: &Path, text: &str, encoding: Encoding)
    -> Result<(), FileError>;
}

/// Decode bytes already read from `path`.
///
/// # Errors
///
/// Returns a `FileError` of kind `DecodeFailure` if the bytes are not valid in
/// `encoding`.
pub fn decode_bytes(path: &Path, bytes: &[u8], encoding: Encoding) -> Result<String, FileError> {
    encoding.decode(bytes).map_err(|e| {
        FileError::new(
            path,
            FileErrorKind::DecodeFailure,
            format!("Cannot decode as {encoding}: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_parts() {
        let file = SourceFile::new("data/in/notes.utf16le").unwrap();
        assert_eq!(file.path(), Path::new("data/in/notes.utf16le"));
        assert_eq!(file.dir(), Path::new("data/in"));
        assert_eq!(file.name(), "notes.utf16le");
    }

    #[test]
    fn test_output_path_appends_suffix() {
        let file = SourceFile::new("data/myfile.utf16le").unwrap();
        assert_eq!(
            file.output_path(".processed"),
            PathBuf::from("data/myfile.utf16le.processed")
        );
    }

    #[test]
    fn test_output_name_is_the_base_name() {
        let file = SourceFile::new("data/in/notes.txt").unwrap();
        assert_eq!(file.output_name(".processed"), "notes.txt.processed");
    }

    #[test]
    fn test_decode_bytes_maps_codec_errors() {
        let err = decode_bytes(Path::new("x.txt"), &[b'a', 0xFF], Encoding::Utf8).unwrap_err();
        assert_eq!(err.kind, FileErrorKind::DecodeFailure);
        assert_eq!(err.file, PathBuf::from("x.txt"));
        assert!(err.message.contains("UTF-8"), "got: {}", err.message);

        assert_eq!(
            decode_bytes(Path::new("x.txt"), b"ok", Encoding::Ascii).unwrap(),
            "ok"
        );
    }

    #[test]
    fn test_bare_name_lives_in_current_dir() {
        let file = SourceFile::new("notes.txt").unwrap();
        assert_eq!(file.dir(), Path::new("."));
        assert_eq!(
            file.output_path(".processed"),
            PathBuf::from("./notes.txt.processed")
        );
    }

    #[test]
    fn test_no_file_name() {
        assert!(SourceFile::new("/").is_none());
        assert!(SourceFile::new("a/..").is_none());
    }
}
