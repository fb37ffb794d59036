//! The per-file processing loop.
//!
//! `Fetching → Detecting → ReadingAndTransforming → Writing → Fetching`, until
//! the file supply runs dry (`Done`). Each iteration yields a `FileOutcome`;
//! per-file failures are values, logged and recorded, never fatal.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, trace, warn};

use crate::config::DEFAULT_OUTPUT_SUFFIX;
use crate::detector::EncodingDetector;
use crate::encoding::Encoding;
use crate::error::{FileError, FileErrorKind};
use crate::report::{FileOutcome, ProcessingReport};
use crate::strategy::{ByteIo, FileSupply, SourceFile, decode_bytes};
use crate::transform::Transformer;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Fetching,
    Detecting,
    ReadingAndTransforming,
    Writing,
    Done,
}

/// Drives detector and transformer over every file of a `FileSupply`.
pub struct ProcessingLoop<S, B> {
    supply: S,
    io: B,
    detector: EncodingDetector,
    transformer: Transformer,
    output_suffix: String,
    state: LoopState,
    handled: HashSet<PathBuf>,
}

impl<S: FileSupply, B: ByteIo> ProcessingLoop<S, B> {
    #[must_use]
    pub fn new(supply: S, io: B, detector: EncodingDetector, transformer: Transformer) -> Self {
        Self {
            supply,
            io,
            detector,
            transformer,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_owned(),
            state: LoopState::Fetching,
            handled: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Process files until the supply is exhausted, recording every outcome.
    pub fn run(&mut self, report: &mut ProcessingReport) {
        while let Some(outcome) = self.step() {
            report.record(outcome);
        }
    }

    /// Process the next file. Returns `None` once the supply is exhausted.
    pub fn step(&mut self) -> Option<FileOutcome> {
        if self.state == LoopState::Done {
            return None;
        }

        loop {
            self.enter(LoopState::Fetching);
            let Some(file) = self.supply.next_file() else {
                self.enter(LoopState::Done);
                info!("No new files to process");
                return None;
            };

            if !self.handled.insert(file.path().to_path_buf()) {
                debug!("{} was already handled in this run", file.path().display());
                continue;
            }

            self.enter(LoopState::Detecting);
            let (encoding, result) = match self.io.read(&file) {
                Ok(bytes) => {
                    // Classify the bytes that get decoded, not just a prefix.
                    let encoding = self.detector.detect(&bytes);
                    debug!("Detected {encoding} for {}", file.name());
                    (encoding, self.decode_transform_write(&file, &bytes, encoding))
                }
                Err(error) => (Encoding::Unknown, Err(error)),
            };

            let outcome = match result {
                Ok(output) => {
                    info!(
                        "Processed file written to: {}",
                        file.output_name(&self.output_suffix)
                    );
                    FileOutcome::processed(file.path(), encoding, output)
                }
                Err(error) => {
                    log_skip(&file, &error);
                    FileOutcome::skipped(file.path(), encoding, error)
                }
            };
            return Some(outcome);
        }
    }

    fn decode_transform_write(
        &mut self,
        file: &SourceFile,
        bytes: &[u8],
        encoding: Encoding,
    ) -> Result<PathBuf, FileError> {
        if !encoding.is_known() {
            return Err(FileError::new(
                file.path(),
                FileErrorKind::EncodingUnknown,
                "No byte-order mark or structural signal identifies the encoding",
            ));
        }

        self.enter(LoopState::ReadingAndTransforming);
        let text = decode_bytes(file.path(), bytes, encoding)?;
        let transformed = self.transformer.transform(&text).map_err(|e| {
            FileError::new(file.path(), FileErrorKind::TransformFailure, e.to_string())
        })?;

        self.enter(LoopState::Writing);
        let output = file.output_path(&self.output_suffix);
        self.io.encode_and_write(&output, &transformed, Encoding::Utf8)?;
        Ok(output)
    }

    fn enter(&mut self, state: LoopState) {
        trace!(from = ?self.state, to = ?state, "loop state");
        self.state = state;
    }
}

fn log_skip(file: &SourceFile, error: &FileError) {
    let name = file.name();
    match error.kind {
        FileErrorKind::EncodingUnknown => warn!("Unknown file encoding for file: {name}"),
        FileErrorKind::DecodeFailure | FileErrorKind::FileTooLarge | FileErrorKind::IoError => {
            warn!("Failed to read file {name}: {}", error.message);
        }
        FileErrorKind::TransformFailure => {
            warn!("Failed to transform file {name}: {}", error.message);
        }
        FileErrorKind::WriteFailure => warn!(
            "Failed to write the processed file for {name}: {}",
            error.message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformConfig;
    use crate::strategy::fs::FsByteIo;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Hands out a fixed list of files.
    struct ListSupply(VecDeque<SourceFile>);

    impl ListSupply {
        fn of(paths: &[PathBuf]) -> Self {
            Self(paths.iter().filter_map(SourceFile::new).collect())
        }
    }

    impl FileSupply for ListSupply {
        fn next_file(&mut self) -> Option<SourceFile> {
            self.0.pop_front()
        }
    }

    /// Reads from disk, refuses every write.
    struct ReadOnlyIo;

    impl ByteIo for ReadOnlyIo {
        fn read(&self, file: &SourceFile) -> Result<Vec<u8>, FileError> {
            FsByteIo::default().read(file)
        }

        fn encode_and_write(
            &self,
            path: &Path,
            _text: &str,
            _encoding: Encoding,
        ) -> Result<(), FileError> {
            Err(FileError::new(path, FileErrorKind::WriteFailure, "read-only"))
        }
    }

    fn transformer() -> Transformer {
        Transformer::new(&TransformConfig::new("X Y", 2)).unwrap()
    }

    #[test]
    fn test_empty_supply_is_done_immediately() {
        let mut lp = ProcessingLoop::new(
            ListSupply::of(&[]),
            FsByteIo::default(),
            EncodingDetector::default(),
            transformer(),
        );
        assert!(lp.step().is_none());
        assert_eq!(lp.state(), LoopState::Done);
        assert!(lp.step().is_none());
    }

    #[test]
    fn test_processes_and_writes_utf8() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in.utf16be");
        fs::write(&input, Encoding::Utf16Be.encode("Chuck Norris says hi").unwrap()).unwrap();

        let mut lp = ProcessingLoop::new(
            ListSupply::of(&[input.clone()]),
            FsByteIo::default(),
            EncodingDetector::default(),
            transformer(),
        );
        let outcome = lp.step().unwrap();
        assert!(outcome.is_processed());
        assert_eq!(outcome.encoding, Encoding::Utf16Be);

        let output = tmp.path().join("in.utf16be.processed");
        assert_eq!(outcome.output.as_deref(), Some(output.as_path()));
        assert_eq!(fs::read_to_string(&output).unwrap(), "1: X Y\n2: Says Hi");
        assert!(lp.step().is_none());
    }

    #[test]
    fn test_unknown_encoding_skips_and_continues() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("a.bin");
        let good = tmp.path().join("b.txt");
        fs::write(&bad, [0x93, b'h', b'i', 0x94]).unwrap();
        fs::write(&good, "hello").unwrap();

        let mut report = ProcessingReport::new(tmp.path());
        ProcessingLoop::new(
            ListSupply::of(&[bad.clone(), good]),
            FsByteIo::default(),
            EncodingDetector::default(),
            transformer(),
        )
        .run(&mut report);

        assert_eq!(report.processed_files, 1);
        assert_eq!(report.skipped_files, 1);
        let error = report.errors().next().unwrap();
        assert_eq!(error.kind, FileErrorKind::EncodingUnknown);
        assert_eq!(error.file, bad);
        assert!(!tmp.path().join("a.bin.processed").exists());
        assert!(tmp.path().join("b.txt.processed").exists());
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("vanished.txt");

        let mut report = ProcessingReport::new(tmp.path());
        ProcessingLoop::new(
            ListSupply::of(&[gone]),
            FsByteIo::default(),
            EncodingDetector::default(),
            transformer(),
        )
        .run(&mut report);

        // An unreadable file cannot be classified.
        assert_eq!(report.skipped_files, 1);
        assert_eq!(report.outcomes[0].encoding, Encoding::Unknown);
        assert_eq!(
            report.errors().next().unwrap().kind,
            FileErrorKind::IoError
        );
    }

    #[test]
    fn test_decode_failure_is_skipped() {
        let tmp = TempDir::new().unwrap();
        // BOM says UTF-16LE, odd trailing byte makes it undecodable.
        let odd = tmp.path().join("odd.txt");
        fs::write(&odd, [0xFF, 0xFE, b'a', 0, b'b']).unwrap();

        let mut report = ProcessingReport::new(tmp.path());
        ProcessingLoop::new(
            ListSupply::of(&[odd]),
            FsByteIo::default(),
            EncodingDetector::default(),
            transformer(),
        )
        .run(&mut report);

        let error = report.errors().next().unwrap();
        assert_eq!(error.kind, FileErrorKind::DecodeFailure);
        assert!(!tmp.path().join("odd.txt.processed").exists());
    }

    #[test]
    fn test_write_failure_does_not_stop_the_batch() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("1.txt");
        let second = tmp.path().join("2.txt");
        fs::write(&first, "one").unwrap();
        fs::write(&second, "two").unwrap();

        let mut report = ProcessingReport::new(tmp.path());
        ProcessingLoop::new(
            ListSupply::of(&[first, second]),
            ReadOnlyIo,
            EncodingDetector::default(),
            transformer(),
        )
        .run(&mut report);

        assert_eq!(report.files_attempted(), 2);
        assert_eq!(report.skipped_files, 2);
        assert!(
            report
                .errors()
                .all(|e| e.kind == FileErrorKind::WriteFailure)
        );
    }

    #[test]
    fn test_duplicate_paths_are_handled_once() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("dup.txt");
        fs::write(&file, "dup").unwrap();

        let mut report = ProcessingReport::new(tmp.path());
        ProcessingLoop::new(
            ListSupply::of(&[file.clone(), file]),
            FsByteIo::default(),
            EncodingDetector::default(),
            transformer(),
        )
        .run(&mut report);

        assert_eq!(report.files_attempted(), 1);
    }

    #[test]
    fn test_custom_output_suffix() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("note.txt");
        fs::write(&input, "a b c").unwrap();

        let mut lp = ProcessingLoop::new(
            ListSupply::of(&[input]),
            FsByteIo::default(),
            EncodingDetector::default(),
            transformer(),
        )
        .with_output_suffix(".out");
        let outcome = lp.step().unwrap();
        assert_eq!(outcome.output, Some(tmp.path().join("note.txt.out")));
        assert_eq!(
            fs::read_to_string(tmp.path().join("note.txt.out")).unwrap(),
            "1: A B\n2: C"
        );
    }

    fn run_one(path: &Path, detector: EncodingDetector) -> ProcessingReport {
        let mut report = ProcessingReport::new(Path::new("."));
        ProcessingLoop::new(
            ListSupply::of(&[path.to_path_buf()]),
            FsByteIo::default(),
            detector,
            transformer(),
        )
        .run(&mut report);
        report
    }

    #[test]
    fn test_utf8_after_long_ascii_prefix_is_decoded() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("long.txt");
        let content = format!("{}caf\u{e9}", "word ".repeat(20));
        fs::write(&input, &content).unwrap();

        // The prefix a 16-byte detector would look at is pure ASCII.
        let report = run_one(&input, EncodingDetector::new(16));

        assert_eq!(report.processed_files, 1);
        assert_eq!(report.outcomes[0].encoding, Encoding::Utf8);
        let out = fs::read_to_string(tmp.path().join("long.txt.processed")).unwrap();
        assert!(out.ends_with("Caf\u{e9}"), "got: {out}");
    }

    #[test]
    fn test_latin1_after_utf8_prefix_falls_back_to_latin1() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("mixed.txt");
        let mut bytes = "\u{e9}t\u{e9} ".repeat(8).into_bytes();
        bytes.extend_from_slice(&[b'c', b'a', b'f', 0xE9]);
        fs::write(&input, &bytes).unwrap();

        // The whole buffer is not UTF-8 and carries no C1 bytes: ISO-8859-1.
        let report = run_one(&input, EncodingDetector::new(16));

        assert_eq!(report.processed_files, 1);
        assert_eq!(report.outcomes[0].encoding, Encoding::Latin1);
        let out = fs::read_to_string(tmp.path().join("mixed.txt.processed")).unwrap();
        assert!(out.ends_with("Caf\u{e9}"), "got: {out}");
    }

    #[test]
    fn test_mixed_content_with_c1_bytes_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("mixed_c1.txt");
        // U+20AC in UTF-8 is E2 82 AC; 0x82 is a C1 byte as ISO-8859-1.
        let mut bytes = "\u{20ac} ".repeat(8).into_bytes();
        bytes.push(0xE9);
        fs::write(&input, &bytes).unwrap();

        let report = run_one(&input, EncodingDetector::new(16));

        assert_eq!(report.skipped_files, 1);
        assert_eq!(
            report.errors().next().unwrap().kind,
            FileErrorKind::EncodingUnknown
        );
        assert!(!tmp.path().join("mixed_c1.txt.processed").exists());
    }

    #[test]
    fn test_ascii_with_nul_bytes_is_processed() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("nul.txt");
        fs::write(&input, [b'a', 0, b'b', 0, b'c']).unwrap();

        let report = run_one(&input, EncodingDetector::default());

        assert_eq!(report.processed_files, 1);
        assert_eq!(report.outcomes[0].encoding, Encoding::Ascii);
        assert!(tmp.path().join("nul.txt.processed").exists());
    }
}
