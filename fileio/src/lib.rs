//! # fileio
//!
//! Batch text normalizer for a single folder.
//!
//! Every file in the folder that has not been handled yet is classified into
//! one of a fixed set of encodings, decoded, run through a fixed three-stage
//! pipeline (token substitution, word capitalization, numbered line wrapping)
//! and written next to the original as `<name>.processed`, always in UTF-8.
//!
//! The crate separates the **core** (encoding detection, the text pipeline,
//! the processing loop) from its **collaborators** (`FileSupply`, `ByteIo`),
//! with a filesystem implementation of both in `strategy::fs`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fileio::{FolderConfig, TransformConfig, process_folder};
//!
//! let folder_config = FolderConfig::new("data");
//! let transform_config = TransformConfig::new("Jane Doe", 5);
//!
//! let report = process_folder(&folder_config, &transform_config).unwrap();
//! println!("Files processed: {}", report.processed_files);
//! println!("Files skipped: {}", report.skipped_files);
//! ```

mod config;
mod detector;
mod encoding;
mod error;
pub mod output;
mod processor;
mod report;
pub mod strategy;
pub mod transform;

pub use config::{DEFAULT_OUTPUT_SUFFIX, DEFAULT_SEARCH_TOKEN, FolderConfig, TransformConfig};
pub use detector::EncodingDetector;
pub use encoding::{DecodeError, EncodeError, Encoding, detect_bom};
pub use error::{FileError, FileErrorKind, ProcessError, StageError, TransformError};
pub use processor::{LoopState, ProcessingLoop};
pub use report::{FileOutcome, ProcessingReport};
pub use strategy::fs::{FolderExplorer, FsByteIo};
pub use strategy::{ByteIo, FileSupply, SourceFile, decode_bytes};
pub use transform::{Stage, Transformer};

use tracing::info;

/// Process every unhandled file in a folder and return the run report.
///
/// This is the primary public API.
///
/// # Errors
///
/// Returns an error if the transform configuration is invalid (zero words per
/// line, empty search token), if the folder does not exist or is not a
/// directory, or if an exclude pattern is malformed. Per-file failures never
/// produce an error; they are recorded in `report.outcomes`.
pub fn process_folder(
    folder_config: &FolderConfig,
    transform_config: &TransformConfig,
) -> anyhow::Result<ProcessingReport> {
    let transformer = Transformer::new(transform_config)?;
    let supply = FolderExplorer::new(folder_config)?;
    let io = FsByteIo::new(folder_config.max_file_size);
    let detector = EncodingDetector::default();

    info!(
        "Application started, reading folder {}...",
        folder_config.folder.display()
    );

    let mut report = ProcessingReport::new(&folder_config.folder);
    ProcessingLoop::new(supply, io, detector, transformer)
        .with_output_suffix(folder_config.output_suffix.as_str())
        .run(&mut report);

    info!(
        "Done: {} processed, {} skipped",
        report.processed_files, report.skipped_files
    );
    Ok(report)
}
