//! Configuration types for folder processing.
//!
//! Split into transformation config (what happens to the text) and folder
//! config (how files are discovered, read and written). The transformer never
//! sees filesystem concerns.

use std::path::PathBuf;

/// Placeholder token replaced by the substitution stage unless overridden.
pub const DEFAULT_SEARCH_TOKEN: &str = "Chuck Norris";

/// Suffix appended to the input file name to build the output file name.
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".processed";

/// Text transformation options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TransformConfig {
    /// Case-sensitive token replaced by `new_name`.
    pub search_token: String,
    /// Replacement text; may contain several words.
    pub new_name: String,
    /// Number of words per numbered output line. Must be positive.
    pub words_per_line: usize,
}

impl TransformConfig {
    /// Config with the default search token.
    #[must_use]
    pub fn new(new_name: impl Into<String>, words_per_line: usize) -> Self {
        Self {
            search_token: DEFAULT_SEARCH_TOKEN.to_owned(),
            new_name: new_name.into(),
            words_per_line,
        }
    }

    /// Override the search token.
    #[must_use]
    pub fn with_search_token(mut self, search_token: impl Into<String>) -> Self {
        self.search_token = search_token.into();
        self
    }
}

/// Filesystem-specific source options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FolderConfig {
    /// The watched folder. Only its direct children are processed.
    pub folder: PathBuf,
    /// Exclude patterns (glob format), matched against the file name and the full path.
    pub exclude: Vec<String>,
    /// Suffix of output files; inputs ending with it are never picked up.
    pub output_suffix: String,
    /// Maximum input file size in bytes (default: 10 MB).
    pub max_file_size: u64,
    /// Whether to follow symbolic links (default: `false`).
    pub follow_links: bool,
}

impl FolderConfig {
    /// Default options for the given folder.
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("."),
            exclude: Vec::new(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_owned(),
            max_file_size: 10_485_760,
            follow_links: false,
        }
    }
}
