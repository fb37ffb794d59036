//! Encoding detection from raw bytes.
//!
//! Order of checks, first match wins:
//! 1. Byte-order mark (authoritative)
//! 2. ASCII: every byte below 0x80 (NUL included)
//! 3. Well-formed UTF-8
//! 4. BOM-less UTF-16: NUL bytes concentrated on one byte parity, and the
//!    data decodes in that byte order
//! 5. ISO-8859-1, unless the data holds NUL or C1 control bytes (0x80..=0x9F)
//!
//! Anything else is `Encoding::Unknown`.
//!
//! `detect` classifies a complete buffer. `get_encoding` only looks at a
//! prefix of the file, so its answer describes that prefix: a file whose
//! first 64 KiB are ASCII is reported as ASCII even if UTF-8 follows. The
//! processing loop therefore classifies the whole buffer it decodes.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::encoding::{Encoding, detect_bom};

/// Default number of leading bytes inspected by `get_encoding`.
pub const DEFAULT_PREFIX_LEN: usize = 65_536;

/// Classifies a file's bytes into one of the supported encodings.
#[derive(Debug, Clone, Copy)]
pub struct EncodingDetector {
    prefix_len: usize,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_LEN)
    }
}

impl EncodingDetector {
    /// Detector whose `get_encoding` inspects at most `prefix_len` bytes (at least 4).
    #[must_use]
    pub fn new(prefix_len: usize) -> Self {
        Self {
            prefix_len: prefix_len.max(4),
        }
    }

    #[must_use]
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Detect the encoding of the file at `path` from its leading bytes.
    ///
    /// Never fails: an unreadable file is reported as `Encoding::Unknown`.
    /// A multi-byte UTF-8 sequence cut by the prefix bound still counts as
    /// valid UTF-8.
    #[must_use]
    pub fn get_encoding(&self, path: &Path) -> Encoding {
        match self.read_prefix(path) {
            Ok((prefix, truncated)) => classify(&prefix, truncated),
            Err(e) => {
                debug!("Cannot read {} for encoding detection: {e}", path.display());
                Encoding::Unknown
            }
        }
    }

    /// Detect the encoding of a complete in-memory buffer.
    #[must_use]
    pub fn detect(&self, bytes: &[u8]) -> Encoding {
        classify(bytes, false)
    }

    /// Leading bytes of the file, and whether the file goes on past them.
    fn read_prefix(&self, path: &Path) -> std::io::Result<(Vec<u8>, bool)> {
        let file = std::fs::File::open(path)?;
        let limit = u64::try_from(self.prefix_len)
            .unwrap_or(u64::MAX)
            .saturating_add(1);
        let mut buffer = Vec::new();
        file.take(limit).read_to_end(&mut buffer)?;

        let truncated = buffer.len() > self.prefix_len;
        buffer.truncate(self.prefix_len);
        Ok((buffer, truncated))
    }
}

/// With `truncated`, the bytes are a prefix of a longer stream and may end in
/// the middle of a character.
fn classify(bytes: &[u8], truncated: bool) -> Encoding {
    if let Some((encoding, _)) = detect_bom(bytes) {
        return encoding;
    }

    if bytes.is_ascii() {
        return Encoding::Ascii;
    }

    if is_utf8(bytes, truncated) {
        return Encoding::Utf8;
    }

    if let Some(encoding) = utf16_by_nul_parity(bytes, truncated) {
        return encoding;
    }

    if bytes.contains(&0) || bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
        return Encoding::Unknown;
    }

    Encoding::Latin1
}

/// Structural validity check. With `truncated`, an incomplete sequence at the
/// very end is accepted; an invalid byte anywhere is not.
fn is_utf8(bytes: &[u8], truncated: bool) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(_) => true,
        Err(e) => truncated && e.error_len().is_none(),
    }
}

/// Text in UTF-16 from the Latin range has a NUL in every high byte. Pick the
/// endianness whose high-byte position holds at least half the NULs while the
/// other position holds almost none, then require the data to decode.
fn utf16_by_nul_parity(bytes: &[u8], truncated: bool) -> Option<Encoding> {
    if bytes.len() % 2 != 0 && !truncated {
        return None;
    }

    let (mut pairs, mut even, mut odd) = (0usize, 0usize, 0usize);
    for pair in bytes.chunks_exact(2) {
        pairs += 1;
        if pair[0] == 0 {
            even += 1;
        }
        if pair[1] == 0 {
            odd += 1;
        }
    }
    if pairs == 0 {
        return None;
    }

    let candidate = if odd * 2 >= pairs && even * 4 < odd {
        Encoding::Utf16Le
    } else if even * 2 >= pairs && odd * 4 < even {
        Encoding::Utf16Be
    } else {
        return None;
    };

    // A prefix may end inside a surrogate pair; only whole buffers must decode.
    if !truncated && candidate.decode(bytes).is_err() {
        return None;
    }
    Some(candidate)
}
