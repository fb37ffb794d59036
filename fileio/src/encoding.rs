//! The closed set of supported text encodings and their byte codecs.
//!
//! Decoding is whole-buffer: the caller hands over every byte of a file and
//! gets a `String` back, with any matching byte-order mark removed. Output is
//! written as UTF-8 without a BOM, but every known encoding can be produced so
//! the detector and the codec can be exercised against each other.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian byte-order mark.
pub const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
/// UTF-16 big-endian byte-order mark.
pub const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// A text encoding from the fixed detection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Encoding {
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "UTF-16LE")]
    Utf16Le,
    #[serde(rename = "UTF-16BE")]
    Utf16Be,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    #[serde(rename = "ISO-8859-1")]
    Latin1,
    #[serde(rename = "US-ASCII")]
    Ascii,
    /// No confident choice could be made; cannot decode or encode.
    #[serde(rename = "unknown")]
    Unknown,
}

impl Encoding {
    /// Canonical charset label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    /// The byte-order mark this encoding may start with, if any.
    #[must_use]
    pub fn bom(self) -> Option<&'static [u8]> {
        match self {
            Self::Utf8 => Some(UTF8_BOM),
            Self::Utf16Le => Some(UTF16_LE_BOM),
            Self::Utf16Be => Some(UTF16_BE_BOM),
            Self::Latin1 | Self::Ascii | Self::Unknown => None,
        }
    }

    /// Decode a whole buffer. A leading BOM of this encoding is stripped and
    /// `Ascii` is read as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns a `DecodeError` if the bytes are not well-formed for this
    /// encoding, or if the encoding is `Unknown`.
    pub fn decode(self, bytes: &[u8]) -> Result<String, DecodeError> {
        let body = match self.bom() {
            Some(bom) => bytes.strip_prefix(bom).unwrap_or(bytes),
            None => bytes,
        };

        match self {
            // ASCII is a subset of UTF-8: a file classified from an ASCII
            // prefix may still carry UTF-8 further on.
            Self::Utf8 | Self::Ascii => std::str::from_utf8(body)
                .map(str::to_owned)
                .map_err(|e| DecodeError::InvalidUtf8 {
                    offset: e.valid_up_to(),
                }),
            Self::Utf16Le => decode_utf16(body, u16::from_le_bytes),
            Self::Utf16Be => decode_utf16(body, u16::from_be_bytes),
            Self::Latin1 => Ok(body.iter().map(|&b| char::from(b)).collect()),
            Self::Unknown => Err(DecodeError::UnknownEncoding),
        }
    }

    /// Encode text. UTF-16 output carries its BOM; UTF-8 output does not.
    ///
    /// # Errors
    ///
    /// Returns an `EncodeError` if a character cannot be represented in this
    /// encoding, or if the encoding is `Unknown`.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf16Le => Ok(encode_utf16(text, UTF16_LE_BOM, u16::to_le_bytes)),
            Self::Utf16Be => Ok(encode_utf16(text, UTF16_BE_BOM, u16::to_be_bytes)),
            Self::Latin1 => encode_single_byte(self, text, 0xFF),
            Self::Ascii => encode_single_byte(self, text, 0x7F),
            Self::Unknown => Err(EncodeError::UnknownEncoding),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a buffer could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("UTF-16 data has an odd number of bytes ({0})")]
    OddLength(usize),

    #[error("unpaired UTF-16 surrogate")]
    UnpairedSurrogate,

    #[error("cannot decode with an unknown encoding")]
    UnknownEncoding,
}

/// Why text could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("character '{ch}' cannot be represented in {encoding}")]
    Unrepresentable { encoding: Encoding, ch: char },

    #[error("cannot encode with an unknown encoding")]
    UnknownEncoding,
}

/// Return the encoding announced by a leading BOM and the BOM length.
#[must_use]
pub fn detect_bom(bytes: &[u8]) -> Option<(Encoding, usize)> {
    if bytes.starts_with(UTF8_BOM) {
        Some((Encoding::Utf8, UTF8_BOM.len()))
    } else if bytes.starts_with(UTF16_LE_BOM) {
        Some((Encoding::Utf16Le, UTF16_LE_BOM.len()))
    } else if bytes.starts_with(UTF16_BE_BOM) {
        Some((Encoding::Utf16Be, UTF16_BE_BOM.len()))
    } else {
        None
    }
}

fn decode_utf16(body: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, DecodeError> {
    if body.len() % 2 != 0 {
        return Err(DecodeError::OddLength(body.len()));
    }
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| DecodeError::UnpairedSurrogate)
}

fn encode_utf16(text: &str, bom: &[u8], bytes: fn(u16) -> [u8; 2]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bom.len() + text.len() * 2);
    out.extend_from_slice(bom);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&bytes(unit));
    }
    out
}

fn encode_single_byte(encoding: Encoding, text: &str, max: u8) -> Result<Vec<u8>, EncodeError> {
    text.chars()
        .map(|ch| match u8::try_from(u32::from(ch)) {
            Ok(b) if b <= max => Ok(b),
            _ => Err(EncodeError::Unrepresentable { encoding, ch }),
        })
        .collect()
}
