use crate::error::StageError;
use crate::transform::Stage;
use std::borrow::Cow;

/// Uppercases the first character of every whitespace-delimited word and
/// lowercases the rest. Whitespace runs are copied byte for byte.
///
/// Casing is Unicode-aware and may change the byte length: `ß` uppercases to
/// `SS`, and a final sigma lowercases to `ς`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapitalizeWords;

impl CapitalizeWords {
    /// Zero-copy when the text is already capitalized.
    #[must_use]
    pub fn capitalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let out = capitalize(text);
        if out == text {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(out)
        }
    }
}

impl Stage for CapitalizeWords {
    fn name(&self) -> &'static str {
        "capitalize_words"
    }

    // Letters without case map to themselves, so this only over-approximates.
    fn needs_apply(&self, text: &str) -> Result<bool, StageError> {
        Ok(text.chars().any(char::is_alphabetic))
    }

    fn apply<'a>(&self, text: Cow<'a, str>) -> Result<Cow<'a, str>, StageError> {
        let out = capitalize(&text);
        if out == *text {
            Ok(text)
        } else {
            Ok(Cow::Owned(out))
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let ws_end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        out.push_str(&rest[..ws_end]);
        rest = &rest[ws_end..];

        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let mut chars = rest[..word_end].chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
        rest = &rest[word_end..];
    }

    out
}
