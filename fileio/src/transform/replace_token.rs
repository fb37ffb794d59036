use crate::error::StageError;
use crate::transform::Stage;
use std::borrow::Cow;

/// Replaces every case-sensitive occurrence of a token with a fixed string.
///
/// Matches are found left to right without overlap, and the replacement text
/// is never searched again, so a replacement that contains the token does not
/// cascade within a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceToken {
    search: String,
    replacement: String,
}

impl ReplaceToken {
    #[must_use]
    pub fn new(search: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replacement: replacement.into(),
        }
    }

    /// Zero-copy when the token is absent. An empty token matches nothing.
    #[must_use]
    pub fn replace<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.search.is_empty() || !text.contains(self.search.as_str()) {
            return Cow::Borrowed(text);
        }
        Cow::Owned(text.replace(self.search.as_str(), &self.replacement))
    }
}

impl Stage for ReplaceToken {
    fn name(&self) -> &'static str {
        "replace_token"
    }

    fn needs_apply(&self, text: &str) -> Result<bool, StageError> {
        Ok(!self.search.is_empty() && text.contains(self.search.as_str()))
    }

    fn apply<'a>(&self, text: Cow<'a, str>) -> Result<Cow<'a, str>, StageError> {
        if !self.needs_apply(&text)? {
            return Ok(text);
        }
        Ok(Cow::Owned(text.replace(self.search.as_str(), &self.replacement)))
    }
}
