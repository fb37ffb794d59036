//! The fixed three-stage text pipeline.
//!
//! Stages run in a fixed order, each receiving the complete output of the
//! previous one:
//! 1. `ReplaceToken`: substitute the search token with the new name
//! 2. `CapitalizeWords`: uppercase the first letter of every word, lowercase the rest
//! 3. `WrapAndNumber`: regroup words into numbered lines of a fixed width
//!
//! Every stage works on `Cow<str>` and hands the input back untouched when it
//! has nothing to change.

pub mod capitalize_words;
pub mod replace_token;
pub mod wrap_and_number;

use std::borrow::Cow;

pub use capitalize_words::CapitalizeWords;
pub use replace_token::ReplaceToken;
pub use wrap_and_number::WrapAndNumber;

use crate::config::TransformConfig;
use crate::error::{StageError, TransformError};

/// A single transformation step.
pub trait Stage: Send + Sync {
    /// Human-readable name, used in log lines and error messages.
    fn name(&self) -> &'static str;

    /// Fast pre-check. Returning `Ok(false)` skips the stage.
    ///
    /// # Errors
    ///
    /// Returns a `StageError` if the stage cannot run with its configuration.
    fn needs_apply(&self, text: &str) -> Result<bool, StageError>;

    /// Transform the text. Must be correct even when `needs_apply` was not called.
    ///
    /// # Errors
    ///
    /// Returns a `StageError` if the stage cannot run with its configuration.
    fn apply<'a>(&self, text: Cow<'a, str>) -> Result<Cow<'a, str>, StageError>;
}

/// Runs the three stages in order.
#[derive(Debug, Clone)]
pub struct Transformer {
    replace: ReplaceToken,
    capitalize: CapitalizeWords,
    wrap: WrapAndNumber,
}

impl Transformer {
    /// Build a transformer from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::InvalidWrapWidth` if `words_per_line` is zero
    /// and `TransformError::EmptySearchToken` if the search token is empty.
    pub fn new(config: &TransformConfig) -> Result<Self, TransformError> {
        if config.words_per_line == 0 {
            return Err(TransformError::InvalidWrapWidth(config.words_per_line));
        }
        if config.search_token.is_empty() {
            return Err(TransformError::EmptySearchToken);
        }

        Ok(Self {
            replace: ReplaceToken::new(&config.search_token, &config.new_name),
            capitalize: CapitalizeWords,
            wrap: WrapAndNumber::new(config.words_per_line),
        })
    }

    #[must_use]
    pub fn words_per_line(&self) -> usize {
        self.wrap.words_per_line()
    }

    /// Substitution stage on its own.
    #[must_use]
    pub fn replace_token<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.replace.replace(text)
    }

    /// Capitalization stage on its own.
    #[must_use]
    pub fn capitalize_words<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.capitalize.capitalize(text)
    }

    /// Wrap-and-number stage on its own.
    ///
    /// # Errors
    ///
    /// Returns `StageError::InvalidConfiguration` if the wrap width is zero.
    pub fn wrap_and_number(&self, text: &str) -> Result<String, StageError> {
        self.wrap.apply(Cow::Borrowed(text)).map(Cow::into_owned)
    }

    /// Run substitute → capitalize → wrap-and-number.
    ///
    /// # Errors
    ///
    /// Returns the first `StageError` raised by a stage.
    pub fn transform(&self, text: &str) -> Result<String, StageError> {
        let stages: [&dyn Stage; 3] = [&self.replace, &self.capitalize, &self.wrap];
        let mut current = Cow::Borrowed(text);

        for stage in stages {
            if !stage.needs_apply(&current)? {
                continue;
            }
            current = stage.apply(current)?;
        }

        Ok(current.into_owned())
    }
}
