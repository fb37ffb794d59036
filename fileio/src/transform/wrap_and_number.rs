use crate::error::StageError;
use crate::transform::Stage;
use std::borrow::Cow;

/// Regroups words into numbered lines of a fixed number of words.
///
/// Input is split on Unicode whitespace; runs collapse and leading or trailing
/// whitespace is dropped. Output lines look like `1: w1 w2 w3`, are joined by a
/// single `\n`, and carry no trailing newline. Only the last line may be short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapAndNumber {
    words_per_line: usize,
}

impl WrapAndNumber {
    /// A width of zero is accepted here but every call then fails.
    #[must_use]
    pub fn new(words_per_line: usize) -> Self {
        Self { words_per_line }
    }

    #[must_use]
    pub fn words_per_line(&self) -> usize {
        self.words_per_line
    }

    fn check_width(self) -> Result<(), StageError> {
        if self.words_per_line == 0 {
            return Err(StageError::InvalidConfiguration(
                self.name(),
                "words per line must be a positive integer".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Stage for WrapAndNumber {
    fn name(&self) -> &'static str {
        "wrap_and_number"
    }

    fn needs_apply(&self, _text: &str) -> Result<bool, StageError> {
        self.check_width()?;
        Ok(true)
    }

    fn apply<'a>(&self, text: Cow<'a, str>) -> Result<Cow<'a, str>, StageError> {
        self.check_width()?;

        let words: Vec<&str> = text.split_whitespace().collect();
        let lines: Vec<String> = words
            .chunks(self.words_per_line)
            .enumerate()
            .map(|(index, chunk)| format!("{}: {}", index + 1, chunk.join(" ")))
            .collect();

        Ok(Cow::Owned(lines.join("\n")))
    }
}
