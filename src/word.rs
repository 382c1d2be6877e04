use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WordError {
    #[error("test word must contain at least one character")]
    Empty,
}

/// The reference word a user has to type. Never empty, so scoring can
/// always divide by its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestWord(String);

impl TestWord {
    pub fn new(word: impl Into<String>) -> Result<Self, WordError> {
        let word = word.into();
        if word.trim().is_empty() {
            return Err(WordError::Empty);
        }
        Ok(Self(word))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    // always false, a TestWord holds at least one character
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for TestWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
