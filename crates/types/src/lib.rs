//! Small validated text types shared across the StoryXcel crates.
//!
//! Titles, labels, usernames and similar short strings are wrapped in
//! [`NonEmptyText`] so that "non-empty, trimmed, reasonably sized" is checked
//! once at the boundary instead of re-validated in every service.

use serde::{Deserialize, Serialize, Serializer};

/// Upper bound for any [`NonEmptyText`] value, in bytes.
///
/// Short strings only: titles, labels, usernames. Document bodies are plain
/// `String`s and are not subject to this bound.
pub const MAX_TEXT_LEN: usize = 4096;

/// Errors produced when constructing validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input was empty or contained only whitespace.
    #[error("text cannot be empty")]
    Empty,
    /// The input exceeded [`MAX_TEXT_LEN`] bytes after trimming.
    #[error("text exceeds maximum length of {MAX_TEXT_LEN} bytes")]
    TooLong,
}

/// A trimmed, non-empty, bounded string.
///
/// Construction trims leading and trailing whitespace; the trimmed value must
/// contain at least one character and at most [`MAX_TEXT_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Validates and wraps the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty, or
    /// [`TextError::TooLong`] if it exceeds [`MAX_TEXT_LEN`] bytes.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.len() > MAX_TEXT_LEN {
            return Err(TextError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<NonEmptyText> for String {
    fn from(text: NonEmptyText) -> Self {
        text.0
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NonEmptyText::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts() {
        let text = NonEmptyText::new("  Gun Smoke  ").unwrap();
        assert_eq!(text.as_str(), "Gun Smoke");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(matches!(NonEmptyText::new(""), Err(TextError::Empty)));
        assert!(matches!(NonEmptyText::new("   \n\t"), Err(TextError::Empty)));
    }

    #[test]
    fn rejects_oversized_input() {
        let oversized = "x".repeat(MAX_TEXT_LEN + 1);
        assert!(matches!(
            NonEmptyText::new(oversized),
            Err(TextError::TooLong)
        ));
    }

    #[test]
    fn serde_round_trip() {
        let text = NonEmptyText::new("Figma board").unwrap();
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, "\"Figma board\"");
        let back: NonEmptyText = serde_json::from_str(&json).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn deserialize_rejects_blank() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
