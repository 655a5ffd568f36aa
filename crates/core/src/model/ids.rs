use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a question inside its set, as written in the set file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u64);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetIdError {
    #[error("question set id cannot be empty")]
    Empty,

    #[error("question set id contains a path separator: {0}")]
    PathSeparator(String),
}

/// Name of a question set (`"cka"`, `"aws"`).
///
/// Set ids double as lookup keys for file-backed sources, so they are trimmed
/// and may not contain path separators.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionSetId(String);

impl QuestionSetId {
    /// Validate and wrap a set name.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetIdError` when the name is blank or contains `/` or `\`.
    pub fn new(raw: impl Into<String>) -> Result<Self, QuestionSetIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuestionSetIdError::Empty);
        }
        if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(QuestionSetIdError::PathSeparator(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QuestionSetId {
    type Error = QuestionSetIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionSetId> for String {
    fn from(value: QuestionSetId) -> Self {
        value.0
    }
}

impl FromStr for QuestionSetId {
    type Err = QuestionSetIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for QuestionSetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ─── Debug / Display ───────────────────────────────────────────────────────────

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for QuestionSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionSetId({:?})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_display() {
        assert_eq!(QuestionId::new(42).to_string(), "42");
    }

    #[test]
    fn set_id_is_trimmed() {
        let id = QuestionSetId::new("  cka ").unwrap();
        assert_eq!(id.as_str(), "cka");
    }

    #[test]
    fn set_id_rejects_blank_and_paths() {
        assert_eq!(QuestionSetId::new("   "), Err(QuestionSetIdError::Empty));
        assert!(matches!(
            QuestionSetId::new("../etc/passwd"),
            Err(QuestionSetIdError::PathSeparator(_))
        ));
        assert!(QuestionSetId::new("..").is_err());
    }

    #[test]
    fn set_id_parses_from_str() {
        let id: QuestionSetId = "aws".parse().unwrap();
        assert_eq!(id.to_string(), "aws");
    }

    #[test]
    fn set_id_deserializes_with_validation() {
        let ok: QuestionSetId = serde_json::from_str("\"cka\"").unwrap();
        assert_eq!(ok.as_str(), "cka");
        assert!(serde_json::from_str::<QuestionSetId>("\"\"").is_err());
    }
}
