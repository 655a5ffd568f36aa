use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreOutOfRange { score: u32, total: u32 },
}

/// One completed attempt, as appended to the results log.
///
/// Serialized as `{setName, score, totalQuestions, timestamp}` with an
/// RFC 3339 timestamp. Deserialization re-checks `score <= totalQuestions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "QuizResultRecord")]
pub struct QuizResult {
    set_name: String,
    score: u32,
    total_questions: u32,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizResultRecord {
    set_name: String,
    score: u32,
    total_questions: u32,
    timestamp: DateTime<Utc>,
}

impl TryFrom<QuizResultRecord> for QuizResult {
    type Error = QuizResultError;

    fn try_from(record: QuizResultRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.set_name,
            record.score,
            record.total_questions,
            record.timestamp,
        )
    }
}

impl QuizResult {
    /// Create a result.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::ScoreOutOfRange` if `score > total_questions`.
    pub fn new(
        set_name: impl Into<String>,
        score: u32,
        total_questions: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        if score > total_questions {
            return Err(QuizResultError::ScoreOutOfRange {
                score,
                total: total_questions,
            });
        }
        Ok(Self {
            set_name: set_name.into(),
            score,
            total_questions,
            timestamp,
        })
    }

    #[must_use]
    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
