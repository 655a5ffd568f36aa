//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionSetId, QuizResultError, SessionConfigError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::quiz::QuizPhase;

/// Errors emitted by `QuestionSetLoader`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("question set `{0}` was not found")]
    NotFound(QuestionSetId),
    #[error("question set `{id}` is malformed: {reason}")]
    Malformed { id: QuestionSetId, reason: String },
    #[error("question set `{id}` could not be read: {source}")]
    Storage {
        id: QuestionSetId,
        #[source]
        source: StorageError,
    },
}

/// Errors emitted by `ResultsLogService` and `StatisticsReporter`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz session and its controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: QuizPhase,
    },
    #[error("no questions loaded")]
    NoQuestions,
    #[error("current question has no hint")]
    NoHint,
    #[error(transparent)]
    Config(#[from] SessionConfigError),
    #[error(transparent)]
    Result(#[from] QuizResultError),
    #[error("result could not be saved: {0}")]
    Results(#[from] ResultsError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
