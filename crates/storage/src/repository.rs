use async_trait::async_trait;
use quiz_core::model::{QuestionSet, QuestionSetId, QuizResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::results_codec::{decode_results, encode_results};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Catalog entry for an available question set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSetEntry {
    pub id: QuestionSetId,
    pub display_name: String,
}

impl QuestionSetEntry {
    #[must_use]
    pub fn new(id: QuestionSetId, title: Option<&str>) -> Self {
        let display_name = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(|| id.as_str().to_owned(), str::to_owned);
        Self { id, display_name }
    }
}

/// Read-only source of question sets keyed by set id.
#[async_trait]
pub trait QuestionSetRepository: Send + Sync {
    /// Fetch a full question set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for unknown ids and
    /// `StorageError::Serialization` when the stored document is malformed.
    async fn load_set(&self, id: &QuestionSetId) -> Result<QuestionSet, StorageError>;

    /// List available sets ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_sets(&self) -> Result<Vec<QuestionSetEntry>, StorageError>;
}

/// Append-only log of quiz attempts stored under a single key.
///
/// Adapters must treat an absent or unparseable stored value as an empty log;
/// only transport failures are reported as errors.
#[async_trait]
pub trait ResultsLogRepository: Send + Sync {
    /// Read the full log, append `result`, and write the log back.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn append(&self, result: &QuizResult) -> Result<(), StorageError>;

    /// All results in insertion order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be read.
    async fn read_all(&self) -> Result<Vec<QuizResult>, StorageError>;

    /// Remove every stored result in one step.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be removed.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// The results log is held as its serialized JSON string, the same shape the
/// persistent adapter writes, so corruption handling is exercised in tests too.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sets: Arc<Mutex<BTreeMap<QuestionSetId, QuestionSet>>>,
    results: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a question set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_set(&self, id: QuestionSetId, set: QuestionSet) -> Result<(), StorageError> {
        let mut guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(id, set);
        Ok(())
    }

    /// Overwrite the raw stored results value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_raw_results(&self, raw: Option<String>) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = raw;
        Ok(())
    }

    /// The raw stored results value, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_results(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl QuestionSetRepository for InMemoryRepository {
    async fn load_set(&self, id: &QuestionSetId) -> Result<QuestionSet, StorageError> {
        let guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_sets(&self) -> Result<Vec<QuestionSetEntry>, StorageError> {
        let guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .map(|(id, set)| QuestionSetEntry::new(id.clone(), set.title.as_deref()))
            .collect())
    }
}

#[async_trait]
impl ResultsLogRepository for InMemoryRepository {
    async fn append(&self, result: &QuizResult) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut all = decode_results(guard.as_deref());
        all.push(result.clone());
        *guard = Some(encode_results(&all)?);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<QuizResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(decode_results(guard.as_deref()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub question_sets: Arc<dyn QuestionSetRepository>,
    pub results: Arc<dyn ResultsLogRepository>,
}

impl Storage {
    /// Both repositories backed by `repo`, which the caller may keep a clone
    /// of to seed sets or inspect the stored log.
    #[must_use]
    pub fn in_memory(repo: InMemoryRepository) -> Self {
        let question_sets: Arc<dyn QuestionSetRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultsLogRepository> = Arc::new(repo);
        Self {
            question_sets,
            results,
        }
    }
}
