use std::sync::Arc;

use log::{debug, warn};
use quiz_core::model::{Question, QuestionSetId};
use storage::repository::{QuestionSetEntry, QuestionSetRepository, StorageError};

use crate::error::LoadError;

/// Resolves question-set identifiers to question lists.
#[derive(Clone)]
pub struct QuestionSetLoader {
    source: Arc<dyn QuestionSetRepository>,
}

impl QuestionSetLoader {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSetRepository>) -> Self {
        Self { source }
    }

    /// Fetch the questions of a set in their stored order.
    ///
    /// An existing set with zero questions loads successfully as an empty list.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotFound` for unknown ids, `LoadError::Malformed`
    /// when the document does not have the question-set shape, and
    /// `LoadError::Storage` for any other read failure.
    pub async fn load(&self, id: &QuestionSetId) -> Result<Vec<Question>, LoadError> {
        match self.source.load_set(id).await {
            Ok(set) => {
                debug!("loaded {} questions from `{id}`", set.questions.len());
                Ok(set.questions)
            }
            Err(StorageError::NotFound) => Err(LoadError::NotFound(id.clone())),
            Err(StorageError::Serialization(reason)) => {
                warn!("question set `{id}` is malformed: {reason}");
                Err(LoadError::Malformed {
                    id: id.clone(),
                    reason,
                })
            }
            Err(source) => Err(LoadError::Storage {
                id: id.clone(),
                source,
            }),
        }
    }

    /// Available sets ordered by id, with display names.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    pub async fn catalog(&self) -> Result<Vec<QuestionSetEntry>, StorageError> {
        self.source.list_sets().await
    }
}
