use std::sync::Arc;

use log::info;
use quiz_core::model::QuizResult;
use storage::repository::ResultsLogRepository;

use crate::error::ResultsError;

/// Appends, reads, and clears the persisted log of quiz attempts.
#[derive(Clone)]
pub struct ResultsLogService {
    results: Arc<dyn ResultsLogRepository>,
}

impl ResultsLogService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultsLogRepository>) -> Self {
        Self { results }
    }

    /// Append one attempt to the end of the log.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Storage` if the log cannot be written.
    pub async fn append(&self, result: &QuizResult) -> Result<(), ResultsError> {
        self.results.append(result).await?;
        info!(
            "saved result {}/{} for `{}`",
            result.score(),
            result.total_questions(),
            result.set_name()
        );
        Ok(())
    }

    /// Every stored attempt, oldest first. A corrupted log reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Storage` if the log cannot be read.
    pub async fn read_all(&self) -> Result<Vec<QuizResult>, ResultsError> {
        Ok(self.results.read_all().await?)
    }

    /// Remove every stored attempt. Callers confirm with the user first.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Storage` if the log cannot be removed.
    pub async fn clear(&self) -> Result<(), ResultsError> {
        self.results.clear().await?;
        info!("cleared results log");
        Ok(())
    }
}
