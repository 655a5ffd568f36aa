use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::SessionConfig;
use storage::repository::{InMemoryRepository, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::loader::QuestionSetLoader;
use crate::quiz::QuizController;
use crate::results_service::ResultsLogService;
use crate::statistics::StatisticsReporter;

/// Assembles app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    loader: Arc<QuestionSetLoader>,
    results: Arc<ResultsLogService>,
    statistics: Arc<StatisticsReporter>,
}

impl AppServices {
    /// Build services with results in `SQLite` and question sets read from
    /// `sets_dir`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        sets_dir: impl Into<PathBuf>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, sets_dir).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over an in-memory repository.
    #[must_use]
    pub fn in_memory(repo: InMemoryRepository, clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(repo), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let results = ResultsLogService::new(Arc::clone(&storage.results));
        Self {
            clock,
            loader: Arc::new(QuestionSetLoader::new(Arc::clone(&storage.question_sets))),
            statistics: Arc::new(StatisticsReporter::new(results.clone())),
            results: Arc::new(results),
        }
    }

    #[must_use]
    pub fn loader(&self) -> Arc<QuestionSetLoader> {
        Arc::clone(&self.loader)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultsLogService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsReporter> {
        Arc::clone(&self.statistics)
    }

    /// A fresh, idle quiz driven by these services.
    #[must_use]
    pub fn quiz_controller(&self, config: SessionConfig) -> QuizController {
        QuizController::new(
            self.loader.as_ref().clone(),
            self.results.as_ref().clone(),
            self.clock,
            config,
        )
    }
}
