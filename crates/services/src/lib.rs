#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod loader;
pub mod quiz;
pub mod results_service;
pub mod statistics;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, LoadError, QuizError, ResultsError};
pub use loader::QuestionSetLoader;
pub use quiz::{
    LoadStatus, QuizController, QuizEvent, QuizPhase, QuizProgress, QuizSession, QuizUpdate,
    ReviewItem,
};
pub use results_service::ResultsLogService;
pub use statistics::{SetBreakdown, StatisticsReporter, StatisticsSummary};
