mod answers;
mod config;
mod ids;
mod question;
mod result;

pub use answers::AnswerMap;
pub use config::{MAX_TIMER_MINUTES, SessionConfig, SessionConfigError};
pub use ids::{QuestionId, QuestionSetId, QuestionSetIdError};
pub use question::{Hint, Question, QuestionKind, QuestionSet};
pub use result::{QuizResult, QuizResultError};
