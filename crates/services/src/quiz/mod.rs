mod controller;
mod countdown;
mod prepare;
mod state;
mod view;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use controller::{QuizController, QuizEvent, QuizUpdate};
pub use countdown::{Countdown, TICK_PERIOD};
pub use prepare::prepare_questions;
pub use state::{
    LoadTicket, QuizPhase, QuizSession, Submission, SubmitTrigger, TickOutcome, TimerId,
};
pub use view::{LoadStatus, QuizProgress, ReviewItem};
