//! Read-only snapshots of a quiz session for presentation layers.

/// Aggregated view of an in-progress attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    /// Zero-based index of the question on screen.
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining_seconds: Option<u32>,
    pub is_first: bool,
    pub is_last: bool,
}

/// One row of the post-submission review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub number: usize,
    pub question: String,
    pub given: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

/// Outcome of loading the selected set, as seen while configuring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Ready { questions: usize },
    Failed(String),
}

impl LoadStatus {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}
