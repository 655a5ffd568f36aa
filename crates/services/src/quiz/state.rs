use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::Rng;

use quiz_core::model::{AnswerMap, Question, QuestionSetId, QuizResult, SessionConfig};
use quiz_core::score;

use super::prepare::prepare_questions;
use super::view::{LoadStatus, QuizProgress, ReviewItem};
use crate::error::{LoadError, QuizError};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Discrete stage of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// No active set.
    Idle,
    /// A set is selected; options may change until the quiz starts.
    Configuring,
    Answering,
    Scored,
    Reviewing,
}

//
// ─── HANDLES ───────────────────────────────────────────────────────────────────
//

/// Identifies one armed countdown. Ticks carrying any other id are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issued by `select_set`; a load result is applied only with the latest ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What caused a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    TimerExpired,
}

/// A freshly scored attempt that the driver must append to the results log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub result: QuizResult,
    pub trigger: SubmitTrigger,
}

/// Outcome of delivering one countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale timer or no longer answering.
    Ignored,
    Running { remaining_seconds: u32 },
    Expired(Submission),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Quiz session state, mutated only through the transition methods below.
///
/// The session is synchronous and never schedules anything itself: timestamps
/// are passed in, loads are applied with `apply_load`, and the caller keeps a
/// countdown running exactly while `armed_timer` returns `Some`.
#[derive(Debug, Clone)]
pub struct QuizSession {
    phase: QuizPhase,
    config: SessionConfig,
    set_id: Option<QuestionSetId>,
    load_status: Option<LoadStatus>,
    load_generation: u64,
    questions: Vec<Question>,
    current: usize,
    answers: AnswerMap,
    score: Option<u32>,
    remaining_seconds: Option<u32>,
    hint_visible: bool,
    armed_timer: Option<TimerId>,
    timer_generation: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl QuizSession {
    /// Create an idle session with the given starting options.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            phase: QuizPhase::Idle,
            config,
            set_id: None,
            load_status: None,
            load_generation: 0,
            questions: Vec::new(),
            current: 0,
            answers: AnswerMap::new(),
            score: None,
            remaining_seconds: None,
            hint_visible: false,
            armed_timer: None,
            timer_generation: 0,
        }
    }

    // ─── accessors ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    #[must_use]
    pub fn set_id(&self) -> Option<&QuestionSetId> {
        self.set_id.as_ref()
    }

    /// Load progress of the selected set; `None` when idle.
    #[must_use]
    pub fn load_status(&self) -> Option<&LoadStatus> {
        self.load_status.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&str> {
        self.answers.get(self.current)
    }

    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.remaining_seconds
    }

    #[must_use]
    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    /// The countdown that should be running right now, if any.
    #[must_use]
    pub fn armed_timer(&self) -> Option<TimerId> {
        self.armed_timer
    }

    /// Snapshot for rendering the answering screen.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.len();
        QuizProgress {
            current: self.current,
            total,
            answered: self.answers.len(),
            remaining_seconds: self.remaining_seconds,
            is_first: self.current == 0,
            is_last: self.current + 1 >= total,
        }
    }

    /// Per-question review rows; empty before the attempt is scored.
    #[must_use]
    pub fn review_items(&self) -> Vec<ReviewItem> {
        if !matches!(self.phase, QuizPhase::Scored | QuizPhase::Reviewing) {
            return Vec::new();
        }
        self.questions
            .iter()
            .enumerate()
            .map(|(idx, question)| {
                let given = self.answers.get(idx);
                ReviewItem {
                    number: idx + 1,
                    question: question.text.clone(),
                    given: given.map(str::to_owned),
                    correct_answer: question.correct_answer.clone(),
                    is_correct: given.is_some_and(|a| question.is_correct(a)),
                    explanation: question.explanation.clone(),
                }
            })
            .collect()
    }

    // ─── selection & configuration ─────────────────────────────────────────

    /// Select a set and enter `Configuring`, discarding any attempt in flight.
    ///
    /// The returned ticket must accompany the load result in `apply_load`.
    pub fn select_set(&mut self, id: QuestionSetId) -> LoadTicket {
        self.clear_attempt();
        self.questions.clear();
        self.load_generation += 1;
        info!("selected question set `{id}`");
        self.set_id = Some(id);
        self.load_status = Some(LoadStatus::Pending);
        self.phase = QuizPhase::Configuring;
        LoadTicket(self.load_generation)
    }

    /// Apply a finished load. Returns `false` when the result was discarded
    /// because the session moved on since the load was issued.
    ///
    /// A failed load leaves the session in `Configuring` with no questions.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<Vec<Question>, LoadError>,
    ) -> bool {
        let pending = self
            .load_status
            .as_ref()
            .is_some_and(LoadStatus::is_pending);
        if self.phase != QuizPhase::Configuring
            || ticket.0 != self.load_generation
            || !pending
        {
            debug!("discarding stale load result (ticket {})", ticket.0);
            return false;
        }

        match outcome {
            Ok(questions) => {
                self.load_status = Some(LoadStatus::Ready {
                    questions: questions.len(),
                });
                self.questions = questions;
            }
            Err(err) => {
                self.load_status = Some(LoadStatus::Failed(err.to_string()));
                self.questions.clear();
            }
        }
        true
    }

    /// Replace the session options.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` once a quiz has started.
    pub fn configure(&mut self, config: SessionConfig) -> Result<(), QuizError> {
        self.ensure_configurable("configure")?;
        self.config = config;
        Ok(())
    }

    /// Turn shuffling on or off.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` once a quiz has started.
    pub fn set_shuffle(&mut self, shuffle: bool) -> Result<(), QuizError> {
        self.ensure_configurable("toggle shuffle")?;
        self.config = self.config.with_shuffle(shuffle);
        Ok(())
    }

    /// Set or clear the countdown length.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` once a quiz has started and
    /// `QuizError::Config` for a zero or oversized timer.
    pub fn set_timer_minutes(&mut self, minutes: Option<u32>) -> Result<(), QuizError> {
        self.ensure_configurable("set timer")?;
        self.config = SessionConfig::configure(self.config.shuffle(), minutes)?;
        Ok(())
    }

    // ─── answering ─────────────────────────────────────────────────────────

    /// Freeze the question order and enter `Answering`.
    ///
    /// Returns the countdown to start, if a timer is configured.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Configuring` and
    /// `QuizError::NoQuestions` while loading or when the set is empty.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<TimerId>, QuizError> {
        self.ensure_phase("start", &[QuizPhase::Configuring])?;
        let ready = matches!(self.load_status, Some(LoadStatus::Ready { .. }));
        if !ready || self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        let questions = std::mem::take(&mut self.questions);
        self.questions = prepare_questions(questions, &self.config, rng);
        self.clear_attempt();
        self.phase = QuizPhase::Answering;
        Ok(self.arm_timer())
    }

    /// Record (or overwrite) the answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Answering`.
    pub fn record_answer(&mut self, answer: impl Into<String>) -> Result<(), QuizError> {
        self.ensure_phase("answer", &[QuizPhase::Answering])?;
        self.answers.insert(self.current, answer);
        Ok(())
    }

    /// Move forward one question. Returns `false` at the last question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Answering`.
    pub fn go_next(&mut self) -> Result<bool, QuizError> {
        self.ensure_phase("go to next question", &[QuizPhase::Answering])?;
        if self.current + 1 >= self.questions.len() {
            return Ok(false);
        }
        self.current += 1;
        self.hint_visible = false;
        Ok(true)
    }

    /// Move back one question. Returns `false` at the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Answering`.
    pub fn go_previous(&mut self) -> Result<bool, QuizError> {
        self.ensure_phase("go to previous question", &[QuizPhase::Answering])?;
        if self.current == 0 {
            return Ok(false);
        }
        self.current -= 1;
        self.hint_visible = false;
        Ok(true)
    }

    /// Flip hint visibility and return the new state.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Answering` and
    /// `QuizError::NoHint` when the current question carries no hint.
    pub fn toggle_hint(&mut self) -> Result<bool, QuizError> {
        self.ensure_phase("toggle hint", &[QuizPhase::Answering])?;
        if !self.current_question().is_some_and(Question::has_hint) {
            return Err(QuizError::NoHint);
        }
        self.hint_visible = !self.hint_visible;
        Ok(self.hint_visible)
    }

    // ─── scoring ───────────────────────────────────────────────────────────

    /// Score the attempt and enter `Scored`.
    ///
    /// Returns `Ok(None)` when the attempt was already scored, so a late
    /// second submit changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` from `Idle` or `Configuring`.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<Option<Submission>, QuizError> {
        match self.phase {
            QuizPhase::Answering => self.finish(now, SubmitTrigger::Manual).map(Some),
            QuizPhase::Scored | QuizPhase::Reviewing => Ok(None),
            phase => Err(QuizError::InvalidTransition {
                action: "submit",
                phase,
            }),
        }
    }

    /// Deliver one second of countdown.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError::Result` if the expiry submission cannot be built.
    pub fn tick(&mut self, timer: TimerId, now: DateTime<Utc>) -> Result<TickOutcome, QuizError> {
        if self.phase != QuizPhase::Answering || self.armed_timer != Some(timer) {
            debug!("ignoring tick from timer {}", timer.0);
            return Ok(TickOutcome::Ignored);
        }
        let Some(remaining) = self.remaining_seconds else {
            return Ok(TickOutcome::Ignored);
        };

        let remaining = remaining.saturating_sub(1);
        self.remaining_seconds = Some(remaining);
        if remaining > 0 {
            return Ok(TickOutcome::Running {
                remaining_seconds: remaining,
            });
        }

        info!("timer {} expired; submitting", timer.0);
        self.finish(now, SubmitTrigger::TimerExpired)
            .map(TickOutcome::Expired)
    }

    fn finish(
        &mut self,
        now: DateTime<Utc>,
        trigger: SubmitTrigger,
    ) -> Result<Submission, QuizError> {
        let correct = score(&self.questions, &self.answers);
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let set_name = self.set_id.as_ref().map_or("", QuestionSetId::as_str);
        let result = QuizResult::new(set_name, correct, total, now)?;

        self.score = Some(correct);
        self.armed_timer = None;
        self.hint_visible = false;
        self.phase = QuizPhase::Scored;
        info!("scored {correct}/{total} on `{set_name}` ({trigger:?})");
        Ok(Submission { result, trigger })
    }

    // ─── results navigation ────────────────────────────────────────────────

    /// Show the per-question review.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Scored`.
    pub fn review(&mut self) -> Result<(), QuizError> {
        self.ensure_phase("review answers", &[QuizPhase::Scored])?;
        self.phase = QuizPhase::Reviewing;
        Ok(())
    }

    /// Return from the review to the score screen.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Reviewing`.
    pub fn back_to_results(&mut self) -> Result<(), QuizError> {
        self.ensure_phase("go back to results", &[QuizPhase::Reviewing])?;
        self.phase = QuizPhase::Scored;
        Ok(())
    }

    /// Retake the same questions in the same order.
    ///
    /// Returns the countdown to start, if a timer is configured.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Scored`.
    pub fn restart(&mut self) -> Result<Option<TimerId>, QuizError> {
        self.ensure_phase("restart", &[QuizPhase::Scored])?;
        self.clear_attempt();
        self.phase = QuizPhase::Answering;
        Ok(self.arm_timer())
    }

    /// Drop the active set and return to `Idle`. Options are kept.
    pub fn back_to_home(&mut self) {
        self.clear_attempt();
        self.questions.clear();
        // Invalidate any load still in flight.
        self.load_generation += 1;
        self.set_id = None;
        self.load_status = None;
        self.phase = QuizPhase::Idle;
    }

    // ─── helpers ───────────────────────────────────────────────────────────

    fn clear_attempt(&mut self) {
        self.current = 0;
        self.answers.clear();
        self.score = None;
        self.hint_visible = false;
        self.remaining_seconds = None;
        self.armed_timer = None;
    }

    fn arm_timer(&mut self) -> Option<TimerId> {
        let seconds = self.config.timer_seconds()?;
        self.timer_generation += 1;
        let id = TimerId::new(self.timer_generation);
        self.remaining_seconds = Some(seconds);
        self.armed_timer = Some(id);
        debug!("armed timer {} for {seconds}s", id.0);
        Some(id)
    }

    fn ensure_phase(&self, action: &'static str, allowed: &[QuizPhase]) -> Result<(), QuizError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(QuizError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    fn ensure_configurable(&self, action: &'static str) -> Result<(), QuizError> {
        self.ensure_phase(action, &[QuizPhase::Idle, QuizPhase::Configuring])
    }
}
