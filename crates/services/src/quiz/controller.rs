use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use quiz_core::Clock;
use quiz_core::model::{Question, QuestionSetId, QuizResult, SessionConfig};

use super::countdown::{Countdown, TICK_PERIOD};
use super::state::{LoadTicket, QuizSession, TickOutcome, TimerId};
use crate::error::{LoadError, QuizError};
use crate::loader::QuestionSetLoader;
use crate::results_service::ResultsLogService;

/// Autonomous inputs to a quiz: finished loads and countdown ticks.
#[derive(Debug)]
pub enum QuizEvent {
    Loaded {
        ticket: LoadTicket,
        outcome: Result<Vec<Question>, LoadError>,
    },
    Tick(TimerId),
}

/// What handling a `QuizEvent` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizUpdate {
    /// `applied` is `false` when the load was stale and dropped.
    Loaded { applied: bool },
    Tick { remaining_seconds: u32 },
    /// The countdown ran out and the attempt was scored and saved.
    Submitted(QuizResult),
    Ignored,
}

/// Drives a `QuizSession`: runs loads in the background, keeps exactly one
/// countdown alive while the session has a timer armed, and appends scored
/// attempts to the results log.
///
/// Must be used from within a tokio runtime.
pub struct QuizController {
    session: QuizSession,
    loader: QuestionSetLoader,
    results: ResultsLogService,
    clock: Clock,
    rng: StdRng,
    events_tx: UnboundedSender<QuizEvent>,
    events_rx: UnboundedReceiver<QuizEvent>,
    countdown: Option<Countdown>,
    load_task: Option<JoinHandle<()>>,
    unsaved: Vec<QuizResult>,
}

impl QuizController {
    #[must_use]
    pub fn new(
        loader: QuestionSetLoader,
        results: ResultsLogService,
        clock: Clock,
        config: SessionConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session: QuizSession::new(config),
            loader,
            results,
            clock,
            rng: StdRng::from_os_rng(),
            events_tx,
            events_rx,
            countdown: None,
            load_task: None,
            unsaved: Vec::new(),
        }
    }

    /// Use a specific random source for shuffling.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Scored attempts whose append failed, oldest first, kept for
    /// `retry_save`.
    #[must_use]
    pub fn unsaved_results(&self) -> &[QuizResult] {
        &self.unsaved
    }

    // ─── events ────────────────────────────────────────────────────────────

    /// Wait for the next load completion or countdown tick.
    ///
    /// Cancel-safe, so it can sit in a `tokio::select!` next to user input.
    pub async fn next_event(&mut self) -> Option<QuizEvent> {
        self.events_rx.recv().await
    }

    /// Apply an event from `next_event`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Results` if a timer-triggered submission could not
    /// be saved; the session is scored regardless.
    pub async fn handle_event(&mut self, event: QuizEvent) -> Result<QuizUpdate, QuizError> {
        match event {
            QuizEvent::Loaded { ticket, outcome } => {
                if let Err(err) = &outcome {
                    warn!("{err}");
                }
                let applied = self.session.apply_load(ticket, outcome);
                if applied {
                    self.load_task = None;
                }
                Ok(QuizUpdate::Loaded { applied })
            }
            QuizEvent::Tick(timer) => {
                let outcome = self.session.tick(timer, self.clock.now());
                self.sync_countdown();
                match outcome? {
                    TickOutcome::Ignored => Ok(QuizUpdate::Ignored),
                    TickOutcome::Running { remaining_seconds } => {
                        Ok(QuizUpdate::Tick { remaining_seconds })
                    }
                    TickOutcome::Expired(submission) => {
                        self.persist(submission.result).await.map(QuizUpdate::Submitted)
                    }
                }
            }
        }
    }

    // ─── user operations ───────────────────────────────────────────────────

    /// Select a set and start loading it in the background.
    ///
    /// Any earlier load still running is aborted.
    pub fn select_set(&mut self, id: QuestionSetId) -> LoadTicket {
        self.abort_load();
        let ticket = self.session.select_set(id.clone());
        self.sync_countdown();

        let loader = self.loader.clone();
        let events = self.events_tx.clone();
        self.load_task = Some(tokio::spawn(async move {
            let outcome = loader.load(&id).await;
            if events.send(QuizEvent::Loaded { ticket, outcome }).is_err() {
                debug!("controller gone before `{id}` finished loading");
            }
        }));
        ticket
    }

    /// Replace the session options.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::configure`].
    pub fn configure(&mut self, config: SessionConfig) -> Result<(), QuizError> {
        self.session.configure(config)
    }

    /// # Errors
    ///
    /// See [`QuizSession::set_shuffle`].
    pub fn set_shuffle(&mut self, shuffle: bool) -> Result<(), QuizError> {
        self.session.set_shuffle(shuffle)
    }

    /// # Errors
    ///
    /// See [`QuizSession::set_timer_minutes`].
    pub fn set_timer_minutes(&mut self, minutes: Option<u32>) -> Result<(), QuizError> {
        self.session.set_timer_minutes(minutes)
    }

    /// Start answering and launch the countdown if configured.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::start`].
    pub fn start(&mut self) -> Result<(), QuizError> {
        self.session.start(&mut self.rng)?;
        self.sync_countdown();
        Ok(())
    }

    /// # Errors
    ///
    /// See [`QuizSession::record_answer`].
    pub fn record_answer(&mut self, answer: impl Into<String>) -> Result<(), QuizError> {
        self.session.record_answer(answer)
    }

    /// # Errors
    ///
    /// See [`QuizSession::go_next`].
    pub fn go_next(&mut self) -> Result<bool, QuizError> {
        self.session.go_next()
    }

    /// # Errors
    ///
    /// See [`QuizSession::go_previous`].
    pub fn go_previous(&mut self) -> Result<bool, QuizError> {
        self.session.go_previous()
    }

    /// # Errors
    ///
    /// See [`QuizSession::toggle_hint`].
    pub fn toggle_hint(&mut self) -> Result<bool, QuizError> {
        self.session.toggle_hint()
    }

    /// Score the attempt, stop the countdown, and append the result.
    ///
    /// Returns `Ok(None)` if the attempt had already been scored.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` before the quiz starts and
    /// `QuizError::Results` if the result could not be saved (the session is
    /// still scored; see `retry_save`).
    pub async fn submit(&mut self) -> Result<Option<QuizResult>, QuizError> {
        let submission = self.session.submit(self.clock.now());
        self.sync_countdown();
        match submission? {
            Some(submission) => self.persist(submission.result).await.map(Some),
            None => Ok(None),
        }
    }

    /// Append results whose earlier save failed. Returns `false` when there
    /// was nothing to retry.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Results` if saving fails again; results not yet
    /// written stay queued.
    pub async fn retry_save(&mut self) -> Result<bool, QuizError> {
        if self.unsaved.is_empty() {
            return Ok(false);
        }
        self.flush_unsaved().await.map(|()| true)
    }

    /// # Errors
    ///
    /// See [`QuizSession::review`].
    pub fn review(&mut self) -> Result<(), QuizError> {
        self.session.review()
    }

    /// # Errors
    ///
    /// See [`QuizSession::back_to_results`].
    pub fn back_to_results(&mut self) -> Result<(), QuizError> {
        self.session.back_to_results()
    }

    /// Retake the same questions; a configured timer starts over.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::restart`].
    pub fn restart(&mut self) -> Result<(), QuizError> {
        self.session.restart()?;
        self.sync_countdown();
        Ok(())
    }

    /// Leave the quiz entirely, cancelling any load or countdown.
    pub fn back_to_home(&mut self) {
        self.abort_load();
        self.session.back_to_home();
        self.sync_countdown();
    }

    // ─── internals ─────────────────────────────────────────────────────────

    /// Make the running countdown match the session's armed timer.
    fn sync_countdown(&mut self) {
        let armed = self.session.armed_timer();
        if self.countdown.as_ref().map(Countdown::id) == armed {
            return;
        }
        // Dropping the old handle aborts its task.
        self.countdown = armed.map(|id| Countdown::spawn(id, TICK_PERIOD, self.events_tx.clone()));
    }

    fn abort_load(&mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
    }

    /// Queue `result` behind any earlier unsaved ones and write them in order.
    async fn persist(&mut self, result: QuizResult) -> Result<QuizResult, QuizError> {
        self.unsaved.push(result.clone());
        self.flush_unsaved().await?;
        Ok(result)
    }

    async fn flush_unsaved(&mut self) -> Result<(), QuizError> {
        while let Some(result) = self.unsaved.first() {
            if let Err(err) = self.results.append(result).await {
                warn!(
                    "could not save quiz result ({} pending): {err}",
                    self.unsaved.len()
                );
                return Err(err.into());
            }
            self.unsaved.remove(0);
        }
        Ok(())
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        self.abort_load();
    }
}
