use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionSet, QuestionSetId, QuizResult, SessionConfig};
use quiz_core::time::fixed_clock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{
    AppServices, LoadStatus, QuizController, QuizError, QuizPhase, QuizUpdate, ResultsLogService,
};
use storage::repository::{InMemoryRepository, ResultsLogRepository, StorageError};

fn id(raw: &str) -> QuestionSetId {
    QuestionSetId::new(raw).unwrap()
}

fn repo_with_sets() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    repo.insert_set(
        id("cka"),
        QuestionSet::new(vec![
            Question::multiple_choice(1, "2+2?", ["3", "4"], "4"),
            Question::free_text(2, "Capital of France?", "Paris"),
        ]),
    )
    .unwrap();
    repo.insert_set(
        id("aws"),
        QuestionSet::new(vec![Question::free_text(1, "Object storage?", "S3")]),
    )
    .unwrap();
    repo
}

fn controller(repo: &InMemoryRepository, config: SessionConfig) -> QuizController {
    AppServices::in_memory(repo.clone(), fixed_clock())
        .quiz_controller(config)
        .with_rng(StdRng::seed_from_u64(9))
}

async fn next_update(controller: &mut QuizController) -> QuizUpdate {
    let event = controller.next_event().await.expect("event channel open");
    controller.handle_event(event).await.unwrap()
}

async fn load(controller: &mut QuizController, set: &str) {
    controller.select_set(id(set));
    assert_eq!(
        next_update(controller).await,
        QuizUpdate::Loaded { applied: true }
    );
}

/// Waits for an event in virtual time; `None` means nothing arrived.
async fn quiet_for(controller: &mut QuizController, secs: u64) -> Option<QuizUpdate> {
    let event = tokio::time::timeout(Duration::from_secs(secs), controller.next_event())
        .await
        .ok()??;
    Some(controller.handle_event(event).await.unwrap())
}

async fn stored(repo: &InMemoryRepository) -> Vec<QuizResult> {
    repo.read_all().await.unwrap()
}

#[tokio::test]
async fn manual_flow_scores_and_persists_once() {
    let repo = repo_with_sets();
    let mut quiz = controller(&repo, SessionConfig::default());
    load(&mut quiz, "cka").await;

    quiz.start().unwrap();
    quiz.record_answer("4").unwrap();
    quiz.go_next().unwrap();
    quiz.record_answer("paris").unwrap();

    let result = quiz.submit().await.unwrap().expect("scored");
    assert_eq!(result.score(), 1);
    assert_eq!(result.total_questions(), 2);
    assert_eq!(quiz.session().phase(), QuizPhase::Scored);

    assert!(quiz.submit().await.unwrap().is_none());
    assert_eq!(stored(&repo).await, vec![result]);
}

#[tokio::test(start_paused = true)]
async fn timer_expiry_submits_exactly_once() {
    let repo = repo_with_sets();
    let config = SessionConfig::configure(false, Some(1)).unwrap();
    let mut quiz = controller(&repo, config);
    load(&mut quiz, "cka").await;
    quiz.start().unwrap();
    quiz.record_answer("4").unwrap();

    let mut ticks = 0;
    let result = loop {
        match next_update(&mut quiz).await {
            QuizUpdate::Tick { .. } => ticks += 1,
            QuizUpdate::Submitted(result) => break result,
            other => panic!("unexpected update {other:?}"),
        }
    };

    assert_eq!(ticks, 59);
    assert_eq!(result.score(), 1);
    assert_eq!(quiz.session().phase(), QuizPhase::Scored);
    assert_eq!(quiz.session().remaining_seconds(), Some(0));

    assert_eq!(quiet_for(&mut quiz, 300).await, None);
    assert!(quiz.submit().await.unwrap().is_none());
    assert_eq!(stored(&repo).await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn back_to_home_mid_timer_stops_ticks() {
    let repo = repo_with_sets();
    let config = SessionConfig::configure(false, Some(1)).unwrap();
    let mut quiz = controller(&repo, config);
    load(&mut quiz, "cka").await;
    quiz.start().unwrap();

    for _ in 0..10 {
        assert!(matches!(next_update(&mut quiz).await, QuizUpdate::Tick { .. }));
    }
    quiz.back_to_home();

    assert_eq!(quiet_for(&mut quiz, 300).await, None);
    assert_eq!(quiz.session().phase(), QuizPhase::Idle);
    assert!(stored(&repo).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn manual_submit_cancels_countdown() {
    let repo = repo_with_sets();
    let config = SessionConfig::configure(false, Some(1)).unwrap();
    let mut quiz = controller(&repo, config);
    load(&mut quiz, "cka").await;
    quiz.start().unwrap();

    assert!(matches!(next_update(&mut quiz).await, QuizUpdate::Tick { remaining_seconds: 59 }));
    quiz.submit().await.unwrap().expect("scored");

    assert_eq!(quiet_for(&mut quiz, 300).await, None);
    assert_eq!(quiz.session().remaining_seconds(), Some(59));
    assert_eq!(stored(&repo).await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_runs_a_fresh_countdown() {
    let repo = repo_with_sets();
    let config = SessionConfig::configure(false, Some(1)).unwrap();
    let mut quiz = controller(&repo, config);
    load(&mut quiz, "aws").await;
    quiz.start().unwrap();
    quiz.submit().await.unwrap();

    quiz.restart().unwrap();
    assert_eq!(quiz.session().remaining_seconds(), Some(60));
    assert_eq!(
        next_update(&mut quiz).await,
        QuizUpdate::Tick { remaining_seconds: 59 }
    );
}

#[tokio::test]
async fn failed_load_leaves_empty_usable_state() {
    let repo = repo_with_sets();
    let mut quiz = controller(&repo, SessionConfig::default());
    load(&mut quiz, "missing").await;

    assert_eq!(quiz.session().phase(), QuizPhase::Configuring);
    assert!(quiz.session().questions().is_empty());
    assert!(matches!(
        quiz.session().load_status(),
        Some(LoadStatus::Failed(_))
    ));
    assert!(matches!(quiz.start(), Err(QuizError::NoQuestions)));

    load(&mut quiz, "aws").await;
    quiz.start().unwrap();
    assert_eq!(quiz.session().phase(), QuizPhase::Answering);
}

#[tokio::test]
async fn reselecting_drops_the_earlier_load() {
    let repo = repo_with_sets();
    let mut quiz = controller(&repo, SessionConfig::default());
    quiz.select_set(id("cka"));
    quiz.select_set(id("aws"));

    assert_eq!(next_update(&mut quiz).await, QuizUpdate::Loaded { applied: true });
    assert_eq!(quiz.session().set_id().map(QuestionSetId::as_str), Some("aws"));
    assert_eq!(quiz.session().questions().len(), 1);
}

#[tokio::test]
async fn invalid_transitions_leave_state_untouched() {
    let repo = repo_with_sets();
    let mut quiz = controller(&repo, SessionConfig::default());

    assert!(matches!(
        quiz.submit().await,
        Err(QuizError::InvalidTransition { phase: QuizPhase::Idle, .. })
    ));
    assert!(quiz.record_answer("x").is_err());
    assert!(quiz.review().is_err());
    assert_eq!(quiz.session().phase(), QuizPhase::Idle);
    assert!(stored(&repo).await.is_empty());
}

//
// ─── PERSISTENCE FAILURES ──────────────────────────────────────────────────────
//

#[derive(Clone, Default)]
struct FlakyResults {
    inner: InMemoryRepository,
    failing: Arc<AtomicBool>,
}

#[async_trait]
impl ResultsLogRepository for FlakyResults {
    async fn append(&self, result: &QuizResult) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.append(result).await
    }

    async fn read_all(&self) -> Result<Vec<QuizResult>, StorageError> {
        self.inner.read_all().await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear().await
    }
}

#[tokio::test]
async fn failed_save_keeps_score_and_can_be_retried() {
    let repo = repo_with_sets();
    let results = FlakyResults::default();
    results.failing.store(true, Ordering::SeqCst);

    let mut quiz = QuizController::new(
        services::QuestionSetLoader::new(Arc::new(repo)),
        ResultsLogService::new(Arc::new(results.clone())),
        fixed_clock(),
        SessionConfig::default(),
    );
    load(&mut quiz, "aws").await;
    quiz.start().unwrap();
    quiz.record_answer("S3").unwrap();

    assert!(matches!(quiz.submit().await, Err(QuizError::Results(_))));
    assert_eq!(quiz.session().phase(), QuizPhase::Scored);
    assert_eq!(quiz.session().score(), Some(1));
    assert_eq!(quiz.unsaved_results().len(), 1);

    results.failing.store(false, Ordering::SeqCst);
    assert!(quiz.retry_save().await.unwrap());
    assert!(quiz.unsaved_results().is_empty());
    assert!(!quiz.retry_save().await.unwrap());
    assert_eq!(results.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn later_save_writes_earlier_unsaved_attempt_first() {
    let repo = repo_with_sets();
    let results = FlakyResults::default();
    results.failing.store(true, Ordering::SeqCst);

    let mut quiz = QuizController::new(
        services::QuestionSetLoader::new(Arc::new(repo)),
        ResultsLogService::new(Arc::new(results.clone())),
        fixed_clock(),
        SessionConfig::default(),
    );
    load(&mut quiz, "aws").await;
    quiz.start().unwrap();
    quiz.record_answer("S3").unwrap();
    assert!(matches!(quiz.submit().await, Err(QuizError::Results(_))));

    results.failing.store(false, Ordering::SeqCst);
    quiz.restart().unwrap();
    let second = quiz.submit().await.unwrap().unwrap();
    assert_eq!(second.score(), 0);

    assert!(quiz.unsaved_results().is_empty());
    assert!(!quiz.retry_save().await.unwrap());
    let scores: Vec<u32> = results
        .read_all()
        .await
        .unwrap()
        .iter()
        .map(QuizResult::score)
        .collect();
    assert_eq!(scores, vec![1, 0]);
}

#[tokio::test]
async fn repeated_failures_queue_every_attempt() {
    let repo = repo_with_sets();
    let results = FlakyResults::default();
    results.failing.store(true, Ordering::SeqCst);

    let mut quiz = QuizController::new(
        services::QuestionSetLoader::new(Arc::new(repo)),
        ResultsLogService::new(Arc::new(results.clone())),
        fixed_clock(),
        SessionConfig::default(),
    );
    load(&mut quiz, "aws").await;
    quiz.start().unwrap();
    assert!(quiz.submit().await.is_err());
    quiz.restart().unwrap();
    assert!(quiz.submit().await.is_err());
    assert_eq!(quiz.unsaved_results().len(), 2);

    results.failing.store(false, Ordering::SeqCst);
    assert!(quiz.retry_save().await.unwrap());
    assert!(quiz.unsaved_results().is_empty());
    assert_eq!(results.read_all().await.unwrap().len(), 2);
}
