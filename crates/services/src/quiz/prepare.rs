use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, SessionConfig};

/// Order questions for a new attempt.
///
/// With shuffling enabled every permutation is equally likely (Fisher-Yates);
/// otherwise the loaded order is kept.
#[must_use]
pub fn prepare_questions<R: Rng + ?Sized>(
    mut questions: Vec<Question>,
    config: &SessionConfig,
    rng: &mut R,
) -> Vec<Question> {
    if config.shuffle() {
        questions.as_mut_slice().shuffle(rng);
    }
    questions
}
