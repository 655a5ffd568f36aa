use crate::model::{AnswerMap, Question};

/// Count questions whose recorded answer exactly equals the correct answer.
///
/// Unanswered questions count as incorrect. Comparison is byte-for-byte: no
/// trimming, no case folding.
#[must_use]
pub fn score(questions: &[Question], answers: &AnswerMap) -> u32 {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(idx, question)| {
            answers
                .get(*idx)
                .is_some_and(|answer| question.is_correct(answer))
        })
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}
