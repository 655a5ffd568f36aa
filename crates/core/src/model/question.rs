use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

//
// ─── HINT ──────────────────────────────────────────────────────────────────────
//

/// Optional help attached to a question; visibility is toggled by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// How an answer to a question is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Answer must be the literal text of one of the options.
    MultipleChoice,
    /// Answer is typed and compared verbatim.
    FreeText,
}

/// A single quiz question, immutable once loaded.
///
/// Field names follow the question-set file format (`correctAnswer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Build a free-text question.
    #[must_use]
    pub fn free_text(
        id: u64,
        text: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            options: None,
            correct_answer: correct_answer.into(),
            hint: None,
            explanation: None,
        }
    }

    /// Build a multiple-choice question.
    #[must_use]
    pub fn multiple_choice<I, S>(
        id: u64,
        text: impl Into<String>,
        options: I,
        correct_answer: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            options: Some(options.into_iter().map(Into::into).collect()),
            correct_answer: correct_answer.into(),
            hint: None,
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, text: impl Into<String>, link: Option<String>) -> Self {
        self.hint = Some(Hint {
            text: text.into(),
            link,
        });
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        if self.options.is_some() {
            QuestionKind::MultipleChoice
        } else {
            QuestionKind::FreeText
        }
    }

    #[must_use]
    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    /// Exact, case-sensitive comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }

    /// Resolve a 1-based option number to its literal text.
    ///
    /// Returns `None` for free-text questions or out-of-range choices.
    #[must_use]
    pub fn option_by_number(&self, number: usize) -> Option<&str> {
        let options = self.options.as_ref()?;
        number
            .checked_sub(1)
            .and_then(|idx| options.get(idx))
            .map(String::as_str)
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Shape of a question-set document: `{ "title"?: ..., "questions": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            title: None,
            questions,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
