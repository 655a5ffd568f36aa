//! Plain-text rendering of quiz screens.

use quiz_core::model::{QuestionKind, QuizResult};
use services::statistics::format_two_decimals;
use services::{LoadStatus, QuizPhase, QuizSession, ReviewItem, StatisticsSummary};
use storage::repository::QuestionSetEntry;

/// `mm:ss` for a countdown.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Whether a tick is worth printing: whole minutes, half a minute, and the
/// final ten seconds.
pub fn timer_notice(remaining: u32) -> Option<String> {
    if remaining > 0 && (remaining % 60 == 0 || remaining == 30 || remaining <= 10) {
        Some(format!("⏱ {} left", format_clock(remaining)))
    } else {
        None
    }
}

pub fn catalog(entries: &[QuestionSetEntry]) -> String {
    if entries.is_empty() {
        return "No question sets found.".into();
    }
    let mut lines = vec!["Question sets:".to_owned()];
    lines.extend(entries.iter().enumerate().map(|(idx, entry)| {
        if entry.display_name == entry.id.as_str() {
            format!("  {}) {}", idx + 1, entry.id)
        } else {
            format!("  {}) {} ({})", idx + 1, entry.display_name, entry.id)
        }
    }));
    lines.push("Pick one with `select <number>`.".to_owned());
    lines.join("\n")
}

/// The screen for the session's current phase.
pub fn screen(session: &QuizSession) -> String {
    match session.phase() {
        QuizPhase::Idle => "Home. `list` shows the question sets.".into(),
        QuizPhase::Configuring => configuring(session),
        QuizPhase::Answering => question(session),
        QuizPhase::Scored => score(session),
        QuizPhase::Reviewing => review(&session.review_items()),
    }
}

fn configuring(session: &QuizSession) -> String {
    let set = session.set_id().map_or("", |id| id.as_str());
    let config = session.config();
    let status = match session.load_status() {
        None | Some(LoadStatus::Pending) => "loading...".to_owned(),
        Some(LoadStatus::Ready { questions: 0 }) => "this set has no questions".to_owned(),
        Some(LoadStatus::Ready { questions }) => format!("{questions} questions ready"),
        Some(LoadStatus::Failed(reason)) => format!("could not load: {reason}"),
    };
    let timer = config
        .timer_minutes()
        .map_or_else(|| "off".to_owned(), |m| format!("{m} min"));
    format!(
        "Set `{set}`: {status}\nShuffle: {}  Timer: {timer}\n`start` to begin, `home` to go back.",
        if config.shuffle() { "on" } else { "off" },
    )
}

fn question(session: &QuizSession) -> String {
    let Some(question) = session.current_question() else {
        return String::new();
    };
    let progress = session.progress();
    let mut header = format!("Question {}/{}", progress.current + 1, progress.total);
    if let Some(remaining) = progress.remaining_seconds {
        header.push_str(&format!("  [{}]", format_clock(remaining)));
    }
    let mut lines = vec![header, question.text.clone()];

    if question.kind() == QuestionKind::MultipleChoice {
        lines.extend(
            question
                .options
                .iter()
                .flatten()
                .enumerate()
                .map(|(idx, option)| format!("  {}) {option}", idx + 1)),
        );
    }
    if session.hint_visible() {
        if let Some(hint) = &question.hint {
            lines.push(format!("Hint: {}", hint.text));
            if let Some(link) = &hint.link {
                lines.push(format!("      {link}"));
            }
        }
    }
    if let Some(answer) = session.current_answer() {
        lines.push(format!("Your answer: {answer}"));
    }

    let mut controls = vec![];
    if !progress.is_first {
        controls.push(":prev");
    }
    if !progress.is_last {
        controls.push(":next");
    }
    if question.has_hint() {
        controls.push(":hint");
    }
    if progress.is_last {
        controls.push(":submit");
    }
    lines.push(controls.join("  "));
    lines.join("\n")
}

fn score(session: &QuizSession) -> String {
    let total = session.questions().len();
    let correct = session.score().unwrap_or(0);
    format!("Score: {correct}/{total}\n`review`, `restart`, or `home`.")
}

pub fn review(items: &[ReviewItem]) -> String {
    let mut lines = vec![];
    for item in items {
        let mark = if item.is_correct { "✓" } else { "✗" };
        lines.push(format!("{mark} {}. {}", item.number, item.question));
        lines.push(format!(
            "    your answer: {}",
            item.given.as_deref().unwrap_or("(none)")
        ));
        if !item.is_correct {
            lines.push(format!("    correct:     {}", item.correct_answer));
        }
        if let Some(explanation) = &item.explanation {
            lines.push(format!("    {explanation}"));
        }
    }
    lines.push("`back` to the score.".to_owned());
    lines.join("\n")
}

pub fn result_line(result: &QuizResult) -> String {
    format!(
        "{} - Score: {}/{} ({})",
        result.set_name(),
        result.score(),
        result.total_questions(),
        result.timestamp().format("%Y-%m-%d %H:%M UTC")
    )
}

pub fn statistics(summary: &StatisticsSummary) -> String {
    let mut lines = vec![
        "Quiz statistics".to_owned(),
        format!(
            "Average score:   {}",
            format_two_decimals(summary.average_score)
        ),
        format!(
            "Completion rate: {}%",
            format_two_decimals(summary.completion_rate)
        ),
        format!("Total attempts:  {}", summary.total_attempts),
    ];

    if !summary.by_set.is_empty() {
        lines.push(String::new());
        lines.push("By set:".to_owned());
        lines.extend(summary.by_set.iter().map(|set| {
            format!(
                "  {:<16} {} attempts, avg {}, best {}",
                set.set_name,
                set.attempts,
                format_two_decimals(set.average_score),
                set.best_score
            )
        }));
    }

    lines.push(String::new());
    lines.push("Recent results:".to_owned());
    if summary.recent.is_empty() {
        lines.push("  No results yet.".to_owned());
    } else {
        lines.extend(summary.recent.iter().map(|r| format!("  {}", result_line(r))));
    }
    lines.join("\n")
}
