use std::error::Error;

use log::debug;
use quiz_core::model::{QuestionKind, QuestionSetId, SessionConfig};
use services::statistics::DEFAULT_RECENT;
use services::{AppServices, QuizController, QuizError, QuizPhase, QuizUpdate};
use storage::repository::QuestionSetEntry;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{HELP, Input};
use crate::render;

/// Interactive quiz on stdin/stdout until `quit` or end of input.
pub async fn run(services: &AppServices, config: SessionConfig) -> Result<(), Box<dyn Error>> {
    let mut quiz = services.quiz_controller(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut catalog = services.loader().catalog().await?;

    let mut confirming_clear = false;

    println!("{}", render::catalog(&catalog));
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if std::mem::take(&mut confirming_clear) {
                    if is_yes(&line) {
                        services.statistics().clear().await?;
                        println!("Statistics cleared.");
                    } else {
                        println!("Statistics kept.");
                    }
                    continue;
                }
                let answering = quiz.session().phase() == QuizPhase::Answering;
                match Input::parse(&line, answering) {
                    Ok(Input::Quit) => break,
                    Ok(Input::ClearStats) => {
                        if can_clear_stats(quiz.session().phase()) {
                            println!("Clear all statistics? [y/N]");
                            confirming_clear = true;
                        } else {
                            println!("Finish or leave the quiz before clearing statistics.");
                        }
                    }
                    Ok(input) => {
                        apply(&mut quiz, services, &mut catalog, input).await?;
                    }
                    Err(err) => println!("{err}"),
                }
            }
            Some(event) = quiz.next_event() => {
                match quiz.handle_event(event).await {
                    Ok(QuizUpdate::Loaded { applied: true }) => {
                        println!("{}", render::screen(quiz.session()));
                    }
                    Ok(QuizUpdate::Tick { remaining_seconds }) => {
                        if let Some(notice) = render::timer_notice(remaining_seconds) {
                            println!("{notice}");
                        }
                    }
                    Ok(QuizUpdate::Submitted(_)) => {
                        println!("Time is up!");
                        println!("{}", render::screen(quiz.session()));
                    }
                    Ok(_) => {}
                    Err(err) => report(&err),
                }
            }
        }
    }

    Ok(())
}

async fn apply(
    quiz: &mut QuizController,
    services: &AppServices,
    catalog: &mut Vec<QuestionSetEntry>,
    input: Input,
) -> Result<(), Box<dyn Error>> {
    let outcome = match input {
        Input::Help => {
            println!("{HELP}");
            return Ok(());
        }
        Input::List => {
            *catalog = services.loader().catalog().await?;
            println!("{}", render::catalog(catalog));
            return Ok(());
        }
        Input::Stats => {
            let summary = services.statistics().summary(DEFAULT_RECENT).await?;
            println!("{}", render::statistics(&summary));
            return Ok(());
        }
        Input::Select(raw) => match resolve_set(&raw, catalog) {
            Some(id) => {
                quiz.select_set(id);
                Ok(())
            }
            None => {
                println!("No question set `{raw}`.");
                return Ok(());
            }
        },
        Input::Shuffle(on) => quiz.set_shuffle(on),
        Input::Timer(minutes) => quiz.set_timer_minutes(minutes),
        Input::Start => quiz.start(),
        Input::Answer(raw) => {
            let answer = resolve_answer(quiz, raw);
            quiz.record_answer(answer)
        }
        Input::Next => quiz.go_next().map(drop),
        Input::Previous => quiz.go_previous().map(drop),
        Input::Hint => quiz.toggle_hint().map(drop),
        Input::Submit => quiz.submit().await.map(drop),
        Input::Save => match quiz.retry_save().await {
            Ok(true) => {
                println!("Result saved.");
                return Ok(());
            }
            Ok(false) => {
                println!("Nothing to save.");
                return Ok(());
            }
            Err(err) => Err(err),
        },
        Input::Review => quiz.review(),
        Input::Back => quiz.back_to_results(),
        Input::Restart => quiz.restart(),
        Input::Home => {
            quiz.back_to_home();
            Ok(())
        }
        Input::ClearStats | Input::Quit => return Ok(()),
    };

    match outcome {
        Ok(()) => println!("{}", render::screen(quiz.session())),
        Err(err) => report(&err),
    }
    Ok(())
}

fn report(err: &QuizError) {
    match err {
        QuizError::InvalidTransition { .. } => {
            debug!("ignored: {err}");
            println!("That is not available right now; try `help`.");
        }
        QuizError::Results(_) => println!("{err}; `save` to try again."),
        other => println!("{other}"),
    }
}

/// A set id, or a 1-based position in the last printed catalog.
fn resolve_set(raw: &str, catalog: &[QuestionSetEntry]) -> Option<QuestionSetId> {
    if let Ok(number) = raw.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|idx| catalog.get(idx))
            .map(|entry| entry.id.clone());
    }
    QuestionSetId::new(raw).ok()
}

/// On multiple-choice questions an option number stands for the option text.
fn resolve_answer(quiz: &QuizController, raw: String) -> String {
    let Some(question) = quiz.session().current_question() else {
        return raw;
    };
    if question.kind() != QuestionKind::MultipleChoice {
        return raw;
    }
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| question.option_by_number(n))
        .map_or(raw, str::to_owned)
}

/// Clearing needs a confirmation line, which would otherwise be read as an
/// answer mid-quiz.
fn can_clear_stats(phase: QuizPhase) -> bool {
    phase != QuizPhase::Answering
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<QuestionSetEntry> {
        vec![
            QuestionSetEntry::new(QuestionSetId::new("aws").unwrap(), None),
            QuestionSetEntry::new(QuestionSetId::new("cka").unwrap(), None),
        ]
    }

    #[test]
    fn sets_resolve_by_number_or_id() {
        assert_eq!(resolve_set("2", &catalog()).unwrap().as_str(), "cka");
        assert_eq!(resolve_set("aws", &catalog()).unwrap().as_str(), "aws");
        assert_eq!(resolve_set("custom", &catalog()).unwrap().as_str(), "custom");
        assert!(resolve_set("0", &catalog()).is_none());
        assert!(resolve_set("3", &catalog()).is_none());
        assert!(resolve_set("../etc", &catalog()).is_none());
    }

    #[test]
    fn clearing_is_refused_while_answering() {
        assert!(can_clear_stats(QuizPhase::Idle));
        assert!(can_clear_stats(QuizPhase::Configuring));
        assert!(can_clear_stats(QuizPhase::Scored));
        assert!(can_clear_stats(QuizPhase::Reviewing));
        assert!(!can_clear_stats(QuizPhase::Answering));
    }

    #[test]
    fn confirmation_accepts_only_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
