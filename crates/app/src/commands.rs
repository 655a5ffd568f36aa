//! Parsing of lines typed at the interactive quiz prompt.

use std::fmt;

/// One user action at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    List,
    Select(String),
    Shuffle(bool),
    Timer(Option<u32>),
    Start,
    Answer(String),
    Next,
    Previous,
    Hint,
    Submit,
    Save,
    Review,
    Back,
    Restart,
    Home,
    Stats,
    ClearStats,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidArgument { command: &'static str, raw: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Empty => write!(f, "type a command, or `help`"),
            InputError::Unknown(word) => write!(f, "unknown command `{word}`; try `help`"),
            InputError::MissingArgument(command) => write!(f, "`{command}` needs a value"),
            InputError::InvalidArgument { command, raw } => {
                write!(f, "`{raw}` is not a valid value for `{command}`")
            }
        }
    }
}

impl std::error::Error for InputError {}

impl Input {
    /// Parse one line.
    ///
    /// While answering, anything that does not start with `:` is taken
    /// verbatim as the answer to the current question. Elsewhere the leading
    /// `:` is optional.
    pub fn parse(line: &str, answering: bool) -> Result<Self, InputError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if answering && !line.trim_start().starts_with(':') {
            return if line.trim().is_empty() {
                Err(InputError::Empty)
            } else {
                Ok(Self::Answer(line.to_owned()))
            };
        }

        let line = line.trim();
        let line = line.strip_prefix(':').unwrap_or(line).trim_start();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(InputError::Empty),
            "list" | "ls" | "sets" => Ok(Self::List),
            "select" | "open" => {
                if rest.is_empty() {
                    Err(InputError::MissingArgument("select"))
                } else {
                    Ok(Self::Select(rest.to_owned()))
                }
            }
            "shuffle" => match rest.to_ascii_lowercase().as_str() {
                "" | "on" | "yes" => Ok(Self::Shuffle(true)),
                "off" | "no" => Ok(Self::Shuffle(false)),
                _ => Err(InputError::InvalidArgument {
                    command: "shuffle",
                    raw: rest.to_owned(),
                }),
            },
            "timer" => match rest.to_ascii_lowercase().as_str() {
                "" => Err(InputError::MissingArgument("timer")),
                "off" | "none" => Ok(Self::Timer(None)),
                value => value.parse().map(|m| Self::Timer(Some(m))).map_err(|_| {
                    InputError::InvalidArgument {
                        command: "timer",
                        raw: rest.to_owned(),
                    }
                }),
            },
            "start" | "go" => Ok(Self::Start),
            "answer" | "a" => {
                if rest.is_empty() {
                    Err(InputError::MissingArgument("answer"))
                } else {
                    Ok(Self::Answer(rest.to_owned()))
                }
            }
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" | "p" => Ok(Self::Previous),
            "hint" => Ok(Self::Hint),
            "submit" => Ok(Self::Submit),
            "save" => Ok(Self::Save),
            "review" => Ok(Self::Review),
            "back" => Ok(Self::Back),
            "restart" | "retry" => Ok(Self::Restart),
            "home" => Ok(Self::Home),
            "stats" => Ok(Self::Stats),
            "clear-stats" => Ok(Self::ClearStats),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(InputError::Unknown(word.to_owned())),
        }
    }
}

pub const HELP: &str = "\
Home:         list | select <id or number> | stats | clear-stats | quit
Configuring:  shuffle on|off | timer <minutes>|off | start | home
Answering:    type an answer (or an option number) | :next | :prev | :hint | :submit | :home
Results:      review | back | restart | save | home";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answering_takes_plain_text_verbatim() {
        assert_eq!(
            Input::parse("  kubectl get pods\n", true),
            Ok(Input::Answer("  kubectl get pods".into()))
        );
        assert_eq!(Input::parse("next", true), Ok(Input::Answer("next".into())));
        assert_eq!(Input::parse(":next", true), Ok(Input::Next));
        assert_eq!(Input::parse(" :SUBMIT ", true), Ok(Input::Submit));
        assert_eq!(Input::parse("   ", true), Err(InputError::Empty));
    }

    #[test]
    fn commands_outside_answering() {
        assert_eq!(Input::parse("select cka", false), Ok(Input::Select("cka".into())));
        assert_eq!(Input::parse(":select 2", false), Ok(Input::Select("2".into())));
        assert_eq!(Input::parse("shuffle", false), Ok(Input::Shuffle(true)));
        assert_eq!(Input::parse("shuffle off", false), Ok(Input::Shuffle(false)));
        assert_eq!(Input::parse("timer 10", false), Ok(Input::Timer(Some(10))));
        assert_eq!(Input::parse("timer off", false), Ok(Input::Timer(None)));
        assert_eq!(Input::parse("Review", false), Ok(Input::Review));
        assert_eq!(Input::parse("q", false), Ok(Input::Quit));
    }

    #[test]
    fn bad_commands_are_reported() {
        assert_eq!(Input::parse("", false), Err(InputError::Empty));
        assert_eq!(
            Input::parse("dance", false),
            Err(InputError::Unknown("dance".into()))
        );
        assert_eq!(
            Input::parse("select", false),
            Err(InputError::MissingArgument("select"))
        );
        assert_eq!(
            Input::parse("timer soon", false),
            Err(InputError::InvalidArgument {
                command: "timer",
                raw: "soon".into()
            })
        );
    }

    #[test]
    fn explicit_answer_command_works_everywhere() {
        assert_eq!(Input::parse(":a Paris", true), Ok(Input::Answer("Paris".into())));
        assert_eq!(
            Input::parse("answer", false),
            Err(InputError::MissingArgument("answer"))
        );
    }
}
