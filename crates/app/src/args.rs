use std::fmt;
use std::path::PathBuf;

use quiz_core::model::SessionConfig;
use services::statistics::DEFAULT_RECENT;

pub const DEFAULT_DB_FILE: &str = "quiz.sqlite3";
pub const DEFAULT_SETS_DIR: &str = "questions";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidTimer { raw: String },
    InvalidRecent { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimer { raw } => write!(f, "invalid --timer value: {raw}"),
            ArgsError::InvalidRecent { raw } => write!(f, "invalid --recent value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Sets,
    Stats,
    ClearStats,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "sets" => Some(Self::Sets),
            "stats" => Some(Self::Stats),
            "clear-stats" => Some(Self::ClearStats),
            _ => None,
        }
    }
}

/// Settings read from the process environment before flags are applied.
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub db_url: Option<String>,
    pub sets_dir: Option<String>,
}

impl Env {
    pub fn from_process() -> Self {
        Self {
            db_url: std::env::var("QUIZ_DB_URL").ok(),
            sets_dir: std::env::var("QUIZ_SETS_DIR").ok(),
        }
    }
}

/// What `parse` found on the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Run(Command, Args),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub db_url: String,
    pub sets_dir: PathBuf,
    pub config: SessionConfig,
    pub recent: usize,
    pub assume_yes: bool,
}

impl Args {
    fn from_env(env: &Env) -> Self {
        Self {
            db_url: env
                .db_url
                .clone()
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| normalize_sqlite_url(DEFAULT_DB_FILE.into()), normalize_sqlite_url),
            sets_dir: env
                .sets_dir
                .clone()
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_SETS_DIR), PathBuf::from),
            config: SessionConfig::default(),
            recent: DEFAULT_RECENT,
            assume_yes: false,
        }
    }
}

/// Parse `argv` (without the program name).
///
/// With no subcommand, or when the first argument is a flag, `play` is assumed.
pub fn parse(argv: Vec<String>, env: &Env) -> Result<Invocation, ArgsError> {
    let mut iter = argv.into_iter().peekable();
    let first = iter.peek().cloned();
    let cmd = match first.as_deref() {
        None => Command::Play,
        Some("--help" | "-h" | "help") => return Ok(Invocation::Help),
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => {
            let cmd = Command::from_arg(first)
                .ok_or_else(|| ArgsError::UnknownCommand(first.to_owned()))?;
            iter.next();
            cmd
        }
    };

    let mut args = Args::from_env(env);
    let mut shuffle = false;
    let mut timer_minutes = None;

    while let Some(arg) = iter.next() {
        match (arg.as_str(), cmd) {
            ("--help" | "-h", _) => return Ok(Invocation::Help),
            ("--db", _) => {
                let value = require_value(&mut iter, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                args.db_url = normalize_sqlite_url(value);
            }
            ("--sets", _) => {
                args.sets_dir = PathBuf::from(require_value(&mut iter, "--sets")?);
            }
            ("--shuffle", Command::Play) => shuffle = true,
            ("--timer", Command::Play) => {
                let value = require_value(&mut iter, "--timer")?;
                let minutes: u32 = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidTimer { raw: value.clone() })?;
                timer_minutes = Some(minutes);
                // Reject zero and oversized values up front.
                SessionConfig::configure(false, timer_minutes)
                    .map_err(|_| ArgsError::InvalidTimer { raw: value })?;
            }
            ("--recent", Command::Stats) => {
                let value = require_value(&mut iter, "--recent")?;
                args.recent = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidRecent { raw: value.clone() })?;
            }
            ("--yes" | "-y", Command::ClearStats) => args.assume_yes = true,
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    args.config = SessionConfig::configure(shuffle, timer_minutes)
        .map_err(|e| ArgsError::InvalidTimer { raw: e.to_string() })?;
    Ok(Invocation::Run(cmd, args))
}

/// Turn relative paths and `sqlite:` shorthands into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [play]       [--db <sqlite_url>] [--sets <dir>] [--shuffle] [--timer <minutes>]");
    eprintln!("  quiz sets         [--sets <dir>]");
    eprintln!("  quiz stats        [--db <sqlite_url>] [--recent <n>]");
    eprintln!("  quiz clear-stats  [--db <sqlite_url>] [--yes]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://<cwd>/{DEFAULT_DB_FILE}");
    eprintln!("  --sets {DEFAULT_SETS_DIR}");
    eprintln!("  --recent {DEFAULT_RECENT}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_SETS_DIR, RUST_LOG");
}
