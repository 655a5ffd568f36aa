use std::num::NonZeroU32;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionConfigError {
    #[error("timer minutes must be > 0")]
    ZeroTimerMinutes,

    #[error("timer of {0} minutes is too long")]
    TimerTooLong(u32),
}

/// Upper bound keeps `minutes * 60` inside `u32`.
pub const MAX_TIMER_MINUTES: u32 = 24 * 60;

/// Options chosen before a quiz starts; frozen while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    shuffle: bool,
    timer_minutes: Option<NonZeroU32>,
}

impl SessionConfig {
    /// Build a configuration.
    ///
    /// # Errors
    ///
    /// Returns `SessionConfigError::ZeroTimerMinutes` for `Some(0)` and
    /// `SessionConfigError::TimerTooLong` beyond `MAX_TIMER_MINUTES`.
    pub fn configure(shuffle: bool, timer_minutes: Option<u32>) -> Result<Self, SessionConfigError> {
        let timer_minutes = match timer_minutes {
            None => None,
            Some(minutes) if minutes > MAX_TIMER_MINUTES => {
                return Err(SessionConfigError::TimerTooLong(minutes));
            }
            Some(minutes) => {
                Some(NonZeroU32::new(minutes).ok_or(SessionConfigError::ZeroTimerMinutes)?)
            }
        };
        Ok(Self {
            shuffle,
            timer_minutes,
        })
    }

    #[must_use]
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    #[must_use]
    pub fn timer_minutes(&self) -> Option<u32> {
        self.timer_minutes.map(NonZeroU32::get)
    }

    /// Countdown length in seconds, if a timer is configured.
    #[must_use]
    pub fn timer_seconds(&self) -> Option<u32> {
        self.timer_minutes().map(|m| m * 60)
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_timer_and_no_shuffle() {
        let config = SessionConfig::default();
        assert!(!config.shuffle());
        assert_eq!(config.timer_seconds(), None);
    }

    #[test]
    fn timer_minutes_convert_to_seconds() {
        let config = SessionConfig::configure(true, Some(2)).unwrap();
        assert!(config.shuffle());
        assert_eq!(config.timer_minutes(), Some(2));
        assert_eq!(config.timer_seconds(), Some(120));
    }

    #[test]
    fn zero_and_oversized_timers_are_rejected() {
        assert_eq!(
            SessionConfig::configure(false, Some(0)),
            Err(SessionConfigError::ZeroTimerMinutes)
        );
        assert_eq!(
            SessionConfig::configure(false, Some(MAX_TIMER_MINUTES + 1)),
            Err(SessionConfigError::TimerTooLong(MAX_TIMER_MINUTES + 1))
        );
    }
}
