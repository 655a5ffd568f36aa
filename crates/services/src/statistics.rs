use std::collections::BTreeMap;

use quiz_core::model::QuizResult;

use crate::error::ResultsError;
use crate::results_service::ResultsLogService;

/// Number of attempts shown in the recent list by default.
pub const DEFAULT_RECENT: usize = 5;

/// Attempts and scores for a single question set.
#[derive(Debug, Clone, PartialEq)]
pub struct SetBreakdown {
    pub set_name: String,
    pub attempts: usize,
    pub average_score: f64,
    pub best_score: u32,
}

/// Everything the statistics screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsSummary {
    pub total_attempts: usize,
    pub average_score: f64,
    /// Percentage of attempts that were scored.
    pub completion_rate: f64,
    /// Newest first.
    pub recent: Vec<QuizResult>,
    pub by_set: Vec<SetBreakdown>,
}

impl StatisticsSummary {
    /// Derive the summary from a log in stored (oldest-first) order.
    #[must_use]
    pub fn from_results(results: &[QuizResult], recent: usize) -> Self {
        Self {
            total_attempts: results.len(),
            average_score: average_score(results),
            completion_rate: completion_rate(results),
            recent: most_recent(results, recent).iter().rev().cloned().collect(),
            by_set: breakdown_by_set(results),
        }
    }
}

/// Read-only statistics over the results log, plus the explicit clear.
#[derive(Clone)]
pub struct StatisticsReporter {
    results: ResultsLogService,
}

impl StatisticsReporter {
    #[must_use]
    pub fn new(results: ResultsLogService) -> Self {
        Self { results }
    }

    /// Summarize the stored log.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Storage` if the log cannot be read.
    pub async fn summary(&self, recent: usize) -> Result<StatisticsSummary, ResultsError> {
        let results = self.results.read_all().await?;
        Ok(StatisticsSummary::from_results(&results, recent))
    }

    /// Remove every stored attempt.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Storage` if the log cannot be removed.
    pub async fn clear(&self) -> Result<(), ResultsError> {
        self.results.clear().await
    }
}

//
// ─── DERIVATIONS ───────────────────────────────────────────────────────────────
//

/// Mean of raw scores; `0.0` for an empty log.
#[must_use]
pub fn average_score(results: &[QuizResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results.iter().map(|r| f64::from(r.score())).sum();
    total / results.len() as f64
}

/// Share of attempts with a recorded score, as a percentage.
///
/// Every decoded result carries a score, so a non-empty log reports 100.
#[must_use]
pub fn completion_rate(results: &[QuizResult]) -> f64 {
    if results.is_empty() {
        0.0
    } else {
        100.0
    }
}

/// The last `n` entries of the log, in stored order.
#[must_use]
pub fn most_recent(results: &[QuizResult], n: usize) -> &[QuizResult] {
    &results[results.len().saturating_sub(n)..]
}

/// Per-set attempts, average, and best score, ordered by set name.
#[must_use]
pub fn breakdown_by_set(results: &[QuizResult]) -> Vec<SetBreakdown> {
    let mut grouped: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for result in results {
        grouped
            .entry(result.set_name())
            .or_default()
            .push(result.score());
    }

    grouped
        .into_iter()
        .map(|(set_name, scores)| {
            let total: f64 = scores.iter().copied().map(f64::from).sum();
            SetBreakdown {
                set_name: set_name.to_owned(),
                attempts: scores.len(),
                average_score: total / scores.len() as f64,
                best_score: scores.iter().copied().max().unwrap_or(0),
            }
        })
        .collect()
}

/// Two-decimal rendering used for averages and rates.
#[must_use]
pub fn format_two_decimals(value: f64) -> String {
    format!("{value:.2}")
}
