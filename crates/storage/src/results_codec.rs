//! Serialized form of the results log: one JSON list under a single key.

use log::warn;
use quiz_core::model::QuizResult;

use crate::repository::StorageError;

/// Well-known key holding the serialized results log.
pub const RESULTS_KEY: &str = "quizResults";

/// Decode a stored results value.
///
/// A missing value, an empty string, or anything that does not parse as a list
/// of results decodes to an empty log.
#[must_use]
pub fn decode_results(raw: Option<&str>) -> Vec<QuizResult> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<QuizResult>>(raw) {
        Ok(results) => results,
        Err(err) => {
            warn!("ignoring corrupted {RESULTS_KEY} value: {err}");
            Vec::new()
        }
    }
}

/// Encode the full log for a replace-on-write store.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_results(results: &[QuizResult]) -> Result<String, StorageError> {
    serde_json::to_string(results).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn absent_and_blank_values_are_empty() {
        assert!(decode_results(None).is_empty());
        assert!(decode_results(Some("  ")).is_empty());
    }

    #[test]
    fn malformed_values_are_empty() {
        assert!(decode_results(Some("{\"setName\":")).is_empty());
        assert!(decode_results(Some("42")).is_empty());
        // score above total fails validation for the whole value
        let bad = r#"[{"setName":"x","score":3,"totalQuestions":1,"timestamp":"2024-01-01T00:00:00Z"}]"#;
        assert!(decode_results(Some(bad)).is_empty());
    }

    #[test]
    fn encoded_log_decodes_in_order() {
        let first = QuizResult::new("cka", 1, 2, fixed_now()).unwrap();
        let second = QuizResult::new("aws", 2, 2, fixed_now()).unwrap();
        let raw = encode_results(&[first.clone(), second.clone()]).unwrap();
        assert!(raw.starts_with('['));
        assert_eq!(decode_results(Some(&raw)), vec![first, second]);
    }
}
