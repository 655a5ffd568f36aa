use std::collections::HashMap;

/// Sparse answers keyed by 0-based question index.
///
/// Only indices the user actually answered are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    entries: HashMap<usize, String>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any previous answer for `index`.
    pub fn insert(&mut self, index: usize, answer: impl Into<String>) {
        self.entries.insert(index, answer.into());
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (usize, S)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (index, answer) in iter {
            map.insert(index, answer);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_previous_answer() {
        let mut answers = AnswerMap::new();
        answers.insert(0, "3");
        answers.insert(0, "4");
        assert_eq!(answers.get(0), Some("4"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn lookups_are_sparse() {
        let answers: AnswerMap = [(3, "x")].into_iter().collect();
        assert_eq!(answers.get(0), None);
        assert_eq!(answers.get(3), Some("x"));
    }
}
