//! Weighted frequency accumulator.

use std::collections::HashMap;
use std::hash::Hash;

/// Accumulates real-valued weights per token.
///
/// Tokens remember their first-insertion position, which breaks ties in
/// [`FrequencyModel::max_token`] and fixes the order of [`FrequencyModel::sorted`].
#[derive(Debug, Clone)]
pub struct FrequencyModel<T> {
    index: HashMap<T, usize>,
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T> Default for FrequencyModel<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            total: 0.0,
        }
    }
}

impl<T: Eq + Hash + Clone> FrequencyModel<T> {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the running total for `token`.
    pub fn add(&mut self, token: T, weight: f64) {
        self.total += weight;
        match self.index.get(&token) {
            Some(&slot) => self.entries[slot].1 += weight,
            None => {
                self.index.insert(token.clone(), self.entries.len());
                self.entries.push((token, weight));
            }
        }
    }

    /// Accumulated weight for `token`, zero if never seen.
    pub fn frequency(&self, token: &T) -> f64 {
        self.index.get(token).map_or(0.0, |&slot| self.entries[slot].1)
    }

    /// Token with the largest weight; ties go to the first inserted.
    pub fn max_token(&self) -> Option<&T> {
        let mut best: Option<&(T, f64)> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(token, _)| token)
    }

    /// Sum of all weights added.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of distinct tokens.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens by descending weight; equal weights keep insertion order.
    pub fn sorted(&self) -> Vec<(&T, f64)> {
        let mut sorted: Vec<(&T, f64)> = self.entries.iter().map(|(t, w)| (t, *w)).collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
        sorted
    }

    /// Fold another model into this one. Tokens new to `self` are appended in
    /// `other`'s insertion order.
    pub fn merge(&mut self, other: FrequencyModel<T>) {
        for (token, weight) in other.entries {
            self.add(token, weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_weights() {
        let mut model = FrequencyModel::new();
        model.add("a", 1.5);
        model.add("b", 2.0);
        model.add("a", 1.0);

        assert_eq!(model.frequency(&"a"), 2.5);
        assert_eq!(model.frequency(&"c"), 0.0);
        assert_eq!(model.total(), 4.5);
        assert_eq!(model.distinct(), 2);
        assert_eq!(model.max_token(), Some(&"a"));
    }

    #[test]
    fn test_ties_go_to_first_inserted() {
        let mut model = FrequencyModel::new();
        model.add("x", 3.0);
        model.add("y", 3.0);
        model.add("first", 0.0);
        model.add("first", 4.0);
        model.add("x", 1.0);

        // "first" reached 4.0 before "x" did, but "x" was inserted earlier
        assert_eq!(model.max_token(), Some(&"x"));
        let order: Vec<&str> = model.sorted().into_iter().map(|(t, _)| *t).collect();
        assert_eq!(order, vec!["x", "first", "y"]);
    }

    #[test]
    fn test_empty_model() {
        let model: FrequencyModel<u32> = FrequencyModel::new();
        assert!(model.is_empty());
        assert_eq!(model.max_token(), None);
    }

    #[test]
    fn test_merge_matches_single_model() {
        let mut left = FrequencyModel::new();
        left.add(1, 2.0);
        left.add(2, 1.0);
        let mut right = FrequencyModel::new();
        right.add(2, 4.0);
        right.add(3, 0.5);

        left.merge(right);

        assert_eq!(left.frequency(&1), 2.0);
        assert_eq!(left.frequency(&2), 5.0);
        assert_eq!(left.frequency(&3), 0.5);
        assert_eq!(left.total(), 7.5);
        assert_eq!(left.max_token(), Some(&2));
    }
}
