//! Occurrence, sample and wiring types.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::link::NodeIndex;

/// Host-graph node indices, one per motif slot.
pub type Occurrence = Vec<NodeIndex>;

/// Sorted slot indices of one occurrence that keep links to the outside.
pub type Wiring = Vec<usize>;

/// A sampled connected node sequence with its importance weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    indices: Vec<NodeIndex>,
    inv_probability: f64,
}

impl SampleResult {
    /// Create a sample result.
    pub fn new(indices: Vec<NodeIndex>, inv_probability: f64) -> Self {
        Self {
            indices,
            inv_probability,
        }
    }

    /// The sampled node indices, in generation order.
    pub fn indices(&self) -> &[NodeIndex] {
        &self.indices
    }

    /// Consume the result, returning the indices.
    pub fn into_indices(self) -> Vec<NodeIndex> {
        self.indices
    }

    /// Reciprocal of the probability that the sampler generated this sequence.
    pub fn inv_probability(&self) -> f64 {
        self.inv_probability
    }

    /// Number of nodes in the sample.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the sample is empty.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Number of nodes shared between a taken set and an occurrence.
pub fn overlap(taken: &HashSet<NodeIndex>, occurrence: &[NodeIndex]) -> usize {
    occurrence.iter().filter(|n| taken.contains(n)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_counts_shared_nodes() {
        let taken: HashSet<NodeIndex> = [1, 2, 3].into_iter().collect();
        assert_eq!(overlap(&taken, &[3, 4, 5]), 1);
        assert_eq!(overlap(&taken, &[7, 8]), 0);
        assert_eq!(overlap(&taken, &[1, 2, 3]), 3);
    }

    #[test]
    fn test_sample_accessors() {
        let sample = SampleResult::new(vec![4, 2, 9], 12.0);
        assert_eq!(sample.len(), 3);
        assert_eq!(sample.indices(), &[4, 2, 9]);
        assert_eq!(sample.inv_probability(), 12.0);
        assert_eq!(sample.into_indices(), vec![4, 2, 9]);
    }
}
