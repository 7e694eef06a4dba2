//! Random connected subgraph sampler.
//!
//! Grows an occurrence from a uniformly chosen seed node by repeatedly adding
//! a uniformly chosen node from the frontier (eligible neighbours of the nodes
//! collected so far, in either link direction). Each sample carries the
//! inverse of the probability of the exact sequence drawn:
//!
//! ```text
//! inv_probability = eligible_seeds * |frontier_1| * ... * |frontier_{k-1}|
//! ```
//!
//! Growth that runs out of eligible neighbours restarts from a fresh seed.

use std::collections::HashSet;

use rand::Rng;

use crate::store::GraphStore;
use crate::types::{NodeIndex, SampleResult};

/// Default number of restarts before a sample is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000;

/// Error type for sampling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    /// The host graph has no nodes.
    #[error("Cannot sample from an empty graph")]
    EmptyGraph,
    /// Requested size is zero or exceeds the nodes still available.
    #[error("Cannot sample {size} nodes; {available} eligible")]
    InvalidSize {
        /// Requested size.
        size: usize,
        /// Nodes not excluded.
        available: usize,
    },
    /// Every attempt ran out of eligible neighbours.
    #[error("Growth blocked after {attempts} attempts")]
    GrowthBlocked {
        /// Attempts made.
        attempts: usize,
    },
}

/// Sampler over a borrowed host graph.
#[derive(Debug)]
pub struct SubgraphSampler<'g, G: GraphStore + ?Sized> {
    graph: &'g G,
    max_attempts: usize,
}

impl<'g, G: GraphStore + ?Sized> SubgraphSampler<'g, G> {
    /// Create a sampler with the default attempt budget.
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set how many restarts are allowed per sample.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Draw one connected sequence of `size` nodes, none of them in `excluded`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        size: usize,
        excluded: &HashSet<NodeIndex>,
        rng: &mut R,
    ) -> Result<SampleResult, SampleError> {
        let n = self.graph.size();
        if n == 0 {
            return Err(SampleError::EmptyGraph);
        }

        let available = n - excluded.iter().filter(|&&node| node < n).count();
        if size == 0 || size > available {
            return Err(SampleError::InvalidSize { size, available });
        }

        // Dense exclusion lists make rejection sampling slow; enumerate instead.
        let seeds: Option<Vec<NodeIndex>> = if 2 * available < n {
            Some((0..n).filter(|node| !excluded.contains(node)).collect())
        } else {
            None
        };

        for attempt in 1..=self.max_attempts {
            let seed = match &seeds {
                Some(seeds) => seeds[rng.gen_range(0..seeds.len())],
                None => loop {
                    let node = rng.gen_range(0..n);
                    if !excluded.contains(&node) {
                        break node;
                    }
                },
            };

            if let Some((indices, weight)) = self.grow(seed, size, excluded, rng) {
                return Ok(SampleResult::new(indices, available as f64 * weight));
            }

            tracing::trace!(attempt, seed, size, "sample growth blocked, restarting");
        }

        Err(SampleError::GrowthBlocked {
            attempts: self.max_attempts,
        })
    }

    /// Grow from `seed`. Returns the sequence and the product of frontier
    /// sizes, or `None` if the frontier empties first.
    fn grow<R: Rng + ?Sized>(
        &self,
        seed: NodeIndex,
        size: usize,
        excluded: &HashSet<NodeIndex>,
        rng: &mut R,
    ) -> Option<(Vec<NodeIndex>, f64)> {
        let mut indices = Vec::with_capacity(size);
        let mut claimed: HashSet<NodeIndex> = HashSet::with_capacity(size * 4);
        let mut frontier: Vec<NodeIndex> = Vec::new();
        let mut weight = 1.0;

        let mut next = seed;
        loop {
            indices.push(next);
            claimed.insert(next);

            if indices.len() == size {
                return Some((indices, weight));
            }

            for neighbor in self.graph.neighbors(next) {
                if !excluded.contains(&neighbor) && claimed.insert(neighbor) {
                    frontier.push(neighbor);
                }
            }

            if frontier.is_empty() {
                return None;
            }

            weight *= frontier.len() as f64;
            next = frontier.swap_remove(rng.gen_range(0..frontier.len()));
        }
    }
}

/// Draw one sample with the default attempt budget.
pub fn sample_subgraph<G, R>(
    graph: &G,
    size: usize,
    excluded: &HashSet<NodeIndex>,
    rng: &mut R,
) -> Result<SampleResult, SampleError>
where
    G: GraphStore + ?Sized,
    R: Rng + ?Sized,
{
    SubgraphSampler::new(graph).sample(size, excluded, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{random, DiGraph, Undirected, UnGraph};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn graph_from(n: usize, links: &[(usize, usize)]) -> UnGraph {
        let mut graph = UnGraph::new();
        for _ in 0..n {
            graph.add_node(());
        }
        for &(a, b) in links {
            graph.connect(a, b);
        }
        graph
    }

    fn is_connected(graph: &UnGraph, nodes: &[usize]) -> bool {
        let set: HashSet<usize> = nodes.iter().copied().collect();
        let mut seen = HashSet::from([nodes[0]]);
        let mut stack = vec![nodes[0]];
        while let Some(node) = stack.pop() {
            for next in graph.neighbors(node) {
                if set.contains(&next) && seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        seen.len() == set.len()
    }

    // ───── Weights ─────

    #[test]
    fn test_triangle_inverse_probability() {
        let graph = graph_from(3, &[(0, 1), (1, 2), (2, 0)]);
        let mut rng = StdRng::seed_from_u64(3);

        let sample = sample_subgraph(&graph, 3, &HashSet::new(), &mut rng).unwrap();

        // 3 seeds, then 2 frontier choices, then 1
        assert_eq!(sample.inv_probability(), 6.0);
        assert_eq!(sample.len(), 3);
    }

    #[test]
    fn test_exclusions_reduce_seed_count() {
        let graph = graph_from(3, &[(0, 1), (1, 2), (2, 0)]);
        let excluded = HashSet::from([2]);
        let mut rng = StdRng::seed_from_u64(5);

        let sample = sample_subgraph(&graph, 2, &excluded, &mut rng).unwrap();

        assert_eq!(sample.inv_probability(), 2.0);
        assert!(!sample.indices().contains(&2));
    }

    #[test]
    fn test_follows_links_in_both_directions() {
        let mut graph = DiGraph::new();
        graph.add_node(());
        graph.add_node(());
        graph.connect(1, 0);
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..10 {
            let sample = sample_subgraph(&graph, 2, &HashSet::new(), &mut rng).unwrap();
            let mut nodes = sample.into_indices();
            nodes.sort();
            assert_eq!(nodes, vec![0, 1]);
        }
    }

    // ───── Failure Modes ─────

    #[test]
    fn test_empty_graph() {
        let graph: UnGraph = UnGraph::new();
        let err = sample_subgraph(&graph, 1, &HashSet::new(), &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, SampleError::EmptyGraph);
    }

    #[test]
    fn test_invalid_sizes() {
        let graph = graph_from(3, &[(0, 1)]);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            sample_subgraph(&graph, 0, &HashSet::new(), &mut rng).unwrap_err(),
            SampleError::InvalidSize { size: 0, available: 3 }
        );
        assert_eq!(
            sample_subgraph(&graph, 3, &HashSet::from([0]), &mut rng).unwrap_err(),
            SampleError::InvalidSize { size: 3, available: 2 }
        );
    }

    #[test]
    fn test_blocked_growth_gives_up() {
        let graph = graph_from(4, &[]);
        let sampler = SubgraphSampler::new(&graph).with_max_attempts(8);

        let err = sampler
            .sample(2, &HashSet::new(), &mut StdRng::seed_from_u64(0))
            .unwrap_err();

        assert_eq!(err, SampleError::GrowthBlocked { attempts: 8 });
    }

    #[test]
    fn test_blocked_growth_restarts() {
        // Node 0 is isolated; any sample of size 2 must come from the pair.
        let graph = graph_from(3, &[(1, 2)]);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            let sample = sample_subgraph(&graph, 2, &HashSet::new(), &mut rng).unwrap();
            assert!(!sample.indices().contains(&0));
        }
    }

    proptest! {
        #[test]
        fn prop_samples_are_connected_and_avoid_exclusions(
            seed in any::<u64>(),
            size in 1usize..6,
            excluded in proptest::collection::hash_set(0usize..60, 0..20),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let graph = random::preferential_attachment::<Undirected, _>(60, 2, &mut rng);

            if let Ok(sample) = sample_subgraph(&graph, size, &excluded, &mut rng) {
                let nodes = sample.indices();
                prop_assert_eq!(nodes.len(), size);
                prop_assert!(nodes.iter().all(|n| !excluded.contains(n)));
                let distinct: HashSet<_> = nodes.iter().collect();
                prop_assert_eq!(distinct.len(), size);
                prop_assert!(is_connected(&graph, nodes));
                prop_assert!(sample.inv_probability() >= 1.0);
            }
        }
    }
}
