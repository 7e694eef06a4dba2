//! Random graph generators for tests and benchmarks.

use rand::Rng;

use super::{Direction, Graph, GraphStore};

/// Erdős–Rényi `G(n, p)`: every possible non-loop link appears independently
/// with probability `p`.
pub fn erdos_renyi<D: Direction, R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Graph<D, ()> {
    let mut graph = Graph::with_capacity(n);
    for _ in 0..n {
        graph.add_node(());
    }

    let p = p.clamp(0.0, 1.0);
    for a in 0..n {
        let start = if D::DIRECTED { 0 } else { a + 1 };
        for b in start..n {
            if a != b && rng.gen_bool(p) {
                graph.connect(a, b);
            }
        }
    }

    graph
}

/// Preferential attachment (Barabási–Albert).
///
/// Starts from a clique of `attach + 1` nodes; every later node links to
/// `attach` distinct earlier nodes chosen with probability proportional to
/// their degree. Directed links point from the new node to its targets.
pub fn preferential_attachment<D: Direction, R: Rng + ?Sized>(
    n: usize,
    attach: usize,
    rng: &mut R,
) -> Graph<D, ()> {
    let mut graph = Graph::with_capacity(n);
    let seed_size = (attach + 1).min(n);

    // Each link contributes both endpoints, so sampling uniformly from this
    // list is sampling proportional to degree.
    let mut endpoints = Vec::with_capacity(2 * n * attach.max(1));

    for _ in 0..seed_size {
        graph.add_node(());
    }
    for a in 0..seed_size {
        for b in 0..a {
            graph.connect(a, b);
            endpoints.push(a);
            endpoints.push(b);
        }
    }

    let mut targets = Vec::with_capacity(attach);
    for _ in seed_size..n {
        let node = graph.add_node(());

        targets.clear();
        while targets.len() < attach.min(node) {
            let candidate = if endpoints.is_empty() {
                rng.gen_range(0..node)
            } else {
                endpoints[rng.gen_range(0..endpoints.len())]
            };
            if !targets.contains(&candidate) {
                targets.push(candidate);
            }
        }

        for &target in &targets {
            graph.connect(node, target);
            endpoints.push(node);
            endpoints.push(target);
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Directed, Undirected};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_preferential_attachment_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let graph: Graph<Directed> = preferential_attachment(100, 3, &mut rng);

        // 4-clique has 6 links, then 96 nodes with 3 links each
        assert_eq!(graph.size(), 100);
        assert_eq!(graph.num_links(), 6 + 96 * 3);
        assert!(graph.links().all(|l| !l.is_self_loop()));
    }

    #[test]
    fn test_erdos_renyi_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Graph<Undirected> = erdos_renyi(10, 0.0, &mut rng);
        let full: Graph<Undirected> = erdos_renyi(10, 1.0, &mut rng);
        let full_directed: Graph<Directed> = erdos_renyi(10, 1.0, &mut rng);

        assert_eq!(empty.num_links(), 0);
        assert_eq!(full.num_links(), 45);
        assert_eq!(full_directed.num_links(), 90);
    }

    #[test]
    fn test_generators_are_seed_deterministic() {
        let g1: Graph<Undirected> = preferential_attachment(50, 2, &mut StdRng::seed_from_u64(42));
        let g2: Graph<Undirected> = preferential_attachment(50, 2, &mut StdRng::seed_from_u64(42));
        assert_eq!(g1, g2);
    }
}
