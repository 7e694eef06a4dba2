//! Golden tests for the motif kernel.
//!
//! These pin exact codelengths, wiring and canonical forms that downstream
//! comparisons rely on.

use motif_kernel::compression::{link_cost, subset_cost};
use motif_kernel::{
    canonicalize_ord, compressed_size, structural_cost, subbed_graph, DiGraph, GraphStore, MotifCompressor,
    Permutations, RissanenCode, UnGraph, UniversalCode,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn build<G: GraphStore<Label = ()> + Default>(n: usize, links: &[(usize, usize)]) -> G {
    let mut graph = G::default();
    for _ in 0..n {
        graph.add_node(());
    }
    for &(a, b) in links {
        graph.connect(a, b);
    }
    graph
}

/// Nodes a..i are 0..8. Two four-node clusters joined through e-f, with a
/// hanging off the first.
fn build_two_cluster_graph() -> UnGraph {
    build(
        9,
        &[
            (0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (2, 4),
            (3, 4), (4, 5), (5, 6), (5, 7), (5, 8), (6, 7), (7, 8),
        ],
    )
}

/// The shared cluster shape in slot order c, e, d, b (and f, g, h, i).
fn build_cluster_motif() -> UnGraph {
    build(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (2, 3)])
}

// ─────────────────────────────────────────────────────────────────────────────
// Edge-List Codelength
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn golden_directed_triangle_cost() {
    let graph: DiGraph = build(3, &[(0, 1), (1, 2), (2, 0)]);

    let code = RissanenCode;
    let expected = code.cost(3) + code.cost(3) + 9f64.log2() + 25f64.log2() + 49f64.log2();

    let actual = structural_cost(&graph).as_bits();
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn golden_per_link_costs() {
    assert!((link_cost(1, true) - 9f64.log2()).abs() < 1e-12);
    assert!((link_cost(2, true) - 25f64.log2()).abs() < 1e-12);
    assert!((link_cost(3, true) - 49f64.log2()).abs() < 1e-12);
}

#[test]
fn golden_cost_increases_with_links() {
    let mut graph: DiGraph = build(5, &[]);
    let mut previous = structural_cost(&graph);

    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 2)] {
        graph.connect(a, b);
        let cost = structural_cost(&graph);
        assert!(cost > previous);
        previous = cost;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Substitution and Wiring
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn golden_two_cluster_wiring() {
    let host = build_two_cluster_graph();
    let occurrences = vec![vec![2, 4, 3, 1], vec![5, 6, 7, 8]];

    let (remainder, wiring) = subbed_graph(&host, &build_cluster_motif(), &occurrences).unwrap();

    assert_eq!(wiring, vec![vec![0, 1, 2, 3], vec![0]]);
    assert_eq!(remainder.size(), 3);
    assert_eq!(remainder.num_links(), 4);
}

#[test]
fn golden_two_cluster_compressed_size() {
    let host = build_two_cluster_graph();
    let motif = build_cluster_motif();
    let occurrences = vec![vec![2, 4, 3, 1], vec![5, 6, 7, 8]];

    let exact = compressed_size(&host, &motif, &occurrences, true).unwrap();
    let fast = compressed_size(&host, &motif, &occurrences, false).unwrap();

    let remainder: UnGraph = build(3, &[(0, 1), (0, 1), (0, 1), (1, 2)]);
    let expected = structural_cost(&remainder).as_bits()
        + structural_cost(&motif).as_bits()
        + subset_cost(4, 4)
        + subset_cost(4, 1);

    assert!((exact.as_bits() - expected).abs() < 1e-9);
    assert!(exact.approx_eq(fast, 1e-9));
}

#[test]
fn golden_zero_occurrences() {
    let host = build_two_cluster_graph();
    let motif = build_cluster_motif();
    let expected = structural_cost(&host) + structural_cost(&motif);

    let compressor = MotifCompressor::new();
    for exact in [true, false] {
        let score = compressor.score(&host, &motif, &[], exact).unwrap();
        assert!(score.compressed.approx_eq(expected, 1e-9));
        assert!(score.compressed.as_bits().is_finite());
        assert_eq!(score.baseline, structural_cost(&host));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Canonical Forms
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn golden_canonical_form_is_stable() {
    let path: UnGraph = build(4, &[(0, 1), (1, 2), (2, 3)]);
    let relabeled: UnGraph = build(4, &[(2, 0), (0, 3), (3, 1)]);

    let a = canonicalize_ord(&path).unwrap();
    let b = canonicalize_ord(&relabeled).unwrap();

    assert_eq!(a.key(), b.key());
    assert_eq!(a.key().code().certificate(), b.key().code().certificate());
    assert!(canonicalize_ord(a.graph()).unwrap().order().is_identity());
}

// ─────────────────────────────────────────────────────────────────────────────
// Permutations
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn golden_four_item_permutations() {
    let all: Vec<Vec<usize>> = Permutations::new(4).collect();

    assert_eq!(all.len(), 24);
    assert_eq!(all[0], vec![0, 1, 2, 3]);
    assert_eq!(all[1], vec![0, 1, 3, 2]);
    assert_eq!(all[2], vec![0, 3, 1, 2]);
    assert_eq!(all[3], vec![3, 0, 1, 2]);
    assert_eq!(all[23], vec![1, 0, 2, 3]);
}
