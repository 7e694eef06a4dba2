//! End-to-end extraction on generated graphs.

use std::collections::HashSet;

use motif_kernel::store::random::{erdos_renyi, preferential_attachment};
use motif_kernel::{
    extract_motif, Directed, ExtractionConfig, Graph, GraphStore, MotifCompressor, MotifExtractor, Undirected,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn scale_free_directed(n: usize, seed: u64) -> Graph<Directed> {
    preferential_attachment(n, 3, &mut StdRng::seed_from_u64(seed))
}

fn config(trials: usize, min: usize, max: usize) -> ExtractionConfig {
    ExtractionConfig {
        progress_interval: 0,
        ..ExtractionConfig::new(trials, min, max).with_seed(42)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fast vs Exact
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fast_and_exact_agree_on_extracted_motif() {
    let graph = scale_free_directed(3_000, 1);
    let extractor = MotifExtractor::new(config(2_000, 3, 5)).unwrap();

    let extraction = extractor.extract(&graph).unwrap();
    let motif = extraction.best().expect("a motif is always found on a connected graph");

    let compressor = MotifCompressor::new();
    let exact = compressor.score(&graph, motif.graph(), motif.occurrences(), true).unwrap();
    let fast = compressor.score(&graph, motif.graph(), motif.occurrences(), false).unwrap();

    assert!(
        exact.compressed.approx_eq(fast.compressed, 1e-6),
        "exact {} vs fast {}",
        exact.compressed,
        fast.compressed
    );
    assert_eq!(exact.baseline, fast.baseline);
}

#[test]
fn fast_and_exact_agree_for_every_ranked_shape() {
    let graph: Graph<Undirected> = erdos_renyi(400, 0.02, &mut StdRng::seed_from_u64(9));
    let extractor = MotifExtractor::new(config(1_500, 3, 4)).unwrap();

    let extraction = extractor.extract(&graph).unwrap();
    let compressor = MotifCompressor::new();

    for motif in extraction.ranked().into_iter().take(10) {
        let exact = compressor.compressed_size(&graph, motif.graph(), motif.occurrences(), true).unwrap();
        let fast = compressor.compressed_size(&graph, motif.graph(), motif.occurrences(), false).unwrap();
        assert!(exact.approx_eq(fast, 1e-6));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Occurrence Invariants
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn occurrences_are_disjoint_and_match_the_shape() {
    let graph = scale_free_directed(1_000, 5);
    let extractor = MotifExtractor::new(config(1_000, 3, 4).with_threads(3)).unwrap();

    let extraction = extractor.extract(&graph).unwrap();
    let motif = extraction.best().unwrap();

    let mut seen = HashSet::new();
    for occurrence in motif.occurrences() {
        assert_eq!(occurrence.len(), motif.size());
        for &node in occurrence {
            assert!(seen.insert(node), "node {node} reused across occurrences");
        }
        assert_eq!(&graph.induced_subgraph(occurrence), motif.graph());
    }
}

#[test]
fn ranked_shapes_are_sorted_by_frequency() {
    let graph = scale_free_directed(500, 3);
    let extraction = MotifExtractor::new(config(800, 3, 3)).unwrap().extract(&graph).unwrap();

    let ranked = extraction.ranked();
    assert_eq!(ranked.len(), extraction.distinct());
    for pair in ranked.windows(2) {
        assert!(pair[0].frequency() >= pair[1].frequency());
    }
    assert_eq!(ranked[0].key(), extraction.best().unwrap().key());
}

#[test]
fn extract_motif_convenience() {
    let graph = scale_free_directed(200, 8);
    let motif = extract_motif(&graph, 300, 3, 3).unwrap().unwrap();

    assert_eq!(motif.size(), 3);
    assert!(!motif.occurrences().is_empty());
    assert!(motif.frequency() > 0.0);
}
