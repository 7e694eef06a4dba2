//! # motif-kernel
//!
//! Motif discovery and minimum description length scoring for large graphs.
//!
//! The kernel answers one question:
//!
//! > How many bits of this graph's link structure does one repeated pattern explain?
//!
//! ## Core Contract
//!
//! 1. Sample small connected subgraphs with importance weights
//! 2. Collapse isomorphic samples onto one canonical key
//! 3. Pick the shape with the largest weighted frequency and its node-disjoint occurrences
//! 4. Score the graph in bits with and without every occurrence replaced by one node
//!
//! ## Architecture
//!
//! ```text
//! Edge list → Graph → SubgraphSampler → Canonicalizer → FrequencyModel → Motif
//!                                                                         ↓
//!                          EdgeListCompressor ← MotifCompressor ← subbed_graph
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph + same config (single thread) → identical motif and occurrences
//! - Isomorphic graphs → identical canonical keys
//! - Codelengths depend only on counts and wiring, never on iteration order

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod compression;
pub mod config;
pub mod data;
pub mod frequency;
pub mod motifs;
pub mod permutations;
pub mod sampler;
pub mod store;
pub mod types;

// Re-exports
pub use types::{CodeLength, Link, LinkTag, NodeIndex, Occurrence, SampleResult, Wiring};
pub use store::{DiGraph, Directed, Direction, Graph, GraphStore, UnGraph, Undirected};
pub use permutations::Permutations;
pub use canonical::{
    canonicalize, canonicalize_ord, is_isomorphic, AdjacencyCode, CanonicalError, CanonicalForm,
    CanonicalKey, Canonicalizer, Order,
};
pub use canonical::cache::{CacheConfig, CacheStats};
pub use sampler::{sample_subgraph, SampleError, SubgraphSampler};
pub use frequency::FrequencyModel;
pub use motifs::{extract_motif, Extraction, ExtractionError, ExtractionStats, Motif, MotifExtractor, MotifReport};
pub use compression::{
    compressed_size, structural_cost, subbed_graph, CompressionError, EdgeListCompressor, EliasGammaCode,
    MotifCompressor, MotifScore, RissanenCode, UniversalCode,
};
pub use config::{ConfigError, ExtractionConfig};
pub use data::{LoadError, LoadOptions};

/// Default extraction config version identifier.
pub const DEFAULT_CONFIG_VERSION: &str = "motif_extraction_v1";
