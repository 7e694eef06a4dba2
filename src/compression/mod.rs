//! Minimum description length scoring.
//!
//! - [`universal`]: bit costs for unbounded integers and subsets
//! - [`edge_list`]: baseline structural cost of a graph
//! - [`motif`]: motif substitution and the cost of the substituted graph

pub mod edge_list;
pub mod motif;
pub mod universal;

pub use edge_list::{link_cost, structural_cost, EdgeListCompressor};
pub use motif::{compressed_size, covered_nodes, subbed_graph, CompressionError, MotifCompressor, MotifScore};
pub use universal::{log2_binomial, subset_cost, EliasGammaCode, RissanenCode, UniversalCode};
