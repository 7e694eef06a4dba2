//! Edge-list ingestion.
//!
//! The loader owns the graph while it streams lines into it and hands it back
//! by value once sorted (and optionally compacted). Lines are whitespace
//! separated; blank lines and lines starting with `#` or `%` are skipped. A
//! third column that parses as an unsigned integer becomes the link tag.

pub mod edge_list;

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::store::{Direction, Graph};

pub use edge_list::{read_edge_list, read_edge_list_unlabeled, write_edge_list};

/// Error type for edge-list ingestion. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The line has fewer than two tokens.
    #[error("Line {line} does not split into two elements")]
    MissingEndpoint {
        /// Offending line.
        line: usize,
    },
    /// An endpoint is not a non-negative integer (unlabeled loading only).
    #[error("The {position} element on line {line} cannot be parsed into an integer: {token:?}")]
    InvalidInteger {
        /// Offending line.
        line: usize,
        /// Which endpoint failed.
        position: Endpoint,
        /// The token as read.
        token: String,
    },
    /// An endpoint id exceeds `LoadOptions::max_id` (unlabeled loading only).
    #[error("The {position} element on line {line} is {id}, above the largest accepted id {max}")]
    IdTooLarge {
        /// Offending line.
        line: usize,
        /// Which endpoint failed.
        position: Endpoint,
        /// The id as read.
        id: u64,
        /// Largest accepted id.
        max: usize,
    },
}

/// Column of an endpoint on an edge-list line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// First column.
    First,
    /// Second column.
    Second,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::First => write!(f, "first"),
            Endpoint::Second => write!(f, "second"),
        }
    }
}

/// Options for edge-list ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop self-loops and links that already exist.
    pub simple: bool,
    /// Prefix first-column ids with `l` and second-column ids with `r`, so the
    /// two columns name disjoint node sets (labeled loading only).
    pub bipartite: bool,
    /// Give every node the empty label (labeled loading only).
    pub blank_labels: bool,
    /// Links between progress log lines; zero disables them.
    pub log_interval: usize,
    /// Links between compactions of the in-progress graph; zero disables them.
    pub compact_interval: usize,
    /// Spare capacity kept per adjacency list by periodic compaction.
    pub compact_headroom: usize,
    /// Compact with no headroom once loading finishes.
    pub clean: bool,
    /// Largest integer id accepted by unlabeled loading. Every id up to the
    /// largest one read becomes a node.
    pub max_id: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            simple: false,
            bipartite: false,
            blank_labels: false,
            log_interval: 500_000,
            compact_interval: 5_000_000,
            compact_headroom: 5,
            clean: true,
            max_id: i32::MAX as usize,
        }
    }
}

impl LoadOptions {
    /// Default options with duplicate links and self-loops dropped.
    pub fn simple() -> Self {
        Self {
            simple: true,
            ..Self::default()
        }
    }
}

/// Load a labeled edge list from a file.
pub fn load_edge_list<D: Direction>(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Graph<D, String>, LoadError> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), direction = D::NAME, "loading edge list");
    read_edge_list(BufReader::new(File::open(path)?), options)
}

/// Load an edge list of consecutive integer ids from a file.
pub fn load_edge_list_unlabeled<D: Direction>(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Graph<D, ()>, LoadError> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), direction = D::NAME, "loading unlabeled edge list");
    read_edge_list_unlabeled(BufReader::new(File::open(path)?), options)
}
