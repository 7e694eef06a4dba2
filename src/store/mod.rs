//! Graph storage.
//!
//! The store is owned exclusively by whoever builds it (usually the edge-list
//! loader) and then handed to the analysis code by value. Analysis only needs
//! `&self`; maintenance such as [`GraphStore::compact`] needs `&mut self`, so the
//! borrow checker keeps compaction from running alongside any reader.

pub mod memory;
pub mod random;

use std::fmt::Debug;

use crate::types::{Link, LinkTag, NodeIndex};

/// Compile-time direction of a graph.
pub trait Direction: Copy + Clone + Default + Debug + PartialEq + Eq + Send + Sync + 'static {
    /// Whether links are ordered pairs.
    const DIRECTED: bool;
    /// Short name used in logs and reports.
    const NAME: &'static str;
}

/// Links are ordered (source, target) pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Directed;

/// Links are unordered pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Undirected;

impl Direction for Directed {
    const DIRECTED: bool = true;
    const NAME: &'static str = "directed";
}

impl Direction for Undirected {
    const DIRECTED: bool = false;
    const NAME: &'static str = "undirected";
}

/// Capability interface shared by every graph variant.
///
/// Implementations must enumerate links and neighbors in a deterministic order.
pub trait GraphStore {
    /// Node label type (`()` for unlabeled graphs).
    type Label;

    /// Whether links are directed.
    fn is_directed(&self) -> bool;

    /// Add a node and return its index. Indices are consecutive from zero.
    fn add_node(&mut self, label: Self::Label) -> NodeIndex;

    /// Add a link from `a` to `b`. Multiple links between the same pair are kept.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    fn connect(&mut self, a: NodeIndex, b: NodeIndex) {
        self.connect_with(a, b, None);
    }

    /// Add a link carrying an optional tag.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    fn connect_with(&mut self, a: NodeIndex, b: NodeIndex, tag: Option<LinkTag>);

    /// Whether at least one link runs from `a` to `b` (either way if undirected).
    fn connected(&self, a: NodeIndex, b: NodeIndex) -> bool;

    /// All links, each reported once.
    fn links(&self) -> impl Iterator<Item = Link> + '_;

    /// Nodes adjacent to `node` in either direction, with multiplicity.
    fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_;

    /// Number of link endpoints at `node`.
    fn degree(&self, node: NodeIndex) -> usize;

    /// Number of nodes.
    fn size(&self) -> usize;

    /// Number of links.
    fn num_links(&self) -> usize;

    /// Sort every adjacency list. Connectivity is unchanged.
    fn sort(&mut self);

    /// Release spare adjacency capacity, keeping at most `headroom` free slots
    /// per list. Connectivity is unchanged.
    fn compact(&mut self, headroom: usize);
}

pub use memory::{Graph, DiGraph, UnGraph};
