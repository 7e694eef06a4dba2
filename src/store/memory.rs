//! In-memory adjacency-list graph store.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::types::{Link, LinkTag, NodeIndex};
use super::{Direction, Directed, GraphStore, Undirected};

/// One adjacency entry: the node at the other end plus the link tag.
type Adjacent = (NodeIndex, Option<LinkTag>);

/// In-memory graph with per-node adjacency lists.
///
/// Directed graphs keep separate outgoing and incoming lists. Undirected graphs
/// keep one symmetric list per node; a self-loop appears once in its node's list.
#[derive(Clone)]
pub struct Graph<D: Direction, L = ()> {
    labels: Vec<L>,
    /// Outgoing (directed) or incident (undirected) adjacency.
    out: Vec<Vec<Adjacent>>,
    /// Incoming adjacency. Always empty for undirected graphs.
    inc: Vec<Vec<Adjacent>>,
    num_links: usize,
    _direction: PhantomData<D>,
}

/// Directed graph.
pub type DiGraph<L = ()> = Graph<Directed, L>;

/// Undirected graph.
pub type UnGraph<L = ()> = Graph<Undirected, L>;

impl<D: Direction, L> Default for Graph<D, L> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            out: Vec::new(),
            inc: Vec::new(),
            num_links: 0,
            _direction: PhantomData,
        }
    }
}

impl<D: Direction, L> Graph<D, L> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            labels: Vec::with_capacity(nodes),
            out: Vec::with_capacity(nodes),
            inc: if D::DIRECTED { Vec::with_capacity(nodes) } else { Vec::new() },
            num_links: 0,
            _direction: PhantomData,
        }
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of a node.
    pub fn label(&self, node: NodeIndex) -> &L {
        &self.labels[node]
    }

    /// All labels in index order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Targets of links leaving `node`. For undirected graphs, all neighbors.
    pub fn out_neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.out[node].iter().map(|(n, _)| *n)
    }

    /// Sources of links entering `node`. For undirected graphs, all neighbors.
    pub fn in_neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let list = if D::DIRECTED { &self.inc[node] } else { &self.out[node] };
        list.iter().map(|(n, _)| *n)
    }

    /// Number of links leaving `node` (all incident links if undirected).
    pub fn out_degree(&self, node: NodeIndex) -> usize {
        self.out[node].len()
    }

    /// Number of links entering `node` (all incident links if undirected).
    pub fn in_degree(&self, node: NodeIndex) -> usize {
        if D::DIRECTED {
            self.inc[node].len()
        } else {
            self.out[node].len()
        }
    }

    /// Number of links from `a` to `b` (either way if undirected).
    pub fn multiplicity(&self, a: NodeIndex, b: NodeIndex) -> usize {
        self.out[a].iter().filter(|(n, _)| *n == b).count()
    }

    /// The subgraph induced by `indices`.
    ///
    /// Node `i` of the result is host node `indices[i]`. Every host link with
    /// both endpoints in `indices` is copied, with multiplicity and tag.
    /// Indices must be distinct.
    pub fn induced_subgraph(&self, indices: &[NodeIndex]) -> Graph<D, L>
    where
        L: Clone,
    {
        let position: HashMap<NodeIndex, usize> =
            indices.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        debug_assert_eq!(position.len(), indices.len(), "induced_subgraph indices must be distinct");

        let mut sub = Graph::with_capacity(indices.len());
        for &node in indices {
            sub.add_node(self.labels[node].clone());
        }

        for (i, &node) in indices.iter().enumerate() {
            for &(other, tag) in &self.out[node] {
                let Some(&j) = position.get(&other) else { continue };
                // Undirected links sit in both lists; copy each from its lower end.
                if D::DIRECTED || other >= node {
                    sub.connect_with(i, j, tag);
                }
            }
        }

        sub
    }

    /// The same graph with nodes renumbered: node `i` of the result is node
    /// `order[i]` of `self`. `order` must be a permutation of `0..size`.
    pub fn reorder(&self, order: &[NodeIndex]) -> Graph<D, L>
    where
        L: Clone,
    {
        debug_assert_eq!(order.len(), self.labels.len());
        self.induced_subgraph(order)
    }

    /// Copy of the structure with every label replaced by `()`.
    pub fn blank(&self) -> Graph<D, ()> {
        self.map_labels(|_| ())
    }

    /// Copy of the structure with labels transformed by `f`.
    pub fn map_labels<M, F: FnMut(&L) -> M>(&self, f: F) -> Graph<D, M> {
        Graph {
            labels: self.labels.iter().map(f).collect(),
            out: self.out.clone(),
            inc: self.inc.clone(),
            num_links: self.num_links,
            _direction: PhantomData,
        }
    }

    /// All links sorted in canonical (first, second, tag) order.
    pub fn sorted_links(&self) -> Vec<Link> {
        let mut links: Vec<Link> = self.links().collect();
        links.sort();
        links
    }
}

impl<D: Direction, L> GraphStore for Graph<D, L> {
    type Label = L;

    fn is_directed(&self) -> bool {
        D::DIRECTED
    }

    fn add_node(&mut self, label: L) -> NodeIndex {
        let index = self.labels.len();
        self.labels.push(label);
        self.out.push(Vec::new());
        if D::DIRECTED {
            self.inc.push(Vec::new());
        }
        index
    }

    fn connect_with(&mut self, a: NodeIndex, b: NodeIndex, tag: Option<LinkTag>) {
        assert!(
            a < self.labels.len() && b < self.labels.len(),
            "link ({a}, {b}) out of bounds for graph of size {}",
            self.labels.len()
        );

        self.out[a].push((b, tag));
        if D::DIRECTED {
            self.inc[b].push((a, tag));
        } else if a != b {
            self.out[b].push((a, tag));
        }
        self.num_links += 1;
    }

    fn connected(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.out[a].iter().any(|(n, _)| *n == b)
    }

    fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.out.iter().enumerate().flat_map(|(node, list)| {
            list.iter()
                .filter(move |(other, _)| D::DIRECTED || *other >= node)
                .map(move |&(other, tag)| Link {
                    first: node,
                    second: other,
                    tag,
                })
        })
    }

    fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let incoming: &[Adjacent] = if D::DIRECTED { self.inc[node].as_slice() } else { &[] };
        self.out[node].iter().chain(incoming.iter()).map(|(n, _)| *n)
    }

    fn degree(&self, node: NodeIndex) -> usize {
        if D::DIRECTED {
            self.out[node].len() + self.inc[node].len()
        } else {
            self.out[node].len()
        }
    }

    fn size(&self) -> usize {
        self.labels.len()
    }

    fn num_links(&self) -> usize {
        self.num_links
    }

    fn sort(&mut self) {
        for list in self.out.iter_mut().chain(self.inc.iter_mut()) {
            list.sort_unstable();
        }
    }

    fn compact(&mut self, headroom: usize) {
        for list in self.out.iter_mut().chain(self.inc.iter_mut()) {
            list.shrink_to(list.len() + headroom);
        }
        self.labels.shrink_to(self.labels.len() + headroom);
    }
}

/// Structural equality: same size, same labels, same multiset of links.
/// Adjacency list order does not matter.
impl<D: Direction, L: PartialEq> PartialEq for Graph<D, L> {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
            && self.num_links == other.num_links
            && self.sorted_links() == other.sorted_links()
    }
}

impl<D: Direction, L: Eq> Eq for Graph<D, L> {}

impl<D: Direction, L> fmt::Debug for Graph<D, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("direction", &D::NAME)
            .field("size", &self.size())
            .field("links", &self.sorted_links())
            .finish()
    }
}

impl<D: Direction, L> fmt::Display for Graph<D, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if D::DIRECTED { "->" } else { "-" };
        write!(f, "[")?;
        for (i, link) in self.sorted_links().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}{}{}", link.first, arrow, link.second)?;
        }
        write!(f, "] ({} nodes)", self.size())
    }
}
