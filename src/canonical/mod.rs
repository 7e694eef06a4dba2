//! Canonical labeling of small graphs.
//!
//! [`canonicalize`] picks one node ordering per isomorphism class so that
//! isomorphic graphs relabel to identical adjacency codes. The search is
//! individualization-refinement:
//!
//! 1. Start from one cell per label class (comparator order) and refine to an
//!    equitable partition.
//! 2. Cells whose members are pairwise twins are fixed in ascending order.
//! 3. If the remaining ambiguous cells admit at most `brute_force_limit`
//!    orderings, enumerate them all with [`Permutations`].
//! 4. Otherwise individualize each member of the first smallest ambiguous cell
//!    and recurse. Two leaves with equal codes reveal an automorphism; members
//!    that share an orbit with an explored member, under the automorphisms
//!    fixing the current path, are skipped.
//!
//! The lexicographically smallest [`AdjacencyCode`] wins; ties go to the
//! smallest ordering among the leaves visited. A graph that is already
//! canonical gets the identity ordering back.
//!
//! Keys compare the full code, never a hash, so two [`CanonicalKey`]s are equal
//! exactly when their graphs are isomorphic.

pub mod cache;
pub(crate) mod refine;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::xxh64;

use crate::permutations::{factorial, Permutations};
use crate::store::{Direction, Graph, GraphStore};
use crate::types::NodeIndex;
use cache::{CacheConfig, CacheStats, CanonicalCache};
use refine::{CountMatrix, Partition};

/// Default upper bound on the node count accepted by the labeler.
pub const DEFAULT_MAX_NODES: usize = 32;

/// Default number of orderings enumerated by brute force at one search node.
pub const DEFAULT_BRUTE_FORCE_LIMIT: u64 = 720;

/// Error type for canonical labeling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonicalError {
    /// Graph exceeds the configured size bound.
    #[error("Graph has {nodes} nodes; canonical labeling is limited to {max}")]
    TooLarge {
        /// Node count of the rejected graph.
        nodes: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Link-count adjacency matrix flattened in row-major order.
///
/// Directed codes hold all `n * n` cells; undirected codes hold the upper
/// triangle including the diagonal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AdjacencyCode {
    size: usize,
    directed: bool,
    cells: Vec<u32>,
}

impl AdjacencyCode {
    pub(crate) fn new(size: usize, directed: bool, cells: Vec<u32>) -> Self {
        Self {
            size,
            directed,
            cells,
        }
    }

    /// Code of `graph` in its current node order.
    pub fn of<D: Direction, L>(graph: &Graph<D, L>) -> Self {
        let identity: Vec<NodeIndex> = (0..graph.size()).collect();
        CountMatrix::of(graph).code(&identity)
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the code describes a directed graph.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Raw cells.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(9 + 4 * self.cells.len());
        bytes.extend_from_slice(&(self.size as u64).to_le_bytes());
        bytes.push(u8::from(self.directed));
        for cell in &self.cells {
            bytes.extend_from_slice(&cell.to_le_bytes());
        }
        bytes
    }

    /// Full certificate as a hex string. Equal certificates mean equal codes.
    pub fn certificate(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Short xxh64 fingerprint for display and report keys.
    pub fn fingerprint(&self) -> String {
        format!("{:016x}", xxh64(&self.to_bytes(), 0))
    }
}

/// A node ordering: position `i` holds original node `order[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order(Vec<NodeIndex>);

impl Order {
    /// Wrap an ordering. Must be a permutation of `0..len`.
    pub fn new(order: Vec<NodeIndex>) -> Self {
        Self(order)
    }

    /// The identity ordering on `n` nodes.
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// The ordering as a slice.
    pub fn as_slice(&self) -> &[NodeIndex] {
        &self.0
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ordering is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every node stays in place.
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &n)| i == n)
    }

    /// Rearrange per-node values into canonical order:
    /// `result[i] = items[order[i]]`.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.0.iter().map(|&i| items[i].clone()).collect()
    }

    /// The inverse ordering: `inverse[order[i]] = i`.
    pub fn inverse(&self) -> Order {
        let mut inverse = vec![0; self.0.len()];
        for (i, &n) in self.0.iter().enumerate() {
            inverse[n] = i;
        }
        Order(inverse)
    }
}

/// A graph fixed to its canonical node ordering, usable as a lookup key.
///
/// Equality and hashing use the adjacency code and the labels.
#[derive(Clone)]
pub struct CanonicalKey<D: Direction, L = ()> {
    graph: Graph<D, L>,
    code: AdjacencyCode,
}

impl<D: Direction, L> CanonicalKey<D, L> {
    /// The canonical graph.
    pub fn graph(&self) -> &Graph<D, L> {
        &self.graph
    }

    /// Consume the key, returning the canonical graph.
    pub fn into_graph(self) -> Graph<D, L> {
        self.graph
    }

    /// The canonical adjacency code.
    pub fn code(&self) -> &AdjacencyCode {
        &self.code
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.graph.size()
    }

    /// Number of links.
    pub fn num_links(&self) -> usize {
        self.graph.num_links()
    }

    /// Short fingerprint of the canonical code.
    pub fn fingerprint(&self) -> String {
        self.code.fingerprint()
    }
}

impl<D: Direction, L: PartialEq> PartialEq for CanonicalKey<D, L> {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.graph.labels() == other.graph.labels()
    }
}

impl<D: Direction, L: Eq> Eq for CanonicalKey<D, L> {}

impl<D: Direction, L: Hash> Hash for CanonicalKey<D, L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.graph.labels().hash(state);
    }
}

impl<D: Direction, L> fmt::Debug for CanonicalKey<D, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanonicalKey")
            .field("fingerprint", &self.fingerprint())
            .field("graph", &self.graph)
            .finish()
    }
}

impl<D: Direction, L> fmt::Display for CanonicalKey<D, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.fingerprint(), self.graph)
    }
}

/// Result of canonicalization: the canonical key plus the ordering that
/// produced it from the input graph.
#[derive(Debug, Clone)]
pub struct CanonicalForm<D: Direction, L = ()> {
    key: CanonicalKey<D, L>,
    order: Order,
}

impl<D: Direction, L> CanonicalForm<D, L> {
    /// The canonical graph.
    pub fn graph(&self) -> &Graph<D, L> {
        &self.key.graph
    }

    /// Ordering from input to canonical graph.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// The canonical key.
    pub fn key(&self) -> &CanonicalKey<D, L> {
        &self.key
    }

    /// Split into key and ordering.
    pub fn into_parts(self) -> (CanonicalKey<D, L>, Order) {
        (self.key, self.order)
    }
}

/// Canonical labeler with a size bound and an optional cache.
#[derive(Debug)]
pub struct Canonicalizer {
    max_nodes: usize,
    brute_force_limit: u64,
    cache: Option<CanonicalCache>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer {
    /// Create a labeler with default bounds and no cache.
    pub fn new() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            brute_force_limit: DEFAULT_BRUTE_FORCE_LIMIT,
            cache: None,
        }
    }

    /// Set the maximum accepted node count.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Set how many orderings may be enumerated directly at one search node.
    pub fn with_brute_force_limit(mut self, limit: u64) -> Self {
        self.brute_force_limit = limit.max(1);
        self
    }

    /// Cache canonical orderings of unlabeled graphs.
    pub fn with_cache(mut self, config: CacheConfig) -> Self {
        self.cache = CanonicalCache::new(config);
        self
    }

    /// Maximum accepted node count.
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Cache statistics, or `None` without a cache.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(CanonicalCache::stats)
    }

    /// Canonicalize a labeled graph. `comparator` orders labels; nodes with
    /// different labels are never exchanged.
    pub fn canonicalize<D, L, F>(
        &self,
        graph: &Graph<D, L>,
        comparator: F,
    ) -> Result<CanonicalForm<D, L>, CanonicalError>
    where
        D: Direction,
        L: Clone,
        F: Fn(&L, &L) -> Ordering,
    {
        let n = graph.size();
        if n > self.max_nodes {
            return Err(CanonicalError::TooLarge {
                nodes: n,
                max: self.max_nodes,
            });
        }

        let matrix = CountMatrix::of(graph);
        let (order, code) = self.search(&matrix, Partition::by_labels(graph.labels(), &comparator));

        Ok(build_form(graph, order, code))
    }

    /// Canonicalize an unlabeled graph, consulting the cache when enabled.
    pub fn canonicalize_blank<D: Direction>(
        &self,
        graph: &Graph<D, ()>,
    ) -> Result<CanonicalForm<D, ()>, CanonicalError> {
        let n = graph.size();
        if n > self.max_nodes {
            return Err(CanonicalError::TooLarge {
                nodes: n,
                max: self.max_nodes,
            });
        }

        let matrix = CountMatrix::of(graph);
        let Some(cache) = &self.cache else {
            let (order, code) = self.search(&matrix, Partition::by_labels(graph.labels(), &unit_order));
            return Ok(build_form(graph, order, code));
        };

        let identity: Vec<NodeIndex> = (0..n).collect();
        let raw = matrix.code(&identity);
        if let Some((order, code)) = cache.get(&raw) {
            return Ok(build_form(graph, order, code));
        }

        let (order, code) = self.search(&matrix, Partition::by_labels(graph.labels(), &unit_order));
        cache.put(raw, order.clone(), code.clone());
        Ok(build_form(graph, order, code))
    }

    fn search(&self, matrix: &CountMatrix, initial: Partition) -> (Order, AdjacencyCode) {
        let mut search = Search {
            matrix,
            brute_force_limit: self.brute_force_limit,
            best: None,
            automorphisms: Vec::new(),
            leaves: 0,
        };
        let identity_allowed = initial.admits_identity();
        search.explore(initial, &mut Vec::new());

        tracing::trace!(
            nodes = matrix.size(),
            leaves = search.leaves,
            automorphisms = search.automorphisms.len(),
            "canonical search finished"
        );

        match search.best {
            Some((code, order)) => {
                // Orbit pruning may skip the identity leaf; a graph that is
                // already canonical still maps to itself.
                let identity: Vec<NodeIndex> = (0..matrix.size()).collect();
                if identity_allowed && order != identity && matrix.code(&identity) == code {
                    (Order(identity), code)
                } else {
                    (Order(order), code)
                }
            }
            // Only reachable for a graph with no nodes.
            None => (Order::identity(0), matrix.code(&[])),
        }
    }
}

fn unit_order(_: &(), _: &()) -> Ordering {
    Ordering::Equal
}

fn build_form<D: Direction, L: Clone>(graph: &Graph<D, L>, order: Order, code: AdjacencyCode) -> CanonicalForm<D, L> {
    let canonical = graph.reorder(order.as_slice());
    CanonicalForm {
        key: CanonicalKey {
            graph: canonical,
            code,
        },
        order,
    }
}

struct Search<'a> {
    matrix: &'a CountMatrix,
    brute_force_limit: u64,
    best: Option<(AdjacencyCode, Vec<NodeIndex>)>,
    /// Automorphisms found between equal-code leaves, as node maps.
    automorphisms: Vec<Vec<NodeIndex>>,
    leaves: u64,
}

impl Search<'_> {
    /// `path` holds the nodes individualized on the way to this partition.
    fn explore(&mut self, partition: Partition, path: &mut Vec<NodeIndex>) {
        let partition = self.settle(partition);

        if partition.is_discrete() {
            self.visit(partition.flatten(), path);
            return;
        }

        let ambiguous: Vec<usize> = partition
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.len() > 1)
            .map(|(i, _)| i)
            .collect();

        let orderings = ambiguous
            .iter()
            .try_fold(1u64, |acc, &c| factorial(partition.cells()[c].len()).and_then(|f| acc.checked_mul(f)));

        if matches!(orderings, Some(count) if count <= self.brute_force_limit) {
            self.enumerate(&partition, &ambiguous, path);
            return;
        }

        let target = ambiguous
            .iter()
            .copied()
            .min_by_key(|&c| partition.cells()[c].len())
            .unwrap_or(ambiguous[0]);

        let mut members = partition.cells()[target].clone();
        members.sort_unstable();
        let mut explored: Vec<NodeIndex> = Vec::with_capacity(members.len());
        for node in members {
            // Automorphisms fixing the path map the subtree of one member of
            // an orbit onto the subtree of another, leaf codes included.
            if !explored.is_empty() {
                let orbits = self.orbits(path);
                if explored.iter().any(|&seen| orbits.same(seen, node)) {
                    continue;
                }
            }
            explored.push(node);

            path.push(node);
            self.explore(partition.individualize(target, node), path);
            path.pop();
        }
    }

    /// Orbits of the group generated by the known automorphisms that fix
    /// every node of `fixed`.
    fn orbits(&self, fixed: &[NodeIndex]) -> Orbits {
        let mut orbits = Orbits::new(self.matrix.size());
        for map in &self.automorphisms {
            if fixed.iter().all(|&p| map[p] == p) {
                orbits.absorb(map);
            }
        }
        orbits
    }

    /// Refine and fix twin cells until neither changes anything.
    fn settle(&self, partition: Partition) -> Partition {
        let mut partition = partition.refine(self.matrix);
        while partition.split_twins(self.matrix) {
            partition = partition.refine(self.matrix);
        }
        partition
    }

    /// Visit every ordering that permutes members within ambiguous cells.
    fn enumerate(&mut self, partition: &Partition, ambiguous: &[usize], path: &[NodeIndex]) {
        let cells = partition.cells();
        let mut generators: Vec<Permutations> = ambiguous
            .iter()
            .map(|&c| Permutations::new(cells[c].len()))
            .collect();
        let mut current: Vec<Vec<usize>> = generators
            .iter_mut()
            .map(|g| g.advance().map(<[usize]>::to_vec).unwrap_or_default())
            .collect();

        loop {
            let mut order = Vec::with_capacity(self.matrix.size());
            let mut slot = 0;
            for (i, members) in cells.iter().enumerate() {
                if slot < ambiguous.len() && ambiguous[slot] == i {
                    order.extend(current[slot].iter().map(|&p| members[p]));
                    slot += 1;
                } else {
                    order.extend_from_slice(members);
                }
            }
            self.visit(order, path);

            // Odometer over the per-cell generators; an exhausted generator is
            // replaced by a fresh one and the next slot to the left advances.
            let mut slot = generators.len();
            loop {
                if slot == 0 {
                    return;
                }
                slot -= 1;
                if let Some(next) = generators[slot].advance() {
                    current[slot] = next.to_vec();
                    break;
                }
                generators[slot] = Permutations::new(cells[ambiguous[slot]].len());
                current[slot] = generators[slot]
                    .advance()
                    .map(<[usize]>::to_vec)
                    .unwrap_or_default();
            }
        }
    }

    fn visit(&mut self, order: Vec<NodeIndex>, path: &[NodeIndex]) {
        self.leaves += 1;
        let code = self.matrix.code(&order);

        let (better, automorphism) = match &self.best {
            None => (true, None),
            Some((best_code, best_order)) => match code.cmp(best_code) {
                Ordering::Less => (true, None),
                Ordering::Equal if order == *best_order => (false, None),
                Ordering::Equal => {
                    let mut map = vec![0; order.len()];
                    for (&from, &to) in best_order.iter().zip(&order) {
                        map[from] = to;
                    }
                    (order < *best_order, Some(map))
                }
                Ordering::Greater => (false, None),
            },
        };

        if let Some(map) = automorphism {
            self.record(map, path);
        }

        if better {
            self.best = Some((code, order));
        }
    }

    /// Keep `map` only if it merges orbits at the deepest prefix of `path` it
    /// fixes. Shallower prefixes see a superset of those generators, so a
    /// discarded map never changes any orbit the search consults.
    fn record(&mut self, map: Vec<NodeIndex>, path: &[NodeIndex]) {
        let fixed = path.iter().take_while(|&&p| map[p] == p).count();
        let orbits = self.orbits(&path[..fixed]);
        if map.iter().enumerate().any(|(v, &w)| !orbits.same(v, w)) {
            self.automorphisms.push(map);
        }
    }
}

/// Union-find over node indices.
struct Orbits {
    parent: Vec<NodeIndex>,
}

impl Orbits {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut v: NodeIndex) -> NodeIndex {
        while self.parent[v] != v {
            self.parent[v] = self.parent[self.parent[v]];
            v = self.parent[v];
        }
        v
    }

    fn absorb(&mut self, map: &[NodeIndex]) {
        for (v, &w) in map.iter().enumerate() {
            let (a, b) = (self.find(v), self.find(w));
            if a != b {
                self.parent[a] = b;
            }
        }
    }

    fn same(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.root(a) == self.root(b)
    }

    fn root(&self, mut v: NodeIndex) -> NodeIndex {
        while self.parent[v] != v {
            v = self.parent[v];
        }
        v
    }
}

/// Canonicalize `graph` with the default labeler.
///
/// Returns the canonical graph and the ordering that maps the input onto it.
pub fn canonicalize<D, L, F>(graph: &Graph<D, L>, comparator: F) -> Result<CanonicalForm<D, L>, CanonicalError>
where
    D: Direction,
    L: Clone,
    F: Fn(&L, &L) -> Ordering,
{
    Canonicalizer::new().canonicalize(graph, comparator)
}

/// Canonicalize a graph whose labels are totally ordered.
pub fn canonicalize_ord<D: Direction, L: Clone + Ord>(graph: &Graph<D, L>) -> Result<CanonicalForm<D, L>, CanonicalError> {
    canonicalize(graph, |a: &L, b: &L| a.cmp(b))
}

/// Whether two graphs are isomorphic (label-preserving when labels differ).
///
/// Confirms by comparing complete canonical forms.
pub fn is_isomorphic<D: Direction, L: Clone + Ord>(a: &Graph<D, L>, b: &Graph<D, L>) -> Result<bool, CanonicalError> {
    if a.size() != b.size() || a.num_links() != b.num_links() {
        return Ok(false);
    }
    let ca = canonicalize_ord(a)?;
    let cb = canonicalize_ord(b)?;
    Ok(ca.key() == cb.key())
}
