//! Ordered partition refinement.
//!
//! A partition is an ordered list of cells. Refinement splits every cell by the
//! number of links each member has to (and, when directed, from) every cell,
//! sorting the resulting sub-cells by that signature. All decisions depend only
//! on structure and cell order, never on node indices, so isomorphic graphs
//! refine to corresponding partitions.

use std::cmp::Ordering;

use crate::store::{Direction, Graph, GraphStore};
use crate::types::NodeIndex;
use super::AdjacencyCode;

/// Dense link-count matrix of a small graph.
#[derive(Debug, Clone)]
pub(crate) struct CountMatrix {
    n: usize,
    directed: bool,
    counts: Vec<u32>,
}

impl CountMatrix {
    pub(crate) fn of<D: Direction, L>(graph: &Graph<D, L>) -> Self {
        let n = graph.size();
        let mut counts = vec![0u32; n * n];

        for link in graph.links() {
            counts[link.first * n + link.second] += 1;
            if !D::DIRECTED && link.first != link.second {
                counts[link.second * n + link.first] += 1;
            }
        }

        Self {
            n,
            directed: D::DIRECTED,
            counts,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub(crate) fn get(&self, a: NodeIndex, b: NodeIndex) -> u32 {
        self.counts[a * self.n + b]
    }

    /// Adjacency code of the graph relabeled so position `i` holds `order[i]`.
    pub(crate) fn code(&self, order: &[NodeIndex]) -> AdjacencyCode {
        let n = self.n;
        let mut cells = Vec::with_capacity(if self.directed { n * n } else { n * (n + 1) / 2 });

        for i in 0..n {
            let start = if self.directed { 0 } else { i };
            for j in start..n {
                cells.push(self.get(order[i], order[j]));
            }
        }

        AdjacencyCode::new(n, self.directed, cells)
    }

    /// Whether swapping `u` and `v` is an automorphism.
    pub(crate) fn are_twins(&self, u: NodeIndex, v: NodeIndex) -> bool {
        if self.get(u, u) != self.get(v, v) || self.get(u, v) != self.get(v, u) {
            return false;
        }
        (0..self.n)
            .filter(|&w| w != u && w != v)
            .all(|w| self.get(u, w) == self.get(v, w) && self.get(w, u) == self.get(w, v))
    }
}

/// Ordered partition of the nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Partition {
    cells: Vec<Vec<NodeIndex>>,
}

impl Partition {
    /// Initial partition: one cell per label class, cells in comparator order.
    pub(crate) fn by_labels<L, F>(labels: &[L], comparator: &F) -> Self
    where
        F: Fn(&L, &L) -> Ordering,
    {
        let mut nodes: Vec<NodeIndex> = (0..labels.len()).collect();
        nodes.sort_by(|&a, &b| comparator(&labels[a], &labels[b]));

        let mut cells: Vec<Vec<NodeIndex>> = Vec::new();
        for node in nodes {
            match cells.last_mut() {
                Some(cell) if comparator(&labels[cell[0]], &labels[node]) == Ordering::Equal => {
                    cell.push(node)
                }
                _ => cells.push(vec![node]),
            }
        }

        Self { cells }
    }

    /// Whether the identity ordering keeps every node within its cell's span.
    pub(crate) fn admits_identity(&self) -> bool {
        let mut start = 0;
        self.cells.iter().all(|cell| {
            let end = start + cell.len();
            let fits = cell.iter().all(|&v| (start..end).contains(&v));
            start = end;
            fits
        })
    }

    pub(crate) fn cells(&self) -> &[Vec<NodeIndex>] {
        &self.cells
    }

    pub(crate) fn is_discrete(&self) -> bool {
        self.cells.iter().all(|c| c.len() == 1)
    }

    /// Node sequence of a discrete partition (or any partition, cell by cell).
    pub(crate) fn flatten(&self) -> Vec<NodeIndex> {
        self.cells.iter().flatten().copied().collect()
    }

    /// Split `node` out of cell `cell`, placing it first.
    pub(crate) fn individualize(&self, cell: usize, node: NodeIndex) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len() + 1);
        for (i, members) in self.cells.iter().enumerate() {
            if i == cell {
                cells.push(vec![node]);
                cells.push(members.iter().copied().filter(|&m| m != node).collect());
            } else {
                cells.push(members.clone());
            }
        }
        Self { cells }
    }

    /// Refine until no cell splits (equitable partition).
    pub(crate) fn refine(mut self, matrix: &CountMatrix) -> Self {
        loop {
            let (next, split) = self.refine_once(matrix);
            self = next;
            if !split {
                return self;
            }
        }
    }

    fn refine_once(&self, matrix: &CountMatrix) -> (Self, bool) {
        let n = matrix.size();
        let k = self.cells.len();

        let mut color = vec![0usize; n];
        for (c, members) in self.cells.iter().enumerate() {
            for &m in members {
                color[m] = c;
            }
        }

        let mut split = false;
        let mut cells = Vec::with_capacity(k);

        for members in &self.cells {
            if members.len() == 1 {
                cells.push(members.clone());
                continue;
            }

            let mut signed: Vec<(Vec<u32>, NodeIndex)> = members
                .iter()
                .map(|&v| (signature(matrix, &color, k, v), v))
                .collect();
            signed.sort_by(|a, b| a.0.cmp(&b.0));

            let before = cells.len();
            let mut last: Option<&Vec<u32>> = None;
            for (sig, v) in &signed {
                if last == Some(sig) {
                    if let Some(cell) = cells.last_mut() {
                        cell.push(*v);
                    }
                } else {
                    cells.push(vec![*v]);
                    last = Some(sig);
                }
            }
            split |= cells.len() - before > 1;
        }

        (Self { cells }, split)
    }

    /// Split every cell whose members are pairwise twins into singletons in
    /// ascending index order. Any order of twins yields the same code, so only
    /// one needs to be explored. Returns whether anything changed.
    pub(crate) fn split_twins(&mut self, matrix: &CountMatrix) -> bool {
        let mut changed = false;
        let mut cells = Vec::with_capacity(self.cells.len());

        for members in self.cells.drain(..) {
            let twins = members.len() > 1
                && members.iter().enumerate().all(|(i, &u)| {
                    members[i + 1..].iter().all(|&v| matrix.are_twins(u, v))
                });

            if twins {
                let mut sorted = members;
                sorted.sort_unstable();
                cells.extend(sorted.into_iter().map(|m| vec![m]));
                changed = true;
            } else {
                cells.push(members);
            }
        }

        self.cells = cells;
        changed
    }
}

/// Per-node refinement signature: self-loops, then link counts to each cell,
/// then (directed) link counts from each cell.
fn signature(matrix: &CountMatrix, color: &[usize], k: usize, v: NodeIndex) -> Vec<u32> {
    let width = if matrix.directed { 2 * k } else { k };
    let mut sig = vec![0u32; 1 + width];
    sig[0] = matrix.get(v, v);

    for (w, &c) in color.iter().enumerate() {
        sig[1 + c] += matrix.get(v, w);
        if matrix.directed {
            sig[1 + k + c] += matrix.get(w, v);
        }
    }

    sig
}
