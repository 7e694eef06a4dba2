//! Motif substitution and its codelength.
//!
//! Every occurrence of a motif collapses into a single node of a remainder
//! graph. Links inside an occurrence are dropped (the motif stores them once);
//! links leaving an occurrence are redirected to its collapsed node, keeping
//! direction, multiplicity and tag. The wiring records, per occurrence, which
//! motif slots had such links.
//!
//! Total codelength with substitution:
//!
//! ```text
//! structural(remainder) + structural(motif) + Σ subset_cost(|motif|, |wiring|)
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::store::{Direction, Graph, GraphStore};
use crate::types::{CodeLength, NodeIndex, Occurrence, Wiring};

use super::edge_list::EdgeListCompressor;
use super::universal::{subset_cost, RissanenCode, UniversalCode};

/// Error type for motif substitution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompressionError {
    /// An occurrence does not have one node per motif slot.
    #[error("Occurrence {index} has {found} nodes; motif has {expected}")]
    OccurrenceSize {
        /// Position of the occurrence.
        index: usize,
        /// Motif node count.
        expected: usize,
        /// Occurrence length.
        found: usize,
    },
    /// An occurrence names a node the host does not have.
    #[error("Node {node} out of bounds for host of size {size}")]
    NodeOutOfBounds {
        /// Offending node.
        node: NodeIndex,
        /// Host node count.
        size: usize,
    },
    /// A host node appears more than once across occurrences.
    #[error("Node {node} appears in more than one occurrence slot")]
    OverlappingOccurrences {
        /// Offending node.
        node: NodeIndex,
    },
}

/// Codelengths with and without substitution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotifScore {
    /// Structural cost of the unmodified host.
    pub baseline: CodeLength,
    /// Cost of remainder, motif and wiring.
    pub compressed: CodeLength,
}

impl MotifScore {
    /// Bits saved by substitution. Negative when substitution costs more.
    pub fn savings(&self) -> f64 {
        self.baseline.delta(self.compressed)
    }
}

/// Owner slot of every host node: `Some((occurrence, slot))` or `None`.
fn slot_owners(
    host_size: usize,
    motif_size: usize,
    occurrences: &[Occurrence],
) -> Result<Vec<Option<(usize, usize)>>, CompressionError> {
    let mut owners = vec![None; host_size];

    for (index, occurrence) in occurrences.iter().enumerate() {
        if occurrence.len() != motif_size {
            return Err(CompressionError::OccurrenceSize {
                index,
                expected: motif_size,
                found: occurrence.len(),
            });
        }
        for (slot, &node) in occurrence.iter().enumerate() {
            let owner = owners.get_mut(node).ok_or(CompressionError::NodeOutOfBounds {
                node,
                size: host_size,
            })?;
            if owner.is_some() {
                return Err(CompressionError::OverlappingOccurrences { node });
            }
            *owner = Some((index, slot));
        }
    }

    Ok(owners)
}

/// Replace every occurrence in `host` by a single node.
///
/// Surviving host nodes keep their relative order and come first; collapsed
/// node `j` follows them, one per occurrence in order. Returns the remainder
/// graph and the sorted wiring of each occurrence.
pub fn subbed_graph<D, L, M>(
    host: &Graph<D, L>,
    motif: &Graph<D, M>,
    occurrences: &[Occurrence],
) -> Result<(Graph<D, ()>, Vec<Wiring>), CompressionError>
where
    D: Direction,
{
    let owners = slot_owners(host.size(), motif.size(), occurrences)?;

    let mut remainder: Graph<D, ()> = Graph::with_capacity(host.size());
    let mut renumbered = vec![0; host.size()];
    for (node, owner) in owners.iter().enumerate() {
        if owner.is_none() {
            renumbered[node] = remainder.add_node(());
        }
    }
    let collapsed: Vec<NodeIndex> = occurrences.iter().map(|_| remainder.add_node(())).collect();

    let mut wired: Vec<Vec<bool>> = occurrences.iter().map(|o| vec![false; o.len()]).collect();

    for link in host.links() {
        let first = owners[link.first];
        let second = owners[link.second];

        if let (Some((a, _)), Some((b, _))) = (first, second) {
            if a == b {
                continue;
            }
        }

        let mut endpoint = |node: NodeIndex, owner: Option<(usize, usize)>| match owner {
            Some((occurrence, slot)) => {
                wired[occurrence][slot] = true;
                collapsed[occurrence]
            }
            None => renumbered[node],
        };
        let a = endpoint(link.first, first);
        let b = endpoint(link.second, second);
        remainder.connect_with(a, b, link.tag);
    }

    let wiring = wired
        .into_iter()
        .map(|slots| slots.iter().enumerate().filter(|&(_, &w)| w).map(|(s, _)| s).collect())
        .collect();

    Ok((remainder, wiring))
}

/// Scores motif substitution under a universal code.
#[derive(Debug, Clone, Default)]
pub struct MotifCompressor<C: UniversalCode = RissanenCode> {
    edges: EdgeListCompressor<C>,
}

impl MotifCompressor<RissanenCode> {
    /// Compressor using Rissanen's universal code.
    pub fn new() -> Self {
        Self {
            edges: EdgeListCompressor::new(),
        }
    }
}

impl<C: UniversalCode> MotifCompressor<C> {
    /// Compressor built on an existing edge-list compressor.
    pub fn with_edges(edges: EdgeListCompressor<C>) -> Self {
        Self { edges }
    }

    /// The underlying edge-list compressor.
    pub fn edges(&self) -> &EdgeListCompressor<C> {
        &self.edges
    }

    /// Codelength of `host` with every occurrence replaced by `motif`.
    ///
    /// `exact` materializes the remainder graph. Otherwise the remainder's
    /// counts and wiring are read off the host's adjacency without building it:
    ///
    /// - nodes: `n - Σ|occ| + #occ`
    /// - links: `m` minus the links with both ends in one occurrence
    /// - slot `s` is wired iff `occ[s]` has a neighbor outside its occurrence
    ///
    /// Both paths give the same result for any valid occurrences.
    pub fn compressed_size<D: Direction, L, M>(
        &self,
        host: &Graph<D, L>,
        motif: &Graph<D, M>,
        occurrences: &[Occurrence],
        exact: bool,
    ) -> Result<CodeLength, CompressionError> {
        let motif_cost = self.edges.structural_cost(motif);
        let slots = motif.size() as u64;

        let (remainder_cost, wiring_cost) = if exact {
            let (remainder, wiring) = subbed_graph(host, motif, occurrences)?;
            let wiring_cost: f64 = wiring.iter().map(|w| subset_cost(slots, w.len() as u64)).sum();
            (self.edges.structural_cost(&remainder), wiring_cost)
        } else {
            let owners = slot_owners(host.size(), motif.size(), occurrences)?;
            let occurrence_of = |node: NodeIndex| owners[node].map(|(index, _)| index);

            let covered: usize = occurrences.iter().map(Vec::len).sum();
            let nodes = host.size() - covered + occurrences.len();

            let mut internal = 0;
            let mut wiring_cost = 0.0;
            for (index, occurrence) in occurrences.iter().enumerate() {
                let mut wired = 0u64;
                for &node in occurrence {
                    // Each link once, as `links()` enumerates it.
                    internal += host
                        .out_neighbors(node)
                        .filter(|&other| D::DIRECTED || other >= node)
                        .filter(|&other| occurrence_of(other) == Some(index))
                        .count();
                    if host.neighbors(node).any(|other| occurrence_of(other) != Some(index)) {
                        wired += 1;
                    }
                }
                wiring_cost += subset_cost(slots, wired);
            }

            let links = host.num_links() - internal;
            (self.edges.cost_of_counts(nodes, links, D::DIRECTED), wiring_cost)
        };

        let total = remainder_cost + motif_cost + CodeLength::bits(wiring_cost);

        tracing::debug!(
            exact,
            occurrences = occurrences.len(),
            motif_nodes = motif.size(),
            bits = total.as_bits(),
            "compressed size"
        );

        Ok(total)
    }

    /// Baseline and compressed codelength together.
    pub fn score<D: Direction, L, M>(
        &self,
        host: &Graph<D, L>,
        motif: &Graph<D, M>,
        occurrences: &[Occurrence],
        exact: bool,
    ) -> Result<MotifScore, CompressionError> {
        Ok(MotifScore {
            baseline: self.edges.structural_cost(host),
            compressed: self.compressed_size(host, motif, occurrences, exact)?,
        })
    }
}

/// [`MotifCompressor::compressed_size`] under Rissanen's universal code.
pub fn compressed_size<D: Direction, L, M>(
    host: &Graph<D, L>,
    motif: &Graph<D, M>,
    occurrences: &[Occurrence],
    exact: bool,
) -> Result<CodeLength, CompressionError> {
    MotifCompressor::new().compressed_size(host, motif, occurrences, exact)
}

/// Host nodes covered by any occurrence.
pub fn covered_nodes(occurrences: &[Occurrence]) -> HashSet<NodeIndex> {
    occurrences.iter().flatten().copied().collect()
}
