//! Motif discovery.
//!
//! [`MotifExtractor`] samples the host graph and returns an [`Extraction`]; its
//! best [`Motif`] is a canonical shape together with node-disjoint
//! occurrences. [`MotifReport`] summarizes a scored motif for output.

pub mod extractor;
pub mod report;

use crate::canonical::CanonicalKey;
use crate::store::{Direction, Graph, GraphStore};
use crate::types::Occurrence;

pub use extractor::{extract_motif, Extraction, ExtractionError, ExtractionStats, MotifExtractor};
pub use report::MotifReport;

/// A canonical shape and its pairwise node-disjoint occurrences.
///
/// Slot `s` of every occurrence plays the role of node `s` of the shape.
#[derive(Debug, Clone)]
pub struct Motif<D: Direction> {
    key: CanonicalKey<D>,
    occurrences: Vec<Occurrence>,
    frequency: f64,
}

impl<D: Direction> Motif<D> {
    pub(crate) fn new(key: CanonicalKey<D>, occurrences: Vec<Occurrence>, frequency: f64) -> Self {
        Self {
            key,
            occurrences,
            frequency,
        }
    }

    /// The canonical shape.
    pub fn graph(&self) -> &Graph<D, ()> {
        self.key.graph()
    }

    /// The canonical key.
    pub fn key(&self) -> &CanonicalKey<D> {
        &self.key
    }

    /// Accepted occurrences, in acceptance order.
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// Accumulated inverse-probability weight.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Node count of the shape.
    pub fn size(&self) -> usize {
        self.key.size()
    }

    /// Link count of the shape.
    pub fn num_links(&self) -> usize {
        self.graph().num_links()
    }

    /// Short fingerprint of the shape.
    pub fn fingerprint(&self) -> String {
        self.key.fingerprint()
    }
}
