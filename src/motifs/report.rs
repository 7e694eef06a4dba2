//! Serializable summary of a scored motif.

use serde::{Deserialize, Serialize};

use crate::compression::MotifScore;
use crate::config::ExtractionConfig;
use crate::store::{Direction, Graph, GraphStore};
use crate::types::CodeLength;

use super::{Extraction, Motif};

/// Everything needed to compare runs: settings, host, shape and scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotifReport {
    /// Hash of the extraction config.
    pub params_hash: String,
    /// `directed` or `undirected`.
    pub direction: String,
    /// Host node count.
    pub host_nodes: usize,
    /// Host link count.
    pub host_links: usize,
    /// Distinct shapes sampled.
    pub shapes: usize,
    /// Fingerprint of the selected shape.
    pub fingerprint: String,
    /// Full canonical certificate of the selected shape.
    pub certificate: String,
    /// Shape node count.
    pub motif_nodes: usize,
    /// Shape link count.
    pub motif_links: usize,
    /// Accepted occurrences.
    pub occurrences: usize,
    /// Weighted frequency of the shape.
    pub frequency: f64,
    /// Whether `score` came from the materialized remainder graph.
    pub exact: bool,
    /// Codelengths with and without substitution.
    pub score: MotifScore,
}

impl MotifReport {
    /// Build a report for `motif`, selected from `extraction` over `host`.
    pub fn new<D: Direction, L>(
        config: &ExtractionConfig,
        host: &Graph<D, L>,
        extraction: &Extraction<D>,
        motif: &Motif<D>,
        score: MotifScore,
        exact: bool,
    ) -> Self {
        Self {
            params_hash: config.params_hash(),
            direction: D::NAME.to_string(),
            host_nodes: host.size(),
            host_links: host.num_links(),
            shapes: extraction.distinct(),
            fingerprint: motif.fingerprint(),
            certificate: motif.key().code().certificate(),
            motif_nodes: motif.size(),
            motif_links: motif.num_links(),
            occurrences: motif.occurrences().len(),
            frequency: motif.frequency(),
            exact,
            score,
        }
    }

    /// Bits saved by substitution.
    pub fn savings(&self) -> f64 {
        self.score.savings()
    }

    /// Compression ratio `compressed / baseline`.
    pub fn ratio(&self) -> f64 {
        let baseline = self.score.baseline.as_bits();
        if baseline == 0.0 {
            return 1.0;
        }
        self.score.compressed.as_bits() / baseline
    }

    /// Baseline codelength.
    pub fn baseline(&self) -> CodeLength {
        self.score.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::MotifCompressor;
    use crate::motifs::MotifExtractor;
    use crate::store::UnGraph;

    #[test]
    fn test_report_serializes() {
        let mut host = UnGraph::new();
        for _ in 0..12 {
            host.add_node(());
        }
        for t in 0..4 {
            let base = 3 * t;
            host.connect(base, base + 1);
            host.connect(base + 1, base + 2);
            host.connect(base + 2, base);
        }

        let config = ExtractionConfig::minimal();
        let extraction = MotifExtractor::new(config.clone()).unwrap().extract(&host).unwrap();
        let motif = extraction.best().unwrap();
        let score = MotifCompressor::new()
            .score(&host, motif.graph(), motif.occurrences(), true)
            .unwrap();

        let report = MotifReport::new(&config, &host, &extraction, &motif, score, true);

        assert_eq!(report.motif_nodes, 3);
        assert_eq!(report.motif_links, 3);
        assert_eq!(report.direction, "undirected");
        assert!(report.occurrences >= 1 && report.occurrences <= 4);

        let json = serde_json::to_string(&report).unwrap();
        let back: MotifReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fingerprint, report.fingerprint);
        assert_eq!(back.occurrences, report.occurrences);
    }
}
