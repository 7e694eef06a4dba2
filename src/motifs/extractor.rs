//! Motif extraction by weighted sampling.
//!
//! Each trial samples a connected node sequence, canonicalizes its induced
//! subgraph, and offers the sequence (reordered into canonical slot order) to
//! the candidate for that shape. An offer that shares a node with any
//! occurrence already accepted for the same shape is discarded; otherwise its
//! inverse probability is added to the shape's frequency.
//!
//! With more than one thread, workers sample and canonicalize independently
//! and take a single lock for the overlap check and the accumulation together.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canonical::{cache::CacheConfig, CanonicalError, CanonicalKey, Canonicalizer};
use crate::config::{ConfigError, ExtractionConfig};
use crate::frequency::FrequencyModel;
use crate::sampler::{SampleError, SubgraphSampler};
use crate::store::{Direction, Graph, GraphStore};
use crate::types::{overlap, NodeIndex, Occurrence};

use super::Motif;

/// Error type for extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Configuration rejected by validation.
    #[error("Invalid extraction config: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// Labeler failure (size bound exceeded).
    #[error("Canonical labeling failed: {0}")]
    Canonical(#[from] CanonicalError),
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Trials attempted.
    pub trials: usize,
    /// Samples accepted as new occurrences.
    pub accepted: usize,
    /// Samples discarded for overlapping an accepted occurrence.
    pub overlapping: usize,
    /// Trials where sampling failed.
    pub failed: usize,
}

struct Candidate {
    occurrences: Vec<Occurrence>,
    taken: HashSet<NodeIndex>,
}

/// Accumulated result of an extraction run.
pub struct Extraction<D: Direction> {
    frequencies: FrequencyModel<CanonicalKey<D>>,
    candidates: HashMap<CanonicalKey<D>, Candidate>,
    stats: ExtractionStats,
}

impl<D: Direction> Default for Extraction<D> {
    fn default() -> Self {
        Self {
            frequencies: FrequencyModel::new(),
            candidates: HashMap::new(),
            stats: ExtractionStats::default(),
        }
    }
}

impl<D: Direction> Extraction<D> {
    /// Offer an occurrence of `key`. Returns whether it was accepted.
    fn offer(&mut self, key: CanonicalKey<D>, occurrence: Occurrence, weight: f64) -> bool {
        let candidate = self.candidates.entry(key.clone()).or_insert_with(|| Candidate {
            occurrences: Vec::new(),
            taken: HashSet::new(),
        });

        if overlap(&candidate.taken, &occurrence) > 0 {
            self.stats.overlapping += 1;
            return false;
        }

        candidate.taken.extend(occurrence.iter().copied());
        candidate.occurrences.push(occurrence);
        self.frequencies.add(key, weight);
        self.stats.accepted += 1;
        true
    }

    fn motif(&self, key: &CanonicalKey<D>) -> Option<Motif<D>> {
        let candidate = self.candidates.get(key)?;
        Some(Motif::new(
            key.clone(),
            candidate.occurrences.clone(),
            self.frequencies.frequency(key),
        ))
    }

    /// The shape with the largest weighted frequency.
    pub fn best(&self) -> Option<Motif<D>> {
        self.motif(self.frequencies.max_token()?)
    }

    /// Every shape found, by descending frequency.
    pub fn ranked(&self) -> Vec<Motif<D>> {
        self.frequencies
            .sorted()
            .into_iter()
            .filter_map(|(key, _)| self.motif(key))
            .collect()
    }

    /// Number of distinct shapes found.
    pub fn distinct(&self) -> usize {
        self.frequencies.distinct()
    }

    /// Run counters.
    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }

    /// The underlying frequency model.
    pub fn frequencies(&self) -> &FrequencyModel<CanonicalKey<D>> {
        &self.frequencies
    }
}

/// Runs extraction according to an [`ExtractionConfig`].
#[derive(Debug)]
pub struct MotifExtractor {
    config: ExtractionConfig,
    canonicalizer: Canonicalizer,
}

impl MotifExtractor {
    /// Validate `config` and build an extractor.
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        config.validate()?;

        let canonicalizer = Canonicalizer::new()
            .with_max_nodes(config.max_canonical_nodes)
            .with_cache(CacheConfig {
                max_entries: config.cache_capacity,
                enabled: config.cache_capacity > 0,
            });

        Ok(Self {
            config,
            canonicalizer,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The labeler, including its cache statistics.
    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    /// Sample `graph` and collect weighted, disjoint occurrences per shape.
    pub fn extract<D, L>(&self, graph: &Graph<D, L>) -> Result<Extraction<D>, ExtractionError>
    where
        D: Direction,
        L: Clone + Send + Sync,
    {
        let started = Instant::now();
        tracing::info!(
            nodes = graph.size(),
            links = graph.num_links(),
            direction = D::NAME,
            trials = self.config.trials,
            min_size = self.config.min_size,
            max_size = self.config.max_size,
            threads = self.config.threads,
            params_hash = %self.config.params_hash(),
            "starting motif extraction"
        );

        let extraction = if self.config.threads <= 1 {
            self.extract_serial(graph)?
        } else {
            self.extract_parallel(graph)?
        };

        let stats = extraction.stats();
        tracing::info!(
            accepted = stats.accepted,
            overlapping = stats.overlapping,
            failed = stats.failed,
            shapes = extraction.distinct(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "motif extraction finished"
        );
        if let Some(best) = extraction.best() {
            tracing::info!(
                fingerprint = %best.fingerprint(),
                nodes = best.size(),
                links = best.num_links(),
                occurrences = best.occurrences().len(),
                frequency = best.frequency(),
                "selected motif"
            );
        }

        Ok(extraction)
    }

    fn extract_serial<D, L>(&self, graph: &Graph<D, L>) -> Result<Extraction<D>, ExtractionError>
    where
        D: Direction,
        L: Clone,
    {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let sampler = SubgraphSampler::new(graph).with_max_attempts(self.config.max_sample_attempts);
        let mut extraction = Extraction::default();

        for trial in 0..self.config.trials {
            extraction.stats.trials += 1;
            match self.trial(graph, &sampler, &mut rng)? {
                Some((key, occurrence, weight)) => {
                    extraction.offer(key, occurrence, weight);
                }
                None => extraction.stats.failed += 1,
            }
            self.log_progress(trial + 1);
        }

        Ok(extraction)
    }

    fn extract_parallel<D, L>(&self, graph: &Graph<D, L>) -> Result<Extraction<D>, ExtractionError>
    where
        D: Direction,
        L: Clone + Send + Sync,
    {
        let threads = self.config.threads;
        let shared: Mutex<Extraction<D>> = Mutex::new(Extraction::default());

        let results: Vec<Result<(), ExtractionError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|worker| {
                    let shared = &shared;
                    // Spread the remainder over the first workers.
                    let trials = self.config.trials / threads + usize::from(worker < self.config.trials % threads);
                    scope.spawn(move || -> Result<(), ExtractionError> {
                        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(worker as u64));
                        let sampler =
                            SubgraphSampler::new(graph).with_max_attempts(self.config.max_sample_attempts);

                        for _ in 0..trials {
                            let outcome = self.trial(graph, &sampler, &mut rng)?;

                            let done = {
                                let mut extraction = shared.lock();
                                extraction.stats.trials += 1;
                                match outcome {
                                    Some((key, occurrence, weight)) => {
                                        extraction.offer(key, occurrence, weight);
                                    }
                                    None => extraction.stats.failed += 1,
                                }
                                extraction.stats.trials
                            };
                            self.log_progress(done);
                        }
                        Ok(())
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        for result in results {
            result?;
        }

        Ok(shared.into_inner())
    }

    /// One sample, canonicalized. `None` when sampling failed.
    #[allow(clippy::type_complexity)]
    fn trial<D, L, R>(
        &self,
        graph: &Graph<D, L>,
        sampler: &SubgraphSampler<'_, Graph<D, L>>,
        rng: &mut R,
    ) -> Result<Option<(CanonicalKey<D>, Occurrence, f64)>, ExtractionError>
    where
        D: Direction,
        L: Clone,
        R: Rng + ?Sized,
    {
        let size = rng.gen_range(self.config.min_size..=self.config.max_size);

        let sample = match sampler.sample(size, &HashSet::new(), rng) {
            Ok(sample) => sample,
            Err(SampleError::GrowthBlocked { attempts }) => {
                tracing::debug!(size, attempts, "sample abandoned");
                return Ok(None);
            }
            Err(e) => {
                tracing::trace!(size, error = %e, "sample rejected");
                return Ok(None);
            }
        };

        let weight = sample.inv_probability();
        let indices = sample.into_indices();
        let subgraph = graph.induced_subgraph(&indices).blank();
        let (key, order) = self.canonicalizer.canonicalize_blank(&subgraph)?.into_parts();

        Ok(Some((key, order.apply(&indices), weight)))
    }

    fn log_progress(&self, done: usize) {
        let interval = self.config.progress_interval;
        if interval > 0 && done % interval == 0 {
            tracing::info!(done, total = self.config.trials, "extraction progress");
        }
    }
}

/// Run `trials` samples with sizes in `min_size..=max_size` and default
/// settings otherwise. Returns the best motif, or `None` if nothing was sampled.
pub fn extract_motif<D, L>(
    graph: &Graph<D, L>,
    trials: usize,
    min_size: usize,
    max_size: usize,
) -> Result<Option<Motif<D>>, ExtractionError>
where
    D: Direction,
    L: Clone + Send + Sync,
{
    let extractor = MotifExtractor::new(ExtractionConfig::new(trials, min_size, max_size))?;
    Ok(extractor.extract(graph)?.best())
}
