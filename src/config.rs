//! Extraction configuration.
//!
//! Every parameter that changes which motif is found feeds `params_hash`, so
//! two reports with the same hash came from the same settings.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::Xxh64;

use crate::DEFAULT_CONFIG_VERSION;

/// Error type for invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Motif sizes start at one node.
    #[error("min_size must be at least 1")]
    ZeroMinSize,
    /// Size range is empty.
    #[error("min_size {min} exceeds max_size {max}")]
    EmptySizeRange {
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Motifs would exceed the labeler bound.
    #[error("max_size {max_size} exceeds max_canonical_nodes {limit}")]
    SizeAboveLabelerLimit {
        /// Configured maximum size.
        max_size: usize,
        /// Configured labeler bound.
        limit: usize,
    },
    /// No worker threads.
    #[error("threads must be at least 1")]
    ZeroThreads,
}

/// Parameters of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Configuration version identifier.
    pub version: String,
    /// Number of samples drawn.
    pub trials: usize,
    /// Smallest motif size sampled.
    pub min_size: usize,
    /// Largest motif size sampled.
    pub max_size: usize,
    /// Seed for the sampling RNG. Worker `w` uses `seed + w`.
    pub seed: u64,
    /// Worker threads. One thread gives a reproducible run for a given seed.
    pub threads: usize,
    /// Restarts allowed per sample before the trial is skipped.
    pub max_sample_attempts: usize,
    /// Labeler size bound.
    pub max_canonical_nodes: usize,
    /// Entries in the canonical ordering cache; zero disables it.
    pub cache_capacity: usize,
    /// Trials between progress log lines; zero disables them.
    pub progress_interval: usize,
}

impl ExtractionConfig {
    /// Configuration with the given trial count and size range, defaults elsewhere.
    pub fn new(trials: usize, min_size: usize, max_size: usize) -> Self {
        Self {
            trials,
            min_size,
            max_size,
            ..Self::default()
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_size == 0 {
            return Err(ConfigError::ZeroMinSize);
        }
        if self.min_size > self.max_size {
            return Err(ConfigError::EmptySizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if self.max_size > self.max_canonical_nodes {
            return Err(ConfigError::SizeAboveLabelerLimit {
                max_size: self.max_size,
                limit: self.max_canonical_nodes,
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Deterministic hash of every parameter, as 16 hex digits.
    pub fn params_hash(&self) -> String {
        let Self {
            version,
            trials,
            min_size,
            max_size,
            seed,
            threads,
            max_sample_attempts,
            max_canonical_nodes,
            cache_capacity,
            progress_interval,
        } = self;

        let mut hasher = Xxh64::new(0);
        hasher.update(&(version.len() as u64).to_le_bytes());
        hasher.update(version.as_bytes());
        for value in [
            *trials,
            *min_size,
            *max_size,
            *threads,
            *max_sample_attempts,
            *max_canonical_nodes,
            *cache_capacity,
            *progress_interval,
        ] {
            hasher.update(&(value as u64).to_le_bytes());
        }
        hasher.update(&seed.to_le_bytes());

        format!("{:016x}", hasher.digest())
    }

    /// Small configuration for tests.
    #[cfg(test)]
    pub fn minimal() -> Self {
        Self {
            trials: 200,
            min_size: 3,
            max_size: 3,
            seed: 1,
            progress_interval: 0,
            ..Self::default()
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            trials: 10_000,
            min_size: 3,
            max_size: 6,
            seed: 0,
            threads: 1,
            max_sample_attempts: crate::sampler::DEFAULT_MAX_ATTEMPTS,
            max_canonical_nodes: crate::canonical::DEFAULT_MAX_NODES,
            cache_capacity: 10_000,
            progress_interval: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(ExtractionConfig::default().validate(), Ok(()));
        assert_eq!(ExtractionConfig::minimal().validate(), Ok(()));
    }

    #[test]
    fn test_validation_failures() {
        assert_eq!(ExtractionConfig::new(10, 0, 3).validate(), Err(ConfigError::ZeroMinSize));
        assert_eq!(
            ExtractionConfig::new(10, 5, 3).validate(),
            Err(ConfigError::EmptySizeRange { min: 5, max: 3 })
        );
        assert_eq!(
            ExtractionConfig::new(10, 3, 40).validate(),
            Err(ConfigError::SizeAboveLabelerLimit { max_size: 40, limit: 32 })
        );
        assert_eq!(
            ExtractionConfig::new(10, 3, 4).with_threads(0).validate(),
            Err(ConfigError::ZeroThreads)
        );
    }

    #[test]
    fn test_params_hash_determinism() {
        assert_eq!(
            ExtractionConfig::default().params_hash(),
            ExtractionConfig::default().params_hash()
        );
    }

    #[test]
    fn test_params_hash_changes() {
        let config1 = ExtractionConfig::default();
        let config2 = ExtractionConfig::default().with_seed(99);

        assert_ne!(config1.params_hash(), config2.params_hash());
    }

    #[test]
    fn test_params_hash_covers_every_field() {
        let base = ExtractionConfig::default();
        let variants = [
            ExtractionConfig { version: "motif_extraction_v2".into(), ..base.clone() },
            ExtractionConfig { trials: 11, ..base.clone() },
            ExtractionConfig { max_size: 5, ..base.clone() },
            ExtractionConfig { max_sample_attempts: 7, ..base.clone() },
            ExtractionConfig { cache_capacity: 0, ..base.clone() },
            ExtractionConfig { progress_interval: 0, ..base.clone() },
            base.clone().with_threads(2),
        ];

        let hash = base.params_hash();
        assert_eq!(hash.len(), 16);
        for variant in &variants {
            assert_ne!(variant.params_hash(), hash, "{variant:?}");
        }
    }

    #[test]
    fn test_json_round_trip() {
        let config = ExtractionConfig::new(500, 2, 5).with_threads(4);
        let json = serde_json::to_string(&config).unwrap();
        let back: ExtractionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
