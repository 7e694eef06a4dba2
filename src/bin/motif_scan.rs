//! Motif Scan Binary
//!
//! Loads an edge list, extracts the most frequent motif and prints a JSON
//! report with its codelength savings to stdout. Logs go to stderr.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `MOTIF_TRIALS`: Samples drawn (default: 10000)
//! - `MOTIF_MIN_SIZE` / `MOTIF_MAX_SIZE`: Motif size range (default: 3 / 6)
//! - `MOTIF_SEED`: Sampling seed (default: 0)
//! - `MOTIF_THREADS`: Worker threads (default: 1)
//! - `MOTIF_DIRECTED`: "true" to read links as directed (default: false)
//! - `MOTIF_EXACT`: "false" to count the remainder from host adjacency without building it (default: true)
//! - `MOTIF_SIMPLE`: "true" to drop self-loops and duplicate links (default: false)
//! - `RUST_LOG`: Log level filter (default: motif_kernel=info,motif_scan=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! MOTIF_TRIALS=50000 MOTIF_DIRECTED=true cargo run --release --bin motif_scan -- edges.txt
//! ```

use std::str::FromStr;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use motif_kernel::data::load_edge_list;
use motif_kernel::{Directed, Direction, ExtractionConfig, GraphStore, LoadOptions, MotifCompressor, MotifExtractor, MotifReport, Undirected};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "motif_kernel=info,motif_scan=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).flatten_event(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Parse an environment variable, falling back to `default` when unset.
fn env_or<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn config_from_env() -> Result<ExtractionConfig, String> {
    let defaults = ExtractionConfig::default();
    Ok(ExtractionConfig {
        trials: env_or("MOTIF_TRIALS", defaults.trials)?,
        min_size: env_or("MOTIF_MIN_SIZE", defaults.min_size)?,
        max_size: env_or("MOTIF_MAX_SIZE", defaults.max_size)?,
        seed: env_or("MOTIF_SEED", defaults.seed)?,
        threads: env_or("MOTIF_THREADS", defaults.threads)?,
        ..defaults
    })
}

fn run<D: Direction>(
    path: &str,
    config: ExtractionConfig,
    options: &LoadOptions,
    exact: bool,
) -> Result<Option<MotifReport>, Box<dyn std::error::Error>> {
    let load_start = Instant::now();
    let graph = load_edge_list::<D>(path, options)?;
    info!(
        nodes = graph.size(),
        links = graph.num_links(),
        latency_ms = load_start.elapsed().as_millis() as u64,
        "edge list loaded"
    );

    let extractor = MotifExtractor::new(config)?;
    let extraction = extractor.extract(&graph)?;
    if let Some(stats) = extractor.canonicalizer().cache_stats() {
        info!(hits = stats.hits, misses = stats.misses, entries = stats.len, "canonical cache");
    }

    let Some(motif) = extraction.best() else {
        warn!("no motif sampled; graph may be empty or smaller than min_size");
        return Ok(None);
    };

    let score = MotifCompressor::new().score(&graph, motif.graph(), motif.occurrences(), exact)?;
    info!(
        baseline_bits = score.baseline.as_bits(),
        compressed_bits = score.compressed.as_bits(),
        savings_bits = score.savings(),
        "motif scored"
    );

    Ok(Some(MotifReport::new(extractor.config(), &graph, &extraction, &motif, score, exact)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    info!(version = version, "Starting motif scan");

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: motif_scan <edge-list-path>")?;

    let config = config_from_env()?;
    let directed: bool = env_or("MOTIF_DIRECTED", false)?;
    let exact: bool = env_or("MOTIF_EXACT", true)?;
    let options = LoadOptions {
        simple: env_or("MOTIF_SIMPLE", false)?,
        ..LoadOptions::default()
    };

    let report = if directed {
        run::<Directed>(&path, config, &options, exact)?
    } else {
        run::<Undirected>(&path, config, &options, exact)?
    };

    if let Some(report) = report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!("Motif scan complete");
    Ok(())
}
