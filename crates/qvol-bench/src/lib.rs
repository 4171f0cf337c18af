//! Quantum Volume benchmarking.
//!
//! Builds random model circuits, evaluates them exactly to find their heavy
//! outputs, and scores how often a sampler lands in that heavy set:
//!
//! - [`model`]: random square (or rectangular) circuits of Haar SU(4) layers
//! - [`heavy`]: ideal distributions and heavy sets
//! - [`scorer`]: heavy-output generation (HOG) probability of one sampler
//! - [`experiment`]: per-depth aggregation over many circuits and samplers
//! - [`qv`]: report types and the quantum-volume verdict
//!
//! # Example
//!
//! ```
//! use qvol_bench::{ExperimentConfig, build_samplers, run_experiment};
//! use qvol_hal::SamplerConfig;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let config = ExperimentConfig::new(vec![2, 3])
//!     .with_repetitions(5)
//!     .with_shots(100)
//!     .with_samplers(vec![SamplerConfig::new("ideal", "ideal")]);
//! let samplers = build_samplers(&config).unwrap();
//! let mut rng = SmallRng::seed_from_u64(1);
//!
//! let report = run_experiment(&config, &mut rng, &samplers).unwrap();
//! assert_eq!(report.series("ideal").unwrap().points.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod experiment;
pub mod haar;
pub mod heavy;
pub mod model;
pub mod qv;
pub mod scorer;

pub use config::ExperimentConfig;
pub use error::{QvError, QvResult};
pub use experiment::{
    HogAccumulator, build_samplers, run_configured, run_experiment, run_experiment_parallel,
};
pub use heavy::{
    HeavySet, HeavySetPolicy, IdealDistribution, compute_heavy_set, compute_heavy_set_with_policy,
    compute_ideal_distribution,
};
pub use model::{MAX_MODEL_WIDTH, generate_model_circuit};
pub use qv::{ASYMPTOTIC_IDEAL_HOG, ExperimentReport, HOG_THRESHOLD, HogPoint, SamplerSeries};
pub use scorer::sample_heavy_set;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Name of the benchmark.
    pub name: String,
    /// Primary metric value.
    pub value: f64,
    /// Unit of the primary metric.
    pub unit: String,
    /// Total wall-clock time.
    pub duration: Duration,
    /// Additional metrics.
    pub metrics: serde_json::Map<String, serde_json::Value>,
}

impl BenchmarkResult {
    /// Create a new benchmark result.
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            duration: Duration::ZERO,
            metrics: serde_json::Map::new(),
        }
    }

    /// Set the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add a metric.
    #[must_use]
    pub fn with_metric(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metrics.insert(key.into(), value.into());
        self
    }
}
