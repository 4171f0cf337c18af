//! Experiment configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML, or JSON by `.json` extension)
//! 2. Environment variables (with QVOL_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;

use qvol_hal::SamplerConfig;
use qvol_ir::NoiseModel;

use crate::error::{QvError, QvResult};
use crate::heavy::HeavySetPolicy;
use crate::model::MAX_MODEL_WIDTH;

/// Parameters of one QV experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Depths to sweep, in report order.
    #[serde(default = "default_depths")]
    pub depths: Vec<u32>,
    /// Random model circuits per depth.
    #[serde(default = "default_repetitions")]
    pub num_repetitions: u32,
    /// Samples drawn from every sampler per circuit.
    #[serde(default = "default_shots")]
    pub shots: u32,
    /// Fixed width; `None` runs square circuits with width equal to depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Seed for the experiment's random stream.
    #[serde(default)]
    pub seed: u64,
    /// Heavy-set rule.
    #[serde(default)]
    pub heavy_set_policy: HeavySetPolicy,
    /// Samplers to score, in report order.
    #[serde(default = "default_samplers")]
    pub samplers: Vec<SamplerConfig>,
}

fn default_depths() -> Vec<u32> {
    vec![2, 3, 4, 5]
}

fn default_repetitions() -> u32 {
    50
}

fn default_shots() -> u32 {
    1000
}

fn default_samplers() -> Vec<SamplerConfig> {
    vec![
        SamplerConfig::new("ideal", "ideal"),
        SamplerConfig::new("noisy", "noisy").with_noise(NoiseModel::Depolarizing { p: 0.005 }),
    ]
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            depths: default_depths(),
            num_repetitions: default_repetitions(),
            shots: default_shots(),
            width: None,
            seed: 0,
            heavy_set_policy: HeavySetPolicy::default(),
            samplers: default_samplers(),
        }
    }
}

impl ExperimentConfig {
    /// Square-circuit sweep over `depths` with default settings otherwise.
    pub fn new(depths: Vec<u32>) -> Self {
        Self {
            depths,
            ..Self::default()
        }
    }

    /// Set the number of circuits per depth.
    #[must_use]
    pub fn with_repetitions(mut self, num_repetitions: u32) -> Self {
        self.num_repetitions = num_repetitions;
        self
    }

    /// Set the samples per circuit and sampler.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Fix the circuit width independently of depth.
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the heavy-set rule.
    #[must_use]
    pub fn with_policy(mut self, policy: HeavySetPolicy) -> Self {
        self.heavy_set_policy = policy;
        self
    }

    /// Replace the sampler list.
    #[must_use]
    pub fn with_samplers(mut self, samplers: Vec<SamplerConfig>) -> Self {
        self.samplers = samplers;
        self
    }

    /// Width used at `depth`.
    pub fn width_for(&self, depth: u32) -> u32 {
        self.width.unwrap_or(depth)
    }

    /// Parse YAML and validate.
    pub fn from_yaml_str(contents: &str) -> QvResult<Self> {
        let config: Self =
            serde_yaml_ng::from_str(contents).map_err(|e| QvError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON and validate.
    pub fn from_json_str(contents: &str) -> QvResult<Self> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| QvError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> QvResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QvError::Config(format!("{}: {e}", path.display())))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&str>) -> QvResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `QVOL_*` environment variables.
    pub fn merge_env(&mut self) -> QvResult<()> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from a variable lookup.
    ///
    /// Recognised keys: `QVOL_DEPTHS` (comma list), `QVOL_REPETITIONS`,
    /// `QVOL_SHOTS`, `QVOL_WIDTH`, `QVOL_SEED`. Unparsable values are errors.
    pub fn merge_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> QvResult<()> {
        if let Some(depths) = lookup("QVOL_DEPTHS") {
            self.depths = depths
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_var::<u32>("QVOL_DEPTHS", s))
                .collect::<QvResult<Vec<_>>>()?;
        }
        if let Some(v) = lookup("QVOL_REPETITIONS") {
            self.num_repetitions = parse_var("QVOL_REPETITIONS", &v)?;
        }
        if let Some(v) = lookup("QVOL_SHOTS") {
            self.shots = parse_var("QVOL_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QVOL_WIDTH") {
            self.width = Some(parse_var("QVOL_WIDTH", &v)?);
        }
        if let Some(v) = lookup("QVOL_SEED") {
            self.seed = parse_var("QVOL_SEED", &v)?;
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> QvResult<()> {
        self.validate_sweep()?;
        if self.samplers.is_empty() {
            return Err(QvError::InvalidParameter(
                "at least one sampler is required".into(),
            ));
        }
        let mut names: Vec<&str> = self.samplers.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(QvError::InvalidParameter(format!(
                "duplicate sampler name '{}'",
                pair[0]
            )));
        }
        Ok(())
    }

    /// Validate depths, widths, repetitions and shots, ignoring samplers.
    pub fn validate_sweep(&self) -> QvResult<()> {
        if self.depths.is_empty() {
            return Err(QvError::InvalidParameter("depths must not be empty".into()));
        }
        if self.depths.contains(&0) {
            return Err(QvError::InvalidParameter("depths must be positive".into()));
        }
        if self.num_repetitions == 0 {
            return Err(QvError::InvalidParameter(
                "num_repetitions must be positive".into(),
            ));
        }
        if self.shots == 0 {
            return Err(QvError::InvalidParameter("shots must be positive".into()));
        }
        for &depth in &self.depths {
            let width = self.width_for(depth);
            if width == 0 || width > MAX_MODEL_WIDTH {
                return Err(QvError::InvalidParameter(format!(
                    "width {width} at depth {depth} is outside 1..={MAX_MODEL_WIDTH}"
                )));
            }
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> QvResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| QvError::InvalidParameter(format!("{key}={value} is not a valid number")))
}
