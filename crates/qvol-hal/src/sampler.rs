//! Sampler trait and configuration.
//!
//! The [`Sampler`] trait is the single capability the benchmark needs from
//! an executor: run a circuit a given number of times and report one
//! classical outcome per repetition.
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run()
//!    (sync, &ref)        (sync)      (sync, one unit of work)
//! ```
//!
//! A run either returns a complete [`SampleBatch`] or fails; there are no
//! partial results.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use qvol_ir::{Circuit, NoiseModel};

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::SampleBatch;

/// Configuration for a sampler instance.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Name under which results are reported.
    pub name: String,
    /// Registered sampler kind, e.g. `"ideal"` or `"noisy"`.
    pub kind: String,
    /// Noise channel for noisy kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseModel>,
    /// Override for the maximum circuit width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_qubits: Option<u32>,
    /// Additional kind-specific settings.
    #[serde(default, flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SamplerConfig {
    /// Create a new sampler configuration.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            noise: None,
            max_qubits: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the noise channel.
    #[must_use]
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Set the maximum circuit width.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = Some(max_qubits);
        self
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for SamplerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplerConfig")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("noise", &self.noise.map(|n| n.to_string()))
            .field("max_qubits", &self.max_qubits)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Trait for circuit executors.
///
/// Implementations are ideal simulators, noisy simulators, or wrappers
/// around hardware. The benchmark never branches on which one it holds.
///
/// # Contract
///
/// - `capabilities()` is synchronous and infallible; capabilities are
///   fixed at construction time.
/// - `run()` measures every qubit of `circuit` at the end of the circuit
///   (a circuit may already carry that terminal measurement) and returns
///   exactly `repetitions` outcomes in execution order.
/// - All randomness comes from `rng`. Executors without a software random
///   source (hardware) may ignore it.
pub trait Sampler: Send + Sync {
    /// Get the name of this sampler.
    fn name(&self) -> &str;

    /// Get the capabilities of this sampler.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a circuit against sampler constraints.
    ///
    /// The provided implementation checks the width limit and IR
    /// invariants.
    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let mut reasons = vec![];
        let caps = self.capabilities();
        if circuit.num_qubits() > caps.num_qubits {
            reasons.push(format!(
                "circuit has {} qubits but {} supports {}",
                circuit.num_qubits(),
                self.name(),
                caps.num_qubits
            ));
        }
        if let Err(e) = circuit.validate() {
            reasons.push(e.to_string());
        }
        if !circuit.measurements_are_terminal() {
            reasons.push("mid-circuit measurement".into());
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    /// Run `circuit` `repetitions` times and return the outcomes.
    fn run(
        &self,
        circuit: &Circuit,
        repetitions: u32,
        rng: &mut dyn RngCore,
    ) -> HalResult<SampleBatch>;
}

/// Result of circuit validation against sampler constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit can be run as-is.
    Valid,
    /// Circuit cannot run on this sampler.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Convert an `Invalid` result into [`HalError::InvalidCircuit`].
    pub fn into_result(self) -> HalResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { reasons } => {
                Err(HalError::InvalidCircuit(reasons.join("; ")))
            }
        }
    }
}

/// Check a repetition count against capabilities.
pub fn check_repetitions(caps: &Capabilities, repetitions: u32) -> HalResult<()> {
    if repetitions == 0 {
        return Err(HalError::InvalidRepetitions(
            "at least one repetition is required".into(),
        ));
    }
    if repetitions > caps.max_shots {
        return Err(HalError::InvalidRepetitions(format!(
            "{repetitions} requested but {} allows at most {}",
            caps.name, caps.max_shots
        )));
    }
    Ok(())
}

/// Trait for creating samplers from configuration.
pub trait SamplerFactory: Sampler + Sized {
    /// Create a sampler from configuration.
    fn from_config(config: SamplerConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use qvol_ir::QubitId;

    struct FixedSampler {
        caps: Capabilities,
    }

    impl Sampler for FixedSampler {
        fn name(&self) -> &str {
            "fixed"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn run(
            &self,
            circuit: &Circuit,
            repetitions: u32,
            _rng: &mut dyn RngCore,
        ) -> HalResult<SampleBatch> {
            check_repetitions(&self.caps, repetitions)?;
            Ok(SampleBatch::new(
                circuit.num_qubits(),
                vec![0; repetitions as usize],
            ))
        }
    }

    #[test]
    fn test_sampler_config_builder() {
        let config = SamplerConfig::new("noisy", "noisy")
            .with_noise(NoiseModel::Depolarizing { p: 0.005 })
            .with_max_qubits(12)
            .with_extra("label", serde_json::json!("depol"));

        assert_eq!(config.kind, "noisy");
        assert_eq!(config.max_qubits, Some(12));
        assert!(config.extra.contains_key("label"));
    }

    #[test]
    fn test_sampler_config_yaml_shape() {
        let json = r#"{"name":"n","kind":"noisy","noise":{"channel":"depolarizing","p":0.5}}"#;
        let config: SamplerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.noise, Some(NoiseModel::Depolarizing { p: 0.5 }));
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_default_validate_checks_width() {
        let sampler = FixedSampler {
            caps: Capabilities::simulator(2),
        };
        let ok = Circuit::bell().unwrap();
        assert!(sampler.validate(&ok).unwrap().is_valid());

        let wide = Circuit::ghz(3).unwrap();
        let result = sampler.validate(&wide).unwrap();
        assert!(!result.is_valid());
        assert!(matches!(
            result.into_result(),
            Err(HalError::InvalidCircuit(_))
        ));
    }

    #[test]
    fn test_default_validate_rejects_mid_circuit_measurement() {
        let sampler = FixedSampler {
            caps: Capabilities::simulator(4),
        };
        let mut circuit = Circuit::new("mid", 1);
        circuit.measure_all().unwrap();
        circuit.x(QubitId(0)).unwrap();
        assert!(!sampler.validate(&circuit).unwrap().is_valid());
    }

    #[test]
    fn test_check_repetitions() {
        let caps = Capabilities::simulator(2);
        assert!(check_repetitions(&caps, 1).is_ok());
        assert!(matches!(
            check_repetitions(&caps, 0),
            Err(HalError::InvalidRepetitions(_))
        ));
        assert!(check_repetitions(&caps, caps.max_shots + 1).is_err());
    }

    #[test]
    fn test_run_through_trait_object() {
        let sampler: Box<dyn Sampler> = Box::new(FixedSampler {
            caps: Capabilities::simulator(2),
        });
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let batch = sampler
            .run(&Circuit::bell().unwrap(), 5, &mut rng)
            .unwrap();
        assert_eq!(batch.len(), 5);
    }
}
