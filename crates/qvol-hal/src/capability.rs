//! Executor capability introspection.
//!
//! [`Capabilities`] describes what a sampler can run: its width limit,
//! repetition limit, whether it is a simulator, and which noise channel (if
//! any) it layers over the circuit. The QV driver only relies on the width
//! and repetition limits; the rest is reported alongside results.

use serde::{Deserialize, Serialize};

use qvol_ir::NoiseModel;

/// Capabilities of a sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the sampler.
    pub name: String,
    /// Maximum circuit width.
    pub num_qubits: u32,
    /// Maximum repetitions per run.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Noise channel applied by the executor on top of the circuit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseModel>,
    /// Additional capability flags, e.g. `"statevector"`, `"trajectories"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a noiseless statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            max_shots: 1_000_000,
            is_simulator: true,
            noise: None,
            features: vec!["statevector".into()],
        }
    }

    /// Create capabilities for a noisy trajectory simulator.
    pub fn noisy_simulator(num_qubits: u32, noise: NoiseModel) -> Self {
        Self {
            name: "noisy_simulator".into(),
            num_qubits,
            max_shots: 1_000_000,
            is_simulator: true,
            noise: Some(noise),
            features: vec!["statevector".into(), "trajectories".into()],
        }
    }

    /// Rename the capabilities, keeping everything else.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check whether a feature flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}
