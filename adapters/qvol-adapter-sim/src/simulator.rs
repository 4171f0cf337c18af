//! Exact evolution and the ideal sampler.

use rand::{Rng, RngCore};
use std::time::Instant;
use tracing::{debug, instrument};

use qvol_hal::{
    Capabilities, HalError, HalResult, SampleBatch, Sampler, SamplerConfig, SamplerFactory,
    check_repetitions,
};
use qvol_ir::{Circuit, Instruction, InstructionKind, Moment};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Widest circuit simulated exactly (2^24 amplitudes, 256 MiB).
pub const MAX_EXACT_QUBITS: u32 = 24;

/// Allowed deviation of the final squared norm from 1.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-6;

/// Evolve |0…0⟩ through a measurement-free, noise-free circuit.
///
/// Fails with [`SimError::NonUnitary`] if any measurement or noise channel is
/// present, with [`SimError::TooManyQubits`] above [`MAX_EXACT_QUBITS`], and
/// with [`SimError::Ir`] if the circuit is malformed.
pub fn simulate(circuit: &Circuit) -> SimResult<Statevector> {
    check_width(circuit.num_qubits(), MAX_EXACT_QUBITS)?;
    circuit.validate()?;
    evolve(circuit.num_qubits(), circuit.moments())
}

pub(crate) fn check_width(num_qubits: u32, max: u32) -> SimResult<()> {
    if num_qubits > max {
        return Err(SimError::TooManyQubits { num_qubits, max });
    }
    Ok(())
}

/// Apply every moment in order; only gates are accepted.
pub(crate) fn evolve(num_qubits: u32, moments: &[Moment]) -> SimResult<Statevector> {
    let mut sv = Statevector::new(num_qubits);
    for (index, moment) in moments.iter().enumerate() {
        for op in moment.operations() {
            match &op.kind {
                InstructionKind::Gate(gate) => sv.apply_gate(gate, &op.qubits),
                InstructionKind::Measure | InstructionKind::NoiseChannel { .. } => {
                    return Err(SimError::NonUnitary {
                        operation: op.name().to_string(),
                        moment: index,
                    });
                }
            }
        }
    }

    let norm_sqr = sv.norm_sqr();
    if (norm_sqr - 1.0).abs() > NORMALIZATION_TOLERANCE {
        return Err(SimError::Normalization { norm_sqr });
    }
    Ok(sv)
}

/// Moments before a trailing measurement-only moment, if there is one.
pub(crate) fn strip_terminal_measurement(circuit: &Circuit) -> &[Moment] {
    match circuit.moments().split_last() {
        Some((last, body))
            if !last.is_empty() && last.operations().iter().all(Instruction::is_measure) =>
        {
            body
        }
        _ => circuit.moments(),
    }
}

/// Running totals of a probability vector, for inverse-CDF lookup.
pub(crate) fn cumulative(probabilities: &[f64]) -> Vec<f64> {
    probabilities
        .iter()
        .scan(0.0, |acc, &p| {
            *acc += p;
            Some(*acc)
        })
        .collect()
}

/// Draw one outcome from running totals.
pub(crate) fn draw(cdf: &[f64], rng: &mut dyn RngCore) -> u64 {
    let total = cdf.last().copied().unwrap_or(0.0);
    let r = rng.r#gen::<f64>() * total;
    let index = cdf.partition_point(|&c| c <= r);
    index.min(cdf.len().saturating_sub(1)) as u64
}

/// Noiseless statevector sampler.
///
/// Simulates the circuit once per run and draws every repetition from the
/// exact output distribution.
pub struct IdealSampler {
    name: String,
    capabilities: Capabilities,
}

impl IdealSampler {
    /// Create an ideal sampler with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(MAX_EXACT_QUBITS)
    }

    /// Create an ideal sampler with a custom width limit.
    ///
    /// The limit is clamped to [`MAX_EXACT_QUBITS`].
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::named("ideal", max_qubits)
    }

    /// Rename the sampler, e.g. to tell several instances apart in a report.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.capabilities = self.capabilities.with_name(self.name.clone());
        self
    }

    fn named(name: impl Into<String>, max_qubits: u32) -> Self {
        let name = name.into();
        let capabilities =
            Capabilities::simulator(max_qubits.min(MAX_EXACT_QUBITS)).with_name(name.clone());
        Self { name, capabilities }
    }
}

impl Default for IdealSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for IdealSampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, circuit, rng), fields(sampler = %self.name, circuit = %circuit.name()))]
    fn run(
        &self,
        circuit: &Circuit,
        repetitions: u32,
        rng: &mut dyn RngCore,
    ) -> HalResult<SampleBatch> {
        check_repetitions(&self.capabilities, repetitions)?;
        if circuit.num_qubits() > self.capabilities.num_qubits {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but {} only supports {}",
                circuit.num_qubits(),
                self.name,
                self.capabilities.num_qubits
            )));
        }
        circuit.validate()?;
        if circuit.has_noise() {
            return Err(HalError::Unsupported(format!(
                "{} does not simulate noise channels",
                self.name
            )));
        }
        if !circuit.measurements_are_terminal() {
            return Err(HalError::InvalidCircuit(
                "mid-circuit measurement".into(),
            ));
        }

        let start = Instant::now();
        let sv = evolve(circuit.num_qubits(), strip_terminal_measurement(circuit))?;
        let cdf = cumulative(&sv.probabilities());
        let outcomes: Vec<u64> = (0..repetitions).map(|_| draw(&cdf, &mut *rng)).collect();

        debug!(
            num_qubits = circuit.num_qubits(),
            repetitions,
            elapsed_us = start.elapsed().as_micros() as u64,
            "ideal sampling complete"
        );

        Ok(SampleBatch::new(circuit.num_qubits(), outcomes))
    }
}

impl SamplerFactory for IdealSampler {
    fn from_config(config: SamplerConfig) -> HalResult<Self> {
        if let Some(noise) = config.noise {
            return Err(HalError::Configuration(format!(
                "ideal sampler '{}' cannot take a noise channel ({noise})",
                config.name
            )));
        }
        let max_qubits = resolve_max_qubits(&config);
        Ok(Self::named(config.name, max_qubits))
    }
}

/// Width limit from `max_qubits`, then `extra.max_qubits`, then the default.
pub(crate) fn resolve_max_qubits(config: &SamplerConfig) -> u32 {
    config
        .max_qubits
        .or_else(|| {
            config
                .extra
                .get("max_qubits")
                .and_then(serde_json::Value::as_u64)
                .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        })
        .unwrap_or(MAX_EXACT_QUBITS)
}
