//! Monte-Carlo trajectory sampler for Pauli noise.
//!
//! Every repetition evolves its own trajectory: after each moment the
//! configured channel draws an independent Pauli error for every qubit of
//! the circuit (idle or not), so the averaged outcome distribution matches
//! the density-matrix evolution of the same channel. Explicit
//! [`InstructionKind::NoiseChannel`] operations inside the circuit are
//! sampled the same way. Readout errors leave the state alone and flip
//! the reported bit instead.

use rand::{Rng, RngCore};
use std::time::Instant;
use tracing::{debug, instrument};

use qvol_hal::{
    Capabilities, HalError, HalResult, SampleBatch, Sampler, SamplerConfig, SamplerFactory,
    check_repetitions,
};
use qvol_ir::{Circuit, InstructionKind, Moment, NoiseModel, QubitId};

use crate::simulator::{MAX_EXACT_QUBITS, cumulative, draw, resolve_max_qubits};
use crate::statevector::Statevector;

/// Trajectory sampler applying a constant per-qubit channel after every moment.
pub struct NoisySampler {
    name: String,
    noise: NoiseModel,
    capabilities: Capabilities,
}

impl NoisySampler {
    /// Create a noisy sampler for `noise`.
    pub fn new(noise: NoiseModel) -> HalResult<Self> {
        Self::named("noisy", noise, MAX_EXACT_QUBITS)
    }

    /// Convenience constructor for a depolarizing channel.
    pub fn depolarizing(p: f64) -> HalResult<Self> {
        Self::new(NoiseModel::Depolarizing { p })
    }

    fn named(name: impl Into<String>, noise: NoiseModel, max_qubits: u32) -> HalResult<Self> {
        noise.validate()?;
        let name = name.into();
        let capabilities = Capabilities::noisy_simulator(max_qubits.min(MAX_EXACT_QUBITS), noise)
            .with_name(name.clone());
        Ok(Self {
            name,
            noise,
            capabilities,
        })
    }

    /// Rename the sampler, e.g. to tell several instances apart in a report.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.capabilities = self.capabilities.with_name(self.name.clone());
        self
    }

    /// The channel applied after every moment.
    pub fn noise(&self) -> NoiseModel {
        self.noise
    }

    /// Run one trajectory and return its measured outcome.
    fn trajectory(&self, circuit: &Circuit, rng: &mut dyn RngCore) -> u64 {
        let num_qubits = circuit.num_qubits();
        let mut sv = Statevector::new(num_qubits);
        let mut readout: Vec<(QubitId, f64)> = Vec::new();

        for moment in circuit.moments() {
            if is_measurement_moment(moment) {
                continue;
            }
            for op in moment.operations() {
                match &op.kind {
                    InstructionKind::Gate(gate) => sv.apply_gate(gate, &op.qubits),
                    InstructionKind::NoiseChannel { model } if model.is_readout() => {
                        readout.extend(op.qubits.iter().map(|&q| (q, model.error_param())));
                    }
                    InstructionKind::NoiseChannel { model } => {
                        for &q in &op.qubits {
                            apply_channel(&mut sv, *model, q, rng);
                        }
                    }
                    // Terminal measurement lives in its own moment.
                    InstructionKind::Measure => {}
                }
            }
            if !self.noise.is_readout() {
                for q in (0..num_qubits).map(QubitId) {
                    apply_channel(&mut sv, self.noise, q, rng);
                }
            }
        }

        let cdf = cumulative(&sv.probabilities());
        let mut outcome = draw(&cdf, rng);

        if self.noise.is_readout() {
            let p = self.noise.error_param();
            readout.extend((0..num_qubits).map(|q| (QubitId(q), p)));
        }
        for (qubit, p) in readout {
            if rng.r#gen::<f64>() < p {
                outcome ^= 1 << qubit.0;
            }
        }
        outcome
    }
}

fn is_measurement_moment(moment: &Moment) -> bool {
    !moment.is_empty() && moment.operations().iter().all(|op| op.is_measure())
}

fn apply_channel(sv: &mut Statevector, model: NoiseModel, qubit: QubitId, rng: &mut dyn RngCore) {
    if let Some(pauli) = model.pauli_for_draw(rng.r#gen::<f64>()) {
        sv.apply_pauli(qubit, pauli);
    }
}

impl Sampler for NoisySampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, circuit, rng), fields(sampler = %self.name, noise = %self.noise))]
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
        if !circuit.measurements_are_terminal() {
            return Err(HalError::InvalidCircuit("mid-circuit measurement".into()));
        }
        circuit.validate()?;

        let start = Instant::now();
        let outcomes: Vec<u64> = (0..repetitions)
            .map(|_| self.trajectory(circuit, &mut *rng))
            .collect();

        debug!(
            num_qubits = circuit.num_qubits(),
            repetitions,
            elapsed_us = start.elapsed().as_micros() as u64,
            "trajectory sampling complete"
        );

        Ok(SampleBatch::new(circuit.num_qubits(), outcomes))
    }
}

impl SamplerFactory for NoisySampler {
    fn from_config(config: SamplerConfig) -> HalResult<Self> {
        let noise = config.noise.ok_or_else(|| {
            HalError::Configuration(format!(
                "noisy sampler '{}' needs a noise channel",
                config.name
            ))
        })?;
        let max_qubits = resolve_max_qubits(&config);
        Self::named(config.name, noise, max_qubits)
    }
}
