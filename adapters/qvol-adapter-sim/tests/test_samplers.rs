//! Integration tests for the simulator samplers.

use num_complex::Complex64;
use qvol_adapter_sim::{IdealSampler, NoisySampler, register_builtin, simulate};
use qvol_hal::{HalError, Sampler, SamplerConfig, SamplerRegistry};
use qvol_ir::{Circuit, NoiseModel, QubitId, StandardGate, UnitaryGate};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn registry() -> SamplerRegistry {
    let mut registry = SamplerRegistry::new();
    register_builtin(&mut registry);
    registry
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn test_builtin_kinds() {
    assert_eq!(registry().kinds(), vec!["ideal", "noisy"]);
}

#[test]
fn test_create_from_configs() {
    let configs = vec![
        SamplerConfig::new("exact", "ideal"),
        SamplerConfig::new("depol", "noisy").with_noise(NoiseModel::Depolarizing { p: 0.01 }),
    ];
    let samplers = registry().create_all(&configs).unwrap();
    let names: Vec<_> = samplers.iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["exact", "depol"]);
    assert!(samplers[0].capabilities().noise.is_none());
    assert!(samplers[1].capabilities().noise.is_some());
}

#[test]
fn test_unknown_kind() {
    let result = registry().create(&SamplerConfig::new("hw", "hardware"));
    assert!(matches!(result, Err(HalError::UnknownSampler(_))));
}

// ---------------------------------------------------------------------------
// Ideal vs noisy agreement
// ---------------------------------------------------------------------------

#[test]
fn test_samplers_agree_without_noise() {
    let mut circuit = Circuit::new("mix", 2);
    circuit
        .ry(0.9, QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .rx(0.4, QubitId(1))
        .unwrap();

    let probs = simulate(&circuit).unwrap().probabilities();
    let shots = 20_000u32;

    let ideal = IdealSampler::new()
        .run_counts(&circuit, shots, 1)
        .expect("ideal run");
    let noisy = NoisySampler::depolarizing(0.0)
        .unwrap()
        .run_counts(&circuit, shots, 2)
        .expect("noisy run");

    for (outcome, p) in probs.iter().enumerate() {
        let expected = p * f64::from(shots);
        let tolerance = 5.0 * (expected.max(1.0)).sqrt() + 5.0;
        assert!((ideal[outcome] as f64 - expected).abs() < tolerance);
        assert!((noisy[outcome] as f64 - expected).abs() < tolerance);
    }
}

#[test]
fn test_unitary_gate_simulation() {
    // iSWAP-like phase on |01⟩ and |10⟩ leaves the populations swapped.
    let o = Complex64::new(0.0, 0.0);
    let l = Complex64::new(1.0, 0.0);
    let i = Complex64::new(0.0, 1.0);
    #[rustfmt::skip]
    let m = vec![
        l, o, o, o,
        o, o, i, o,
        o, i, o, o,
        o, o, o, l,
    ];
    let gate = UnitaryGate::new("iswap", 2, m).unwrap();

    let mut circuit = Circuit::new("u", 2);
    circuit.gate(StandardGate::X, [QubitId(0)]).unwrap();
    circuit.gate(gate, [QubitId(0), QubitId(1)]).unwrap();

    let probs = simulate(&circuit).unwrap().probabilities();
    assert!((probs[0b10] - 1.0).abs() < 1e-12);
}

trait RunCounts {
    fn run_counts(&self, circuit: &Circuit, shots: u32, seed: u64) -> Result<Vec<u64>, HalError>;
}

impl<S: Sampler> RunCounts for S {
    fn run_counts(&self, circuit: &Circuit, shots: u32, seed: u64) -> Result<Vec<u64>, HalError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let batch = self.run(circuit, shots, &mut rng)?;
        let mut hist = vec![0u64; 1 << circuit.num_qubits()];
        for outcome in batch.outcomes {
            hist[outcome as usize] += 1;
        }
        Ok(hist)
    }
}
