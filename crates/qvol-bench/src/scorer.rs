//! Heavy-set scoring of a sampler.

use rand::RngCore;
use std::borrow::Cow;
use tracing::{debug, instrument};

use qvol_hal::{HalError, Sampler};
use qvol_ir::Circuit;

use crate::error::{QvError, QvResult};
use crate::heavy::HeavySet;

/// Fraction of `repetitions` outcomes from `sampler` that land in `heavy_set`.
///
/// The circuit is handed to the sampler with a terminal measurement of
/// every qubit (appended unless already present). The scorer draws no
/// randomness of its own; `rng` is passed straight to the sampler. Sampler
/// failures surface as [`QvError::Execution`] and are never retried.
#[instrument(skip_all, fields(sampler = sampler.name(), circuit = circuit.name(), repetitions = repetitions))]
pub fn sample_heavy_set<S: Sampler + ?Sized>(
    circuit: &Circuit,
    heavy_set: &HeavySet,
    sampler: &S,
    repetitions: u32,
    rng: &mut dyn RngCore,
) -> QvResult<f64> {
    if repetitions == 0 {
        return Err(QvError::InvalidParameter(
            "repetitions must be positive".into(),
        ));
    }
    if heavy_set.num_qubits() != circuit.num_qubits() {
        return Err(QvError::InvalidParameter(format!(
            "heavy set over {} qubits does not match circuit width {}",
            heavy_set.num_qubits(),
            circuit.num_qubits()
        )));
    }

    let measured = if circuit.has_measurements() {
        Cow::Borrowed(circuit)
    } else {
        Cow::Owned(circuit.with_terminal_measurement()?)
    };

    let batch = sampler.run(&measured, repetitions, rng)?;
    if batch.len() != repetitions as usize {
        return Err(HalError::ExecutionFailed(format!(
            "{} returned {} outcomes for {} repetitions",
            sampler.name(),
            batch.len(),
            repetitions
        ))
        .into());
    }

    let heavy = heavy_set.count_heavy(&batch.outcomes);
    let probability = heavy as f64 / f64::from(repetitions);
    debug!(heavy, probability, "scored batch");
    Ok(probability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qvol_adapter_sim::IdealSampler;
    use qvol_hal::{Capabilities, HalResult, SampleBatch};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::heavy::compute_heavy_set;

    /// Returns a fixed outcome list, ignoring the requested count.
    struct Scripted {
        caps: Capabilities,
        outcomes: Vec<u64>,
    }

    impl Sampler for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }
        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }
        fn run(&self, c: &Circuit, _: u32, _: &mut dyn RngCore) -> HalResult<SampleBatch> {
            Ok(SampleBatch::new(c.num_qubits(), self.outcomes.clone()))
        }
    }

    struct Failing;

    impl Sampler for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn capabilities(&self) -> &Capabilities {
            unimplemented!()
        }
        fn run(&self, _: &Circuit, _: u32, _: &mut dyn RngCore) -> HalResult<SampleBatch> {
            Err(HalError::ExecutionFailed("device offline".into()))
        }
    }

    #[test]
    fn test_fraction_of_heavy_outcomes() {
        let circuit = Circuit::bell().unwrap();
        let heavy = compute_heavy_set(&circuit).unwrap();
        let sampler = Scripted {
            caps: Capabilities::simulator(2),
            outcomes: vec![0b00, 0b01, 0b11, 0b11],
        };
        let mut rng = SmallRng::seed_from_u64(0);
        let p = sample_heavy_set(&circuit, &heavy, &sampler, 4, &mut rng).unwrap();
        assert!((p - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ideal_sampler_on_bell_is_always_heavy() {
        let circuit = Circuit::bell().unwrap();
        let heavy = compute_heavy_set(&circuit).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let p = sample_heavy_set(&circuit, &heavy, &IdealSampler::new(), 200, &mut rng).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_batch_length_is_execution_error() {
        let circuit = Circuit::bell().unwrap();
        let heavy = compute_heavy_set(&circuit).unwrap();
        let sampler = Scripted {
            caps: Capabilities::simulator(2),
            outcomes: vec![0; 3],
        };
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            sample_heavy_set(&circuit, &heavy, &sampler, 4, &mut rng),
            Err(QvError::Execution(_))
        ));
    }

    #[test]
    fn test_sampler_failure_propagates() {
        let circuit = Circuit::bell().unwrap();
        let heavy = compute_heavy_set(&circuit).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let err = sample_heavy_set(&circuit, &heavy, &Failing, 10, &mut rng).unwrap_err();
        assert!(matches!(err, QvError::Execution(HalError::ExecutionFailed(_))));
    }

    #[test]
    fn test_zero_repetitions() {
        let circuit = Circuit::bell().unwrap();
        let heavy = compute_heavy_set(&circuit).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            sample_heavy_set(&circuit, &heavy, &IdealSampler::new(), 0, &mut rng),
            Err(QvError::InvalidParameter(_))
        ));
    }
}
