//! Experiment aggregation.
//!
//! For every depth and trial a fresh model circuit is built, its heavy set
//! computed, and every sampler scored against it. Per-trial probabilities
//! land in a [`HogAccumulator`] slot keyed by sampler and depth.
//!
//! Randomness is split per trial: one `u64` seed is drawn from the caller's
//! rng for each (depth, trial) in order. The trial seeds its own
//! [`SmallRng`], builds the circuit from it and then draws one seed per
//! sampler. Trials therefore never share a random stream, and the
//! sequential and rayon-parallel runners produce identical reports.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, instrument};

use qvol_hal::{Sampler, SamplerRegistry};
use qvol_ir::Circuit;

use crate::config::ExperimentConfig;
use crate::error::{QvError, QvResult};
use crate::heavy::{HeavySetPolicy, compute_heavy_set_with_policy};
use crate::model::generate_model_circuit;
use crate::qv::{ExperimentReport, HogPoint, SamplerSeries};
use crate::scorer::sample_heavy_set;

/// Per-(sampler, depth) HOG probability store.
///
/// Each slot keeps the running sum and the per-trial values in the order
/// they were recorded.
#[derive(Debug, Clone)]
pub struct HogAccumulator {
    samplers: Vec<String>,
    /// `(depth, width)` per depth index.
    layout: Vec<(u32, u32)>,
    /// `slots[sampler][depth_index]`.
    slots: Vec<Vec<Slot>>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    sum: f64,
    trials: Vec<f64>,
}

impl HogAccumulator {
    /// Empty accumulator for `samplers` over `layout` (`(depth, width)` pairs).
    pub fn new(samplers: Vec<String>, layout: Vec<(u32, u32)>) -> Self {
        let slots = samplers
            .iter()
            .map(|_| vec![Slot::default(); layout.len()])
            .collect();
        Self {
            samplers,
            layout,
            slots,
        }
    }

    /// Record one trial's probability for sampler `sampler` at depth index `depth_index`.
    pub fn record(&mut self, sampler: usize, depth_index: usize, probability: f64) -> QvResult<()> {
        let slot = self
            .slots
            .get_mut(sampler)
            .and_then(|row| row.get_mut(depth_index))
            .ok_or_else(|| {
                QvError::InvalidParameter(format!(
                    "no accumulator slot for sampler {sampler} at depth index {depth_index}"
                ))
            })?;
        slot.sum += probability;
        slot.trials.push(probability);
        Ok(())
    }

    /// Record one probability per sampler, in sampler order.
    pub fn record_trial(&mut self, depth_index: usize, probabilities: &[f64]) -> QvResult<()> {
        if probabilities.len() != self.samplers.len() {
            return Err(QvError::InvalidParameter(format!(
                "trial produced {} probabilities for {} samplers",
                probabilities.len(),
                self.samplers.len()
            )));
        }
        for (sampler, &p) in probabilities.iter().enumerate() {
            self.record(sampler, depth_index, p)?;
        }
        Ok(())
    }

    /// Running sum for a slot.
    pub fn sum(&self, sampler: usize, depth_index: usize) -> Option<f64> {
        self.slot(sampler, depth_index).map(|s| s.sum)
    }

    /// Average over the trials recorded so far in a slot.
    pub fn mean(&self, sampler: usize, depth_index: usize) -> Option<f64> {
        self.slot(sampler, depth_index)
            .filter(|s| !s.trials.is_empty())
            .map(|s| s.sum / s.trials.len() as f64)
    }

    /// Number of trials recorded in a slot.
    pub fn num_trials(&self, sampler: usize, depth_index: usize) -> usize {
        self.slot(sampler, depth_index).map_or(0, |s| s.trials.len())
    }

    fn slot(&self, sampler: usize, depth_index: usize) -> Option<&Slot> {
        self.slots.get(sampler).and_then(|row| row.get(depth_index))
    }

    /// Turn the accumulated trials into a report.
    pub fn into_report(
        self,
        seed: Option<u64>,
        heavy_set_policy: HeavySetPolicy,
    ) -> ExperimentReport {
        let layout = self.layout;
        let series = self
            .samplers
            .into_iter()
            .zip(self.slots)
            .map(|(sampler, row)| SamplerSeries {
                sampler,
                points: layout
                    .iter()
                    .zip(row)
                    .map(|(&(depth, width), slot)| HogPoint::from_trials(depth, width, slot.trials))
                    .collect(),
            })
            .collect();
        ExperimentReport {
            seed,
            heavy_set_policy,
            series,
        }
    }
}

/// Build the samplers named in `config` using the built-in simulator kinds.
pub fn build_samplers(config: &ExperimentConfig) -> QvResult<Vec<Box<dyn Sampler>>> {
    let mut registry = SamplerRegistry::new();
    qvol_adapter_sim::register_builtin(&mut registry);
    Ok(registry.create_all(&config.samplers)?)
}

/// Run the experiment described entirely by `config`.
///
/// Samplers come from [`build_samplers`] and the random stream is seeded
/// from `config.seed`, which is recorded in the report. Trials run on the
/// rayon pool.
pub fn run_configured(config: &ExperimentConfig) -> QvResult<ExperimentReport> {
    config.validate()?;
    let samplers = build_samplers(config)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut report = run_experiment_parallel(config, &mut rng, &samplers)?;
    report.seed = Some(config.seed);
    Ok(report)
}

/// Run every trial sequentially.
///
/// Fails fast on the first error; no trial result is substituted. The report
/// carries no seed since `rng` is opaque here; `config.seed` is not used.
#[instrument(skip_all, fields(depths = ?config.depths, repetitions = config.num_repetitions))]
pub fn run_experiment(
    config: &ExperimentConfig,
    rng: &mut dyn RngCore,
    samplers: &[Box<dyn Sampler>],
) -> QvResult<ExperimentReport> {
    let mut acc = prepare(config, samplers)?;
    let start = Instant::now();

    for (depth_index, &depth) in config.depths.iter().enumerate() {
        let width = config.width_for(depth);
        for trial in 0..config.num_repetitions {
            let trial_seed = rng.next_u64();
            let probabilities = run_trial(config, width, depth, trial_seed, samplers)?;
            debug!(depth, trial, ?probabilities, "trial complete");
            acc.record_trial(depth_index, &probabilities)?;
        }
        log_depth(&acc, samplers, depth_index, depth, width);
    }

    info!(elapsed = ?start.elapsed(), "experiment complete");
    Ok(acc.into_report(None, config.heavy_set_policy))
}

/// Run the trials of each depth concurrently on the rayon pool.
///
/// Trial seeds are drawn from `rng` in the same order as
/// [`run_experiment`] and results are recorded in trial order, so the
/// report is identical to the sequential one.
#[instrument(skip_all, fields(depths = ?config.depths, repetitions = config.num_repetitions))]
pub fn run_experiment_parallel(
    config: &ExperimentConfig,
    rng: &mut dyn RngCore,
    samplers: &[Box<dyn Sampler>],
) -> QvResult<ExperimentReport> {
    let mut acc = prepare(config, samplers)?;
    let start = Instant::now();

    for (depth_index, &depth) in config.depths.iter().enumerate() {
        let width = config.width_for(depth);
        let seeds: Vec<u64> = (0..config.num_repetitions)
            .map(|_| rng.next_u64())
            .collect();

        let results = seeds
            .par_iter()
            .map(|&seed| run_trial(config, width, depth, seed, samplers))
            .collect::<QvResult<Vec<_>>>()?;

        for probabilities in &results {
            acc.record_trial(depth_index, probabilities)?;
        }
        log_depth(&acc, samplers, depth_index, depth, width);
    }

    info!(elapsed = ?start.elapsed(), "experiment complete");
    Ok(acc.into_report(None, config.heavy_set_policy))
}

fn prepare(config: &ExperimentConfig, samplers: &[Box<dyn Sampler>]) -> QvResult<HogAccumulator> {
    config.validate_sweep()?;
    if samplers.is_empty() {
        return Err(QvError::InvalidParameter(
            "at least one sampler is required".into(),
        ));
    }
    let names: Vec<String> = samplers.iter().map(|s| s.name().to_string()).collect();
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(QvError::InvalidParameter(format!(
                "duplicate sampler name '{name}'"
            )));
        }
    }
    let layout = config
        .depths
        .iter()
        .map(|&d| (d, config.width_for(d)))
        .collect();
    Ok(HogAccumulator::new(names, layout))
}

/// One trial: circuit, heavy set, then one score per sampler.
fn run_trial(
    config: &ExperimentConfig,
    width: u32,
    depth: u32,
    trial_seed: u64,
    samplers: &[Box<dyn Sampler>],
) -> QvResult<Vec<f64>> {
    let mut trial_rng = SmallRng::seed_from_u64(trial_seed);
    let circuit: Circuit = generate_model_circuit(width, depth, &mut trial_rng)?;
    let heavy = compute_heavy_set_with_policy(&circuit, config.heavy_set_policy)?;
    let sampler_seeds: Vec<u64> = samplers.iter().map(|_| trial_rng.next_u64()).collect();

    samplers
        .iter()
        .zip(sampler_seeds)
        .map(|(sampler, seed)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            sample_heavy_set(&circuit, &heavy, sampler.as_ref(), config.shots, &mut rng)
        })
        .collect()
}

fn log_depth(
    acc: &HogAccumulator,
    samplers: &[Box<dyn Sampler>],
    depth_index: usize,
    depth: u32,
    width: u32,
) {
    for (i, sampler) in samplers.iter().enumerate() {
        info!(
            sampler = sampler.name(),
            depth,
            width,
            mean = acc.mean(i, depth_index).unwrap_or(0.0),
            "depth complete"
        );
    }
}
