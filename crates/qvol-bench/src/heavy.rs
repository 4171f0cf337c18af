//! Ideal output distributions and heavy sets.
//!
//! The heavy set of a circuit is the set of outcomes whose ideal
//! probability is strictly greater than the median of all `2^n` ideal
//! probabilities. Ties at the median are excluded, so for a distribution
//! with distinct values the heavy set holds exactly half of the outcomes
//! and never more.
//!
//! [`HeavySetPolicy::ProbabilityMass`] is offered as an alternative reading:
//! the most likely outcomes whose mass first reaches one half.

use serde::{Deserialize, Serialize};
use tracing::debug;

use qvol_adapter_sim::{NORMALIZATION_TOLERANCE, SimError, simulate};
use qvol_ir::{Circuit, outcome_to_bitstring};

use crate::error::{QvError, QvResult};

/// How the heavy set is cut from an ideal distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeavySetPolicy {
    /// Outcomes with probability strictly above the median.
    #[default]
    StrictMedian,
    /// Most likely outcomes until their combined mass reaches one half.
    ProbabilityMass,
}

/// Exact output probabilities of a circuit, indexed by outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct IdealDistribution {
    num_qubits: u32,
    probabilities: Vec<f64>,
}

impl IdealDistribution {
    /// Wrap a probability vector, checking its length and normalization.
    pub fn from_probabilities(num_qubits: u32, probabilities: Vec<f64>) -> QvResult<Self> {
        let expected = 1usize
            .checked_shl(num_qubits)
            .ok_or_else(|| QvError::InvalidParameter(format!("{num_qubits} qubits")))?;
        if probabilities.len() != expected {
            return Err(QvError::InvalidParameter(format!(
                "distribution over {num_qubits} qubits needs {expected} entries, got {}",
                probabilities.len()
            )));
        }
        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(SimError::Normalization { norm_sqr: total }.into());
        }
        Ok(Self {
            num_qubits,
            probabilities,
        })
    }

    /// Width of the underlying circuit.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// All probabilities, indexed by outcome.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of one outcome (0 outside the register).
    pub fn probability(&self, outcome: u64) -> f64 {
        usize::try_from(outcome)
            .ok()
            .and_then(|i| self.probabilities.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Median of all probabilities.
    ///
    /// Computed on a `total_cmp`-sorted copy; an even count averages the two
    /// middle values.
    pub fn median(&self) -> f64 {
        let mut sorted = self.probabilities.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    /// Heavy set under `policy`.
    pub fn heavy_set(&self, policy: HeavySetPolicy) -> HeavySet {
        let outcomes = match policy {
            HeavySetPolicy::StrictMedian => {
                let median = self.median();
                self.probabilities
                    .iter()
                    .enumerate()
                    .filter(|&(_, &p)| p > median)
                    .map(|(i, _)| i as u64)
                    .collect()
            }
            HeavySetPolicy::ProbabilityMass => {
                let mut order: Vec<usize> = (0..self.probabilities.len()).collect();
                order.sort_by(|&a, &b| {
                    self.probabilities[b]
                        .total_cmp(&self.probabilities[a])
                        .then(a.cmp(&b))
                });
                let mut mass = 0.0;
                let mut picked: Vec<u64> = Vec::new();
                for i in order {
                    if mass >= 0.5 {
                        break;
                    }
                    mass += self.probabilities[i];
                    picked.push(i as u64);
                }
                picked.sort_unstable();
                picked
            }
        };
        HeavySet {
            num_qubits: self.num_qubits,
            outcomes,
        }
    }

    /// Total ideal probability carried by `heavy`.
    ///
    /// This is the expected HOG probability of a perfect sampler.
    pub fn heavy_output_mass(&self, heavy: &HeavySet) -> f64 {
        heavy.iter().map(|o| self.probability(o)).sum()
    }
}

/// Set of heavy outcomes, stored as sorted outcome integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeavySet {
    num_qubits: u32,
    outcomes: Vec<u64>,
}

impl HeavySet {
    /// Width of the outcomes.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Whether `outcome` is heavy.
    pub fn contains(&self, outcome: u64) -> bool {
        self.outcomes.binary_search(&outcome).is_ok()
    }

    /// Whether the bitstring (qubit 0 first) is heavy.
    pub fn contains_bitstring(&self, bits: &str) -> bool {
        bits.len() == self.num_qubits as usize
            && qvol_ir::bitstring_to_outcome(bits).is_some_and(|o| self.contains(o))
    }

    /// Number of heavy outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no outcome is heavy.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Heavy outcomes in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.outcomes.iter().copied()
    }

    /// Heavy outcomes as bitstrings, qubit 0 first.
    pub fn bitstrings(&self) -> Vec<String> {
        self.iter()
            .map(|o| outcome_to_bitstring(o, self.num_qubits))
            .collect()
    }

    /// How many of `outcomes` are heavy.
    pub fn count_heavy(&self, outcomes: &[u64]) -> usize {
        outcomes.iter().filter(|&&o| self.contains(o)).count()
    }
}

/// Exact ideal output distribution of a gate-only circuit.
pub fn compute_ideal_distribution(circuit: &Circuit) -> QvResult<IdealDistribution> {
    let probabilities = simulate(circuit)?.probabilities();
    IdealDistribution::from_probabilities(circuit.num_qubits(), probabilities)
}

/// Heavy set of `circuit` under the strict-median rule.
pub fn compute_heavy_set(circuit: &Circuit) -> QvResult<HeavySet> {
    compute_heavy_set_with_policy(circuit, HeavySetPolicy::StrictMedian)
}

/// Heavy set of `circuit` under `policy`.
pub fn compute_heavy_set_with_policy(
    circuit: &Circuit,
    policy: HeavySetPolicy,
) -> QvResult<HeavySet> {
    let distribution = compute_ideal_distribution(circuit)?;
    let heavy = distribution.heavy_set(policy);
    debug!(
        circuit = circuit.name(),
        ?policy,
        heavy = heavy.len(),
        mass = distribution.heavy_output_mass(&heavy),
        "computed heavy set"
    );
    Ok(heavy)
}
