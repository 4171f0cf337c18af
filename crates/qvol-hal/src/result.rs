//! Sample batches and outcome histograms.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use qvol_ir::outcome_to_bitstring;

/// Ordered measurement outcomes from one run of a circuit.
///
/// Each outcome is an integer whose bit `q` is the classical value read
/// from qubit `q`. The order matches the order in which repetitions were
/// executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleBatch {
    /// Width of each outcome.
    pub num_qubits: u32,
    /// Outcomes, one per repetition.
    pub outcomes: Vec<u64>,
}

impl SampleBatch {
    /// Create a batch.
    pub fn new(num_qubits: u32, outcomes: Vec<u64>) -> Self {
        Self {
            num_qubits,
            outcomes,
        }
    }

    /// Number of repetitions in the batch.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the batch holds no outcomes.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Bitstring of the `index`-th outcome, qubit 0 first.
    pub fn bitstring(&self, index: usize) -> Option<String> {
        self.outcomes
            .get(index)
            .map(|&o| outcome_to_bitstring(o, self.num_qubits))
    }

    /// Histogram of the batch keyed by bitstring.
    pub fn counts(&self) -> Counts {
        let mut counts = Counts::new();
        for &outcome in &self.outcomes {
            counts.insert(outcome_to_bitstring(outcome, self.num_qubits), 1);
        }
        counts
    }
}

/// Outcome histogram keyed by bitstring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring` (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded outcomes.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the histogram is empty.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most frequent bitstring; ties resolve to the lexicographically smallest.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Iterate over `(bitstring, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
