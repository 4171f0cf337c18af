//! Qubit identifiers and outcome bitstrings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit, in `[0, num_qubits)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The qubit index as a `usize`, for statevector bit arithmetic.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Render a measurement outcome as a bitstring.
///
/// Qubit `q` lives in bit `q` of `outcome`; the returned string lists
/// qubit 0 first.
pub fn outcome_to_bitstring(outcome: u64, num_qubits: u32) -> String {
    (0..num_qubits)
        .map(|q| if (outcome >> q) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Parse a bitstring produced by [`outcome_to_bitstring`].
///
/// Returns `None` for characters other than `0`/`1` or strings wider
/// than 64 bits.
pub fn bitstring_to_outcome(bits: &str) -> Option<u64> {
    if bits.len() > 64 {
        return None;
    }
    bits.chars().enumerate().try_fold(0u64, |acc, (q, c)| match c {
        '0' => Some(acc),
        '1' => Some(acc | (1 << q)),
        _ => None,
    })
}
