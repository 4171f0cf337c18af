//! Noise channel descriptions.
//!
//! A [`NoiseModel`] describes a stochastic single-qubit channel. It can be
//! placed in a circuit as an explicit [`crate::Instruction::noise_channel`]
//! or handed to a noisy executor that applies it uniformly after every
//! moment. All channels here are Pauli channels (or classical readout
//! flips), so they can be simulated exactly by sampling trajectories.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// A single-qubit noise channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
#[non_exhaustive]
pub enum NoiseModel {
    /// Depolarizing channel: with probability `p` one of X, Y, Z is
    /// applied, each with probability `p / 3`.
    Depolarizing {
        /// Error probability (0.0 to 1.0).
        p: f64,
    },

    /// Bit-flip channel: flips |0⟩ ↔ |1⟩ with probability `p`.
    BitFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },

    /// Phase-flip channel: applies Z with probability `p`.
    PhaseFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },

    /// Readout error: measurement reports wrong outcome with probability `p`.
    ReadoutError {
        /// Misclassification probability (0.0 to 1.0).
        p: f64,
    },
}

/// The Pauli operator picked by one draw of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl NoiseModel {
    /// Get a human-readable name for this noise model.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseModel::Depolarizing { .. } => "depolarizing",
            NoiseModel::BitFlip { .. } => "bit_flip",
            NoiseModel::PhaseFlip { .. } => "phase_flip",
            NoiseModel::ReadoutError { .. } => "readout_error",
        }
    }

    /// Get the error probability of this noise model.
    pub fn error_param(&self) -> f64 {
        match self {
            NoiseModel::Depolarizing { p }
            | NoiseModel::BitFlip { p }
            | NoiseModel::PhaseFlip { p }
            | NoiseModel::ReadoutError { p } => *p,
        }
    }

    /// Whether the channel acts on the classical outcome rather than the state.
    pub fn is_readout(&self) -> bool {
        matches!(self, NoiseModel::ReadoutError { .. })
    }

    /// Check that the probability lies in `[0, 1]`.
    pub fn validate(&self) -> IrResult<()> {
        let p = self.error_param();
        if !(0.0..=1.0).contains(&p) {
            return Err(IrError::InvalidNoise {
                channel: self.name().to_string(),
                p,
            });
        }
        Ok(())
    }

    /// Map a uniform draw `u ∈ [0, 1)` to the Pauli error it selects, if any.
    ///
    /// Readout errors never act on the state and always return `None`.
    pub fn pauli_for_draw(&self, u: f64) -> Option<Pauli> {
        match *self {
            NoiseModel::Depolarizing { p } => {
                if u >= p {
                    None
                } else if u < p / 3.0 {
                    Some(Pauli::X)
                } else if u < 2.0 * p / 3.0 {
                    Some(Pauli::Y)
                } else {
                    Some(Pauli::Z)
                }
            }
            NoiseModel::BitFlip { p } => (u < p).then_some(Pauli::X),
            NoiseModel::PhaseFlip { p } => (u < p).then_some(Pauli::Z),
            NoiseModel::ReadoutError { .. } => None,
        }
    }
}

impl std::fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(p={:.4})", self.name(), self.error_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let m = NoiseModel::Depolarizing { p: 0.005 };
        assert_eq!(m.to_string(), "depolarizing(p=0.0050)");
    }

    #[test]
    fn test_validate_range() {
        assert!(NoiseModel::BitFlip { p: 0.0 }.validate().is_ok());
        assert!(NoiseModel::BitFlip { p: 1.0 }.validate().is_ok());
        assert!(NoiseModel::BitFlip { p: 1.5 }.validate().is_err());
        assert!(NoiseModel::PhaseFlip { p: -0.1 }.validate().is_err());
    }

    #[test]
    fn test_depolarizing_draw_partitions_evenly() {
        let m = NoiseModel::Depolarizing { p: 0.3 };
        assert_eq!(m.pauli_for_draw(0.05), Some(Pauli::X));
        assert_eq!(m.pauli_for_draw(0.15), Some(Pauli::Y));
        assert_eq!(m.pauli_for_draw(0.25), Some(Pauli::Z));
        assert_eq!(m.pauli_for_draw(0.35), None);
    }

    #[test]
    fn test_readout_never_touches_state() {
        let m = NoiseModel::ReadoutError { p: 1.0 };
        assert!(m.is_readout());
        assert_eq!(m.pauli_for_draw(0.0), None);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&NoiseModel::BitFlip { p: 0.25 }).unwrap();
        assert_eq!(json, r#"{"channel":"bit_flip","p":0.25}"#);
        let back: NoiseModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NoiseModel::BitFlip { p: 0.25 });
    }
}
