//! Error types for the simulator adapter.

use thiserror::Error;

use qvol_hal::HalError;

/// Errors that can occur during exact simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The statevector would not fit the exact-simulation limit.
    #[error("Circuit has {num_qubits} qubits; exact simulation supports at most {max}")]
    TooManyQubits {
        /// Width of the rejected circuit.
        num_qubits: u32,
        /// Configured limit.
        max: u32,
    },

    /// A measurement or noise channel was found where only gates are allowed.
    #[error("Non-unitary operation '{operation}' in moment {moment}")]
    NonUnitary {
        /// Name of the offending operation.
        operation: String,
        /// Index of the moment holding it.
        moment: usize,
    },

    /// The final state drifted away from unit norm.
    #[error("State norm {norm_sqr} deviates from 1 beyond tolerance")]
    Normalization {
        /// Squared norm of the final state.
        norm_sqr: f64,
    },

    /// Error from the IR layer.
    #[error("IR error: {0}")]
    Ir(#[from] qvol_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

impl From<SimError> for HalError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::TooManyQubits { .. } => HalError::CircuitTooLarge(err.to_string()),
            SimError::NonUnitary { .. } => HalError::Unsupported(err.to_string()),
            SimError::Ir(e) => HalError::Ir(e),
            SimError::Normalization { .. } => HalError::ExecutionFailed(err.to_string()),
        }
    }
}
