//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit:?} not found in circuit of width {width}{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Width of the circuit.
        width: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit:?} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Two operations in one moment act on the same qubit.
    #[error("Qubit {qubit:?} is already acted on in moment {moment}")]
    QubitConflict {
        /// The contested qubit.
        qubit: QubitId,
        /// Index of the moment, if the moment belongs to a circuit.
        moment: usize,
    },

    /// Matrix has the wrong number of entries for its qubit count.
    #[error("Matrix for '{gate_name}' has {got} entries, expected {expected}")]
    InvalidMatrix {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of entries.
        expected: usize,
        /// Actual number of entries.
        got: usize,
    },

    /// Matrix is not unitary within tolerance.
    #[error("Matrix for '{gate_name}' is not unitary (max deviation {deviation:.3e})")]
    NotUnitary {
        /// Name of the gate.
        gate_name: String,
        /// Largest entry of |U†U - I|.
        deviation: f64,
    },

    /// Noise parameter outside of [0, 1].
    #[error("Noise channel '{channel}' has invalid probability {p}")]
    InvalidNoise {
        /// Channel name.
        channel: String,
        /// Offending probability.
        p: f64,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
