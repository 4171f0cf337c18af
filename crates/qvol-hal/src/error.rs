//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur while driving an executor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The executor failed to produce the requested samples.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit exceeds executor capabilities.
    #[error("Circuit exceeds executor capabilities: {0}")]
    CircuitTooLarge(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Invalid number of repetitions.
    #[error("Invalid repetitions: {0}")]
    InvalidRepetitions(String),

    /// No factory registered for the requested sampler kind.
    #[error("Unknown sampler kind: {0}")]
    UnknownSampler(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qvol_ir::IrError),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
