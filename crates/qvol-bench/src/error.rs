//! Error types for the QV benchmark.

use thiserror::Error;

/// Errors that can occur while building, evaluating or scoring model circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QvError {
    /// Malformed width, depth, repetition or configuration value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Ideal evaluation failed.
    #[error("Simulation error: {0}")]
    Simulation(#[from] qvol_adapter_sim::SimError),

    /// A sampler failed to produce its batch.
    #[error("Execution error: {0}")]
    Execution(#[from] qvol_hal::HalError),

    /// Circuit construction failed.
    #[error("IR error: {0}")]
    Ir(#[from] qvol_ir::IrError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for QV operations.
pub type QvResult<T> = Result<T, QvError>;
