//! Qvol Local Statevector Simulator
//!
//! Exact statevector simulation plus two [`qvol_hal::Sampler`]
//! implementations built on it:
//!
//! - [`IdealSampler`]: simulates once, draws every repetition from the exact
//!   output distribution.
//! - [`NoisySampler`]: one Monte-Carlo trajectory per repetition with a
//!   Pauli channel after every moment.
//!
//! [`simulate`] is also the engine behind ideal-distribution evaluation in
//! the benchmark crate.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow (limit) |
//!
//! # Example
//!
//! ```
//! use qvol_adapter_sim::IdealSampler;
//! use qvol_hal::Sampler;
//! use qvol_ir::Circuit;
//! use rand::SeedableRng;
//!
//! let sampler = IdealSampler::new();
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
//!
//! let batch = sampler.run(&Circuit::bell()?, 1000, &mut rng)?;
//! let counts = batch.counts();
//! assert_eq!(counts.get("00") + counts.get("11"), 1000);
//! # Ok::<(), qvol_hal::HalError>(())
//! ```

mod error;
mod noisy;
mod simulator;
mod statevector;

pub use error::{SimError, SimResult};
pub use noisy::NoisySampler;
pub use simulator::{IdealSampler, MAX_EXACT_QUBITS, NORMALIZATION_TOLERANCE, simulate};
pub use statevector::Statevector;

use qvol_hal::SamplerRegistry;

/// Register the `"ideal"` and `"noisy"` sampler kinds.
pub fn register_builtin(registry: &mut SamplerRegistry) {
    registry.register::<IdealSampler>("ideal");
    registry.register::<NoisySampler>("noisy");
}
