//! Qvol Hardware Abstraction Layer
//!
//! This crate defines the one seam between the Quantum Volume benchmark and
//! whatever executes its circuits: the [`Sampler`] trait. Ideal simulators,
//! noisy simulators, and hardware wrappers all implement it, and the
//! benchmark treats them interchangeably.
//!
//! # Overview
//!
//! - [`Sampler`]: run a circuit `repetitions` times, return a [`SampleBatch`]
//! - [`Capabilities`]: width and repetition limits plus descriptive flags
//! - [`SamplerConfig`] and [`SamplerRegistry`]: build samplers by kind name
//! - [`Counts`]: histogram view of a batch
//!
//! # Example: Implementing a Sampler
//!
//! ```
//! use qvol_hal::{Capabilities, HalResult, SampleBatch, Sampler, check_repetitions};
//! use qvol_ir::Circuit;
//! use rand::RngCore;
//!
//! /// Always reports the all-zeros outcome.
//! struct ZeroSampler {
//!     caps: Capabilities,
//! }
//!
//! impl Sampler for ZeroSampler {
//!     fn name(&self) -> &str { "zero" }
//!
//!     fn capabilities(&self) -> &Capabilities { &self.caps }
//!
//!     fn run(&self, circuit: &Circuit, repetitions: u32, _rng: &mut dyn RngCore)
//!         -> HalResult<SampleBatch>
//!     {
//!         check_repetitions(&self.caps, repetitions)?;
//!         Ok(SampleBatch::new(circuit.num_qubits(), vec![0; repetitions as usize]))
//!     }
//! }
//!
//! let sampler = ZeroSampler { caps: Capabilities::simulator(8) };
//! let mut rng = rand::rngs::mock::StepRng::new(0, 1);
//! let batch = sampler.run(&Circuit::bell()?, 10, &mut rng)?;
//! assert_eq!(batch.counts().get("00"), 10);
//! # Ok::<(), qvol_hal::HalError>(())
//! ```

pub mod capability;
pub mod error;
pub mod registry;
pub mod result;
pub mod sampler;

pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use registry::SamplerRegistry;
pub use result::{Counts, SampleBatch};
pub use sampler::{Sampler, SamplerConfig, SamplerFactory, ValidationResult, check_repetitions};
