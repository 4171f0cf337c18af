//! Circuit Intermediate Representation
//!
//! This crate provides the data structures shared by every stage of the
//! quantum volume pipeline: the random model-circuit builder, the exact
//! evaluator, and the executors that sample from circuits.
//!
//! # Overview
//!
//! A [`Circuit`] is a fixed-width register of qubits and an ordered list of
//! [`Moment`]s. Each moment holds operations on pairwise disjoint qubits, an
//! invariant enforced on insertion. Operations are [`Instruction`]s: gates,
//! measurements, or explicit [`NoiseModel`] channels.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] and the outcome/bitstring helpers
//! - **Gates**: [`StandardGate`] for built-in gates and [`UnitaryGate`] for
//!   gates carrying an explicit, validated unitary matrix
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Moments**: [`Moment`] layers of simultaneous operations
//! - **Circuit**: [`Circuit`] builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qvol_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3); // H, CX, measure
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX`, `CZ` | 2 | Controlled-X and Controlled-Z |
//! | `Swap` | 2 | SWAP gate |
//! | `UnitaryGate` | k | Explicit `2^k × 2^k` unitary |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod moment;
pub mod noise;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, StandardGate, UNITARY_TOLERANCE, UnitaryGate, unitarity_deviation};
pub use instruction::{Instruction, InstructionKind};
pub use moment::Moment;
pub use noise::{NoiseModel, Pauli};
pub use qubit::{QubitId, bitstring_to_outcome, outcome_to_bitstring};
