//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Tolerance on `|U†U - I|` entries when accepting an explicit matrix.
pub const UNITARY_TOLERANCE: f64 = 1e-8;

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
            _ => 1,
        }
    }
}

/// A gate given by an explicit unitary matrix.
///
/// The matrix is row-major, `2^k × 2^k` for `k` qubits. Basis states are
/// ordered with the first operand qubit as the most significant bit, so for
/// a two-qubit gate on `(a, b)` row `2·a + b` addresses `|a b⟩`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnitaryGate")]
pub struct UnitaryGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Row-major matrix entries.
    matrix: Vec<Complex64>,
}

impl UnitaryGate {
    /// Create a gate from a matrix, checking shape and unitarity.
    pub fn new(name: impl Into<String>, num_qubits: u32, matrix: Vec<Complex64>) -> IrResult<Self> {
        let name = name.into();
        let Some((dim, entries)) = 1usize
            .checked_shl(num_qubits)
            .and_then(|dim| dim.checked_mul(dim).map(|entries| (dim, entries)))
        else {
            return Err(IrError::InvalidMatrix {
                gate_name: name,
                expected: usize::MAX,
                got: matrix.len(),
            });
        };
        if matrix.len() != entries {
            return Err(IrError::InvalidMatrix {
                gate_name: name,
                expected: entries,
                got: matrix.len(),
            });
        }

        let deviation = unitarity_deviation(&matrix, dim);
        if deviation > UNITARY_TOLERANCE {
            return Err(IrError::NotUnitary {
                gate_name: name,
                deviation,
            });
        }

        Ok(Self {
            name,
            num_qubits,
            matrix,
        })
    }

    /// Side length of the matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        1 << self.num_qubits
    }

    /// Row-major matrix entries.
    #[inline]
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dim() + col]
    }
}

/// Unchecked wire form of [`UnitaryGate`]; deserialization goes through
/// [`UnitaryGate::new`].
#[derive(Deserialize)]
struct RawUnitaryGate {
    name: String,
    num_qubits: u32,
    matrix: Vec<Complex64>,
}

impl TryFrom<RawUnitaryGate> for UnitaryGate {
    type Error = IrError;

    fn try_from(raw: RawUnitaryGate) -> IrResult<Self> {
        Self::new(raw.name, raw.num_qubits, raw.matrix)
    }
}

/// Largest entry of `|U†U - I|` for a row-major `dim × dim` matrix.
pub fn unitarity_deviation(matrix: &[Complex64], dim: usize) -> f64 {
    let mut worst = 0.0f64;
    for i in 0..dim {
        for j in 0..dim {
            let mut acc = Complex64::new(0.0, 0.0);
            for k in 0..dim {
                acc += matrix[k * dim + i].conj() * matrix[k * dim + j];
            }
            if i == j {
                acc -= Complex64::new(1.0, 0.0);
            }
            worst = worst.max(acc.norm());
        }
    }
    worst
}

/// A quantum gate, either standard or an explicit unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A gate carrying its own unitary matrix.
    Unitary(UnitaryGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Unitary(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Unitary(g) => g.num_qubits,
        }
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from an explicit unitary.
    pub fn unitary(gate: UnitaryGate) -> Self {
        Self {
            kind: GateKind::Unitary(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<UnitaryGate> for Gate {
    fn from(gate: UnitaryGate) -> Self {
        Gate::unitary(gate)
    }
}
