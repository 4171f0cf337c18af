//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::moment::Moment;
use crate::qubit::QubitId;

/// A quantum circuit over a fixed register of qubits.
///
/// The circuit is an ordered list of [`Moment`]s. Builders either append
/// single operations, which are packed into the earliest moment after the
/// last one touching their qubits, or push whole moments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Width of the register.
    num_qubits: u32,
    /// Layers of operations.
    moments: Vec<Moment>,
}

impl Circuit {
    /// Create an empty circuit on `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            moments: vec![],
        }
    }

    /// Append an operation in the earliest moment it fits.
    pub fn append(&mut self, op: Instruction) -> IrResult<&mut Self> {
        op.validate(self.num_qubits)?;

        let start = self
            .moments
            .iter()
            .rposition(|m| op.qubits.iter().any(|q| m.acts_on(*q)))
            .map_or(0, |i| i + 1);

        if start == self.moments.len() {
            self.moments.push(Moment::new());
        }
        self.moments[start]
            .push(op)
            .map_err(|e| with_moment_index(e, start))?;
        Ok(self)
    }

    /// Append a whole moment after the current last one.
    pub fn push_moment(&mut self, moment: Moment) -> IrResult<&mut Self> {
        for op in moment.operations() {
            op.validate(self.num_qubits)?;
        }
        self.moments.push(moment);
        Ok(self)
    }

    /// Re-check every structural invariant.
    ///
    /// Useful for circuits that did not come through the builder, e.g.
    /// after deserialization.
    pub fn validate(&self) -> IrResult<()> {
        for (index, moment) in self.moments.iter().enumerate() {
            let mut seen = Moment::new();
            for op in moment.operations() {
                op.validate(self.num_qubits)?;
                seen.push(op.clone())
                    .map_err(|e| with_moment_index(e, index))?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::CX,
            control,
            target,
        ))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::CZ,
            control,
            target,
        ))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))
    }

    /// Measure all qubits in a new final moment.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let qubits = (0..self.num_qubits).map(QubitId);
        self.push_moment(Moment::with_operations([Instruction::measure(qubits)])?)
    }

    /// Copy of this circuit ending in a single all-qubit measurement.
    pub fn with_terminal_measurement(&self) -> IrResult<Self> {
        let mut circuit = self.clone();
        circuit.measure_all()?;
        Ok(circuit)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the circuit depth, counting idle moments.
    pub fn depth(&self) -> usize {
        self.moments.len()
    }

    /// Get the moments in order.
    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// Iterate over all operations, moment by moment.
    pub fn operations(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.moments.iter().flat_map(|m| m.operations().iter())
    }

    /// Total number of operations.
    pub fn num_operations(&self) -> usize {
        self.moments.iter().map(Moment::len).sum()
    }

    /// Whether the circuit contains any measurement.
    pub fn has_measurements(&self) -> bool {
        self.operations().any(Instruction::is_measure)
    }

    /// Whether the circuit contains explicit noise channels.
    pub fn has_noise(&self) -> bool {
        self.operations().any(Instruction::is_noise_channel)
    }

    /// Whether every operation is a gate.
    pub fn is_unitary(&self) -> bool {
        self.operations().all(Instruction::is_gate)
    }

    /// Whether measurements, if any, sit only in the last moment.
    pub fn measurements_are_terminal(&self) -> bool {
        let Some((last, body)) = self.moments.split_last() else {
            return true;
        };
        let body_measures = body
            .iter()
            .flat_map(|m| m.operations())
            .any(|op| matches!(op.kind, InstructionKind::Measure));
        let last_mixed = last.operations().iter().any(Instruction::is_measure)
            && !last.operations().iter().all(Instruction::is_measure);
        !body_measures && !last_mixed
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit (no measurement).
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new("bell", 2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit (no measurement).
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new("ghz", n);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        Ok(circuit)
    }
}

fn with_moment_index(err: IrError, index: usize) -> IrError {
    match err {
        IrError::QubitConflict { qubit, .. } => IrError::QubitConflict {
            qubit,
            moment: index,
        },
        other => other,
    }
}
