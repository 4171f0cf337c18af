//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::noise::NoiseModel;
use crate::qubit::QubitId;

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Computational-basis measurement of every operand qubit.
    Measure,
    /// Noise channel applied independently to every operand qubit.
    NoiseChannel {
        /// The noise model describing the physical process.
        model: NoiseModel,
    },
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a measurement over the given qubits.
    pub fn measure(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a noise channel instruction.
    pub fn noise_channel(model: NoiseModel, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::NoiseChannel { model },
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Check operand arity, duplicate operands, and range against `width`.
    pub fn validate(&self, width: u32) -> IrResult<()> {
        if let InstructionKind::Gate(gate) = &self.kind {
            let expected = gate.num_qubits();
            if self.qubits.len() != expected as usize {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got: self.qubits.len() as u32,
                });
            }
        }
        if let InstructionKind::NoiseChannel { model } = &self.kind {
            model.validate()?;
        }

        for (i, q) in self.qubits.iter().enumerate() {
            if q.0 >= width {
                return Err(IrError::QubitNotFound {
                    qubit: *q,
                    width,
                    gate_name: Some(self.name().to_string()),
                });
            }
            if self.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(self.name().to_string()),
                });
            }
        }
        Ok(())
    }

    /// Check if this is a noise channel instruction.
    pub fn is_noise_channel(&self) -> bool {
        matches!(self.kind, InstructionKind::NoiseChannel { .. })
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::NoiseChannel { model } => model.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.name(), "h");
        assert!(inst.validate(1).is_ok());
    }

    #[test]
    fn test_measure_instruction() {
        let inst = Instruction::measure([QubitId(0), QubitId(1)]);
        assert!(inst.is_measure());
        assert_eq!(inst.qubits.len(), 2);
    }

    #[test]
    fn test_noise_channel_instruction() {
        let inst = Instruction::noise_channel(NoiseModel::Depolarizing { p: 0.03 }, [QubitId(0)]);
        assert!(inst.is_noise_channel());
        assert_eq!(inst.name(), "depolarizing");
    }

    #[test]
    fn test_validate_rejects_bad_operands() {
        let dup = Instruction::two_qubit_gate(StandardGate::CX, QubitId(1), QubitId(1));
        assert!(matches!(dup.validate(2), Err(IrError::DuplicateQubit { .. })));

        let out_of_range = Instruction::single_qubit_gate(StandardGate::X, QubitId(4));
        assert!(matches!(
            out_of_range.validate(2),
            Err(IrError::QubitNotFound { width: 2, .. })
        ));

        let arity = Instruction::gate(StandardGate::CZ, [QubitId(0)]);
        assert!(matches!(
            arity.validate(2),
            Err(IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }
}
