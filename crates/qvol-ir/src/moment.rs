//! Moments: layers of operations on disjoint qubits.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// One time slice of a circuit.
///
/// No qubit is acted on by more than one operation within a moment. An
/// empty moment is a valid idle layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    operations: Vec<Instruction>,
}

impl Moment {
    /// Create an empty moment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a moment from operations, rejecting overlapping operands.
    pub fn with_operations(operations: impl IntoIterator<Item = Instruction>) -> IrResult<Self> {
        let mut moment = Self::new();
        for op in operations {
            moment.push(op)?;
        }
        Ok(moment)
    }

    /// Add an operation to this moment.
    ///
    /// Fails with [`IrError::QubitConflict`] if one of its qubits is already
    /// used. The reported moment index is 0; [`crate::Circuit`] rewrites it
    /// to the real position.
    pub fn push(&mut self, op: Instruction) -> IrResult<()> {
        if let Some(q) = self.conflict(&op) {
            return Err(IrError::QubitConflict {
                qubit: q,
                moment: 0,
            });
        }
        self.operations.push(op);
        Ok(())
    }

    /// First qubit of `op` that this moment already acts on.
    pub fn conflict(&self, op: &Instruction) -> Option<QubitId> {
        op.qubits.iter().copied().find(|q| self.acts_on(*q))
    }

    /// Whether any operation in this moment touches `qubit`.
    pub fn acts_on(&self, qubit: QubitId) -> bool {
        self.operations.iter().any(|op| op.qubits.contains(&qubit))
    }

    /// Operations in insertion order.
    pub fn operations(&self) -> &[Instruction] {
        &self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the moment is an idle layer.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Qubits touched by this moment, in operation order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.operations.iter().flat_map(|op| op.qubits.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    #[test]
    fn test_disjoint_operations_accepted() {
        let m = Moment::with_operations([
            Instruction::two_qubit_gate(StandardGate::CZ, QubitId(0), QubitId(1)),
            Instruction::single_qubit_gate(StandardGate::H, QubitId(2)),
        ])
        .unwrap();
        assert_eq!(m.len(), 2);
        assert!(m.acts_on(QubitId(2)));
        assert!(!m.acts_on(QubitId(3)));
    }

    #[test]
    fn test_overlap_rejected() {
        let mut m = Moment::new();
        m.push(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();
        let err = m
            .push(Instruction::two_qubit_gate(
                StandardGate::CX,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitConflict {
                qubit: QubitId(1),
                ..
            }
        ));
        assert_eq!(m.len(), 1);
    }
}
