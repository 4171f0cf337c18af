//! Model-circuit generation.
//!
//! A model circuit of width `n` and depth `d` has exactly `d` moments. Each
//! moment pairs a uniformly random permutation of the qubits into
//! `floor(n/2)` disjoint pairs and places an independent Haar-random SU(4)
//! on every pair. With odd `n` the last qubit of the permutation idles.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use qvol_ir::{Circuit, Instruction, Moment, QubitId};

use crate::error::{QvError, QvResult};
use crate::haar::random_su4;

/// Widest model circuit whose outcomes fit in a `u64`.
pub const MAX_MODEL_WIDTH: u32 = 64;

/// Generate a model circuit, drawing all randomness from `rng`.
///
/// The same seed and parameters give an identical circuit. Fails with
/// [`QvError::InvalidParameter`] for zero width or depth.
pub fn generate_model_circuit<R: Rng + ?Sized>(
    num_qubits: u32,
    depth: u32,
    rng: &mut R,
) -> QvResult<Circuit> {
    if num_qubits == 0 {
        return Err(QvError::InvalidParameter(
            "model circuit width must be positive".into(),
        ));
    }
    if num_qubits > MAX_MODEL_WIDTH {
        return Err(QvError::InvalidParameter(format!(
            "model circuit width {num_qubits} exceeds {MAX_MODEL_WIDTH}"
        )));
    }
    if depth == 0 {
        return Err(QvError::InvalidParameter(
            "model circuit depth must be positive".into(),
        ));
    }

    let mut circuit = Circuit::new(format!("qv_n{num_qubits}_d{depth}"), num_qubits);
    let mut permutation: Vec<u32> = (0..num_qubits).collect();

    for _layer in 0..depth {
        permutation.shuffle(rng);
        let mut moment = Moment::new();
        for pair in permutation.chunks_exact(2) {
            let gate = random_su4(rng)?;
            moment.push(Instruction::gate(gate, [QubitId(pair[0]), QubitId(pair[1])]))?;
        }
        circuit.push_moment(moment)?;
    }

    debug!(
        num_qubits,
        depth,
        num_operations = circuit.num_operations(),
        "generated model circuit"
    );
    Ok(circuit)
}
