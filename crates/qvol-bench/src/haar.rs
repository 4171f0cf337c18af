//! Haar-random unitaries.
//!
//! A matrix of i.i.d. standard complex Gaussians (the Ginibre ensemble) is
//! QR-factorised. Rescaling the columns of `Q` so that the diagonal of `R`
//! becomes real and positive makes `Q` exactly Haar distributed.

use faer::{Mat, c64};
use rand::Rng;
use std::f64::consts::{FRAC_1_SQRT_2, TAU};

use qvol_ir::{IrResult, UnitaryGate};

/// Diagonal entries of `R` smaller than this trigger a redraw.
const DEGENERATE_NORM: f64 = 1e-12;

/// Draw a pair of independent standard normals (Box-Muller).
fn normal_pair<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    // 1 - u lies in (0, 1], keeping the log finite.
    let u1 = 1.0 - rng.r#gen::<f64>();
    let u2 = rng.r#gen::<f64>();
    let radius = (-2.0 * u1.ln()).sqrt();
    (radius * (TAU * u2).cos(), radius * (TAU * u2).sin())
}

/// Complex Gaussian with unit variance.
fn complex_normal<R: Rng + ?Sized>(rng: &mut R) -> c64 {
    let (re, im) = normal_pair(rng);
    c64::new(re, im) * FRAC_1_SQRT_2
}

/// Haar-random `dim × dim` unitary.
pub fn random_unitary<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Mat<c64> {
    loop {
        let ginibre = Mat::<c64>::from_fn(dim, dim, |_, _| complex_normal(&mut *rng));
        let q = ginibre.as_ref().qr().compute_Q();

        // R = Q†G, so its diagonal is the overlap of each Q column with the
        // matching Ginibre column.
        let phases: Vec<c64> = (0..dim)
            .map(|j| {
                (0..dim)
                    .map(|i| q[(i, j)].conj() * ginibre[(i, j)])
                    .sum::<c64>()
            })
            .collect();
        if phases.iter().any(|r| r.norm() < DEGENERATE_NORM) {
            continue;
        }

        return Mat::from_fn(dim, dim, |i, j| q[(i, j)] * (phases[j] / phases[j].norm()));
    }
}

/// Row-major entries of a square matrix.
fn row_major(m: &Mat<c64>) -> Vec<c64> {
    (0..m.nrows())
        .flat_map(|i| (0..m.ncols()).map(move |j| m[(i, j)]))
        .collect()
}

/// Haar-random two-qubit gate with unit determinant.
pub fn random_su4<R: Rng + ?Sized>(rng: &mut R) -> IrResult<UnitaryGate> {
    let u = random_unitary(4, rng);
    let phase = c64::from_polar(1.0, -u.as_ref().determinant().arg() / 4.0);
    let matrix = row_major(&u).into_iter().map(|z| z * phase).collect();
    UnitaryGate::new("su4", 2, matrix)
}
