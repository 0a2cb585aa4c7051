//! Least squares via SVD.
//!
//! The Levenberg–Marquardt step solves a small square system
//! `(JᵀJ + λD) δ = -Jᵀr`. Cholesky handles the well-conditioned case; this
//! solver is the fallback when the damped matrix is numerically
//! rank-deficient (e.g. a parameter that does not influence the model).
//!
//! Nalgebra's `QR::solve` is intended for square, full-rank systems and will
//! panic for non-square matrices, so the fallback goes through SVD.

use nalgebra::{DMatrix, DVector};

/// Solve `min ||x·β - y||²` using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
