//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `Σ r_i(p)²` for a residual function `r: ℝᵐ → ℝⁿ`:
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr
//! ```
//!
//! - `J` is a forward-difference Jacobian (no analytic derivatives needed).
//! - A step that lowers the cost is accepted and `λ` shrinks (towards
//!   Gauss–Newton); a rejected step grows `λ` (towards gradient descent).
//! - Convergence follows the usual MINPACK-style tests: relative cost
//!   reduction (`ftol`), relative step size (`xtol`), and the cosine between
//!   the residual vector and the Jacobian columns (`gtol`).

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;
use crate::math::solve_least_squares;

const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e16;

/// Solver tolerances and limits.
#[derive(Debug, Clone, Copy)]
pub struct LmOptions {
    pub max_iterations: usize,
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
    pub initial_lambda: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            ftol: 1e-12,
            xtol: 1e-12,
            gtol: 1e-12,
            initial_lambda: 1e-3,
        }
    }
}

/// Converged solver state.
#[derive(Debug, Clone)]
pub struct LmReport {
    pub params: Vec<f64>,
    /// Sum of squared residuals at `params`.
    pub cost: f64,
    pub iterations: usize,
}

/// Run Levenberg–Marquardt from `initial`.
///
/// `residuals` must return a vector of the same length for every input.
pub fn levenberg_marquardt<F>(
    residuals: F,
    initial: &[f64],
    opts: &LmOptions,
) -> Result<LmReport, FitError>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let mut p = DVector::from_column_slice(initial);
    let mut r = residuals(&p);
    if !all_finite(&r) {
        return Err(FitError::NonFinite);
    }
    let mut cost = r.norm_squared();
    let mut lambda = opts.initial_lambda.max(LAMBDA_MIN);

    for iteration in 1..=opts.max_iterations {
        if cost == 0.0 {
            return Ok(report(&p, cost, iteration - 1));
        }

        let jac = jacobian(&residuals, &p, &r)?;
        let jtj = jac.transpose() * &jac;
        let grad = jac.transpose() * &r;

        if gradient_cosine(&jac, &grad, cost.sqrt()) <= opts.gtol {
            return Ok(report(&p, cost, iteration - 1));
        }

        let mut solved_any = false;
        let mut accepted = false;
        while lambda <= LAMBDA_MAX {
            let Some(step) = damped_step(&jtj, &grad, lambda) else {
                lambda *= 10.0;
                continue;
            };
            solved_any = true;

            let candidate = &p + &step;
            let r_new = residuals(&candidate);
            let cost_new = r_new.norm_squared();

            if cost_new.is_finite() && cost_new <= cost {
                let reduction = cost - cost_new;
                let small_step = step.norm() <= opts.xtol * (opts.xtol + p.norm());
                let small_reduction = reduction <= opts.ftol * cost;

                p = candidate;
                r = r_new;
                cost = cost_new;
                lambda = (lambda / 10.0).max(LAMBDA_MIN);
                accepted = true;

                if small_step || small_reduction {
                    return Ok(report(&p, cost, iteration));
                }
                break;
            }
            lambda *= 10.0;
        }

        if !solved_any {
            return Err(FitError::Singular);
        }
        if !accepted {
            // No amount of damping lowers the cost: `p` is stationary to
            // working precision.
            return Ok(report(&p, cost, iteration));
        }
    }

    Err(FitError::NotConverged {
        iterations: opts.max_iterations,
    })
}

fn report(p: &DVector<f64>, cost: f64, iterations: usize) -> LmReport {
    LmReport {
        params: p.iter().copied().collect(),
        cost,
        iterations,
    }
}

fn all_finite(v: &DVector<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

/// Forward-difference Jacobian of the residual function at `p`.
fn jacobian<F>(
    residuals: &F,
    p: &DVector<f64>,
    r: &DVector<f64>,
) -> Result<DMatrix<f64>, FitError>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let eps = f64::EPSILON.sqrt();
    let mut jac = DMatrix::zeros(r.len(), p.len());

    for j in 0..p.len() {
        let mut h = eps * p[j].abs();
        if h == 0.0 {
            h = eps;
        }
        let mut shifted = p.clone();
        shifted[j] += h;
        // Use the step actually representable in floating point.
        let h = shifted[j] - p[j];

        let r_shifted = residuals(&shifted);
        if r_shifted.len() != r.len() || !all_finite(&r_shifted) {
            return Err(FitError::NonFinite);
        }
        jac.set_column(j, &((r_shifted - r) / h));
    }

    Ok(jac)
}

/// Largest cosine between the residual vector and any Jacobian column.
fn gradient_cosine(jac: &DMatrix<f64>, grad: &DVector<f64>, r_norm: f64) -> f64 {
    let mut worst = 0.0f64;
    for (j, g) in grad.iter().enumerate() {
        let col_norm = jac.column(j).norm();
        if col_norm > 0.0 {
            worst = worst.max(g.abs() / (col_norm * r_norm));
        }
    }
    worst
}

fn damped_step(jtj: &DMatrix<f64>, grad: &DVector<f64>, lambda: f64) -> Option<DVector<f64>> {
    let mut a = jtj.clone();
    for i in 0..a.nrows() {
        let d = jtj[(i, i)];
        a[(i, i)] += lambda * if d > 0.0 { d } else { 1.0 };
    }
    let rhs = -grad;

    let step = match a.clone().cholesky() {
        Some(chol) => chol.solve(&rhs),
        None => solve_least_squares(&a, &rhs)?,
    };
    step.iter().all(|v| v.is_finite()).then_some(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_residuals(xs: Vec<f64>, ys: Vec<f64>) -> impl Fn(&DVector<f64>) -> DVector<f64> {
        move |p| {
            let r = xs.iter().zip(&ys).map(|(x, y)| p[0] * x + p[1] - y);
            DVector::from_iterator(xs.len(), r)
        }
    }

    #[test]
    fn recovers_exact_line() {
        let f = line_residuals(vec![0.0, 1.0, 2.0, 3.0], vec![3.0, 5.0, 7.0, 9.0]);
        let out = levenberg_marquardt(f, &[1.0, 1.0], &LmOptions::default()).unwrap();
        assert!((out.params[0] - 2.0).abs() < 1e-8, "m = {}", out.params[0]);
        assert!((out.params[1] - 3.0).abs() < 1e-8, "c = {}", out.params[1]);
        assert!(out.cost < 1e-12);
    }

    #[test]
    fn recovers_exponential_decay() {
        let xs: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 5.0 * (-0.7 * x).exp()).collect();
        let f = move |p: &DVector<f64>| {
            DVector::from_iterator(
                xs.len(),
                xs.iter().zip(&ys).map(|(x, y)| p[1] * (-p[0] * x).exp() - y),
            )
        };
        let out = levenberg_marquardt(f, &[1.0, 1.0], &LmOptions::default()).unwrap();
        assert!((out.params[0] - 0.7).abs() < 1e-6, "a = {}", out.params[0]);
        assert!((out.params[1] - 5.0).abs() < 1e-6, "b = {}", out.params[1]);
    }

    #[test]
    fn reports_non_convergence_when_iterations_run_out() {
        // exp(p*x) -> 0 only as p -> -inf, so every step keeps improving.
        let xs = [1.0, 2.0, 3.0];
        let f = move |p: &DVector<f64>| {
            DVector::from_iterator(3, xs.iter().map(|x| (p[0] * x).exp()))
        };
        let opts = LmOptions {
            max_iterations: 10,
            ..LmOptions::default()
        };
        let err = levenberg_marquardt(f, &[0.0], &opts).unwrap_err();
        assert_eq!(err, FitError::NotConverged { iterations: 10 });
    }

    #[test]
    fn zero_initial_damping_still_terminates() {
        // Starting at the least-squares optimum, trial steps can only be
        // rejected, so damping must grow from a positive floor.
        let f = line_residuals(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]);
        let opts = LmOptions {
            initial_lambda: 0.0,
            gtol: 0.0,
            ..LmOptions::default()
        };
        let out = levenberg_marquardt(f, &[0.0, 1.0 / 3.0], &opts).unwrap();
        assert!(out.params[0].abs() < 1e-9, "m = {}", out.params[0]);
        assert!((out.params[1] - 1.0 / 3.0).abs() < 1e-9, "c = {}", out.params[1]);
    }

    #[test]
    fn rejects_non_finite_start() {
        let f = |p: &DVector<f64>| DVector::from_element(2, p[0].ln());
        let err = levenberg_marquardt(f, &[-1.0], &LmOptions::default()).unwrap_err();
        assert_eq!(err, FitError::NonFinite);
    }
}
