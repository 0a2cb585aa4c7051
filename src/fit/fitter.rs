//! Fit a model to one data set.
//!
//! Given:
//! - observations `(x_i, y_i)`
//! - a `Model` with `m` named parameters
//!
//! we minimize `Σ (f(x_i; p) - y_i)²` with Levenberg–Marquardt, starting
//! from the model's initial guess (all ones unless the model overrides it).

use nalgebra::DVector;

use crate::domain::{DataSet, FitResult};
use crate::error::FitError;
use crate::math::{LmOptions, levenberg_marquardt};
use crate::models::Model;

/// Fit `model` to the `(x, y)` columns of `data`.
pub fn fit_data(model: &Model, data: &DataSet, opts: &LmOptions) -> Result<FitResult, FitError> {
    fit_xy(model, &data.x, &data.y, opts)
}

/// Fit `model` to raw `x` / `y` slices.
pub fn fit_xy(
    model: &Model,
    x: &[f64],
    y: &[f64],
    opts: &LmOptions,
) -> Result<FitResult, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }

    let m = model.param_count();
    let n = x.len();
    if n < m || n == 0 {
        return Err(FitError::Underdetermined { points: n, params: m });
    }

    let initial = model.initial_guess();
    if initial.len() != m {
        return Err(FitError::InitialGuess {
            expected: m,
            found: initial.len(),
        });
    }

    let residuals = |p: &DVector<f64>| {
        DVector::from_iterator(
            n,
            x.iter()
                .zip(y)
                .map(|(&xi, &yi)| model.eval(xi, p.as_slice()) - yi),
        )
    };

    let out = levenberg_marquardt(residuals, &initial, opts)?;
    let rmse = (out.cost / n as f64).sqrt();

    Ok(FitResult {
        params: out.params,
        sse: out.cost,
        rmse,
        iterations: out.iterations,
    })
}
