//! Named-parameter model functions.
//!
//! A `Model` pairs a scalar function `f(x; p)` with the declared names of its
//! parameters. The names drive the aggregate table header, so they are part of
//! the model definition rather than something recovered from the function.

use std::fmt;
use std::sync::Arc;

type ModelFn = dyn Fn(f64, &[f64]) -> f64 + Send + Sync;

/// A parametric function of one independent variable.
#[derive(Clone)]
pub struct Model {
    name: String,
    params: Vec<String>,
    initial: Option<Vec<f64>>,
    func: Arc<ModelFn>,
}

impl Model {
    /// Build a model from a closure and its parameter names.
    ///
    /// `func` receives the independent variable and a slice with one value per
    /// entry of `params`, in the same order.
    pub fn new<F>(name: impl Into<String>, params: &[&str], func: F) -> Self
    where
        F: Fn(f64, &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            initial: None,
            func: Arc::new(func),
        }
    }

    /// Straight line `m*x + c`.
    pub fn linear() -> Self {
        Self::new("linear", &["m", "c"], |x, p| p[0] * x + p[1])
    }

    /// Exponential decay `b*exp(-a*x)`.
    pub fn exponential() -> Self {
        Self::new("exponential", &["a", "b"], |x, p| p[1] * (-p[0] * x).exp())
    }

    /// Override the default initial guess (all ones).
    pub fn with_initial(mut self, initial: Vec<f64>) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn initial_guess(&self) -> Vec<f64> {
        self.initial
            .clone()
            .unwrap_or_else(|| vec![1.0; self.params.len()])
    }

    /// Evaluate `f(x; params)`.
    pub fn eval(&self, x: f64, params: &[f64]) -> f64 {
        (self.func)(x, params)
    }

    /// Evaluate the model at every `x`.
    pub fn predict(&self, xs: &[f64], params: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x, params)).collect()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::linear()
    }
}
