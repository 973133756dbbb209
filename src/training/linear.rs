//! Gradient-descent linear regression

use crate::error::{BenchError, Result};
use crate::training::config::LinearConfig;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Linear regression fit by full-batch gradient descent on squared error.
///
/// When `fit_intercept` is disabled the intercept is fixed at 0.0 and never
/// updated during descent. That asymmetry is inherited behavior, documented
/// rather than corrected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Array1<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Train on a feature matrix and target vector.
    pub fn train(x: &Array2<f64>, y: &Array1<f64>, config: &LinearConfig) -> Result<Self> {
        config.validate()?;

        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(BenchError::InvalidInput(
                "linear training set is empty".to_string(),
            ));
        }
        if n_samples != y.len() {
            return Err(BenchError::InvalidInput(format!(
                "feature matrix has {} rows but label vector has {}",
                n_samples,
                y.len()
            )));
        }

        let mut weights: Array1<f64> = Array1::zeros(x.ncols());
        let mut intercept = 0.0;
        let n = n_samples as f64;

        for iter in 0..config.iterations {
            let residuals = &x.dot(&weights) + intercept - y;

            // d/dw of mean squared error: (2/n) X^T r
            let grad_w = x.t().dot(&residuals) * (2.0 / n);
            weights = weights - config.step_size * &grad_w;

            if config.fit_intercept {
                let grad_b = 2.0 * residuals.mean().unwrap_or(0.0);
                intercept -= config.step_size * grad_b;
            }

            if !weights.iter().all(|w| w.is_finite()) || !intercept.is_finite() {
                return Err(BenchError::NumericInstability {
                    stage: "train".to_string(),
                    detail: format!(
                        "linear coefficients diverged at iteration {} (step_size {} too large?)",
                        iter, config.step_size
                    ),
                });
            }
        }

        Ok(Self { weights, intercept })
    }

    /// Predict the continuous target for one feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}
