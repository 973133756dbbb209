//! Multinomial logistic regression

use crate::error::{BenchError, Result};
use crate::training::config::LogisticConfig;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Multinomial (softmax) logistic regression.
///
/// The class count is declared up front in [`LogisticConfig`] and never
/// inferred from the data. Labels must lie in `0..num_classes`; feeding
/// labels outside that range is a caller contract violation, not a condition
/// this trainer checks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight row per class
    weights: Array2<f64>,
    /// One bias per class
    biases: Array1<f64>,
    num_classes: usize,
}

impl LogisticModel {
    /// Train with iterative full-batch gradient descent, terminating early
    /// once the gradient norm drops under the configured tolerance.
    pub fn train(x: &Array2<f64>, y: &Array1<f64>, config: &LogisticConfig) -> Result<Self> {
        config.validate()?;

        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples == 0 {
            return Err(BenchError::InvalidInput(
                "logistic training set is empty".to_string(),
            ));
        }
        if n_samples != y.len() {
            return Err(BenchError::InvalidInput(format!(
                "feature matrix has {} rows but label vector has {}",
                n_samples,
                y.len()
            )));
        }

        let k = config.num_classes;
        let mut weights: Array2<f64> = Array2::zeros((k, n_features));
        let mut biases: Array1<f64> = Array1::zeros(k);
        let n = n_samples as f64;
        let lr = 0.5;

        for iter in 0..config.max_iter {
            // Scores: (n_samples, k)
            let mut scores = x.dot(&weights.t());
            scores += &biases;

            // Row-wise softmax with max-shift
            for mut row in scores.rows_mut() {
                let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                row.mapv_inplace(|v| (v - max).exp());
                let sum: f64 = row.sum();
                row.mapv_inplace(|v| v / sum);
            }

            if !scores.iter().all(|p| p.is_finite()) {
                return Err(BenchError::NumericInstability {
                    stage: "train".to_string(),
                    detail: format!("softmax produced non-finite probabilities at iteration {}", iter),
                });
            }

            // Gradient of cross-entropy: (P - Y_onehot)^T X / n
            let mut delta = scores;
            for (i, &label) in y.iter().enumerate() {
                delta[[i, label as usize]] -= 1.0;
            }

            let grad_w = delta.t().dot(x) / n;
            let grad_b = delta.sum_axis(Axis(0)) / n;

            let grad_norm =
                (grad_w.mapv(|v| v * v).sum() + grad_b.mapv(|v| v * v).sum()).sqrt();
            if grad_norm < config.tol {
                break;
            }

            weights = weights - lr * &grad_w;
            biases = biases - lr * &grad_b;
        }

        Ok(Self {
            weights,
            biases,
            num_classes: k,
        })
    }

    /// Predict the most probable class index for one feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let scores = self.class_scores(features);
        scores
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i as f64)
            .unwrap_or(0.0)
    }

    /// Unnormalized per-class scores for one feature vector.
    pub fn class_scores(&self, features: &[f64]) -> Vec<f64> {
        (0..self.num_classes)
            .map(|c| {
                self.weights
                    .row(c)
                    .iter()
                    .zip(features.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + self.biases[c]
            })
            .collect()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_binary_separable() {
        let x = array![
            [-2.0], [-1.5], [-1.0], [-0.5], [-0.3],
            [0.3], [0.5], [1.0], [1.5], [2.0],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];

        let config = LogisticConfig::new(2).with_max_iter(500);
        let model = LogisticModel::train(&x, &y, &config).unwrap();

        assert_eq!(model.predict(&[-1.2]), 0.0);
        assert_eq!(model.predict(&[1.2]), 1.0);
    }

    #[test]
    fn test_three_classes() {
        let x = array![
            [0.0, 0.0], [0.2, 0.1], [0.1, 0.2],
            [5.0, 0.0], [5.2, 0.1], [4.9, 0.2],
            [0.0, 5.0], [0.1, 5.2], [0.2, 4.9],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0];

        let config = LogisticConfig::new(3).with_max_iter(1000);
        let model = LogisticModel::train(&x, &y, &config).unwrap();

        assert_eq!(model.predict(&[0.1, 0.1]), 0.0);
        assert_eq!(model.predict(&[5.0, 0.1]), 1.0);
        assert_eq!(model.predict(&[0.1, 5.0]), 2.0);
    }

    #[test]
    fn test_num_classes_under_two_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![0.0, 0.0];
        let result = LogisticModel::train(&x, &y, &LogisticConfig::new(1));
        assert!(matches!(result, Err(BenchError::InvalidHyperparameter { .. })));
    }

    #[test]
    fn test_empty_training_set_rejected() {
        let x = Array2::<f64>::zeros((0, 1));
        let y = Array1::<f64>::zeros(0);
        let result = LogisticModel::train(&x, &y, &LogisticConfig::new(2));
        assert!(matches!(result, Err(BenchError::InvalidInput(_))));
    }
}
