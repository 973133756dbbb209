//! Multinomial naive Bayes

use crate::error::{BenchError, Result};
use crate::training::config::NaiveBayesConfig;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Multinomial naive Bayes classifier.
///
/// Assumes the multinomial event model: every feature value is a
/// non-negative count-like quantity. Negative features are rejected at
/// training time rather than clamped, since a silently clamped count would
/// corrupt the likelihood estimates without any visible signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    /// Per-class log prior
    class_log_priors: HashMap<i64, f64>,
    /// Per-class, per-feature log probability
    feature_log_probs: HashMap<i64, Vec<f64>>,
    /// Sorted class labels observed during training
    classes: Vec<i64>,
}

impl NaiveBayesModel {
    /// Estimate class priors and smoothed feature likelihoods from counts.
    pub fn train(x: &Array2<f64>, y: &Array1<f64>, config: &NaiveBayesConfig) -> Result<Self> {
        config.validate()?;

        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples == 0 {
            return Err(BenchError::InvalidInput(
                "naive Bayes training set is empty".to_string(),
            ));
        }
        if n_samples != y.len() {
            return Err(BenchError::InvalidInput(format!(
                "feature matrix has {} rows but label vector has {}",
                n_samples,
                y.len()
            )));
        }
        if let Some((row, col)) = first_negative(x) {
            return Err(BenchError::InvalidInput(format!(
                "naive Bayes requires non-negative features, found {} at row {} column {}",
                x[[row, col]],
                row,
                col
            )));
        }

        let mut class_counts: HashMap<i64, usize> = HashMap::new();
        for &label in y.iter() {
            *class_counts.entry(label as i64).or_insert(0) += 1;
        }

        let mut classes: Vec<i64> = class_counts.keys().copied().collect();
        classes.sort_unstable();

        let mut class_log_priors = HashMap::new();
        for (&class, &count) in &class_counts {
            class_log_priors.insert(class, (count as f64 / n_samples as f64).ln());
        }

        let alpha = config.smoothing;
        let mut feature_log_probs = HashMap::new();
        for &class in &classes {
            let mut feature_counts = vec![alpha; n_features];
            let mut total_count = alpha * n_features as f64;

            for (row, &label) in x.rows().into_iter().zip(y.iter()) {
                if label as i64 == class {
                    for (j, &val) in row.iter().enumerate() {
                        feature_counts[j] += val;
                        total_count += val;
                    }
                }
            }

            if total_count <= 0.0 {
                // All-zero features with zero smoothing leave nothing to
                // normalize over.
                return Err(BenchError::NumericInstability {
                    stage: "train".to_string(),
                    detail: format!(
                        "class {} has zero total feature mass and zero smoothing",
                        class
                    ),
                });
            }

            let log_probs: Vec<f64> = feature_counts
                .iter()
                .map(|&count| (count / total_count).ln())
                .collect();
            feature_log_probs.insert(class, log_probs);
        }

        Ok(Self {
            class_log_priors,
            feature_log_probs,
            classes,
        })
    }

    /// Predict the maximum-posterior class for one feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        self.classes
            .iter()
            .map(|&class| {
                let log_prior = self.class_log_priors[&class];
                let log_likelihood: f64 = features
                    .iter()
                    .zip(self.feature_log_probs[&class].iter())
                    .map(|(&xi, &log_p)| xi * log_p)
                    .sum();
                (class, log_prior + log_likelihood)
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(class, _)| class as f64)
            .unwrap_or(0.0)
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }
}

fn first_negative(x: &Array2<f64>) -> Option<(usize, usize)> {
    for (i, row) in x.rows().into_iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            if val < 0.0 {
                return Some((i, j));
            }
        }
    }
    None
}
