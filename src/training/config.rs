//! Hyperparameter bundles and algorithm selection

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Impurity criterion for decision-tree splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impurity {
    /// Gini impurity (classification)
    Gini,
    /// Information entropy (classification)
    Entropy,
    /// Label variance (regression)
    Variance,
}

/// Linear regression hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearConfig {
    /// Number of gradient-descent iterations
    pub iterations: usize,
    /// Gradient-descent step size
    pub step_size: f64,
    /// Whether to learn a bias term. When false the intercept stays exactly
    /// 0.0 and is never updated; callers relying on a centered fit must
    /// enable this explicitly.
    pub fit_intercept: bool,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            step_size: 0.01,
            fit_intercept: false,
        }
    }
}

impl LinearConfig {
    pub fn new(iterations: usize, step_size: f64) -> Self {
        Self {
            iterations,
            step_size,
            ..Self::default()
        }
    }

    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BenchError::hyperparameter(
                "iterations",
                self.iterations,
                "must be at least 1",
            ));
        }
        if !(self.step_size > 0.0) || !self.step_size.is_finite() {
            return Err(BenchError::hyperparameter(
                "step_size",
                self.step_size,
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}

/// Multinomial logistic regression hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Declared number of classes. Fixed before training, never inferred
    /// from the data; labels outside `0..num_classes` are a caller error.
    pub num_classes: usize,
    /// Maximum optimizer iterations
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            num_classes: 2,
            max_iter: 100,
            tol: 1e-6,
        }
    }
}

impl LogisticConfig {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            ..Self::default()
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_classes < 2 {
            return Err(BenchError::hyperparameter(
                "num_classes",
                self.num_classes,
                "must be at least 2",
            ));
        }
        if self.max_iter == 0 {
            return Err(BenchError::hyperparameter(
                "max_iter",
                self.max_iter,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Multinomial naive Bayes hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesConfig {
    /// Additive (Laplace) smoothing applied to feature counts
    pub smoothing: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self { smoothing: 1.0 }
    }
}

impl NaiveBayesConfig {
    pub fn new(smoothing: f64) -> Self {
        Self { smoothing }
    }

    pub fn validate(&self) -> Result<()> {
        if self.smoothing < 0.0 || !self.smoothing.is_finite() {
            return Err(BenchError::hyperparameter(
                "smoothing",
                self.smoothing,
                "must be non-negative and finite",
            ));
        }
        Ok(())
    }
}

/// Decision tree hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Declared number of classes (classification impurities only)
    pub num_classes: usize,
    /// Maximum tree depth; a depth-1 tree is a single split
    pub max_depth: usize,
    /// Upper bound on candidate thresholds evaluated per continuous
    /// feature. A discretization/performance trade-off, not an exactness
    /// guarantee.
    pub max_bins: usize,
    /// Impurity criterion
    pub impurity: Impurity,
    /// Feature index → arity for categorical features. Absent indices are
    /// treated as continuous.
    pub categorical_features: HashMap<usize, usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            num_classes: 2,
            max_depth: 10,
            max_bins: 1000,
            impurity: Impurity::Gini,
            categorical_features: HashMap::new(),
        }
    }
}

impl TreeConfig {
    pub fn new(num_classes: usize, max_depth: usize, max_bins: usize, impurity: Impurity) -> Self {
        Self {
            num_classes,
            max_depth,
            max_bins,
            impurity,
            categorical_features: HashMap::new(),
        }
    }

    pub fn with_categorical_features(mut self, features: HashMap<usize, usize>) -> Self {
        self.categorical_features = features;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(BenchError::hyperparameter(
                "max_depth",
                self.max_depth,
                "must be at least 1",
            ));
        }
        if self.max_bins < 2 {
            return Err(BenchError::hyperparameter(
                "max_bins",
                self.max_bins,
                "must be at least 2",
            ));
        }
        if self.impurity != Impurity::Variance && self.num_classes < 2 {
            return Err(BenchError::hyperparameter(
                "num_classes",
                self.num_classes,
                "must be at least 2 for classification impurities",
            ));
        }
        Ok(())
    }
}

/// Selects the algorithm family and carries its hyperparameters.
///
/// The pipeline switches on this exactly once, at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlgorithmSpec {
    Linear(LinearConfig),
    Logistic(LogisticConfig),
    NaiveBayes(NaiveBayesConfig),
    DecisionTree(TreeConfig),
}

impl AlgorithmSpec {
    /// Short name used in reports and logs
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmSpec::Linear(_) => "linear",
            AlgorithmSpec::Logistic(_) => "logistic",
            AlgorithmSpec::NaiveBayes(_) => "naiveBayes",
            AlgorithmSpec::DecisionTree(_) => "decisionTree",
        }
    }

    /// Whether the trained model predicts discrete class labels
    pub fn is_classifier(&self) -> bool {
        match self {
            AlgorithmSpec::Linear(_) => false,
            AlgorithmSpec::Logistic(_) | AlgorithmSpec::NaiveBayes(_) => true,
            AlgorithmSpec::DecisionTree(config) => config.impurity != Impurity::Variance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            AlgorithmSpec::Linear(c) => c.validate(),
            AlgorithmSpec::Logistic(c) => c.validate(),
            AlgorithmSpec::NaiveBayes(c) => c.validate(),
            AlgorithmSpec::DecisionTree(c) => c.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_validation() {
        assert!(LinearConfig::new(100, 0.1).validate().is_ok());
        assert!(LinearConfig::new(0, 0.1).validate().is_err());
        assert!(LinearConfig::new(100, 0.0).validate().is_err());
        assert!(LinearConfig::new(100, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_logistic_validation() {
        assert!(LogisticConfig::new(2).validate().is_ok());
        assert!(LogisticConfig::new(5).validate().is_ok());
        assert!(LogisticConfig::new(1).validate().is_err());
    }

    #[test]
    fn test_naive_bayes_validation() {
        assert!(NaiveBayesConfig::new(1.0).validate().is_ok());
        assert!(NaiveBayesConfig::new(0.0).validate().is_ok());
        assert!(NaiveBayesConfig::new(-0.5).validate().is_err());
    }

    #[test]
    fn test_tree_validation() {
        assert!(TreeConfig::default().validate().is_ok());
        assert!(TreeConfig::new(2, 0, 32, Impurity::Gini).validate().is_err());
        assert!(TreeConfig::new(2, 5, 1, Impurity::Gini).validate().is_err());
        assert!(TreeConfig::new(1, 5, 32, Impurity::Gini).validate().is_err());
        // Variance impurity does not use num_classes
        assert!(TreeConfig::new(0, 5, 32, Impurity::Variance).validate().is_ok());
    }

    #[test]
    fn test_spec_classifier_flag() {
        assert!(!AlgorithmSpec::Linear(LinearConfig::default()).is_classifier());
        assert!(AlgorithmSpec::Logistic(LogisticConfig::default()).is_classifier());
        assert!(AlgorithmSpec::NaiveBayes(NaiveBayesConfig::default()).is_classifier());
        assert!(
            !AlgorithmSpec::DecisionTree(TreeConfig::new(0, 5, 32, Impurity::Variance))
                .is_classifier()
        );
    }
}
