//! Trained model variants and prediction

use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::metrics::PredictionPair;
use crate::training::config::AlgorithmSpec;
use crate::training::decision_tree::DecisionTreeModel;
use crate::training::linear::LinearModel;
use crate::training::logistic::LogisticModel;
use crate::training::naive_bayes::NaiveBayesModel;
use serde::{Deserialize, Serialize};

/// An immutable trained model.
///
/// The variant is chosen once, at training time; prediction goes through the
/// single `predict` capability without any further variant-specific logic in
/// callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedModel {
    Linear(LinearModel),
    Logistic(LogisticModel),
    NaiveBayes(NaiveBayesModel),
    DecisionTree(DecisionTreeModel),
}

impl TrainedModel {
    /// Train the algorithm selected by `spec` on a training set.
    pub fn train(training: &Dataset, spec: &AlgorithmSpec) -> Result<Self> {
        if training.is_empty() {
            return Err(BenchError::InvalidInput(format!(
                "{} training set is empty",
                spec.name()
            )));
        }
        let (x, y) = training.to_matrix();

        Ok(match spec {
            AlgorithmSpec::Linear(config) => {
                TrainedModel::Linear(LinearModel::train(&x, &y, config)?)
            }
            AlgorithmSpec::Logistic(config) => {
                TrainedModel::Logistic(LogisticModel::train(&x, &y, config)?)
            }
            AlgorithmSpec::NaiveBayes(config) => {
                TrainedModel::NaiveBayes(NaiveBayesModel::train(&x, &y, config)?)
            }
            AlgorithmSpec::DecisionTree(config) => {
                TrainedModel::DecisionTree(DecisionTreeModel::train(&x, &y, config)?)
            }
        })
    }

    /// Predict the label for one feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        match self {
            TrainedModel::Linear(m) => m.predict(features),
            TrainedModel::Logistic(m) => m.predict(features),
            TrainedModel::NaiveBayes(m) => m.predict(features),
            TrainedModel::DecisionTree(m) => m.predict(features),
        }
    }
}

/// Apply a trained model to a held-out set, pairing each prediction with its
/// actual label. Order follows the input sequence; neither the model nor the
/// test set is mutated.
pub fn predict_pairs(model: &TrainedModel, test: &Dataset) -> Vec<PredictionPair> {
    test.iter()
        .map(|example| PredictionPair::new(model.predict(&example.features), example.label))
        .collect()
}
