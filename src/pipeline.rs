//! Pipeline orchestration: split, train, predict, evaluate

use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::metrics::{self, MetricsResult, PredictionPair};
use crate::training::{predict_pairs, AlgorithmSpec, TrainedModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything a single pipeline invocation returns: the named metrics plus
/// the raw prediction pairs for further inspection by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub algorithm: String,
    pub metrics: MetricsResult,
    pub predictions: Vec<PredictionPair>,
}

/// Drives one algorithm variant through split → train → predict → metrics.
///
/// The pipeline is agnostic to feature-vector width: a single-feature
/// "simple" dataset and a multi-feature "complex" one flow through identical
/// logic. Each invocation is independent; the trained model is discarded
/// once metrics are computed.
///
/// All diagnostic logging happens here, at the orchestration boundary.
/// Trainers, the predictor, and the metric reductions stay silent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    spec: AlgorithmSpec,
    train_fraction: f64,
    test_fraction: f64,
    seed: u64,
}

impl Pipeline {
    /// Create a pipeline with the harness defaults: 40% training, 60% test,
    /// seed 11.
    pub fn new(spec: AlgorithmSpec) -> Self {
        Self {
            spec,
            train_fraction: 0.4,
            test_fraction: 0.6,
            seed: 11,
        }
    }

    pub fn with_split(mut self, train_fraction: f64, test_fraction: f64) -> Self {
        self.train_fraction = train_fraction;
        self.test_fraction = test_fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run the full pipeline over a dataset.
    pub fn run(&self, dataset: &Dataset) -> Result<EvaluationReport> {
        self.spec.validate()?;

        info!(
            algorithm = self.spec.name(),
            examples = dataset.len(),
            features = dataset.n_features(),
            seed = self.seed,
            "starting pipeline run"
        );

        let split = dataset.random_split(self.train_fraction, self.test_fraction, self.seed)?;
        if split.training.is_empty() {
            return Err(BenchError::InvalidInput(
                "split produced an empty training set; use a larger dataset or fraction"
                    .to_string(),
            ));
        }
        if split.test.is_empty() {
            return Err(BenchError::InvalidInput(
                "split produced an empty test set; use a larger dataset or fraction".to_string(),
            ));
        }
        debug!(
            training = split.training.len(),
            test = split.test.len(),
            "dataset partitioned"
        );

        let model = TrainedModel::train(&split.training, &self.spec)?;
        let predictions = predict_pairs(&model, &split.test);

        let metrics = self.compute_metrics(&predictions)?;
        info!(
            algorithm = self.spec.name(),
            metrics = ?metrics,
            "pipeline run complete"
        );

        Ok(EvaluationReport {
            algorithm: self.spec.name().to_string(),
            metrics,
            predictions,
        })
    }

    /// Task-appropriate metric set: MSE for regression; accuracy, macro
    /// precision/recall and F-measure for classification, plus AUC when the
    /// test labels are binary.
    fn compute_metrics(&self, predictions: &[PredictionPair]) -> Result<MetricsResult> {
        let mut result = MetricsResult::new();

        if self.spec.is_classifier() {
            result.insert("accuracy".to_string(), metrics::accuracy(predictions)?);
            result.insert("precision".to_string(), metrics::precision(predictions)?);
            result.insert("recall".to_string(), metrics::recall(predictions)?);
            result.insert("fMeasure".to_string(), metrics::f_measure(predictions)?);

            if is_binary(predictions) {
                result.insert(
                    "areaUnderROC".to_string(),
                    metrics::area_under_roc(predictions)?,
                );
            }
        } else {
            result.insert("mse".to_string(), metrics::mse(predictions)?);
        }

        Ok(result)
    }
}

fn is_binary(predictions: &[PredictionPair]) -> bool {
    let mut labels: Vec<f64> = predictions.iter().map(|p| p.actual).collect();
    labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    labels.dedup();
    labels.len() == 2
}

/// Run several algorithm variants over the same dataset and seed,
/// side by side.
pub fn compare(
    dataset: &Dataset,
    specs: Vec<AlgorithmSpec>,
) -> Result<Vec<EvaluationReport>> {
    specs
        .into_iter()
        .map(|spec| Pipeline::new(spec).run(dataset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{Impurity, LinearConfig, LogisticConfig, NaiveBayesConfig, TreeConfig};

    fn classification_dataset(n: usize) -> Dataset {
        Dataset::from_rows(
            (0..n)
                .map(|i| {
                    let class = (i % 2) as f64;
                    (class, vec![class * 10.0 + (i % 5) as f64, 1.0])
                })
                .collect(),
        )
        .unwrap()
    }

    fn regression_dataset(n: usize) -> Dataset {
        Dataset::from_rows(
            (0..n)
                .map(|i| {
                    let x = i as f64 / n as f64;
                    (2.0 * x, vec![x])
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_regression_pipeline_reports_mse() {
        let ds = regression_dataset(100);
        let pipeline = Pipeline::new(AlgorithmSpec::Linear(LinearConfig::new(500, 0.1)));
        let report = pipeline.run(&ds).unwrap();

        assert!(report.metrics.contains_key("mse"));
        assert!(!report.metrics.contains_key("accuracy"));
        assert!(!report.predictions.is_empty());
    }

    #[test]
    fn test_classification_pipeline_reports_full_set() {
        let ds = classification_dataset(60);
        let pipeline = Pipeline::new(AlgorithmSpec::DecisionTree(TreeConfig::new(
            2,
            4,
            32,
            Impurity::Gini,
        )));
        let report = pipeline.run(&ds).unwrap();

        for name in ["accuracy", "precision", "recall", "fMeasure", "areaUnderROC"] {
            assert!(report.metrics.contains_key(name), "missing metric {}", name);
            let value = report.metrics[name];
            assert!((0.0..=1.0).contains(&value), "{} = {} out of range", name, value);
        }
    }

    #[test]
    fn test_same_seed_same_report() {
        let ds = classification_dataset(40);
        let spec = AlgorithmSpec::NaiveBayes(NaiveBayesConfig::new(1.0));
        let a = Pipeline::new(spec.clone()).run(&ds).unwrap();
        let b = Pipeline::new(spec).run(&ds).unwrap();
        assert_eq!(a.predictions, b.predictions);
        assert_eq!(a.metrics, b.metrics);
    }

    #[test]
    fn test_width_agnostic() {
        // Single-feature and multi-feature datasets run through the same
        // pipeline untouched
        let simple = Dataset::from_rows(
            (0..40).map(|i| ((i % 2) as f64, vec![(i % 2) as f64 * 5.0])).collect(),
        )
        .unwrap();
        let spec = AlgorithmSpec::Logistic(LogisticConfig::new(2));

        let simple_report = Pipeline::new(spec.clone()).run(&simple).unwrap();
        let complex_report = Pipeline::new(spec).run(&classification_dataset(40)).unwrap();
        assert!(simple_report.metrics.contains_key("accuracy"));
        assert!(complex_report.metrics.contains_key("accuracy"));
    }

    #[test]
    fn test_compare_runs_all_variants() {
        let ds = classification_dataset(60);
        let reports = compare(
            &ds,
            vec![
                AlgorithmSpec::Logistic(LogisticConfig::new(2)),
                AlgorithmSpec::NaiveBayes(NaiveBayesConfig::new(1.0)),
                AlgorithmSpec::DecisionTree(TreeConfig::new(2, 4, 32, Impurity::Gini)),
            ],
        )
        .unwrap();

        assert_eq!(reports.len(), 3);
        let names: Vec<&str> = reports.iter().map(|r| r.algorithm.as_str()).collect();
        assert_eq!(names, vec!["logistic", "naiveBayes", "decisionTree"]);
    }

    #[test]
    fn test_invalid_spec_rejected_before_split() {
        let ds = classification_dataset(20);
        let pipeline = Pipeline::new(AlgorithmSpec::Logistic(LogisticConfig::new(1)));
        assert!(matches!(
            pipeline.run(&ds),
            Err(BenchError::InvalidHyperparameter { .. })
        ));
    }
}
