//! modelbench — training/evaluation harness for supervised model families
//!
//! Trains and evaluates multiple supervised-learning model families over a
//! shared labeled-vector dataset, compares their predictive quality, and
//! reports standard accuracy metrics.
//!
//! # Modules
//!
//! - [`dataset`] - Labeled datasets and seeded train/test splitting
//! - [`training`] - Per-algorithm trainers and the trained-model variants
//! - [`metrics`] - MSE, accuracy, macro precision/recall/F-measure, ROC/AUC
//! - [`pipeline`] - Orchestration: split → train → predict → evaluate
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use modelbench::dataset::Dataset;
//! use modelbench::pipeline::Pipeline;
//! use modelbench::training::{AlgorithmSpec, LogisticConfig};
//!
//! let dataset = Dataset::from_rows(
//!     (0..40)
//!         .map(|i| ((i % 2) as f64, vec![(i % 2) as f64 * 4.0 + (i % 3) as f64]))
//!         .collect(),
//! )
//! .unwrap();
//!
//! let report = Pipeline::new(AlgorithmSpec::Logistic(LogisticConfig::new(2)))
//!     .with_seed(11)
//!     .run(&dataset)
//!     .unwrap();
//!
//! assert!(report.metrics.contains_key("accuracy"));
//! ```

pub mod dataset;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod training;

pub use dataset::{Dataset, LabeledExample, Split};
pub use error::{BenchError, Result};
pub use metrics::{MetricsResult, PredictionPair};
pub use pipeline::{compare, EvaluationReport, Pipeline};
pub use training::{
    AlgorithmSpec, Impurity, LinearConfig, LogisticConfig, NaiveBayesConfig, TrainedModel,
    TreeConfig,
};
