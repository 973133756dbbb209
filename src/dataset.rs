//! Labeled datasets and seeded train/test splitting

use crate::error::{BenchError, Result};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A single training/test example: target label plus a fixed-width feature vector.
///
/// The label is a class index for classification tasks and a continuous
/// target for regression, stored uniformly as `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub label: f64,
    pub features: Vec<f64>,
}

impl LabeledExample {
    pub fn new(label: f64, features: Vec<f64>) -> Self {
        Self { label, features }
    }
}

/// An ordered, immutable collection of labeled examples with a consistent
/// feature-vector width.
///
/// Width consistency and label finiteness are enforced at construction, so
/// downstream trainers can assume a rectangular feature matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    examples: Vec<LabeledExample>,
    n_features: usize,
}

impl Dataset {
    /// Build a dataset from examples, validating shape and labels.
    pub fn new(examples: Vec<LabeledExample>) -> Result<Self> {
        let first = examples.first().ok_or_else(|| {
            BenchError::InvalidInput("dataset must contain at least one example".to_string())
        })?;

        let n_features = first.features.len();
        if n_features == 0 {
            return Err(BenchError::InvalidInput(
                "feature vectors must be non-empty".to_string(),
            ));
        }

        for (i, example) in examples.iter().enumerate() {
            if example.features.len() != n_features {
                return Err(BenchError::InvalidInput(format!(
                    "inconsistent feature width at example {}: expected {}, got {}",
                    i,
                    n_features,
                    example.features.len()
                )));
            }
            if !example.label.is_finite() {
                return Err(BenchError::InvalidInput(format!(
                    "non-finite label at example {}: {}",
                    i, example.label
                )));
            }
        }

        Ok(Self {
            examples,
            n_features,
        })
    }

    /// Build a dataset from `(label, features)` rows, the shape an upstream
    /// feature table hands over.
    pub fn from_rows(rows: Vec<(f64, Vec<f64>)>) -> Result<Self> {
        Self::new(
            rows.into_iter()
                .map(|(label, features)| LabeledExample::new(label, features))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledExample> {
        self.examples.iter()
    }

    /// Materialize the dataset as a row-major feature matrix and label vector.
    pub fn to_matrix(&self) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((self.examples.len(), self.n_features), |(r, c)| {
            self.examples[r].features[c]
        });
        let y = Array1::from_iter(self.examples.iter().map(|e| e.label));
        (x, y)
    }

    /// Randomly partition into training and test subsets.
    ///
    /// Each example independently goes to training with probability
    /// `train_fraction / (train_fraction + test_fraction)`, drawn in
    /// example-index order from a ChaCha8 stream fixed by `seed`. Identical
    /// inputs produce bit-identical partitions. The resulting sizes are
    /// approximate, not exact counts; downstream error estimates tolerate
    /// that, so the split is deliberately not stratified or exact.
    ///
    /// The fractions need not sum to 1.0 but must each be in (0, 1].
    pub fn random_split(&self, train_fraction: f64, test_fraction: f64, seed: u64) -> Result<Split> {
        if self.examples.is_empty() {
            return Err(BenchError::InvalidInput(
                "cannot split an empty dataset".to_string(),
            ));
        }
        for (name, value) in [("train_fraction", train_fraction), ("test_fraction", test_fraction)] {
            if !(value > 0.0 && value <= 1.0) || !value.is_finite() {
                return Err(BenchError::hyperparameter(
                    name,
                    value,
                    "must be in (0, 1]",
                ));
            }
        }

        let train_prob = train_fraction / (train_fraction + test_fraction);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut training = Vec::new();
        let mut test = Vec::new();
        for example in &self.examples {
            let draw: f64 = rng.gen();
            if draw < train_prob {
                training.push(example.clone());
            } else {
                test.push(example.clone());
            }
        }

        Ok(Split {
            training: Dataset {
                examples: training,
                n_features: self.n_features,
            },
            test: Dataset {
                examples: test,
                n_features: self.n_features,
            },
        })
    }
}

/// A train/test partition of a dataset.
///
/// Either side may be empty for small datasets or extreme fractions; the
/// pipeline rejects that case before training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Split {
    pub training: Dataset,
    pub test: Dataset,
}
