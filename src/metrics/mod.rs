//! Evaluation metrics over prediction/label pairs
//!
//! Every metric is a pure reduction over a `&[PredictionPair]` slice; there
//! is no shared accumulation state, so sequential and parallel callers get
//! identical results.

mod roc;

pub use roc::{area_under_roc, roc_curve};

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One prediction paired with the ground-truth label it was made against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPair {
    pub predicted: f64,
    pub actual: f64,
}

impl PredictionPair {
    pub fn new(predicted: f64, actual: f64) -> Self {
        Self { predicted, actual }
    }
}

/// Named metric values returned to the caller.
pub type MetricsResult = HashMap<String, f64>;

/// Mean squared error over all pairs.
pub fn mse(pairs: &[PredictionPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(BenchError::InvalidInput(
            "mse requires at least one prediction pair".to_string(),
        ));
    }
    let sum: f64 = pairs
        .iter()
        .map(|p| (p.predicted - p.actual).powi(2))
        .sum();
    Ok(sum / pairs.len() as f64)
}

/// Fraction of pairs whose prediction equals the label exactly.
///
/// Classification labels are discrete values stored as floats and compared
/// with exact equality. That is intentional, carried over from the source
/// design; do not soften it to a tolerance comparison.
pub fn accuracy(pairs: &[PredictionPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(BenchError::InvalidInput(
            "accuracy requires at least one prediction pair".to_string(),
        ));
    }
    let correct = pairs.iter().filter(|p| p.predicted == p.actual).count();
    Ok(correct as f64 / pairs.len() as f64)
}

/// Multiclass confusion counts keyed by exact label value.
#[derive(Debug, Clone, Default)]
struct Confusion {
    /// class → true positives
    tp: HashMap<u64, usize>,
    /// class → predicted-as count (tp + fp)
    predicted: HashMap<u64, usize>,
    /// class → actual count (tp + fn)
    actual: HashMap<u64, usize>,
}

fn key(label: f64) -> u64 {
    label.to_bits()
}

fn confusion(pairs: &[PredictionPair]) -> Confusion {
    let mut c = Confusion::default();
    for pair in pairs {
        *c.predicted.entry(key(pair.predicted)).or_insert(0) += 1;
        *c.actual.entry(key(pair.actual)).or_insert(0) += 1;
        if pair.predicted == pair.actual {
            *c.tp.entry(key(pair.actual)).or_insert(0) += 1;
        }
    }
    c
}

/// Macro-averaged precision over the classes observed as actual labels.
///
/// Per-class precision is tp / (tp + fp); a class the model never predicts
/// contributes 0. Macro averaging (unweighted mean over classes) is used for
/// all multiclass aggregates in this crate, consistently.
pub fn precision(pairs: &[PredictionPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(BenchError::InvalidInput(
            "precision requires at least one prediction pair".to_string(),
        ));
    }
    let c = confusion(pairs);
    let sum: f64 = c
        .actual
        .keys()
        .map(|class| {
            let tp = *c.tp.get(class).unwrap_or(&0) as f64;
            let predicted = *c.predicted.get(class).unwrap_or(&0) as f64;
            if predicted > 0.0 {
                tp / predicted
            } else {
                0.0
            }
        })
        .sum();
    Ok(sum / c.actual.len() as f64)
}

/// Macro-averaged recall over the classes observed as actual labels.
pub fn recall(pairs: &[PredictionPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(BenchError::InvalidInput(
            "recall requires at least one prediction pair".to_string(),
        ));
    }
    let c = confusion(pairs);
    let sum: f64 = c
        .actual
        .iter()
        .map(|(class, &actual)| {
            let tp = *c.tp.get(class).unwrap_or(&0) as f64;
            tp / actual as f64
        })
        .sum();
    Ok(sum / c.actual.len() as f64)
}

/// Harmonic mean of macro precision and macro recall.
pub fn f_measure(pairs: &[PredictionPair]) -> Result<f64> {
    let p = precision(pairs)?;
    let r = recall(pairs)?;
    if p + r == 0.0 {
        return Ok(0.0);
    }
    Ok(2.0 * p * r / (p + r))
}
