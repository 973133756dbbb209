//! ROC curve and AUC for binary classifiers

use crate::error::{BenchError, Result};
use crate::metrics::PredictionPair;

/// Receiver Operating Characteristic curve.
///
/// Pairs are sorted by predicted score descending and a decision threshold
/// is swept across the distinct scores; at each threshold a
/// `(false positive rate, true positive rate)` point is emitted. The curve
/// always starts at (0, 0) and ends at (1, 1). The larger of the two actual
/// label values is the positive class.
///
/// Errors with `UnsupportedMetric` unless the actual labels take exactly two
/// distinct values.
pub fn roc_curve(pairs: &[PredictionPair]) -> Result<Vec<(f64, f64)>> {
    let (positive, n_pos, n_neg) = binary_labels(pairs)?;

    let mut sorted: Vec<&PredictionPair> = pairs.iter().collect();
    sorted.sort_by(|a, b| {
        b.predicted
            .partial_cmp(&a.predicted)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut curve = vec![(0.0, 0.0)];
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        // Consume all pairs sharing this score before emitting a point, so
        // tied scores produce a single threshold
        let score = sorted[i].predicted;
        while i < sorted.len() && sorted[i].predicted == score {
            if sorted[i].actual == positive {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        curve.push((fp as f64 / n_neg as f64, tp as f64 / n_pos as f64));
    }

    Ok(curve)
}

/// Area under the ROC curve, by trapezoidal integration.
pub fn area_under_roc(pairs: &[PredictionPair]) -> Result<f64> {
    let curve = roc_curve(pairs)?;
    let mut area = 0.0;
    for window in curve.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        area += (x1 - x0) * (y0 + y1) / 2.0;
    }
    Ok(area)
}

/// Identify the positive class and count both classes.
fn binary_labels(pairs: &[PredictionPair]) -> Result<(f64, usize, usize)> {
    if pairs.is_empty() {
        return Err(BenchError::InvalidInput(
            "roc requires at least one prediction pair".to_string(),
        ));
    }

    let mut labels: Vec<f64> = pairs.iter().map(|p| p.actual).collect();
    labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    labels.dedup();

    if labels.len() != 2 {
        return Err(BenchError::UnsupportedMetric(format!(
            "roc requires a binary label set, found {} distinct labels",
            labels.len()
        )));
    }

    let positive = labels[1];
    let n_pos = pairs.iter().filter(|p| p.actual == positive).count();
    let n_neg = pairs.len() - n_pos;
    Ok((positive, n_pos, n_neg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(data: &[(f64, f64)]) -> Vec<PredictionPair> {
        data.iter().map(|&(p, a)| PredictionPair::new(p, a)).collect()
    }

    #[test]
    fn test_perfect_ranking_auc_one() {
        // Scores strictly monotone in the true label
        let p = pairs(&[
            (0.9, 1.0),
            (0.8, 1.0),
            (0.7, 1.0),
            (0.3, 0.0),
            (0.2, 0.0),
            (0.1, 0.0),
        ]);
        assert!((area_under_roc(&p).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_ranking_auc_zero() {
        let p = pairs(&[(0.9, 0.0), (0.8, 0.0), (0.2, 1.0), (0.1, 1.0)]);
        assert_eq!(area_under_roc(&p).unwrap(), 0.0);
    }

    #[test]
    fn test_random_scores_auc_in_range() {
        let p = pairs(&[
            (0.6, 1.0),
            (0.5, 0.0),
            (0.7, 0.0),
            (0.4, 1.0),
            (0.55, 1.0),
            (0.45, 0.0),
        ]);
        let auc = area_under_roc(&p).unwrap();
        assert!((0.0..=1.0).contains(&auc));
    }

    #[test]
    fn test_curve_endpoints() {
        let p = pairs(&[(0.9, 1.0), (0.1, 0.0)]);
        let curve = roc_curve(&p).unwrap();
        assert_eq!(*curve.first().unwrap(), (0.0, 0.0));
        assert_eq!(*curve.last().unwrap(), (1.0, 1.0));
    }

    #[test]
    fn test_tied_scores_single_threshold() {
        let p = pairs(&[(0.5, 1.0), (0.5, 0.0), (0.5, 1.0), (0.5, 0.0)]);
        let curve = roc_curve(&p).unwrap();
        // One threshold consumes everything: (0,0) then (1,1)
        assert_eq!(curve, vec![(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(area_under_roc(&p).unwrap(), 0.5);
    }

    #[test]
    fn test_non_binary_rejected() {
        let three = pairs(&[(0.1, 0.0), (0.2, 1.0), (0.3, 2.0)]);
        assert!(matches!(
            area_under_roc(&three),
            Err(BenchError::UnsupportedMetric(_))
        ));

        let one = pairs(&[(0.1, 1.0), (0.2, 1.0)]);
        assert!(matches!(
            area_under_roc(&one),
            Err(BenchError::UnsupportedMetric(_))
        ));
    }
}
