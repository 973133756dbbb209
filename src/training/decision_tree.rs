//! Recursive binary-split decision tree

use crate::error::{BenchError, Result};
use crate::training::config::{Impurity, TreeConfig};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Test applied at an internal node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SplitTest {
    /// Continuous feature: go left iff `value <= threshold`
    Threshold(f64),
    /// Categorical feature: go left iff the rounded value is in the set
    Categories(Vec<i64>),
}

impl SplitTest {
    fn goes_left(&self, value: f64) -> bool {
        match self {
            SplitTest::Threshold(t) => value <= *t,
            SplitTest::Categories(set) => set.contains(&(value.round() as i64)),
        }
    }
}

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf with prediction value
    Leaf { value: f64, n_samples: usize },
    /// Internal node with a binary split
    Split {
        feature_idx: usize,
        test: SplitTest,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

/// Decision tree fit by greedy recursive binary splitting.
///
/// At each node the split minimizing weighted child impurity is chosen;
/// growth stops at `max_depth` or when a node is pure. `max_bins` bounds the
/// candidate thresholds evaluated per continuous feature, trading split
/// exactness for scan cost. Features listed in the config's categorical map
/// split on category subsets: categories are ordered by mean label and
/// prefix subsets of that ordering are the candidates, which recovers the
/// optimal subset split for binary labels and regression targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeModel {
    root: TreeNode,
    config: TreeConfig,
}

impl DecisionTreeModel {
    pub fn train(x: &Array2<f64>, y: &Array1<f64>, config: &TreeConfig) -> Result<Self> {
        config.validate()?;

        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(BenchError::InvalidInput(
                "decision tree training set is empty".to_string(),
            ));
        }
        if n_samples != y.len() {
            return Err(BenchError::InvalidInput(format!(
                "feature matrix has {} rows but label vector has {}",
                n_samples,
                y.len()
            )));
        }
        for (&idx, &arity) in &config.categorical_features {
            if idx >= x.ncols() {
                return Err(BenchError::hyperparameter(
                    "categorical_features",
                    idx,
                    "feature index out of range",
                ));
            }
            if arity < 2 {
                return Err(BenchError::hyperparameter(
                    "categorical_features",
                    arity,
                    "arity must be at least 2",
                ));
            }
        }

        let builder = TreeBuilder { x, y, config };
        let indices: Vec<usize> = (0..n_samples).collect();
        let root = builder.build(&indices, 0);

        Ok(Self {
            root,
            config: config.clone(),
        })
    }

    /// Predict the label (class or mean target) for one feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split {
                    feature_idx,
                    test,
                    left,
                    right,
                    ..
                } => {
                    node = if test.goes_left(features[*feature_idx]) {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn node_depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
            }
        }
        node_depth(&self.root)
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    config: &'a TreeConfig,
}

struct Candidate {
    feature_idx: usize,
    test: SplitTest,
    gain: f64,
}

impl TreeBuilder<'_> {
    fn build(&self, indices: &[usize], depth: usize) -> TreeNode {
        let n_samples = indices.len();
        let labels: Vec<f64> = indices.iter().map(|&i| self.y[i]).collect();

        if depth >= self.config.max_depth || is_pure(&labels) {
            return self.leaf(&labels, n_samples);
        }

        let best = self.find_best_split(indices, &labels);
        match best {
            Some(candidate) => {
                let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
                    indices.iter().partition(|&&i| {
                        candidate.test.goes_left(self.x[[i, candidate.feature_idx]])
                    });

                if left_indices.is_empty() || right_indices.is_empty() {
                    return self.leaf(&labels, n_samples);
                }

                let left = Box::new(self.build(&left_indices, depth + 1));
                let right = Box::new(self.build(&right_indices, depth + 1));
                TreeNode::Split {
                    feature_idx: candidate.feature_idx,
                    test: candidate.test,
                    left,
                    right,
                    n_samples,
                }
            }
            None => self.leaf(&labels, n_samples),
        }
    }

    fn leaf(&self, labels: &[f64], n_samples: usize) -> TreeNode {
        TreeNode::Leaf {
            value: self.leaf_value(labels),
            n_samples,
        }
    }

    fn leaf_value(&self, labels: &[f64]) -> f64 {
        match self.config.impurity {
            Impurity::Variance => labels.iter().sum::<f64>() / labels.len() as f64,
            _ => {
                // Majority class; ties break toward the smaller label
                let mut counts: HashMap<i64, usize> = HashMap::new();
                for &val in labels {
                    *counts.entry(val.round() as i64).or_insert(0) += 1;
                }
                counts
                    .into_iter()
                    .max_by_key(|&(class, count)| (count, std::cmp::Reverse(class)))
                    .map(|(class, _)| class as f64)
                    .unwrap_or(0.0)
            }
        }
    }

    fn find_best_split(&self, indices: &[usize], labels: &[f64]) -> Option<Candidate> {
        let parent_impurity = self.impurity(labels);
        let n_features = self.x.ncols();

        // Each feature scans its candidate splits independently
        let per_feature: Vec<Option<Candidate>> = (0..n_features)
            .into_par_iter()
            .map(|feature_idx| {
                if self.config.categorical_features.contains_key(&feature_idx) {
                    self.best_categorical_split(feature_idx, indices, parent_impurity)
                } else {
                    self.best_continuous_split(feature_idx, indices, parent_impurity)
                }
            })
            .collect();

        per_feature
            .into_iter()
            .flatten()
            .max_by(|a, b| a.gain.partial_cmp(&b.gain).unwrap_or(std::cmp::Ordering::Equal))
    }

    fn best_continuous_split(
        &self,
        feature_idx: usize,
        indices: &[usize],
        parent_impurity: f64,
    ) -> Option<Candidate> {
        let mut values: Vec<f64> = indices.iter().map(|&i| self.x[[i, feature_idx]]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();
        if values.len() < 2 {
            return None;
        }

        // Midpoints between adjacent distinct values, capped at max_bins
        // candidates by striding over the sorted gaps
        let n_gaps = values.len() - 1;
        let max_candidates = self.config.max_bins - 1;
        let stride = n_gaps.div_ceil(max_candidates).max(1);
        let thresholds: Vec<f64> = (0..n_gaps)
            .step_by(stride)
            .map(|g| (values[g] + values[g + 1]) / 2.0)
            .collect();

        let mut best: Option<Candidate> = None;
        for threshold in thresholds {
            let gain = self.split_gain(indices, feature_idx, parent_impurity, |v| v <= threshold);
            if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                best = Some(Candidate {
                    feature_idx,
                    test: SplitTest::Threshold(threshold),
                    gain,
                });
            }
        }
        best
    }

    fn best_categorical_split(
        &self,
        feature_idx: usize,
        indices: &[usize],
        parent_impurity: f64,
    ) -> Option<Candidate> {
        // Mean label per observed category
        let mut sums: HashMap<i64, (f64, usize)> = HashMap::new();
        for &i in indices {
            let cat = self.x[[i, feature_idx]].round() as i64;
            let entry = sums.entry(cat).or_insert((0.0, 0));
            entry.0 += self.y[i];
            entry.1 += 1;
        }
        if sums.len() < 2 {
            return None;
        }

        let mut ordered: Vec<(i64, f64)> = sums
            .into_iter()
            .map(|(cat, (sum, count))| (cat, sum / count as f64))
            .collect();
        ordered.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        let categories: Vec<i64> = ordered.into_iter().map(|(cat, _)| cat).collect();

        // Prefix subsets over the mean-label ordering
        let mut best: Option<Candidate> = None;
        for split_at in 1..categories.len() {
            let left_set: Vec<i64> = categories[..split_at].to_vec();
            let gain = self.split_gain(indices, feature_idx, parent_impurity, |v| {
                left_set.contains(&(v.round() as i64))
            });
            if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                best = Some(Candidate {
                    feature_idx,
                    test: SplitTest::Categories(left_set),
                    gain,
                });
            }
        }
        best
    }

    fn split_gain(
        &self,
        indices: &[usize],
        feature_idx: usize,
        parent_impurity: f64,
        goes_left: impl Fn(f64) -> bool,
    ) -> f64 {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for &i in indices {
            if goes_left(self.x[[i, feature_idx]]) {
                left.push(self.y[i]);
            } else {
                right.push(self.y[i]);
            }
        }
        if left.is_empty() || right.is_empty() {
            return 0.0;
        }

        let n = indices.len() as f64;
        let weighted = (left.len() as f64 * self.impurity(&left)
            + right.len() as f64 * self.impurity(&right))
            / n;
        parent_impurity - weighted
    }

    fn impurity(&self, labels: &[f64]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        match self.config.impurity {
            Impurity::Gini => {
                let n = labels.len() as f64;
                let mut counts: HashMap<i64, usize> = HashMap::new();
                for &val in labels {
                    *counts.entry(val.round() as i64).or_insert(0) += 1;
                }
                1.0 - counts
                    .values()
                    .map(|&c| (c as f64 / n).powi(2))
                    .sum::<f64>()
            }
            Impurity::Entropy => {
                let n = labels.len() as f64;
                let mut counts: HashMap<i64, usize> = HashMap::new();
                for &val in labels {
                    *counts.entry(val.round() as i64).or_insert(0) += 1;
                }
                -counts
                    .values()
                    .map(|&c| {
                        let p = c as f64 / n;
                        p * p.ln()
                    })
                    .sum::<f64>()
            }
            Impurity::Variance => {
                let n = labels.len() as f64;
                let mean = labels.iter().sum::<f64>() / n;
                labels.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / n
            }
        }
    }
}

fn is_pure(labels: &[f64]) -> bool {
    match labels.first() {
        None => true,
        Some(&first) => labels.iter().all(|&v| (v - first).abs() < 1e-12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_depth_one_separable() {
        // Separable by thresholding the single feature at 2.5
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let config = TreeConfig::new(2, 1, 32, Impurity::Gini);
        let model = DecisionTreeModel::train(&x, &y, &config).unwrap();

        assert_eq!(model.depth(), 1);
        // Full training accuracy on separable data
        for (row, &label) in x.rows().into_iter().zip(y.iter()) {
            assert_eq!(model.predict(row.as_slice().unwrap()), label);
        }
    }

    #[test]
    fn test_max_depth_respected() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];

        let config = TreeConfig::new(2, 2, 32, Impurity::Gini);
        let model = DecisionTreeModel::train(&x, &y, &config).unwrap();
        assert!(model.depth() <= 2);
    }

    #[test]
    fn test_pure_node_stops() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 1.0, 1.0];

        let config = TreeConfig::new(2, 10, 32, Impurity::Gini);
        let model = DecisionTreeModel::train(&x, &y, &config).unwrap();
        assert_eq!(model.depth(), 0);
        assert_eq!(model.predict(&[99.0]), 1.0);
    }

    #[test]
    fn test_entropy_criterion() {
        let x = array![[0.0], [1.0], [2.0], [10.0], [11.0], [12.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let config = TreeConfig::new(2, 3, 32, Impurity::Entropy);
        let model = DecisionTreeModel::train(&x, &y, &config).unwrap();
        assert_eq!(model.predict(&[1.0]), 0.0);
        assert_eq!(model.predict(&[11.0]), 1.0);
    }

    #[test]
    fn test_variance_regression() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![1.0, 1.2, 0.8, 9.0, 9.2, 8.8];

        let config = TreeConfig::new(0, 3, 32, Impurity::Variance);
        let model = DecisionTreeModel::train(&x, &y, &config).unwrap();

        assert!((model.predict(&[2.0]) - 1.0).abs() < 0.5);
        assert!((model.predict(&[11.0]) - 9.0).abs() < 0.5);
    }

    #[test]
    fn test_categorical_split() {
        // Feature 0 is a category with arity 3; categories 0 and 2 map to
        // class 0, category 1 to class 1
        let x = array![
            [0.0], [0.0], [2.0], [2.0], [0.0], [2.0],
            [1.0], [1.0], [1.0], [1.0],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

        let mut categorical = HashMap::new();
        categorical.insert(0usize, 3usize);
        let config =
            TreeConfig::new(2, 3, 32, Impurity::Gini).with_categorical_features(categorical);
        let model = DecisionTreeModel::train(&x, &y, &config).unwrap();

        assert_eq!(model.predict(&[0.0]), 0.0);
        assert_eq!(model.predict(&[1.0]), 1.0);
        assert_eq!(model.predict(&[2.0]), 0.0);
        // A threshold split cannot isolate the middle category in one level
        assert!(model.depth() >= 1);
    }

    #[test]
    fn test_max_bins_limits_candidates() {
        // 100 distinct values but only a handful of candidate thresholds;
        // the class boundary at 50 is still coarse-locatable
        let rows: Vec<(f64, Vec<f64>)> = (0..100)
            .map(|i| (if i < 50 { 0.0 } else { 1.0 }, vec![i as f64]))
            .collect();
        let n = rows.len();
        let x = Array2::from_shape_fn((n, 1), |(r, _)| rows[r].1[0]);
        let y = Array1::from_iter(rows.iter().map(|r| r.0));

        let config = TreeConfig::new(2, 4, 4, Impurity::Gini);
        let model = DecisionTreeModel::train(&x, &y, &config).unwrap();

        let correct = (0..100)
            .filter(|&i| model.predict(&[i as f64]) == if i < 50 { 0.0 } else { 1.0 })
            .count();
        assert!(correct >= 90, "only {} of 100 correct", correct);
    }

    #[test]
    fn test_invalid_categorical_index_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![0.0, 1.0];
        let mut categorical = HashMap::new();
        categorical.insert(5usize, 3usize);
        let config =
            TreeConfig::new(2, 3, 32, Impurity::Gini).with_categorical_features(categorical);
        let result = DecisionTreeModel::train(&x, &y, &config);
        assert!(matches!(result, Err(BenchError::InvalidHyperparameter { .. })));
    }

    #[test]
    fn test_empty_training_set_rejected() {
        let x = Array2::<f64>::zeros((0, 1));
        let y = Array1::<f64>::zeros(0);
        let result = DecisionTreeModel::train(&x, &y, &TreeConfig::default());
        assert!(matches!(result, Err(BenchError::InvalidInput(_))));
    }
}
