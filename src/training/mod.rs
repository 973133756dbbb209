//! Model training
//!
//! One trainer per supported algorithm family:
//! - Linear regression (gradient descent)
//! - Multinomial logistic regression
//! - Multinomial naive Bayes
//! - Decision trees (gini/entropy/variance)
//!
//! Each trainer is a pure function from a training set and a hyperparameter
//! bundle to an immutable [`TrainedModel`].

mod config;
mod model;
pub mod decision_tree;
pub mod linear;
pub mod logistic;
pub mod naive_bayes;

pub use config::{
    AlgorithmSpec, Impurity, LinearConfig, LogisticConfig, NaiveBayesConfig, TreeConfig,
};
pub use decision_tree::{DecisionTreeModel, SplitTest, TreeNode};
pub use linear::LinearModel;
pub use logistic::LogisticModel;
pub use model::{predict_pairs, TrainedModel};
pub use naive_bayes::NaiveBayesModel;
