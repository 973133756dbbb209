//! Error types for the modelbench harness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Main error type for the harness
///
/// Every failure names the stage it came from (split/train/predict/metric)
/// either through the variant itself or its message. Nothing is retried;
/// a failed stage aborts the whole pipeline invocation.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid hyperparameter: {name} = {value}, {reason}")]
    InvalidHyperparameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported metric: {0}")]
    UnsupportedMetric(String),

    #[error("Numeric instability in {stage}: {detail}")]
    NumericInstability { stage: String, detail: String },
}

impl BenchError {
    /// Shorthand for the hyperparameter variant
    pub fn hyperparameter(name: &str, value: impl ToString, reason: &str) -> Self {
        BenchError::InvalidHyperparameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BenchError::InvalidInput("empty dataset".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty dataset");
    }

    #[test]
    fn test_hyperparameter_display() {
        let err = BenchError::hyperparameter("step_size", 0.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid hyperparameter: step_size = 0, must be positive"
        );
    }

    #[test]
    fn test_instability_display() {
        let err = BenchError::NumericInstability {
            stage: "train".to_string(),
            detail: "loss diverged".to_string(),
        };
        assert_eq!(err.to_string(), "Numeric instability in train: loss diverged");
    }
}
