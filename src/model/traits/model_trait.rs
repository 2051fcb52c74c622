use std::fmt;

use serde_json::Value;

use crate::data::Table;
use crate::error::PredictError;

/// Family of a loaded classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    DecisionTree,
    GradientBoosting,
    LogisticRegression,
    RandomForest,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::DecisionTree => "decision_tree",
            Algorithm::GradientBoosting => "gradient_boosting",
            Algorithm::LogisticRegression => "logistic_regression",
            Algorithm::RandomForest => "random_forest",
        };
        f.write_str(name)
    }
}

/// Anything that labels every row of a table.
///
/// Implementations hold no per-call state, so one instance is shared by all
/// request handlers.
pub trait ModelTrait: Send + Sync {
    fn algorithm(&self) -> Algorithm;

    /// Returns one label per table row, in row order.
    fn predict(&self, table: &Table) -> Result<Vec<Value>, PredictError>;
}
