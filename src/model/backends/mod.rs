//! Inference for the supported classifier families.
//!
//! Every artifact is a JSON object tagged by `algorithm`; the remaining
//! fields depend on the family. All of them share `features` (a
//! [`FeatureSpec`]) and `classes`, the labels returned to clients.

pub mod decision_tree;
pub mod features;
pub mod gradient_boosting;
pub mod logistic_regression;
pub mod random_forest;
pub mod tree;

use std::sync::Arc;

use ndarray::ArrayView1;
use serde::Deserialize;
use serde_json::Value;

use crate::model::traits::ModelTrait;

pub use decision_tree::DecisionTreeClassifier;
pub use features::FeatureSpec;
pub use gradient_boosting::GradientBoostingClassifier;
pub use logistic_regression::LogisticRegressionClassifier;
pub use random_forest::RandomForestClassifier;
pub use tree::Tree;

#[derive(Debug, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum ModelArtifact {
    DecisionTree(DecisionTreeClassifier),
    GradientBoosting(GradientBoostingClassifier),
    LogisticRegression(LogisticRegressionClassifier),
    RandomForest(RandomForestClassifier),
}

impl ModelArtifact {
    /// Checks the artifact's internal consistency and hands it out as a
    /// shared predictor.
    pub fn into_model(self) -> Result<Arc<dyn ModelTrait>, String> {
        Ok(match self {
            ModelArtifact::DecisionTree(model) => {
                model.validate()?;
                Arc::new(model)
            }
            ModelArtifact::GradientBoosting(model) => {
                model.validate()?;
                Arc::new(model)
            }
            ModelArtifact::LogisticRegression(model) => {
                model.validate()?;
                Arc::new(model)
            }
            ModelArtifact::RandomForest(model) => {
                model.validate()?;
                Arc::new(model)
            }
        })
    }
}

pub(crate) fn validate_classes(classes: &[Value]) -> Result<(), String> {
    if classes.len() < 2 {
        return Err(format!(
            "classifier needs at least two classes, found {}",
            classes.len()
        ));
    }
    if classes
        .iter()
        .any(|label| label.is_array() || label.is_object() || label.is_null())
    {
        return Err("class labels must be strings, numbers or booleans".to_string());
    }
    Ok(())
}

/// Number of raw scores a margin-based model produces: one for binary
/// problems, one per class otherwise.
pub(crate) fn score_width(n_classes: usize) -> usize {
    if n_classes == 2 {
        1
    } else {
        n_classes
    }
}

/// Index of the first maximum.
pub(crate) fn argmax(scores: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (index, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = index;
        }
    }
    best
}

/// Maps raw margins to a label: the sign for a single binary margin,
/// otherwise the highest scoring class.
pub(crate) fn label_from_margins(margins: ArrayView1<f64>, classes: &[Value]) -> Value {
    let index = if margins.len() == 1 {
        usize::from(margins[0] > 0.0)
    } else {
        argmax(margins)
    };
    classes[index].clone()
}
