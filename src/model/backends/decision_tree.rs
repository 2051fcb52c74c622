use ndarray::ArrayView1;
use serde::Deserialize;
use serde_json::Value;

use crate::data::Table;
use crate::error::PredictError;
use crate::model::traits::{Algorithm, ModelTrait};

use super::{argmax, validate_classes, FeatureSpec, Tree};

/// Single classification tree whose leaves hold per-class sample counts.
#[derive(Debug, Deserialize)]
pub struct DecisionTreeClassifier {
    features: FeatureSpec,
    classes: Vec<Value>,
    tree: Tree,
}

impl DecisionTreeClassifier {
    pub fn validate(&self) -> Result<(), String> {
        self.features.validate()?;
        validate_classes(&self.classes)?;
        self.tree.check(self.features.len(), self.classes.len())
    }
}

impl ModelTrait for DecisionTreeClassifier {
    fn algorithm(&self) -> Algorithm {
        Algorithm::DecisionTree
    }

    fn predict(&self, table: &Table) -> Result<Vec<Value>, PredictError> {
        let x = self.features.design_matrix(table)?;
        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let counts = ArrayView1::from(self.tree.leaf(row));
                self.classes[argmax(counts)].clone()
            })
            .collect())
    }
}
