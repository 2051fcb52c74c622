use ndarray::{Array1, ArrayView1};
use serde::Deserialize;
use serde_json::Value;

use crate::data::Table;
use crate::error::PredictError;
use crate::model::traits::{Algorithm, ModelTrait};

use super::{argmax, validate_classes, FeatureSpec, Tree};

/// Bagged classification trees combined by soft voting: each tree votes
/// with its leaf's class distribution and the mean picks the label.
#[derive(Debug, Deserialize)]
pub struct RandomForestClassifier {
    features: FeatureSpec,
    classes: Vec<Value>,
    trees: Vec<Tree>,
}

impl RandomForestClassifier {
    pub fn validate(&self) -> Result<(), String> {
        self.features.validate()?;
        validate_classes(&self.classes)?;
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.check(self.features.len(), self.classes.len())
                .map_err(|reason| format!("tree {index}: {reason}"))?;
        }
        Ok(())
    }

    fn vote(&self, row: ArrayView1<f64>) -> Array1<f64> {
        let mut proba = Array1::zeros(self.classes.len());
        for tree in &self.trees {
            let counts = ArrayView1::from(tree.leaf(row));
            let total = counts.sum();
            if total > 0.0 {
                proba.scaled_add(1.0 / total, &counts);
            }
        }
        proba / self.trees.len() as f64
    }
}

impl ModelTrait for RandomForestClassifier {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RandomForest
    }

    fn predict(&self, table: &Table) -> Result<Vec<Value>, PredictError> {
        let x = self.features.design_matrix(table)?;
        Ok(x.rows()
            .into_iter()
            .map(|row| self.classes[argmax(self.vote(row).view())].clone())
            .collect())
    }
}
