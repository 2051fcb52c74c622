use ndarray::{Array1, ArrayView1};
use serde::Deserialize;
use serde_json::Value;

use crate::data::Table;
use crate::error::PredictError;
use crate::model::traits::{Algorithm, ModelTrait};

use super::{label_from_margins, score_width, validate_classes, FeatureSpec, Tree};

/// Additive ensemble of regression trees fitted on the log-loss gradient.
///
/// `estimators[stage][k]` adds to margin `k`; binary problems carry a
/// single margin per stage.
#[derive(Debug, Deserialize)]
pub struct GradientBoostingClassifier {
    features: FeatureSpec,
    classes: Vec<Value>,
    learning_rate: f64,
    init: Vec<f64>,
    estimators: Vec<Vec<Tree>>,
}

impl GradientBoostingClassifier {
    pub fn validate(&self) -> Result<(), String> {
        self.features.validate()?;
        validate_classes(&self.classes)?;
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(format!("invalid learning rate {}", self.learning_rate));
        }
        let width = score_width(self.classes.len());
        if self.init.len() != width {
            return Err(format!(
                "init holds {} scores, expected {width}",
                self.init.len()
            ));
        }
        for (stage, trees) in self.estimators.iter().enumerate() {
            if trees.len() != width {
                return Err(format!(
                    "stage {stage} holds {} trees, expected {width}",
                    trees.len()
                ));
            }
            for tree in trees {
                tree.check(self.features.len(), 1)
                    .map_err(|reason| format!("stage {stage}: {reason}"))?;
            }
        }
        Ok(())
    }

    fn raw_scores(&self, row: ArrayView1<f64>) -> Array1<f64> {
        let mut scores = Array1::from(self.init.clone());
        for stage in &self.estimators {
            for (k, tree) in stage.iter().enumerate() {
                scores[k] += self.learning_rate * tree.leaf(row)[0];
            }
        }
        scores
    }
}

impl ModelTrait for GradientBoostingClassifier {
    fn algorithm(&self) -> Algorithm {
        Algorithm::GradientBoosting
    }

    fn predict(&self, table: &Table) -> Result<Vec<Value>, PredictError> {
        let x = self.features.design_matrix(table)?;
        Ok(x.rows()
            .into_iter()
            .map(|row| label_from_margins(self.raw_scores(row).view(), &self.classes))
            .collect())
    }
}
