use ndarray::{Array1, Array2};
use serde::Deserialize;
use serde_json::Value;

use crate::data::Table;
use crate::error::PredictError;
use crate::model::traits::{Algorithm, ModelTrait};

use super::{label_from_margins, score_width, validate_classes, FeatureSpec};

#[derive(Debug, Deserialize)]
struct LogisticRegressionArtifact {
    features: FeatureSpec,
    classes: Vec<Value>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

/// Linear classifier scoring `X · coefᵀ + intercept`.
#[derive(Debug, Deserialize)]
#[serde(try_from = "LogisticRegressionArtifact")]
pub struct LogisticRegressionClassifier {
    features: FeatureSpec,
    classes: Vec<Value>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl TryFrom<LogisticRegressionArtifact> for LogisticRegressionClassifier {
    type Error = String;

    fn try_from(artifact: LogisticRegressionArtifact) -> Result<Self, Self::Error> {
        let rows = artifact.coef.len();
        let cols = artifact.coef.first().map_or(0, Vec::len);
        if artifact.coef.iter().any(|row| row.len() != cols) {
            return Err("coef rows have different lengths".to_string());
        }
        let flat: Vec<f64> = artifact.coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| format!("cannot shape coef: {e}"))?;

        Ok(Self {
            features: artifact.features,
            classes: artifact.classes,
            coef,
            intercept: Array1::from(artifact.intercept),
        })
    }
}

impl LogisticRegressionClassifier {
    pub fn validate(&self) -> Result<(), String> {
        self.features.validate()?;
        validate_classes(&self.classes)?;
        let width = score_width(self.classes.len());
        let expected = (width, self.features.len());
        if self.coef.dim() != expected {
            return Err(format!(
                "coef has shape {:?}, expected {:?}",
                self.coef.dim(),
                expected
            ));
        }
        if self.intercept.len() != width {
            return Err(format!(
                "intercept holds {} values, expected {width}",
                self.intercept.len()
            ));
        }
        Ok(())
    }
}

impl ModelTrait for LogisticRegressionClassifier {
    fn algorithm(&self) -> Algorithm {
        Algorithm::LogisticRegression
    }

    fn predict(&self, table: &Table) -> Result<Vec<Value>, PredictError> {
        let x = self.features.design_matrix(table)?;
        let margins = x.dot(&self.coef.t()) + &self.intercept;
        Ok(margins
            .rows()
            .into_iter()
            .map(|row| label_from_margins(row, &self.classes))
            .collect())
    }
}
