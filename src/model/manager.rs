use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use log::{error, info, warn};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::data::Table;
use crate::error::LoadError;
use crate::model::backends::ModelArtifact;

use super::traits::model_trait::ModelTrait;

/// The models served by this process and the artifact file of each.
pub static MODEL_FILES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("DecisionTree", "DecisionTree_model.json"),
        ("GradientBoosting", "GradientBoosting_model.json"),
        ("LogisticRegression", "LogisticRegression_model.json"),
        ("RandomForest", "RandomForest_model.json"),
    ])
});

/// Outcome of one model on one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Labels(Vec<Value>),
    Error(String),
}

/// Models loaded at startup plus the reasons the others failed to load.
///
/// Built once and never mutated; request handlers share it behind an `Arc`.
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<dyn ModelTrait>>,
    load_errors: BTreeMap<String, String>,
}

impl ModelRegistry {
    /// Loads every `(name, file)` pair from `dir`. A model that cannot be
    /// loaded is recorded in the load errors and never stops the others.
    pub fn load_all<P, I, K, V>(dir: P, files: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let mut models = BTreeMap::new();
        let mut load_errors = BTreeMap::new();

        for (name, file) in files {
            let name = name.into();
            let path = dir.join(file);
            match load_model(&path) {
                Ok(model) => {
                    info!(
                        "Loaded {} ({}) from {}",
                        name,
                        model.algorithm(),
                        path.display()
                    );
                    models.insert(name, model);
                }
                Err(e) => {
                    error!("Error loading {}: {}", name, e);
                    load_errors.insert(name, e.to_string());
                }
            }
        }

        Self::from_parts(models, load_errors)
    }

    /// Loads the fixed model set from `dir`.
    pub fn load_default<P: AsRef<Path>>(dir: P) -> Self {
        Self::load_all(dir, MODEL_FILES.iter().map(|(name, file)| (*name, *file)))
    }

    pub fn from_parts(
        models: BTreeMap<String, Arc<dyn ModelTrait>>,
        load_errors: BTreeMap<String, String>,
    ) -> Self {
        Self {
            models,
            load_errors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn loaded_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn load_errors(&self) -> &BTreeMap<String, String> {
        &self.load_errors
    }

    /// Runs every loaded model over `table`. A failing model yields an
    /// error entry and does not affect the others.
    pub fn predict_all(&self, table: &Table) -> BTreeMap<String, PredictionOutcome> {
        self.models
            .iter()
            .map(|(name, model)| {
                let outcome = match model.predict(table) {
                    Ok(labels) => PredictionOutcome::Labels(labels),
                    Err(e) => {
                        warn!("{} failed to predict: {}", name, e);
                        PredictionOutcome::Error(e.to_string())
                    }
                };
                (name.clone(), outcome)
            })
            .collect()
    }
}

/// Reads and validates a single artifact file.
pub fn load_model(path: &Path) -> Result<Arc<dyn ModelTrait>, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ModelArtifact =
        serde_json::from_str(&raw).map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    artifact.into_model().map_err(|reason| LoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    })
}
