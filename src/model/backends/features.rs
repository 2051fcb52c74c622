use std::collections::HashSet;

use ndarray::Array2;
use serde::Deserialize;

use crate::data::{Cell, Table};
use crate::error::PredictError;

/// Input schema a model was trained with.
///
/// Named schemas pick request columns by name, in the model's order.
/// Positional schemas only know the feature count and take the request
/// columns in table order, which is the key order of the first record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeatureSpec {
    Named(Vec<String>),
    Count(usize),
}

impl FeatureSpec {
    pub fn len(&self) -> usize {
        match self {
            FeatureSpec::Named(names) => names.len(),
            FeatureSpec::Count(count) => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("model declares no features".to_string());
        }
        if let FeatureSpec::Named(names) = self {
            let mut seen = HashSet::new();
            if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
                return Err(format!("feature '{dup}' is declared twice"));
            }
        }
        Ok(())
    }

    /// Extracts the `rows x features` matrix this model expects from `table`.
    pub fn design_matrix(&self, table: &Table) -> Result<Array2<f64>, PredictError> {
        if table.is_empty() {
            return Err(PredictError::EmptyInput);
        }

        let indices = match self {
            FeatureSpec::Named(names) => {
                let mut indices = Vec::with_capacity(names.len());
                let mut missing = Vec::new();
                for name in names {
                    match table.column_index(name) {
                        Some(index) => indices.push(index),
                        None => missing.push(name.clone()),
                    }
                }
                if !missing.is_empty() {
                    return Err(PredictError::MissingFeatures(missing));
                }

                let unexpected: Vec<String> = table
                    .columns()
                    .iter()
                    .filter(|column| !names.contains(*column))
                    .cloned()
                    .collect();
                if !unexpected.is_empty() {
                    return Err(PredictError::UnexpectedFeatures(unexpected));
                }
                indices
            }
            FeatureSpec::Count(count) => {
                if table.n_columns() != *count {
                    return Err(PredictError::FeatureCount {
                        expected: *count,
                        found: table.n_columns(),
                    });
                }
                (0..*count).collect()
            }
        };

        let mut matrix = Array2::zeros((table.n_rows(), indices.len()));
        for ((row, feature), slot) in matrix.indexed_iter_mut() {
            *slot = numeric_cell(table, row, indices[feature])?;
        }
        Ok(matrix)
    }
}

fn numeric_cell(table: &Table, row: usize, column: usize) -> Result<f64, PredictError> {
    let name = || table.columns()[column].clone();
    match table.cell(row, column) {
        Some(Cell::Number(value)) => Ok(*value),
        Some(Cell::Bool(flag)) => Ok(if *flag { 1.0 } else { 0.0 }),
        Some(Cell::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| PredictError::NonNumeric {
                column: name(),
                value: text.clone(),
            }),
        Some(Cell::Null) | None => Err(PredictError::MissingValue {
            column: name(),
            row,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(data: serde_json::Value) -> Table {
        Table::from_json(&data).unwrap()
    }

    fn named(names: &[&str]) -> FeatureSpec {
        FeatureSpec::Named(names.iter().map(|name| name.to_string()).collect())
    }

    #[test]
    fn named_schema_reorders_columns() {
        let spec = named(&["f2", "f1"]);
        let matrix = spec
            .design_matrix(&table(json!([{"f1": 1, "f2": 2}, {"f1": 3, "f2": 4}])))
            .unwrap();
        assert_eq!(matrix, ndarray::array![[2.0, 1.0], [4.0, 3.0]]);
    }

    #[test]
    fn named_schema_reports_missing_before_unexpected() {
        let spec = named(&["f1", "f3"]);
        assert_eq!(
            spec.design_matrix(&table(json!({"f1": 1, "f2": 2}))),
            Err(PredictError::MissingFeatures(vec!["f3".into()]))
        );

        let spec = named(&["f1"]);
        assert_eq!(
            spec.design_matrix(&table(json!({"f1": 1, "f2": 2}))),
            Err(PredictError::UnexpectedFeatures(vec!["f2".into()]))
        );
    }

    #[test]
    fn positional_schema_checks_width() {
        let spec = FeatureSpec::Count(3);
        assert_eq!(
            spec.design_matrix(&table(json!({"a": 1, "b": 2}))),
            Err(PredictError::FeatureCount { expected: 3, found: 2 })
        );
    }

    #[test]
    fn positional_schema_follows_request_key_order() {
        let matrix = FeatureSpec::Count(3)
            .design_matrix(&table(json!({"f1": 1, "f2": 2, "f10": 10})))
            .unwrap();
        assert_eq!(matrix, ndarray::array![[1.0, 2.0, 10.0]]);
    }

    #[test]
    fn converts_booleans_and_numeric_strings() {
        let spec = named(&["flag", "size"]);
        let matrix = spec
            .design_matrix(&table(json!({"flag": true, "size": " 2.5"})))
            .unwrap();
        assert_eq!(matrix, ndarray::array![[1.0, 2.5]]);
    }

    #[test]
    fn rejects_text_and_nulls() {
        let spec = named(&["f1"]);
        assert_eq!(
            spec.design_matrix(&table(json!({"f1": "high"}))),
            Err(PredictError::NonNumeric { column: "f1".into(), value: "high".into() })
        );
        assert_eq!(
            spec.design_matrix(&table(json!({"f1": "inf"}))),
            Err(PredictError::NonNumeric { column: "f1".into(), value: "inf".into() })
        );
        assert_eq!(
            spec.design_matrix(&table(json!([{"f1": 1}, {"f1": null}]))),
            Err(PredictError::MissingValue { column: "f1".into(), row: 1 })
        );
    }

    #[test]
    fn empty_table_has_nothing_to_predict() {
        assert_eq!(
            FeatureSpec::Count(1).design_matrix(&table(json!([]))),
            Err(PredictError::EmptyInput)
        );
    }

    #[test]
    fn duplicate_names_are_invalid() {
        assert!(named(&["f1", "f1"]).validate().is_err());
        assert!(FeatureSpec::Count(0).validate().is_err());
        assert!(named(&["f1", "f2"]).validate().is_ok());
    }
}
