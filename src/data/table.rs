//! Column-aligned record sets built from loosely typed JSON payloads.
//!
//! A payload is either one record or an array of records. Records must all
//! share the key set of the first one and every column keeps a single scalar
//! type (nulls fit anywhere), so columns never silently shift or change
//! meaning between rows.

use serde_json::Value;
use thiserror::Error;

/// A single scalar value of the table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Bool,
    Number,
    Text,
}

impl CellKind {
    fn as_str(&self) -> &'static str {
        match self {
            CellKind::Bool => "boolean",
            CellKind::Number => "numeric",
            CellKind::Text => "string",
        }
    }
}

impl Cell {
    /// Returns `None` for arrays and objects, which have no tabular form.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Cell::Null),
            Value::Bool(b) => Some(Cell::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Cell::Number),
            Value::String(s) => Some(Cell::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn kind(&self) -> Option<CellKind> {
        match self {
            Cell::Null => None,
            Cell::Bool(_) => Some(CellKind::Bool),
            Cell::Number(_) => Some(CellKind::Number),
            Cell::Text(_) => Some(CellKind::Text),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("record {index} is not an object")]
    NotAnObject { index: usize },
    #[error("record {index} has key '{key}' which record 0 does not have")]
    UnexpectedKey { index: usize, key: String },
    #[error("record {index} is missing key '{key}'")]
    MissingKey { index: usize, key: String },
    #[error("record {index} field '{key}' holds a nested value")]
    NestedValue { index: usize, key: String },
    #[error("column '{key}' mixes {expected} and {found} values (record {index})")]
    MixedTypes {
        index: usize,
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Rows of cells aligned on named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Builds a table from a single record or an array of records.
    pub fn from_json(data: &Value) -> Result<Self, TableError> {
        let records: Vec<&Value> = match data {
            Value::Array(items) => items.iter().collect(),
            single => vec![single],
        };

        let Some(first) = records.first() else {
            return Ok(Table::default());
        };
        let first = first
            .as_object()
            .ok_or(TableError::NotAnObject { index: 0 })?;

        let columns: Vec<String> = first.keys().cloned().collect();
        let mut kinds: Vec<Option<CellKind>> = vec![None; columns.len()];
        let mut rows = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or(TableError::NotAnObject { index })?;

            if let Some(key) = object.keys().find(|key| !first.contains_key(*key)) {
                return Err(TableError::UnexpectedKey {
                    index,
                    key: key.clone(),
                });
            }

            let mut row = Vec::with_capacity(columns.len());
            for (col, key) in columns.iter().enumerate() {
                let value = object.get(key).ok_or_else(|| TableError::MissingKey {
                    index,
                    key: key.clone(),
                })?;
                let cell = Cell::from_json(value).ok_or_else(|| TableError::NestedValue {
                    index,
                    key: key.clone(),
                })?;

                if let Some(kind) = cell.kind() {
                    match kinds[col] {
                        None => kinds[col] = Some(kind),
                        Some(seen) if seen != kind => {
                            return Err(TableError::MixedTypes {
                                index,
                                key: key.clone(),
                                expected: seen.as_str(),
                                found: kind.as_str(),
                            })
                        }
                        Some(_) => {}
                    }
                }
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }
}
