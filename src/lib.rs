//! HTTP gateway serving a fixed set of pre-trained tabular classifiers.
//!
//! Models are loaded once at startup into a [`ModelRegistry`]; every
//! `POST /predict` call turns its `data` payload into a [`Table`] and runs
//! each loaded model over it.

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod model;

pub use data::table::Table;
pub use model::manager::{ModelRegistry, MODEL_FILES};
