use std::collections::BTreeMap;
use std::path::PathBuf;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failure to turn an artifact file into a predictor.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid model artifact {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Failure of a single model on a single request.
#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("found array with 0 sample(s), at least one row is required")]
    EmptyInput,
    #[error("missing feature columns: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),
    #[error("unexpected feature columns not seen during training: {}", .0.join(", "))]
    UnexpectedFeatures(Vec<String>),
    #[error("expected {expected} features, got {found}")]
    FeatureCount { expected: usize, found: usize },
    /// Text that does not parse as a finite float. Unlike numpy coercion,
    /// "inf" and "nan" are refused.
    #[error("could not convert {value:?} in column '{column}' to float")]
    NonNumeric { column: String, value: String },
    #[error("missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No models loaded on server")]
    Unavailable { load_errors: BTreeMap<String, String> },
    #[error("{0}")]
    BadRequest(String),
    #[error("prediction task failed: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_errors: Option<&'a BTreeMap<String, String>>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let load_errors = match self {
            ApiError::Unavailable { load_errors } => Some(load_errors),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            load_errors,
        })
    }
}
