use std::collections::BTreeMap;
use std::time::Instant;

use actix_web::{web, HttpResponse};
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::api::server::AppState;
use crate::data::Table;
use crate::error::ApiError;
use crate::model::manager::PredictionOutcome;

#[derive(Serialize)]
struct StatusResponse<'a> {
    status: &'static str,
    loaded_models: Vec<String>,
    load_errors: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct PredictResponse {
    predictions: BTreeMap<String, PredictionOutcome>,
}

pub async fn home(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        status: "ok",
        loaded_models: state.registry.loaded_names(),
        load_errors: state.registry.load_errors(),
    })
}

pub async fn predict(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let registry = state.registry.clone();
    if registry.is_empty() {
        return Err(ApiError::Unavailable {
            load_errors: registry.load_errors().clone(),
        });
    }

    let table = parse_payload(&body).inspect_err(|e| debug!("Rejected predict request: {}", e))?;

    let start = Instant::now();
    let rows = table.n_rows();
    let predictions = web::block(move || registry.predict_all(&table))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    debug!("Predicted {} rows in {:?}", rows, start.elapsed());

    Ok(HttpResponse::Ok().json(PredictResponse { predictions }))
}

/// Turns a raw request body into the table passed to the models.
pub fn parse_payload(body: &[u8]) -> Result<Table, ApiError> {
    let payload = serde_json::from_slice::<Value>(body)
        .ok()
        .filter(|payload| !is_falsy(payload))
        .ok_or_else(|| ApiError::BadRequest("No input data provided".to_string()))?;

    let data = payload
        .get("data")
        .filter(|data| !data.is_null())
        .ok_or_else(|| ApiError::BadRequest("Key 'data' not found in JSON".to_string()))?;

    Table::from_json(data).map_err(|e| ApiError::BadRequest(format!("Invalid input data: {}", e)))
}

/// Empty containers, zero, `false`, `""` and `null` carry no input.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
