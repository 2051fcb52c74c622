use std::path::{Path, PathBuf};

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use tabular_serve::api::server::{routes, AppState};
use tabular_serve::{ModelRegistry, MODEL_FILES};

fn dir(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

macro_rules! app {
    ($models:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(ModelRegistry::load_default(
                    $models,
                ))))
                .configure(routes),
        )
        .await
    };
}

macro_rules! post_predict {
    ($app:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/predict")
            .insert_header(("content-type", "application/json"))
            .set_payload($body.to_string())
            .to_request();
        let resp = test::call_service($app, req).await;
        let status: StatusCode = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn status_lists_loaded_models_and_errors() {
    let app = app!(dir("tests/fixtures/mixed"));
    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["loaded_models"], json!(["DecisionTree", "RandomForest"]));
    let errors = body["load_errors"].as_object().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_key("GradientBoosting"));
    assert!(errors.contains_key("LogisticRegression"));
}

#[actix_web::test]
async fn no_models_means_server_unavailable() {
    let app = app!(dir("tests/fixtures/missing"));
    for body in [r#"{"data": {"f1": 1, "f2": 2}}"#, "{}", "garbage"] {
        let (status, body) = post_predict!(&app, body);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No models loaded on server");
        assert_eq!(
            body["load_errors"].as_object().unwrap().len(),
            MODEL_FILES.len()
        );
    }
}

#[actix_web::test]
async fn empty_object_is_rejected() {
    let app = app!(dir("models"));
    let (status, body) = post_predict!(&app, "{}");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("data"));
}

#[actix_web::test]
async fn bad_inputs_are_client_errors() {
    let app = app!(dir("models"));
    let cases = [
        ("", "No input data provided"),
        ("{not json", "No input data provided"),
        (r#"{"rows": []}"#, "Key 'data' not found in JSON"),
        (r#"{"data": null}"#, "Key 'data' not found in JSON"),
        (
            r#"{"data": [{"f1": 1, "f2": 2}, {"f1": 3}]}"#,
            "Invalid input data: record 1 is missing key 'f2'",
        ),
        (
            r#"{"data": [{"f1": 1}, {"f1": "x"}]}"#,
            "Invalid input data: column 'f1' mixes numeric and string values (record 1)",
        ),
    ];
    for (input, message) in cases {
        let (status, body) = post_predict!(&app, input);
        assert_eq!(status, StatusCode::BAD_REQUEST, "input {input:?}");
        assert_eq!(body["error"], message, "input {input:?}");
        assert!(body.get("load_errors").is_none());
    }
}

#[actix_web::test]
async fn single_record_gets_one_prediction_per_model() {
    let app = app!(dir("models"));
    let (status, body) = post_predict!(&app, r#"{"data": {"f1": 1, "f2": 2}}"#);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "predictions": {
                "DecisionTree": [0],
                "GradientBoosting": [0],
                "LogisticRegression": [0],
                "RandomForest": ["low"]
            }
        })
    );
}

#[actix_web::test]
async fn record_list_gets_one_prediction_per_row() {
    let app = app!(dir("models"));
    let (status, body) = post_predict!(
        &app,
        r#"{"data": [{"f1": 1, "f2": 2}, {"f1": 3, "f2": 4}]}"#
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["predictions"],
        json!({
            "DecisionTree": [0, 1],
            "GradientBoosting": [0, 1],
            "LogisticRegression": [0, 1],
            "RandomForest": ["low", "high"]
        })
    );
}

#[actix_web::test]
async fn feature_mismatch_stays_local_to_its_model() {
    let app = app!(dir("tests/fixtures/mixed"));
    let (status, body) = post_predict!(
        &app,
        r#"{"data": [{"f1": 1, "f2": 2}, {"f1": 3, "f2": 4}]}"#
    );
    assert_eq!(status, StatusCode::OK);
    let predictions = body["predictions"].as_object().unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions["DecisionTree"], json!([0, 1]));
    assert_eq!(predictions["RandomForest"], "missing feature columns: f3");
}

#[actix_web::test]
async fn empty_record_list_fails_every_model_inline() {
    let app = app!(dir("models"));
    let (status, body) = post_predict!(&app, r#"{"data": []}"#);
    assert_eq!(status, StatusCode::OK);
    for (_, outcome) in body["predictions"].as_object().unwrap() {
        assert!(outcome.as_str().unwrap().contains("0 sample(s)"));
    }
}

#[actix_web::test]
async fn repeated_requests_are_identical() {
    let app = app!(dir("models"));
    let request = r#"{"data": [{"f1": 2.5, "f2": 3.5}, {"f1": 0, "f2": 10}]}"#;
    let first = post_predict!(&app, request);
    let second = post_predict!(&app, request);
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first, second);
}

#[actix_web::test]
async fn positional_model_reads_columns_in_request_order() {
    let app = app!(dir("tests/fixtures/positional"));
    // margin = first column - second column
    let (status, body) = post_predict!(
        &app,
        r#"{"data": [{"f2": 10, "f1": 0}, {"f2": 1, "f1": 5}]}"#
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["predictions"]["LogisticRegression"],
        json!(["first", "second"])
    );
}

#[actix_web::test]
async fn json_body_is_read_whatever_the_content_type() {
    // Clients posting JSON as text/plain (curl -d without -H) still get
    // predictions; only the body decides whether input is present.
    let app = app!(dir("models"));
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", "text/plain"))
        .set_payload(r#"{"data": {"f1": 1, "f2": 2}}"#)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["predictions"]["DecisionTree"], json!([0]));
}
