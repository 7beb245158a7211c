//! Courses resource router.

use std::collections::HashMap;

use axum::{extract::Query, routing::get, Json, Router};
use devcamper_common::protocol::DataBody;
use serde_json::{json, Value};

use crate::server::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index).post(create))
}

/// `GET /api/v1/courses` — list placeholder.
async fn index(Query(params): Query<HashMap<String, String>>) -> Json<DataBody<Value>> {
    Json(DataBody::new(json!({
        "resource": "courses",
        "items": [],
        "query": params,
    })))
}

/// `POST /api/v1/courses` — create placeholder.
///
/// Reads the body through the framework's JSON extractor rather than the
/// pipeline extension, so it sees exactly the rewritten raw bytes.
async fn create(Json(body): Json<Value>) -> Json<DataBody<Value>> {
    Json(DataBody::new(json!({
        "resource": "courses",
        "created": body,
    })))
}
