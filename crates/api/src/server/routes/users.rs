//! Users resource router.

use axum::{routing::get, Json, Router};
use devcamper_common::protocol::DataBody;
use serde_json::{json, Value};

use crate::server::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// `GET /api/v1/users` — list placeholder.
async fn index() -> Json<DataBody<Value>> {
    Json(DataBody::new(json!({ "resource": "users", "items": [] })))
}
