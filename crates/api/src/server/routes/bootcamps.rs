//! Bootcamps resource router.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    routing::{get, put},
    Extension, Json, Router,
};
use devcamper_common::protocol::DataBody;
use serde_json::{json, Value};

use crate::server::middleware::body::JsonBody;
use crate::server::middleware::uploads::Uploads;
use crate::server::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/:id/photo", put(upload_photo))
}

/// `GET /api/v1/bootcamps` — list placeholder; echoes the (collapsed,
/// sanitized) query parameters.
async fn index(Query(params): Query<HashMap<String, String>>) -> Json<DataBody<Value>> {
    Json(DataBody::new(json!({
        "resource": "bootcamps",
        "items": [],
        "query": params,
    })))
}

/// `POST /api/v1/bootcamps` — create placeholder; echoes the sanitized body.
async fn create(body: Option<Extension<JsonBody>>) -> Json<DataBody<Value>> {
    let payload = body.map(|Extension(JsonBody(v))| v).unwrap_or(Value::Null);
    Json(DataBody::new(payload))
}

/// `PUT /api/v1/bootcamps/:id/photo` — upload placeholder; reports metadata
/// of the files the upload stage extracted.
async fn upload_photo(
    Path(id): Path<String>,
    uploads: Option<Extension<Uploads>>,
) -> Json<DataBody<Value>> {
    let files: Vec<Value> = uploads
        .map(|Extension(Uploads(files))| {
            files
                .iter()
                .map(|f| {
                    json!({
                        "field": f.field,
                        "filename": f.filename,
                        "size": f.size,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Json(DataBody::new(json!({ "id": id, "files": files })))
}
