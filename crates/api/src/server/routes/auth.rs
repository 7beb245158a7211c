//! Auth resource router.

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use devcamper_common::{protocol::DataBody, ApiError};
use serde_json::Value;

use crate::server::error::Rejection;
use crate::server::middleware::body::JsonBody;
use crate::server::middleware::cookies::Cookies;
use crate::server::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

/// `POST /api/v1/auth/login` — login placeholder; echoes the sanitized body.
async fn login(body: Option<Extension<JsonBody>>) -> Json<DataBody<Value>> {
    let payload = body.map(|Extension(JsonBody(v))| v).unwrap_or(Value::Null);
    Json(DataBody::new(payload))
}

/// `GET /api/v1/auth/me` — protected placeholder. Without a session token it
/// bubbles an auth failure into the terminal error stage.
async fn me(cookies: Option<Extension<Cookies>>) -> Result<Json<DataBody<Value>>, Rejection> {
    let token = cookies.as_ref().and_then(|Extension(c)| c.get("token"));
    match token {
        Some(token) => Ok(Json(DataBody::new(
            serde_json::json!({ "token": token }),
        ))),
        None => Err(ApiError::Auth.into()),
    }
}
