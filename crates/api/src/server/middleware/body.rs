//! JSON body parsing and write-back.
//!
//! [`parse_json_body`] buffers and parses JSON request bodies into a
//! [`JsonBody`] extension which the sanitizing stages mutate in place.
//! [`apply_sanitized_body`] runs innermost and re-serialises the (by then
//! sanitized) value into the raw body so byte-level extractors cannot observe
//! pre-sanitized input.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use devcamper_common::ApiError;

use crate::server::error::error_response;
use crate::server::state::AppState;

/// Parsed JSON request body, attached as a request extension.
///
/// This is the handler-facing view of the body; sanitizing stages mutate it
/// before dispatch.
#[derive(Debug, Clone)]
pub struct JsonBody(pub serde_json::Value);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().starts_with("application/json"))
        .unwrap_or(false)
}

/// Pipeline stage 1: parse JSON request bodies.
///
/// Short-circuits with a 400 envelope when the body is syntactically invalid
/// or exceeds the configured cap. Non-JSON requests pass through untouched.
pub async fn parse_json_body(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !is_json(&req) {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();
    let bytes = match to_bytes(body, state.max_json_body_bytes).await {
        Ok(b) => b,
        Err(e) => {
            return error_response(&ApiError::MalformedBody(format!(
                "could not read request body: {e}"
            )))
        }
    };

    if !bytes.is_empty() {
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => {
                parts.extensions.insert(JsonBody(value));
            }
            Err(e) => return error_response(&ApiError::MalformedBody(e.to_string())),
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Innermost stage: write the sanitized [`JsonBody`] back into the raw body.
pub async fn apply_sanitized_body(req: Request, next: Next) -> Response {
    let sanitized = req
        .extensions()
        .get::<JsonBody>()
        .and_then(|b| serde_json::to_vec(&b.0).ok());

    let req = match sanitized {
        Some(bytes) => {
            let (mut parts, _) = req.into_parts();
            parts.headers.insert(CONTENT_LENGTH, bytes.len().into());
            Request::from_parts(parts, Body::from(bytes))
        }
        None => req,
    };

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::{middleware::from_fn, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[tokio::test]
    async fn write_back_replaces_stale_body_bytes() {
        // Handler reads the raw body through the framework's JSON extractor,
        // not the pipeline's extension, and echoes the content length it saw.
        async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
            let len = headers
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_owned();
            Json(json!({ "body": body, "content_length": len }))
        }

        let app = Router::new()
            .route("/", post(echo))
            .layer(from_fn(apply_sanitized_body));

        // Raw bytes still carry the operator key; the extension holds the
        // sanitized value the earlier stages produced.
        let stale = r#"{"password":"x","$where":"sleep(1000)"}"#;
        let sanitized = json!({"password": "x"});
        let mut req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, stale.len())
            .body(Body::from(stale))
            .unwrap();
        req.extensions_mut().insert(JsonBody(sanitized.clone()));

        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = to_bytes(res.into_body(), 4096).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["body"], sanitized);
        assert!(v["body"].get("$where").is_none());

        let expected_len = serde_json::to_vec(&sanitized).unwrap().len();
        assert_eq!(v["content_length"], expected_len.to_string());
    }

    #[tokio::test]
    async fn requests_without_parsed_body_pass_through_unchanged() {
        async fn echo(body: String) -> String {
            body
        }

        let app = Router::new()
            .route("/", post(echo))
            .layer(from_fn(apply_sanitized_body));

        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("plain text"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let bytes = to_bytes(res.into_body(), 4096).await.unwrap();
        assert_eq!(&bytes[..], b"plain text");
    }

    #[test]
    fn detects_json_content_type() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::empty())
            .unwrap();
        assert!(is_json(&req));

        let req = Request::builder()
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::empty())
            .unwrap();
        assert!(!is_json(&req));

        let req = Request::builder().body(Body::empty()).unwrap();
        assert!(!is_json(&req));
    }
}
