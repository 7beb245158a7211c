//! Axum router construction: the ordered middleware stack, the five resource
//! mounts, and the static asset fallback.

use std::time::Duration;

use axum::{
    handler::HandlerWithoutStateExt,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    response::Response,
    Router,
};
use devcamper_common::ApiError;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Config;
use crate::server::error::error_response;
use crate::server::middleware::{body, cookies, hpp, rate_limit, sanitize, security, uploads, xss};
use crate::server::routes;
use crate::server::state::AppState;

/// Build the application [`Router`] with all resource mounts and the full
/// middleware stack attached.
///
/// Stage order is written down exactly once, in the [`ServiceBuilder`] below:
/// top entry runs first on the request path. Any stage that fails
/// short-circuits straight to the terminal error stage; later stages and
/// handlers are never reached.
pub fn build(state: AppState, cfg: &Config) -> Router {
    let api = Router::new()
        .nest("/api/v1/bootcamps", routes::bootcamps::router())
        .nest("/api/v1/courses", routes::courses::router())
        .nest("/api/v1/auth", routes::auth::router())
        .nest("/api/v1/users", routes::users::router())
        .nest("/api/v1/reviews", routes::reviews::router());

    // Anything outside /api/v1/* is tried against the public directory;
    // misses produce the standard 404 envelope, never a framework page.
    let static_assets =
        ServeDir::new(&cfg.public_dir).not_found_service(not_found.into_service());

    let mut app = api
        .fallback_service(static_assets)
        .layer(
            ServiceBuilder::new()
                .layer(TimeoutLayer::new(Duration::from_secs(cfg.request_timeout_secs)))
                .layer(from_fn_with_state(state.clone(), body::parse_json_body))
                .layer(from_fn(cookies::parse_cookies))
                .layer(from_fn_with_state(state.clone(), uploads::extract_uploads))
                .layer(from_fn(sanitize::strip_operator_keys))
                .layer(from_fn(security::security_headers))
                .layer(from_fn(xss::escape_html))
                .layer(from_fn_with_state(state.clone(), rate_limit::limit))
                .layer(from_fn(hpp::collapse_duplicate_params))
                .layer(build_cors(&cfg.cors_allow_origin))
                .layer(from_fn(body::apply_sanitized_body)),
        )
        .with_state(state);

    // Diagnostic request logging, development mode only. Resolved once here,
    // not per request.
    if cfg.is_development() {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

/// Cross-origin policy: `"*"` permits any origin, otherwise the single
/// configured origin. An unparseable origin falls back to permissive with a
/// warning rather than refusing to start.
fn build_cors(origin: &str) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return base.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => base.allow_origin(value),
        Err(_) => {
            warn!(origin, "invalid CORS_ALLOW_ORIGIN, allowing any origin");
            base.allow_origin(Any)
        }
    }
}

/// Default "not found" outcome for unmatched routes and missing files.
async fn not_found() -> Response {
    error_response(&ApiError::NotFound)
}
