//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use mongodb::Database;

use crate::config::Config;
use crate::server::middleware::rate_limit::{RateLimitConfig, RateLimiter};

/// Application state shared across all request handlers and stateful
/// middleware stages.
///
/// All fields are cheaply cloneable so Axum can clone the state per request.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the document store. `None` only in tests.
    pub db: Option<Database>,
    /// Keyed request-counter store used by the rate-limit stage. Owned here
    /// rather than hidden in a process-wide singleton so tests get isolation.
    pub limiter: Arc<RateLimiter>,
    /// Cap applied when buffering JSON request bodies.
    pub max_json_body_bytes: usize,
    /// Cap applied when buffering multipart upload bodies.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create a new [`AppState`] from the database handle, limiter, and
    /// config-derived limits.
    pub fn new(db: Option<Database>, limiter: Arc<RateLimiter>, cfg: &Config) -> Self {
        Self {
            db,
            limiter,
            max_json_body_bytes: cfg.max_json_body_bytes,
            max_upload_bytes: cfg.max_upload_bytes,
        }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] without a database handle, suitable
    /// for tests.
    fn default() -> Self {
        Self::new(
            None,
            Arc::new(RateLimiter::new(RateLimitConfig::default())),
            &Config::default(),
        )
    }
}
