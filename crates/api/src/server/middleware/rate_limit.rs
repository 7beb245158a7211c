//! Fixed-window rate limiting keyed by client identity.
//!
//! The counter store is owned by [`crate::server::state::AppState`] and
//! passed in at construction, so each test gets an isolated limiter.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use devcamper_common::ApiError;
use parking_lot::Mutex;

use crate::server::error::error_response;
use crate::server::state::AppState;

/// Identity used when neither a forwarding header nor a peer address is
/// available (e.g. in-process test transports).
const FALLBACK_IDENTITY: &str = "unknown";

/// Rate limiter tuning.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per client identity per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(600),
        }
    }
}

/// One client's counter within the current window.
#[derive(Debug)]
struct Window {
    count: u32,
    started_at: Instant,
}

/// Outcome of a rate-limit check.
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    /// Forward the request; `remaining` feeds the `X-RateLimit-Remaining` header.
    Allowed { remaining: u32 },
    /// Short-circuit with 429.
    Limited,
}

/// Fixed-window keyed counter store.
///
/// A client's count resets once the current time passes window start plus
/// window length. Access is serialised by one mutex over the whole map;
/// the critical section is a hash lookup and an integer bump.
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// Create a limiter with the given tuning.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Maximum requests per window.
    pub fn max_requests(&self) -> u32 {
        self.config.max_requests
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.config.window
    }

    /// Count a request for `key` and decide whether to forward it.
    pub fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut windows = self.windows.lock();

        let window = windows.entry(key.to_owned()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        if now.duration_since(window.started_at) >= self.config.window {
            window.count = 0;
            window.started_at = now;
        }

        if window.count >= self.config.max_requests {
            Decision::Limited
        } else {
            window.count += 1;
            Decision::Allowed {
                remaining: self.config.max_requests - window.count,
            }
        }
    }

    /// Drop windows whose reset time has passed.
    pub fn prune(&self) {
        let now = Instant::now();
        self.windows
            .lock()
            .retain(|_, w| now.duration_since(w.started_at) < self.config.window);
    }

    /// Number of client identities currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }
}

/// Spawn the periodic prune task for a shared limiter.
pub fn prune_task(limiter: Arc<RateLimiter>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(limiter.window());
        interval.tick().await; // first tick completes immediately
        loop {
            interval.tick().await;
            limiter.prune();
        }
    })
}

/// Pipeline stage 8: enforce the per-client request budget.
///
/// Allowed responses carry `X-RateLimit-Limit` and `X-RateLimit-Remaining`;
/// over-budget requests short-circuit as 429 and never reach later stages.
pub async fn limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let key = client_identity(&req);

    match state.limiter.check(&key) {
        Decision::Limited => error_response(&ApiError::TooManyRequests),
        Decision::Allowed { remaining } => {
            let max = state.limiter.max_requests();
            let mut res = next.run(req).await;
            let headers = res.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(max));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            res
        }
    }
}

/// Client identity: first `X-Forwarded-For` hop, else the peer address.
fn client_identity(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_owned();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| FALLBACK_IDENTITY.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn limiter(max: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests: max,
            window: Duration::from_secs(window_secs),
        })
    }

    #[test]
    fn allows_up_to_the_limit() {
        let l = limiter(3, 600);
        assert_eq!(l.check("c"), Decision::Allowed { remaining: 2 });
        assert_eq!(l.check("c"), Decision::Allowed { remaining: 1 });
        assert_eq!(l.check("c"), Decision::Allowed { remaining: 0 });
        assert_eq!(l.check("c"), Decision::Limited);
    }

    #[test]
    fn clients_are_counted_independently() {
        let l = limiter(1, 600);
        assert_eq!(l.check("a"), Decision::Allowed { remaining: 0 });
        assert_eq!(l.check("b"), Decision::Allowed { remaining: 0 });
        assert_eq!(l.check("a"), Decision::Limited);
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let l = limiter(1, 0);
        // Zero-length window: every check starts a fresh window.
        assert!(matches!(l.check("c"), Decision::Allowed { .. }));
        assert!(matches!(l.check("c"), Decision::Allowed { .. }));
    }

    #[test]
    fn prune_drops_expired_windows() {
        let l = limiter(5, 0);
        l.check("a");
        l.check("b");
        assert_eq!(l.tracked_clients(), 2);
        l.prune();
        assert_eq!(l.tracked_clients(), 0);
    }

    #[test]
    fn identity_prefers_forwarded_header() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_identity(&req), "203.0.113.9");
    }

    #[test]
    fn identity_falls_back_to_peer_address() {
        let mut req = Request::builder().body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("192.0.2.1:4711".parse().unwrap()));
        assert_eq!(client_identity(&req), "192.0.2.1");
    }

    #[test]
    fn identity_fallback_constant() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_identity(&req), FALLBACK_IDENTITY);
    }
}
