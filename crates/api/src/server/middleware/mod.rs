//! The ordered middleware pipeline.
//!
//! Every inbound request passes through these stages, in the order they are
//! stacked in [`crate::server::router::build`]:
//!
//! 1. request logging — `TraceLayer`, development mode only, outermost
//! 2. timeout — `TimeoutLayer`
//! 3. body — JSON body buffering and parsing ([`body::parse_json_body`])
//! 4. cookies — `Cookie` header parsing ([`cookies::parse_cookies`])
//! 5. uploads — multipart file extraction ([`uploads::extract_uploads`])
//! 6. sanitize — operator-key stripping ([`sanitize::strip_operator_keys`])
//! 7. security — defensive response headers ([`security::security_headers`])
//! 8. xss — HTML escaping of string fields ([`xss::escape_html`])
//! 9. rate_limit — per-client window counter ([`rate_limit::limit`])
//! 10. hpp — duplicate query parameter collapse ([`hpp::collapse_duplicate_params`])
//! 11. CORS — `tower_http::cors::CorsLayer`
//! 12. body finalisation — sanitized body write-back ([`body::apply_sanitized_body`])
//!
//! A stage either forwards the request or short-circuits with an error
//! response rendered by [`crate::server::error::error_response`]; stages are
//! never re-entered.

pub mod body;
pub mod cookies;
pub mod hpp;
pub mod rate_limit;
pub mod sanitize;
pub mod security;
pub mod uploads;
pub mod xss;

use axum::extract::Request;
use axum::http::uri::{PathAndQuery, Uri};

/// Rewrite the request's query string through `f`.
///
/// Pairs are percent-decoded before `f` runs and re-encoded afterwards. A
/// request without a query string is left untouched.
pub(crate) fn rewrite_query(req: &mut Request, f: impl FnOnce(&mut Vec<(String, String)>)) {
    let Some(query) = req.uri().query() else {
        return;
    };

    let mut pairs: Vec<(String, String)> =
        form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    f(&mut pairs);

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();

    let path = req.uri().path();
    let path_and_query = if encoded.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{encoded}")
    };

    let mut parts = req.uri().clone().into_parts();
    if let Ok(pq) = PathAndQuery::from_maybe_shared(path_and_query) {
        parts.path_and_query = Some(pq);
        if let Ok(uri) = Uri::from_parts(parts) {
            *req.uri_mut() = uri;
        }
    }
}
