//! Error taxonomy shared across crates.

use thiserror::Error;

/// Top-level API error type.
///
/// Every pipeline stage and every resource handler propagates failures as an
/// [`ApiError`]; the terminal error stage renders it as one JSON envelope.
/// Variants map to HTTP status codes returned to callers:
/// - [`ApiError::MalformedBody`] → 400
/// - [`ApiError::Validation`] → 400
/// - [`ApiError::Auth`] → 401
/// - [`ApiError::Forbidden`] → 403
/// - [`ApiError::NotFound`] → 404
/// - [`ApiError::TooManyRequests`] → 429
/// - [`ApiError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be parsed as JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The request was well-formed but semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// The caller is not authenticated.
    #[error("not authorized to access this route")]
    Auth,

    /// The caller is authenticated but not permitted.
    #[error("forbidden")]
    Forbidden,

    /// No route or resource matched the request.
    #[error("resource not found")]
    NotFound,

    /// The caller exceeded the per-window request limit.
    #[error("too many requests, please try again later")]
    TooManyRequests,

    /// An unexpected internal error occurred. The payload is logged
    /// server-side and never sent to the client.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::MalformedBody(_) | ApiError::Validation(_) => 400,
            ApiError::Auth => 401,
            ApiError::Forbidden => 403,
            ApiError::NotFound => 404,
            ApiError::TooManyRequests => 429,
            ApiError::Internal(_) => 500,
        }
    }

    /// Message safe to expose to callers.
    ///
    /// [`ApiError::Internal`] collapses to a fixed string so stack traces and
    /// driver errors never leak through the envelope.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Server Error".to_owned(),
            other => other.to_string(),
        }
    }
}
