//! Response envelopes serialised as JSON to API clients.
//!
//! Every response body carries a `success` flag so clients can branch on one
//! field regardless of status code.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

/// Standard error body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable description safe to expose to callers.
    pub error: String,
}

impl ErrorBody {
    /// Construct an [`ErrorBody`] from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Success envelope
// ---------------------------------------------------------------------------

/// Standard success body wrapping handler data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataBody<T> {
    /// Always `true`.
    pub success: bool,
    /// Handler payload.
    pub data: T,
}

impl<T> DataBody<T> {
    /// Wrap `data` in a success envelope.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
