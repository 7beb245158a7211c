//! Terminal error stage.
//!
//! Every pipeline stage and every handler funnels failures here; nothing else
//! in the service writes an error response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use devcamper_common::{protocol::ErrorBody, ApiError};
use tracing::error;

/// Render an [`ApiError`] as the standard JSON error envelope.
///
/// Internal errors are logged with full detail server-side; the client only
/// ever sees the fixed public message.
pub fn error_response(err: &ApiError) -> Response {
    if let ApiError::Internal(detail) = err {
        error!(error = %detail, "unhandled error");
    }

    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::new(err.public_message()))).into_response()
}

/// Handler-side wrapper so route handlers can bubble an [`ApiError`] with `?`.
#[derive(Debug)]
pub struct Rejection(pub ApiError);

impl From<ApiError> for Rejection {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        error_response(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use devcamper_common::protocol::ErrorBody;

    async fn body_of(res: Response) -> ErrorBody {
        let bytes = to_bytes(res.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn renders_status_and_envelope() {
        let res = error_response(&ApiError::NotFound);
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_of(res).await;
        assert!(!body.success);
        assert_eq!(body.error, "resource not found");
    }

    #[tokio::test]
    async fn internal_detail_never_reaches_the_client() {
        let res = error_response(&ApiError::Internal("db password leaked".into()));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(res).await;
        assert_eq!(body.error, "Server Error");
    }

    #[tokio::test]
    async fn rejection_wraps_into_same_envelope() {
        let res = Rejection(ApiError::Auth).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
