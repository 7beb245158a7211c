//! Multipart upload extraction.
//!
//! File parts of `multipart/form-data` requests are pulled into an
//! [`Uploads`] extension before dispatch. No size or type validation happens
//! here beyond the configured body cap; that is a resource-handler concern.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    middleware::Next,
    response::Response,
};
use bytes::Bytes;
use devcamper_common::ApiError;

use crate::server::error::error_response;
use crate::server::state::AppState;

/// One uploaded file extracted from a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Form field name the file was sent under.
    pub field: String,
    /// Original filename as reported by the client.
    pub filename: String,
    /// Payload size in bytes.
    pub size: usize,
    /// In-memory payload.
    pub bytes: Bytes,
}

/// Uploaded files for this request, attached as a request extension.
///
/// Present (possibly empty) for every multipart request, absent otherwise.
#[derive(Debug, Clone, Default)]
pub struct Uploads(pub Arc<Vec<UploadedFile>>);

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Pipeline stage 4: extract multipart file payloads.
pub async fn extract_uploads(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !is_multipart(&req) {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();
    let bytes = match to_bytes(body, state.max_upload_bytes).await {
        Ok(b) => b,
        Err(e) => {
            return error_response(&ApiError::MalformedBody(format!(
                "could not read upload body: {e}"
            )))
        }
    };

    // Parse a copy of the request so the original bytes survive for any
    // downstream extractor that wants the raw multipart stream.
    let mut files = Vec::new();
    if let Some(probe) = probe_request(&parts.headers, bytes.clone()) {
        if let Ok(mut multipart) = Multipart::from_request(probe, &()).await {
            while let Ok(Some(field)) = multipart.next_field().await {
                let Some(filename) = field.file_name().map(str::to_owned) else {
                    continue; // plain form field, not a file
                };
                let name = field.name().unwrap_or("file").to_owned();
                if let Ok(data) = field.bytes().await {
                    files.push(UploadedFile {
                        field: name,
                        filename,
                        size: data.len(),
                        bytes: data,
                    });
                }
            }
        }
    }

    parts.extensions.insert(Uploads(Arc::new(files)));
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn probe_request(headers: &axum::http::HeaderMap, bytes: Bytes) -> Option<Request> {
    let mut builder = Request::builder();
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder.body(Body::from(bytes)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_multipart_content_type() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "multipart/form-data; boundary=xyz")
            .body(Body::empty())
            .unwrap();
        assert!(is_multipart(&req));

        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap();
        assert!(!is_multipart(&req));
    }

    #[tokio::test]
    async fn probe_preserves_content_type() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(CONTENT_TYPE, "multipart/form-data; boundary=xyz".parse().unwrap());
        let probe = probe_request(&headers, Bytes::from_static(b"")).unwrap();
        assert!(is_multipart(&probe));
    }
}
