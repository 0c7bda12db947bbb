//! Request ID middleware for correlating logs with requests.
//!
//! Reuses the caller's `x-request-id` header when it carries a UUID (the load
//! balancer or a client may already have assigned one), otherwise generates a
//! UUID v4. Every request runs inside a tracing span carrying the id, and the
//! id is echoed back on the response.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

fn incoming_request_id(request: &Request) -> Option<Uuid> {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
}

/// Middleware that assigns a request ID and wraps the request in a span.
///
/// This should be the outermost layer so the span covers all other
/// middleware and the handler.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(Uuid::new_v4);

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
