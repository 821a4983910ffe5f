//! Request ID middleware.
//!
//! Every request gets an ID, either forwarded from an upstream proxy or a
//! fresh UUID v4. The ID is recorded on the tracing span, tagged on the Sentry
//! scope and echoed in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest forwarded ID accepted as-is.
const MAX_FORWARDED_LEN: usize = 128;

/// Accept a forwarded ID only if it is short, printable ASCII.
fn forwarded_id(value: &HeaderValue) -> Option<String> {
    let value = value.to_str().ok()?.trim();
    let valid = !value.is_empty()
        && value.len() <= MAX_FORWARDED_LEN
        && value.chars().all(|c| c.is_ascii_graphic());
    valid.then(|| value.to_owned())
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(forwarded_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
