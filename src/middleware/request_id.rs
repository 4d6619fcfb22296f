use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// HTTP header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied request ID that is accepted as-is
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Extension type for storing request ID in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Creates a new random request ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts a caller-supplied ID if it is non-empty visible ASCII within
    /// `MAX_REQUEST_ID_LEN` bytes
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_REQUEST_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_graphic());
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tags each request with an ID, reusing the caller's `x-request-id` when
/// acceptable, and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    // Reuse the caller's ID when it is acceptable, otherwise generate one
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(RequestId::parse)
        .unwrap_or_default();

    // Handlers read it back through `Extension<RequestId>`
    request.extensions_mut().insert(request_id.clone());

    // Continue processing the request
    let mut response = next.run(request).await;

    // Echo the ID on the response headers
    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Span factory for `TraceLayer` carrying the request ID
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(RequestId::as_str)
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_client_id() {
        let id = RequestId::parse("trace-42.abc").unwrap();
        assert_eq!(id.as_str(), "trace-42.abc");
    }

    #[test]
    fn test_parse_rejects_empty_and_whitespace() {
        assert!(RequestId::parse("").is_none());
        assert!(RequestId::parse("has space").is_none());
    }

    #[test]
    fn test_parse_rejects_oversized() {
        let raw = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        assert!(RequestId::parse(&raw).is_none());
        assert!(RequestId::parse(&raw[..MAX_REQUEST_ID_LEN]).is_some());
    }

    #[test]
    fn test_generated_ids_are_uuids() {
        let id = RequestId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, RequestId::new());
    }
}
