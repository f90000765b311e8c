//! Security headers and same-origin CORS reflection, applied to every
//! response.

use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, HOST, ORIGIN,
    STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

/// Middleware adding the fixed security headers and, for same-origin
/// requests, the credentialed CORS headers
pub async fn security_headers(req: Request, next: Next) -> Response {
    let reflected = reflected_origin(req.headers());

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
    headers.insert(
        STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    if let Some(origin) = reflected {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    }

    response
}

/// The request's `Origin`, if it contains the request's own `Host`.
///
/// Both headers must be present and non-empty.
pub fn reflected_origin(headers: &HeaderMap) -> Option<HeaderValue> {
    let origin = headers.get(ORIGIN)?;
    let host = headers.get(HOST)?.to_str().ok()?;
    let origin_str = origin.to_str().ok()?;

    if origin_str.is_empty() || host.is_empty() || !origin_str.contains(host) {
        return None;
    }
    Some(origin.clone())
}
