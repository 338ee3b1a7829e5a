use crate::api::error_response;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use rand::Rng;
use std::fmt::Write;
use std::time::Instant;

/// Per-request trace id, stored in request extensions and echoed in the
/// `X-Trace-Id` response header and in error envelopes.
#[derive(Clone)]
pub struct TraceId(pub String);

impl std::ops::Deref for TraceId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

/// 16 hex characters from 8 random bytes.
fn generate_trace_id() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    bytes.iter().fold(String::with_capacity(16), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

const MAX_BODY_LOG_CHARS: usize = 200;
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Truncates to `MAX_BODY_LOG_CHARS` bytes on a char boundary.
fn body_snippet(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) if s.len() > MAX_BODY_LOG_CHARS => {
            let mut end = MAX_BODY_LOG_CHARS;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &s[..end])
        }
        Ok(s) => s.to_string(),
        Err(_) => "<non-utf8 body>".to_string(),
    }
}

fn format_elapsed(elapsed_us: u128) -> String {
    match elapsed_us {
        us if us < 1_000 => format!("{us}µs"),
        us if us < 1_000_000 => format!("{}ms", us / 1_000),
        us => format!("{:.1}s", us as f64 / 1_000_000.0),
    }
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Logs every request and response with a shared trace id.
pub async fn request_logging(mut req: Request, next: Next) -> Response {
    let trace_id = generate_trace_id();
    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let method = req.method().clone();
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let req = if carries_body(&method) {
        let (parts, body) = req.into_parts();
        let bytes = match axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(trace_id = %trace_id, method = %method, path = %path, error = %e, "--> request body rejected");
                let mut response = error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    &trace_id,
                    "payload_too_large",
                    &format!("request body exceeds {MAX_REQUEST_BODY_BYTES} bytes"),
                );
                if let Ok(val) = HeaderValue::from_str(&trace_id) {
                    response.headers_mut().insert("X-Trace-Id", val);
                }
                return response;
            }
        };
        tracing::info!(
            trace_id = %trace_id,
            method = %method,
            path = %path,
            body = %body_snippet(&bytes),
            "--> request"
        );
        Request::from_parts(parts, Body::from(bytes))
    } else {
        tracing::info!(trace_id = %trace_id, method = %method, path = %path, "--> request");
        req
    };

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = format_elapsed(start.elapsed().as_micros());

    let (mut parts, body) = response.into_parts();
    let bytes: Bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let is_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let snippet = if is_json {
        body_snippet(&bytes)
    } else {
        String::new()
    };

    log_response(&trace_id, parts.status, &elapsed, &snippet);

    if let Ok(val) = HeaderValue::from_str(&trace_id) {
        parts.headers.insert("X-Trace-Id", val);
    }
    Response::from_parts(parts, Body::from(bytes))
}

fn log_response(trace_id: &str, status: StatusCode, elapsed: &str, body: &str) {
    let code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(trace_id, status = code, elapsed, body, "<-- response");
    } else if status.is_client_error() {
        tracing::warn!(trace_id, status = code, elapsed, body, "<-- response");
    } else {
        tracing::info!(trace_id, status = code, elapsed, "<-- response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_id_is_sixteen_hex_chars() {
        let id = generate_trace_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let long = "é".repeat(150);
        let snippet = body_snippet(long.as_bytes());
        assert!(snippet.ends_with("..."));
        assert!(snippet.len() <= MAX_BODY_LOG_CHARS + 3);
        assert_eq!(body_snippet(b"{}"), "{}");
        assert_eq!(body_snippet(&[0xff, 0xfe]), "<non-utf8 body>");
    }

    #[test]
    fn elapsed_units() {
        assert_eq!(format_elapsed(999), "999µs");
        assert_eq!(format_elapsed(12_000), "12ms");
        assert_eq!(format_elapsed(2_500_000), "2.5s");
    }
}
