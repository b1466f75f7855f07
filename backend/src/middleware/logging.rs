use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header::CONTENT_LENGTH, StatusCode},
    middleware::Next,
    response::Response,
};

use super::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 1024;

/// Logs every 4xx/5xx response with a preview of its body.
///
/// Error bodies are small JSON or HTML documents, so the body is buffered and
/// handed back to the client unchanged.
pub async fn log_error_responses(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let started = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = started.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    let (body, preview) = match to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
        Ok(bytes) => {
            let preview = body_preview(&bytes);
            (Body::from(bytes), preview)
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            (Body::empty(), format!("<unreadable body: {err}>"))
        }
    };

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), %method, %path, %request_id, latency_ms, body = %preview, "Request failed");
    } else if status != StatusCode::NOT_FOUND {
        tracing::warn!(status = status.as_u16(), %method, %path, %request_id, latency_ms, body = %preview, "Request rejected");
    } else {
        tracing::debug!(status = status.as_u16(), %method, %path, %request_id, latency_ms, "Not found");
    }

    Response::from_parts(parts, body)
}

fn body_preview(bytes: &[u8]) -> String {
    if bytes.len() <= MAX_LOGGED_BODY_BYTES {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    format!(
        "{}... ({} bytes)",
        String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
        bytes.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_bodies_are_truncated_in_logs() {
        let body = vec![b'a'; MAX_LOGGED_BODY_BYTES + 10];
        let preview = body_preview(&body);
        assert!(preview.ends_with(&format!("... ({} bytes)", MAX_LOGGED_BODY_BYTES + 10)));
        assert_eq!(body_preview(b"{\"error\":\"x\"}"), "{\"error\":\"x\"}");
    }
}
