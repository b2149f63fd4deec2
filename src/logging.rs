//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::Next,
    response::Response,
};

/// The number of bytes of a request or response body to log at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body) = request.into_parts();
    let body = read_body(body).await;
    log_message("Received request", &format!("{headers:#?}"), &body);

    let request = Request::from_parts(headers, Body::from(body));
    let response = next.run(request).await;

    let (headers, body) = response.into_parts();
    let body = read_body(body).await;
    log_message("Sending response", &format!("{headers:#?}"), &body);

    Response::from_parts(headers, Body::from(body))
}

async fn read_body(body: Body) -> Bytes {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("Could not read body for logging: {error}"))
        .unwrap_or_default()
}

fn log_message(prefix: &str, headers: &str, body: &[u8]) {
    let body = String::from_utf8_lossy(body);
    let short_body = format_body(&body);

    tracing::info!("{prefix}: {headers}\nbody: {short_body}");

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full body: {body:?}");
    }
}

/// Quote `body` for the `info` log, cutting it at [LOG_BODY_LENGTH_LIMIT] bytes.
fn format_body(body: &str) -> String {
    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(truncated) => format!("{truncated:?}..."),
        None => format!("{body:?}"),
    }
}

/// Cut `text` down to at most `limit` bytes without splitting a character.
///
/// Returns `None` if `text` already fits.
fn truncate(text: &str, limit: usize) -> Option<&str> {
    if text.len() <= limit {
        return None;
    }

    let end = (0..=limit)
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    Some(&text[..end])
}
