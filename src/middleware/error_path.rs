use axum::{
    body::{to_bytes, Body},
    extract::{OriginalUri, Request},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ApiError, Classified};

// Bare error bodies from axum are a short line of text at most.
const BARE_BODY_LIMIT: usize = 16 * 1024;

/// Gives every failing response the uniform error body, with the request path.
///
/// Responses from `AppError` carry their [`ApiError`] as an extension and
/// only get the path filled in. Other 4xx/5xx responses (a 405 from the
/// router, for instance) are wrapped, using their body text as the message
/// or the status reason when the body is empty. Headers such as `Allow`
/// are kept. Successful responses pass through untouched.
pub async fn attach_request_path(req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let response = next.run(req).await;
    let status = response.status();
    let (mut parts, body) = response.into_parts();

    let mut api_error = match parts.extensions.remove::<ApiError>() {
        Some(api_error) => api_error,
        None if status.is_client_error() || status.is_server_error() => {
            ApiError::new(bare_error(status, body).await, "")
        }
        None => return Response::from_parts(parts, body),
    };
    api_error.path = path;

    parts.headers.remove(CONTENT_TYPE);
    parts.headers.remove(CONTENT_LENGTH);
    (parts, Json(api_error)).into_response()
}

async fn bare_error(status: axum::http::StatusCode, body: Body) -> Classified {
    let text = match to_bytes(body, BARE_BODY_LIMIT).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read error body");
            String::new()
        }
    };
    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or("Unknown").to_string()
    } else {
        text
    };

    Classified { status, message, field_errors: None }
}
