//! Not-found and centralized error handling.
//!
//! Handlers return `Result<_, AppError>`. Converting an `AppError` into a
//! response yields a sanitized body and tags the response with the failing
//! error; [`handle_errors`], installed as the outermost pipeline entry, logs
//! that error through the request logger and rewrites the body for the
//! configured environment.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use tenantmvc_core::error::{MvcError, GENERIC_MESSAGE};

use crate::obs::RequestLog;

/// Placeholder body of the unmatched-route handler.
pub const NOT_FOUND_BODY: &str = "404 Not Found";

/// Handler error; wraps the shared error type so it can become a response.
#[derive(Debug)]
pub struct AppError(pub MvcError);

impl From<MvcError> for AppError {
    fn from(e: MvcError) -> Self {
        AppError(e)
    }
}

/// Response extension marking a response produced from a handler error.
#[derive(Debug, Clone)]
pub struct HandlerFailure(pub Arc<MvcError>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut res = (status, GENERIC_MESSAGE).into_response();
        res.extensions_mut().insert(HandlerFailure(Arc::new(self.0)));
        res
    }
}

/// Terminal handler for requests no route matched.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

/// Error verbosity fixed when the error handler is installed.
#[derive(Debug, Clone, Copy)]
pub struct ErrorPolicy {
    pub development: bool,
}

/// Centralized error handler middleware.
pub async fn handle_errors(State(policy): State<ErrorPolicy>, req: Request, next: Next) -> Response {
    let log = req.extensions().get::<RequestLog>().cloned();
    let wants_json = accepts_json(req.headers());

    let res = next.run(req).await;
    let Some(HandlerFailure(err)) = res.extensions().get::<HandlerFailure>().cloned() else {
        return res;
    };

    if let Some(log) = log {
        log.error(&err.trace());
    }

    let (parts, _) = res.into_parts();
    let message = err.public_message(policy.development);
    let mut out = if wants_json {
        (parts.status, Json(json!({ "ok": false, "error": message }))).into_response()
    } else {
        (parts.status, message).into_response()
    };

    // Keep headers set by inner layers (session cookie etc.); the body is new.
    let mut headers = parts.headers;
    headers.remove(CONTENT_TYPE);
    headers.remove(CONTENT_LENGTH);
    for (name, value) in &headers {
        out.headers_mut().append(name.clone(), value.clone());
    }
    out
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}
