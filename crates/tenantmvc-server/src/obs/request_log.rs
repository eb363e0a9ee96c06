use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;

/// Logging capability bound to a single request.
pub trait RequestLogger: Send + Sync {
    fn error(&self, msg: &str);
}

/// Request extension carrying the optional logger.
#[derive(Clone)]
pub struct RequestLog(pub Arc<dyn RequestLogger>);

impl RequestLog {
    pub fn error(&self, msg: &str) {
        self.0.error(msg);
    }
}

/// Logger that tags every line with the request id, method and path.
#[derive(Debug, Clone)]
pub struct TracingRequestLogger {
    pub request_id: String,
    pub method: String,
    pub path: String,
}

impl RequestLogger for TracingRequestLogger {
    fn error(&self, msg: &str) {
        tracing::error!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            "{msg}"
        );
    }
}

/// Host middleware: attach a [`TracingRequestLogger`] to every request.
///
/// The id comes from the [`RequestId`] set by tower-http's request-id layer;
/// requests reaching here without one log `-`.
pub async fn attach_request_log(mut req: Request, next: Next) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();
    let logger = TracingRequestLogger {
        request_id,
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
    };
    req.extensions_mut().insert(RequestLog(Arc::new(logger)));
    next.run(req).await
}
