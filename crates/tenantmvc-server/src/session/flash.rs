//! Flash messages exposed to templates.

use axum::{extract::Request, middleware::Next, response::Response};
use serde::Serialize;

use super::Session;

pub const SUCCESS: &str = "success";
pub const ERROR: &str = "error";

/// Per-request data every template can read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewLocals {
    pub success_msg: Vec<String>,
    pub error_msg: Vec<String>,
}

/// Move pending flash messages into the request's [`ViewLocals`].
///
/// Must run inside the session layer and before any handler renders.
pub async fn expose_flash(mut req: Request, next: Next) -> Response {
    let locals = match req.extensions().get::<Session>() {
        Some(session) => ViewLocals {
            success_msg: session.take_flash(SUCCESS),
            error_msg: session.take_flash(ERROR),
        },
        None => {
            tracing::debug!("flash skipped: no session on request");
            ViewLocals::default()
        }
    };
    req.extensions_mut().insert(locals);
    next.run(req).await
}
