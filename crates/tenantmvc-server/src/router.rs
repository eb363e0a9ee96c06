//! Host wiring: lifecycle + routers + host middleware.

use axum::{http::HeaderName, middleware, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use tenantmvc_core::error::Result;

use crate::{app_state::AppState, context, diagnostics, lifecycle::Lifecycle, navbar, obs, server::MvcServer};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Bootstrap the MVC server and wrap it with tenant resolution, request ids,
/// tracing and the per-request logger.
pub fn build_router(state: AppState) -> Result<Router> {
    let prefix = state.cfg().http.system_prefix.clone();
    let mut lifecycle = Lifecycle::new(MvcServer::from_config(state.cfg()))
        .mount("/", navbar::router())
        .mount(prefix, diagnostics::router());

    let app = lifecycle.run(state.clone())?;

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    Ok(app
        .layer(middleware::from_fn_with_state(state, context::resolve_tenant))
        .layer(middleware::from_fn(obs::attach_request_log))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid)))
}
