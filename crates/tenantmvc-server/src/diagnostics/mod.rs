//! Tenant-aware diagnostics endpoints.
//!
//! - `GET /health`    : current time, tenant start time, process uptime (HTML)
//! - `GET /readiness` : readiness probe (JSON)
//! - `GET /info`      : host + tenant name/value listing (HTML)
//! - `GET /timestamp` : current instant in several formats (JSON)
//! - `GET /routes`    : per-route metrics of the current tenant (JSON)
//!
//! Handlers only read. Missing tenant metrics degrade to zero/null; probe
//! failures propagate to the error handler.

pub mod payload;
pub mod probe;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Serialize;
use serde_json::json;

use tenantmvc_core::format::{record_pairs, NameValue};

use crate::app_state::AppState;
use crate::context::Tenant;
use crate::errors::AppError;
use crate::views::Views;

pub use payload::{HealthView, InfoRecord, RoutesPayload, TimestampPayload};
pub use probe::{HostProbe, SystemProbe, SystemSnapshot};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/readiness", get(readiness))
        .route("/info", get(info))
        .route("/timestamp", get(timestamp))
        .route("/routes", get(routes))
}

async fn health(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    views: Views,
) -> Result<Html<String>, AppError> {
    let now = Local::now();
    let data = HealthView::new(
        payload::local_string(&now, &state.probe().timezone()),
        &tenant,
        state.process_uptime().as_secs_f64(),
    );
    views.render("system_health", &data)
}

async fn readiness(Tenant(tenant): Tenant) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "ok": true, "status": "ready", "tenant": tenant.domain })),
    )
}

#[derive(Serialize)]
struct InfoView {
    items: Vec<NameValue>,
}

async fn info(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    views: Views,
) -> Result<Html<String>, AppError> {
    let system = state.probe().snapshot()?;
    let items = record_pairs(&InfoRecord::new(system, &tenant))?;
    views.render("system_info", &InfoView { items })
}

async fn timestamp(State(state): State<AppState>) -> impl IntoResponse {
    let payload = TimestampPayload::at(Local::now(), state.probe().timezone());
    (StatusCode::OK, Json(payload))
}

async fn routes(State(state): State<AppState>, Tenant(tenant): Tenant) -> impl IntoResponse {
    let payload = RoutesPayload::new(&tenant, state.probe().timezone());
    (StatusCode::OK, Json(payload))
}
