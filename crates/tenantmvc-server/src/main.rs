//! tenantmvc server binary.
//!
//! Usage: `tenantmvc-server [config.yaml]` (default `tenantmvc.yaml`).

use tracing_subscriber::{fmt, EnvFilter};

use tenantmvc_core::error::{MvcError, Result};
use tenantmvc_server::{app_state, config, router};

const DEFAULT_CONFIG: &str = "tenantmvc.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e.trace(), "startup aborted");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.http.listen_addr()?;
    let environment = cfg.environment;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state)?;

    tracing::info!(%listen, env = environment.as_str(), "tenantmvc-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| MvcError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| MvcError::Internal(format!("server failed: {e}")))
}
