//! Shared application state.
//!
//! Built once at startup from the validated config; cheap to clone.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tenantmvc_core::error::Result;

use crate::config::ServerConfig;
use crate::context::TenantRegistry;
use crate::diagnostics::{HostProbe, SystemProbe};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    tenants: TenantRegistry,
    sessions: SessionStore,
    probe: Arc<dyn SystemProbe>,
    started: Instant,
}

impl AppState {
    /// Build application state backed by the real host probe.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        Self::with_probe(cfg, Arc::new(HostProbe))
    }

    pub fn with_probe(cfg: ServerConfig, probe: Arc<dyn SystemProbe>) -> Result<Self> {
        cfg.validate()?;
        let tenants = TenantRegistry::from_config(&cfg.tenants);
        tracing::debug!(tenants = ?tenants.domains(), env = cfg.environment.as_str(), "app state built");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                tenants,
                sessions: SessionStore::new(),
                probe,
                started: Instant::now(),
            }),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn tenants(&self) -> &TenantRegistry {
        &self.inner.tenants
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn probe(&self) -> &dyn SystemProbe {
        self.inner.probe.as_ref()
    }

    /// Time since this state was built, i.e. process uptime.
    pub fn process_uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }
}
