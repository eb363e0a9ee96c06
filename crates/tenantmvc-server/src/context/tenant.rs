use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::HOST, request::Parts},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use tenantmvc_core::error::{MvcError, Result};
use tenantmvc_core::{TenantContext, TenantMetrics};

use crate::app_state::AppState;
use crate::config::TenantConfig;
use crate::errors::AppError;

/// Known tenants and their latest published metrics snapshot.
///
/// Metrics are written by an external collector through [`publish`]; each
/// publish swaps the whole `Arc`, so readers always see a complete snapshot.
///
/// [`publish`]: TenantRegistry::publish
#[derive(Debug, Default)]
pub struct TenantRegistry {
    /// Lowercased domains in config order; the first is the fallback.
    domains: Vec<String>,
    metrics: DashMap<String, Arc<TenantMetrics>>,
}

impl TenantRegistry {
    pub fn from_config(tenants: &[TenantConfig]) -> Self {
        Self {
            domains: tenants
                .iter()
                .map(|t| t.domain.to_ascii_lowercase())
                .collect(),
            metrics: DashMap::new(),
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Replace the metrics snapshot for `domain`.
    pub fn publish(&self, domain: &str, metrics: TenantMetrics) -> Result<()> {
        let key = domain.to_ascii_lowercase();
        if !self.domains.contains(&key) {
            return Err(MvcError::Config(format!("unknown tenant: {domain}")));
        }
        self.metrics.insert(key, Arc::new(metrics));
        Ok(())
    }

    /// Resolve by `Host` header (port ignored), falling back to the first tenant.
    pub fn resolve(&self, host: Option<&str>) -> Option<TenantContext> {
        let wanted = host
            .map(strip_port)
            .map(str::to_ascii_lowercase)
            .filter(|h| self.domains.contains(h));

        let domain = match wanted {
            Some(d) => d,
            None => self.domains.first()?.clone(),
        };

        let metrics = self.metrics.get(&domain).map(|m| Arc::clone(m.value()));
        Some(TenantContext { domain, metrics })
    }
}

fn strip_port(host: &str) -> &str {
    // IPv6 literals keep their brackets: "[::1]:3000" -> "[::1]"
    if let Some(end) = host.find(']') {
        return &host[..=end];
    }
    host.rsplit_once(':').map_or(host, |(h, _)| h)
}

/// Host middleware: attach the resolved tenant to the request.
pub async fn resolve_tenant(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let host = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match state.tenants().resolve(host.as_deref()) {
        Some(tenant) => {
            tracing::trace!(tenant = %tenant.domain, "tenant resolved");
            req.extensions_mut().insert(tenant);
        }
        None => tracing::warn!(host = ?host, "no tenant resolved"),
    }
    next.run(req).await
}

/// Extractor for the tenant the host attached to this request.
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantContext);

#[async_trait]
impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .map(Tenant)
            .ok_or_else(|| AppError(MvcError::Internal("no tenant resolved for request".into())))
    }
}
