//! Tenant context and the per-tenant request metrics it carries.
//!
//! Metrics are collected by the host; this crate only reads them. A
//! `TenantContext` holds an immutable snapshot behind an `Arc`, so a reader
//! never observes a half-updated route entry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Aggregated timing for one route key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub count: u64,
    pub total_time_ms: f64,
}

impl RouteStats {
    pub fn new(count: u64, total_time_ms: f64) -> Self {
        Self {
            count,
            total_time_ms: total_time_ms.max(0.0),
        }
    }

    /// Mean response time; 0 when the route was never called.
    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_time_ms / self.count as f64
    }
}

/// Per-tenant request counters as published by the host's collector.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantMetrics {
    pub start_time: Option<DateTime<Utc>>,
    pub total_requests: u64,
    pub total_errors: u64,
    /// Route key -> stats, in insertion order.
    pub routes: Vec<(String, RouteStats)>,
}

impl TenantMetrics {
    pub fn started_at(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start_time),
            ..Self::default()
        }
    }

    /// Set the request/error totals. Errors are capped at the request count.
    pub fn with_totals(mut self, total_requests: u64, total_errors: u64) -> Self {
        self.total_requests = total_requests;
        self.total_errors = total_errors.min(total_requests);
        self
    }

    /// Insert or replace a route entry, keeping its original position.
    pub fn with_route(mut self, key: impl Into<String>, stats: RouteStats) -> Self {
        let key = key.into();
        match self.routes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = stats,
            None => self.routes.push((key, stats)),
        }
        self
    }

    pub fn route(&self, key: &str) -> Option<&RouteStats> {
        self.routes.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }
}

/// Tenant resolved by the host for the current request.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub domain: String,
    pub metrics: Option<Arc<TenantMetrics>>,
}

impl TenantContext {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<TenantMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.metrics.as_ref().and_then(|m| m.start_time)
    }

    pub fn total_requests(&self) -> u64 {
        self.metrics.as_ref().map_or(0, |m| m.total_requests)
    }

    pub fn total_errors(&self) -> u64 {
        self.metrics.as_ref().map_or(0, |m| m.total_errors)
    }
}
