//! Data shapes of the diagnostics responses.

use chrono::{DateTime, Offset, TimeZone, Utc};
use serde::Serialize;

use tenantmvc_core::format::{format_uptime, route_summaries, RouteSummary};
use tenantmvc_core::TenantContext;

use super::probe::SystemSnapshot;

/// Local time in the shape of `Date.prototype.toString`:
/// `Mon Oct 19 2026 10:00:00 GMT+0200 (Europe/Paris)`.
///
/// The parenthesized part is the IANA zone id, not the long zone name
/// ("Central European Summer Time") a browser would print.
pub fn local_string<Tz>(now: &DateTime<Tz>, timezone: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{} ({timezone})", now.format("%a %b %d %Y %H:%M:%S GMT%z"))
}

/// View data of the health page.
#[derive(Debug, Clone, Serialize)]
pub struct HealthView {
    pub current_time: String,
    pub start_time: Option<DateTime<Utc>>,
    pub up_time: String,
}

impl HealthView {
    pub fn new(current_time: String, tenant: &TenantContext, process_uptime_secs: f64) -> Self {
        Self {
            current_time,
            start_time: tenant.start_time(),
            up_time: format_uptime(process_uptime_secs),
        }
    }
}

/// System snapshot merged with the tenant's identity and counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoRecord {
    #[serde(flatten)]
    pub system: SystemSnapshot,
    pub tenant: String,
    pub started: Option<DateTime<Utc>>,
    pub total_requests: u64,
    pub total_errors: u64,
}

impl InfoRecord {
    pub fn new(system: SystemSnapshot, tenant: &TenantContext) -> Self {
        Self {
            system,
            tenant: tenant.domain.clone(),
            started: tenant.start_time(),
            total_requests: tenant.total_requests(),
            total_errors: tenant.total_errors(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampPayload {
    pub ok: bool,
    pub iso: String,
    pub utc: String,
    pub local: String,
    pub timestamp: i64,
    pub timezone: String,
    /// Minutes behind UTC (positive west of Greenwich).
    pub offset_minutes: i32,
}

impl TimestampPayload {
    /// Every field describes the same instant `now`.
    pub fn at<Tz>(now: DateTime<Tz>, timezone: String) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let utc = now.with_timezone(&Utc);
        let offset_minutes = -(now.offset().fix().local_minus_utc() / 60);
        Self {
            ok: true,
            iso: utc.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            utc: utc.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            local: local_string(&now, &timezone),
            timestamp: utc.timestamp_millis(),
            timezone,
            offset_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesPayload {
    pub ok: bool,
    pub tenant: String,
    pub total_requests: u64,
    pub total_errors: u64,
    pub timezone: String,
    pub routes: Vec<RouteSummary>,
}

impl RoutesPayload {
    pub fn new(tenant: &TenantContext, timezone: String) -> Self {
        Self {
            ok: true,
            tenant: tenant.domain.clone(),
            total_requests: tenant.total_requests(),
            total_errors: tenant.total_errors(),
            timezone,
            routes: route_summaries(tenant.metrics.as_deref()),
        }
    }
}
