//! OS/process facade for the diagnostics endpoints.
//!
//! Degraded readings (no CPU descriptor, no external IPv4, unknown host name)
//! fall back to `"unknown"`. Only a facade that cannot report at all is an
//! error.

use std::net::{IpAddr, Ipv4Addr};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sysinfo::System;

use tenantmvc_core::error::{MvcError, Result};

pub const UNKNOWN: &str = "unknown";

/// Fresh reading of the host, built per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    pub hostname: String,
    pub platform: String,
    pub release: String,
    pub arch: String,
    pub total_mem: u64,
    pub used_mem: u64,
    pub mem_used_percent: String,
    pub cpu_model: String,
    pub cpu_cores: usize,
    pub ip: String,
    pub uptime_seconds: f64,
    pub timezone: String,
    pub current_time: String,
}

pub trait SystemProbe: Send + Sync {
    fn snapshot(&self) -> Result<SystemSnapshot>;

    /// IANA name of the host time zone.
    fn timezone(&self) -> String;
}

/// Probe backed by `sysinfo`, `if-addrs` and `iana-time-zone`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostProbe;

impl SystemProbe for HostProbe {
    fn snapshot(&self) -> Result<SystemSnapshot> {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu();

        let total_mem = sys.total_memory();
        if total_mem == 0 {
            return Err(MvcError::Probe("memory statistics unavailable".into()));
        }
        let used_mem = total_mem.saturating_sub(sys.available_memory());

        let cpus = sys.cpus();
        let cpu_model = cpus
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Ok(SystemSnapshot {
            hostname: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
            platform: std::env::consts::OS.to_string(),
            release: System::kernel_version().unwrap_or_else(|| UNKNOWN.to_string()),
            arch: std::env::consts::ARCH.to_string(),
            total_mem,
            used_mem,
            mem_used_percent: mem_used_percent(total_mem, used_mem),
            cpu_model,
            cpu_cores: cpus.len(),
            ip: local_ipv4(),
            uptime_seconds: System::uptime() as f64,
            timezone: self.timezone(),
            current_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    fn timezone(&self) -> String {
        iana_time_zone::get_timezone().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "time zone lookup failed, using UTC");
            "UTC".to_string()
        })
    }
}

/// Used share of memory, two decimals, clamped to [0, 100].
pub fn mem_used_percent(total: u64, used: u64) -> String {
    if total == 0 {
        return "0.00".to_string();
    }
    let pct = (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0);
    format!("{pct:.2}")
}

/// First non-loopback IPv4 address in interface order.
pub fn first_external_ipv4<I>(addrs: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = IpAddr>,
{
    addrs.into_iter().find_map(|ip| match ip {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
        _ => None,
    })
}

fn local_ipv4() -> String {
    match if_addrs::get_if_addrs() {
        Ok(ifaces) => first_external_ipv4(ifaces.iter().map(|i| i.ip()))
            .map_or_else(|| UNKNOWN.to_string(), |ip| ip.to_string()),
        Err(e) => {
            tracing::debug!(error = %e, "interface enumeration failed");
            UNKNOWN.to_string()
        }
    }
}
