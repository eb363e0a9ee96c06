//! Pure formatting helpers for the diagnostics views and payloads.

use serde::Serialize;
use serde_json::Value;

use crate::error::{MvcError, Result};
use crate::tenant::TenantMetrics;

/// Returned by the uptime formatters for input that is not a usable duration.
pub const INVALID_INPUT: &str = "Invalid input";

/// Render a duration in seconds as `"1h 2m 3s"`.
///
/// Hours appear only when non-zero; minutes when non-zero or when hours are
/// shown; seconds always. Below 10 seconds a non-zero millisecond part is
/// appended (`"5s 250ms"`). NaN, infinite and negative input yields
/// [`INVALID_INPUT`].
pub fn format_uptime(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return INVALID_INPUT.to_string();
    }

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let millis = ((seconds % 1.0) * 1000.0).round() as u64;

    let mut parts = Vec::with_capacity(4);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || hours > 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{secs}s"));
    if seconds < 10.0 && millis > 0 {
        parts.push(format!("{millis}ms"));
    }

    parts.join(" ")
}

/// [`format_uptime`] for loosely typed input; anything but a JSON number is invalid.
pub fn format_uptime_value(value: &Value) -> String {
    match value.as_f64() {
        Some(seconds) => format_uptime(seconds),
        None => INVALID_INPUT.to_string(),
    }
}

/// Round to two decimal places the way `toFixed(2)` does.
///
/// Rounding works on the exact decimal value of `v`, so `0.075` (stored as
/// `0.07499...`) becomes `0.07`. Exact halfway values round away from zero.
pub fn round2(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    // A double lies exactly halfway between two cents only when it is an odd
    // multiple of 1/8; scaling by 8 is exact.
    let eighths = v * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return (v * 100.0).round() / 100.0;
    }
    // `{:.2}` rounds the exact decimal expansion.
    format!("{v:.2}").parse().unwrap_or(v)
}

/// One entry of a generic key/value listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameValue<V = Value> {
    pub name: String,
    pub value: V,
}

/// Turn any mapping into name/value pairs, preserving iteration order.
pub fn name_value_pairs<K, V, I>(entries: I) -> Vec<NameValue<V>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
{
    entries
        .into_iter()
        .map(|(name, value)| NameValue {
            name: name.into(),
            value,
        })
        .collect()
}

/// Serialize a record and list its fields in declaration order.
pub fn record_pairs<T: Serialize>(record: &T) -> Result<Vec<NameValue>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(name_value_pairs(map)),
        Ok(other) => Err(MvcError::Internal(format!(
            "expected a record, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(MvcError::Internal(format!("serialize record failed: {e}"))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Per-route line of the routes payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub route: String,
    pub calls: u64,
    pub avg_response_ms: f64,
}

/// Summaries in the source's insertion order; absent metrics give an empty list.
pub fn route_summaries(metrics: Option<&TenantMetrics>) -> Vec<RouteSummary> {
    let Some(metrics) = metrics else {
        return Vec::new();
    };

    metrics
        .routes
        .iter()
        .map(|(key, stats)| RouteSummary {
            route: key.clone(),
            calls: stats.count,
            avg_response_ms: if stats.count > 0 {
                round2(stats.avg_ms())
            } else {
                0.0
            },
        })
        .collect()
}
