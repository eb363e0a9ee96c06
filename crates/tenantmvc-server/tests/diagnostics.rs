//! Diagnostics endpoint tests (routes, timestamp, health, info).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde_json::{json, Value};

use tenantmvc_core::{RouteStats, TenantContext, TenantMetrics};
use tenantmvc_server::app_state::AppState;
use tenantmvc_server::diagnostics::probe::{first_external_ipv4, mem_used_percent};
use tenantmvc_server::diagnostics::TimestampPayload;
use tenantmvc_server::router::build_router;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap()
}

fn acme_metrics() -> TenantMetrics {
    TenantMetrics::started_at(start())
        .with_totals(12, 2)
        .with_route("GET /api/system/routes", RouteStats::new(3, 10.0))
        .with_route("GET /", RouteStats::new(0, 0.0))
        .with_route("GET /about", RouteStats::new(8, 12.5))
}

fn published(state: &AppState) {
    state.tenants().publish("acme.test", acme_metrics()).unwrap();
}

#[tokio::test]
async fn routes_report_tenant_metrics_in_insertion_order() {
    let dir = common::views_dir();
    let state = common::state("development", dir.path());
    published(&state);
    let app = build_router(state).unwrap();

    let (status, headers, body) =
        common::send(&app, common::get("/api/system/routes", "acme.test:3000")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"].to_str().unwrap().starts_with("application/json"));

    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        v,
        json!({
            "ok": true,
            "tenant": "acme.test",
            "totalRequests": 12,
            "totalErrors": 2,
            "timezone": common::TZ,
            "routes": [
                {"route": "GET /api/system/routes", "calls": 3, "avgResponseMs": 3.33},
                {"route": "GET /", "calls": 0, "avgResponseMs": 0.0},
                {"route": "GET /about", "calls": 8, "avgResponseMs": 1.56},
            ]
        })
    );
}

#[tokio::test]
async fn routes_without_metrics_degrade_to_defaults() {
    let dir = common::views_dir();
    let state = common::state("production", dir.path());
    published(&state);
    let app = build_router(state).unwrap();

    let (status, _, body) = common::send(&app, common::get("/api/system/routes", "globex.test")).await;
    assert_eq!(status, StatusCode::OK);

    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["tenant"], "globex.test");
    assert_eq!(v["totalRequests"], 0);
    assert_eq!(v["totalErrors"], 0);
    assert_eq!(v["routes"], json!([]));
}

#[tokio::test]
async fn unknown_host_falls_back_to_first_tenant() {
    let dir = common::views_dir();
    let app = build_router(common::state("development", dir.path())).unwrap();

    let (_, _, body) = common::send(&app, common::get("/api/system/readiness", "elsewhere.test")).await;
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v, json!({"ok": true, "status": "ready", "tenant": "acme.test"}));
}

#[tokio::test]
async fn timestamp_fields_describe_one_instant() {
    let dir = common::views_dir();
    let app = build_router(common::state("development", dir.path())).unwrap();

    let (status, _, body) = common::send(&app, common::get("/api/system/timestamp", "acme.test")).await;
    assert_eq!(status, StatusCode::OK);

    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["ok"], true);
    assert_eq!(v["timezone"], common::TZ);

    let ts = v["timestamp"].as_i64().unwrap();
    let iso = DateTime::parse_from_rfc3339(v["iso"].as_str().unwrap()).unwrap();
    assert_eq!(iso.timestamp_millis(), ts);

    let utc = DateTime::parse_from_rfc2822(v["utc"].as_str().unwrap()).unwrap();
    assert_eq!(utc.timestamp(), ts.div_euclid(1000));

    assert!(v["offsetMinutes"].is_i64());
    assert!(v["local"].as_str().unwrap().contains("GMT"));
}

#[test]
fn timestamp_offset_is_minutes_behind_utc() {
    let east = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = east.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    let p = TimestampPayload::at(now, "Europe/Paris".into());

    assert_eq!(p.offset_minutes, -120);
    assert_eq!(p.iso, "2026-10-19T10:00:00.000Z");
    assert_eq!(p.utc, "Mon, 19 Oct 2026 10:00:00 GMT");
    assert_eq!(p.local, "Mon Oct 19 2026 12:00:00 GMT+0200 (Europe/Paris)");
    assert_eq!(p.timestamp, now.timestamp_millis());

    let west = FixedOffset::west_opt(5 * 3600).unwrap();
    let p = TimestampPayload::at(now.with_timezone(&west), "America/New_York".into());
    assert_eq!(p.offset_minutes, 300);
    assert_eq!(p.iso, "2026-10-19T10:00:00.000Z");
}

#[tokio::test]
async fn health_shows_start_time_or_unset() {
    let dir = common::views_dir();
    let state = common::state("development", dir.path());
    published(&state);
    let app = build_router(state).unwrap();

    let (status, headers, body) = common::send(&app, common::get("/api/system/health", "acme.test")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"].to_str().unwrap().starts_with("text/html"));
    assert!(body.starts_with("<html><body>"));
    assert!(body.contains("2026-10-01T08:30:00Z"));
    assert!(body.contains("<dt>Uptime</dt><dd>0s"));

    let (_, _, body) = common::send(&app, common::get("/api/system/health", "globex.test")).await;
    assert!(body.contains("<dt>Started</dt><dd>unset</dd>"));
}

#[tokio::test]
async fn info_lists_system_then_tenant_fields() {
    let dir = common::views_dir();
    let state = common::state("development", dir.path());
    published(&state);
    let app = build_router(state).unwrap();

    let (status, _, body) = common::send(&app, common::get("/api/system/info", "acme.test")).await;
    assert_eq!(status, StatusCode::OK);

    let order = [
        "hostname", "platform", "release", "arch", "totalMem", "usedMem", "memUsedPercent",
        "cpuModel", "cpuCores", "ip", "uptimeSeconds", "timezone", "currentTime", "tenant",
        "started", "totalRequests", "totalErrors",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|name| body.find(&format!("<td>{name}</td>")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{body}");

    assert!(body.contains("<td>hostname</td><td>test-host</td>"));
    assert!(body.contains("<td>tenant</td><td>acme.test</td>"));
    assert!(body.contains("<td>totalRequests</td><td>12</td>"));
}

#[tokio::test]
async fn info_probe_failure_reaches_error_handler() {
    let dir = common::views_dir();
    for (env, expected) in [
        ("development", "system probe unavailable: no facade"),
        ("production", "Server Error"),
    ] {
        let state = AppState::with_probe(
            common::config(env, dir.path()),
            Arc::new(common::FailingProbe),
        )
        .unwrap();
        let app = build_router(state).unwrap();

        let (status, _, body) = common::send(&app, common::get("/api/system/info", "acme.test")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{env}");
        assert_eq!(body, expected);
    }
}

#[test]
fn degraded_readings_use_fallbacks() {
    assert_eq!(mem_used_percent(0, 0), "0.00");
    assert_eq!(mem_used_percent(3, 1), "33.33");
    assert_eq!(mem_used_percent(4, 9), "100.00");

    let addrs = [
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(Ipv6Addr::LOCALHOST),
        IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)),
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
    ];
    assert_eq!(first_external_ipv4(addrs), Some(Ipv4Addr::new(192, 168, 1, 20)));
    assert_eq!(first_external_ipv4([IpAddr::V4(Ipv4Addr::LOCALHOST)]), None);
}

#[test]
fn tenant_context_reads_published_snapshot() {
    let dir = common::views_dir();
    let state = common::state("development", dir.path());
    published(&state);

    let t: TenantContext = state.tenants().resolve(Some("ACME.test")).unwrap();
    assert_eq!(t.total_requests(), 12);

    assert!(state.tenants().publish("initech.test", TenantMetrics::default()).is_err());
}
