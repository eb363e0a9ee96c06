//! Shared fixtures for server integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use tenantmvc_core::error::{MvcError, Result};
use tenantmvc_server::app_state::AppState;
use tenantmvc_server::config::{self, ServerConfig};
use tenantmvc_server::diagnostics::{SystemProbe, SystemSnapshot};

pub const TZ: &str = "Europe/Paris";

/// Template tree: views, partials/ and layouts/.
pub fn views_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("layouts")).unwrap();
    fs::create_dir_all(root.join("partials")).unwrap();

    let files = [
        ("layouts/main.hbs", "<html><body>{{> flash}}{{{body}}}</body></html>"),
        (
            "partials/flash.hbs",
            "{{#each success_msg}}<p class=\"success\">{{this}}</p>{{/each}}\
             {{#each error_msg}}<p class=\"error\">{{this}}</p>{{/each}}",
        ),
        (
            "system_health.hbs",
            "<dl><dt>Current</dt><dd>{{current_time}}</dd>\
             <dt>Started</dt><dd>{{#if start_time}}{{start_time}}{{else}}unset{{/if}}</dd>\
             <dt>Uptime</dt><dd>{{up_time}}</dd></dl>",
        ),
        (
            "system_info.hbs",
            "<table>{{#each items}}<tr><td>{{name}}</td><td>{{value}}</td></tr>{{/each}}</table>",
        ),
        ("home.hbs", "<h1>Home</h1>"),
        ("about.hbs", "<h1>About</h1>"),
        ("contact.hbs", "<h1>Contact</h1>"),
        ("support.hbs", "<h1>Support</h1>"),
    ];
    for (name, body) in files {
        fs::write(root.join(name), body).unwrap();
    }
    dir
}

pub fn config(environment: &str, views: &Path) -> ServerConfig {
    let root = views.display();
    let yaml = format!(
        r#"
version: 1
environment: {environment}
http:
  views_path: '{root}'
  views_layouts_path: '{root}/layouts'
  views_partials_path: '{root}/partials'
tenants:
  - domain: "acme.test"
  - domain: "globex.test"
"#
    );
    config::load_from_str(&yaml).unwrap()
}

pub struct FixedProbe;

impl SystemProbe for FixedProbe {
    fn snapshot(&self) -> Result<SystemSnapshot> {
        Ok(SystemSnapshot {
            hostname: "test-host".into(),
            platform: "linux".into(),
            release: "6.1.0".into(),
            arch: "x86_64".into(),
            total_mem: 8_000,
            used_mem: 2_000,
            mem_used_percent: "25.00".into(),
            cpu_model: "unknown".into(),
            cpu_cores: 4,
            ip: "10.0.0.7".into(),
            uptime_seconds: 3661.0,
            timezone: TZ.into(),
            current_time: "2026-10-19T10:00:00.000Z".into(),
        })
    }

    fn timezone(&self) -> String {
        TZ.into()
    }
}

pub struct FailingProbe;

impl SystemProbe for FailingProbe {
    fn snapshot(&self) -> Result<SystemSnapshot> {
        Err(MvcError::Probe("no facade".into()))
    }

    fn timezone(&self) -> String {
        TZ.into()
    }
}

pub fn state(environment: &str, views: &Path) -> AppState {
    AppState::with_probe(config(environment, views), Arc::new(FixedProbe)).unwrap()
}

pub fn get(uri: &str, host: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", host)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}
