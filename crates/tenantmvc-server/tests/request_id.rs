//! Request ids and the per-request logger attached by the host stack.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use axum::{http::StatusCode, middleware, routing::get, Extension, Router};

use tenantmvc_server::obs::{attach_request_log, RequestLog};
use tenantmvc_server::router::{build_router, REQUEST_ID_HEADER};

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let dir = common::views_dir();
    let app = build_router(common::state("development", dir.path())).unwrap();

    let mut seen = Vec::new();
    for path in ["/api/system/routes", "/missing"] {
        let (_, headers, _) = common::send(&app, common::get(path, "acme.test")).await;
        let id = headers[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        assert_eq!(id.len(), 36, "{path}: {id}");
        seen.push(id);
    }
    assert_ne!(seen[0], seen[1]);
}

#[tokio::test]
async fn caller_request_id_is_propagated() {
    let dir = common::views_dir();
    let app = build_router(common::state("development", dir.path())).unwrap();

    let mut req = common::get("/api/system/health", "acme.test");
    req.headers_mut()
        .insert(REQUEST_ID_HEADER, "edge-42".parse().unwrap());
    let (status, headers, _) = common::send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[REQUEST_ID_HEADER], "edge-42");
}

#[tokio::test]
async fn logger_is_attached_without_id_layer() {
    async fn has_log(log: Option<Extension<RequestLog>>) -> &'static str {
        if log.is_some() {
            "attached"
        } else {
            "missing"
        }
    }

    let app = Router::new()
        .route("/", get(has_log))
        .layer(middleware::from_fn(attach_request_log));

    let (status, _, body) = common::send(&app, common::get("/", "acme.test")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "attached");
}
