//! tenantmvc server library entry.
//!
//! Wires the bootstrap lifecycle, session/flash support, the handlebars view
//! engine, the error handlers, and the diagnostics and navigation routers into
//! an axum application. Consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod errors;
pub mod lifecycle;
pub mod navbar;
pub mod obs;
pub mod router;
pub mod server;
pub mod session;
pub mod views;
