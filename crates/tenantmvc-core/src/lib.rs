//! tenantmvc core: transport-agnostic tenant data model, error types, and the
//! formatting helpers used by the diagnostics surface.
//!
//! This crate carries no HTTP or runtime dependencies so the same types can be
//! shared by the server, a metrics collector, and tests.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here. Missing or partial
//! data degrades to documented defaults instead of failing.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod format;
pub mod tenant;

/// Shared result type.
pub use error::{MvcError, Result};
pub use tenant::{RouteStats, TenantContext, TenantMetrics};
