//! Tenant context types shared across layers.
//!
//! The host resolves a `TenantContext` per request and stores it in the
//! request extensions; handlers read it through the [`Tenant`] extractor.

pub mod tenant;

pub use tenant::{resolve_tenant, Tenant, TenantRegistry};
