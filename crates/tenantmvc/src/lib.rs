//! Top-level facade crate for tenantmvc.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use tenantmvc_core::*;
}

pub mod server {
    pub use tenantmvc_server::*;
}
