//! YAML config for the MVC server.
//!
//! One file sets the environment (which picks error verbosity and view
//! caching), the listen address and diagnostics prefix, the view/layout/partial
//! directories, the session cookie name, and the tenant domains. Unknown keys
//! are rejected, and `validate` runs before a config is handed out.

pub mod schema;

use std::fs;

use tenantmvc_core::error::{MvcError, Result};

pub use schema::{Environment, HttpSection, ServerConfig, SessionSection, TenantConfig};

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MvcError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig =
        serde_yaml::from_str(s).map_err(|e| MvcError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
