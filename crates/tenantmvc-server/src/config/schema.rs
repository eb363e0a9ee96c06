use std::collections::HashSet;
use std::net::SocketAddr;

use serde::Deserialize;
use tenantmvc_core::error::{MvcError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub http: HttpSection,

    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub tenants: Vec<TenantConfig>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MvcError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if self.tenants.is_empty() {
            return Err(MvcError::Config("tenants must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for t in &self.tenants {
            if t.domain.trim().is_empty() {
                return Err(MvcError::Config("tenant domain must not be empty".into()));
            }
            if !seen.insert(t.domain.to_ascii_lowercase()) {
                return Err(MvcError::Config(format!(
                    "duplicate tenant domain: {}",
                    t.domain
                )));
            }
        }

        self.http.validate()?;
        self.session.validate()?;

        Ok(())
    }
}

/// Deployment environment; drives error verbosity and view caching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Mount point of the diagnostics router.
    #[serde(default = "default_system_prefix")]
    pub system_prefix: String,

    #[serde(default = "default_layout")]
    pub views_default_layout: String,

    #[serde(default = "default_layouts_path")]
    pub views_layouts_path: String,

    #[serde(default = "default_partials_path")]
    pub views_partials_path: String,

    #[serde(default = "default_views_path")]
    pub views_path: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            system_prefix: default_system_prefix(),
            views_default_layout: default_layout(),
            views_layouts_path: default_layouts_path(),
            views_partials_path: default_partials_path(),
            views_path: default_views_path(),
        }
    }
}

impl HttpSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if !self.system_prefix.starts_with('/') || self.system_prefix.len() < 2 {
            return Err(MvcError::Config(
                "http.system_prefix must start with '/' and not be the root".into(),
            ));
        }

        for (key, v) in [
            ("views_default_layout", &self.views_default_layout),
            ("views_layouts_path", &self.views_layouts_path),
            ("views_partials_path", &self.views_partials_path),
            ("views_path", &self.views_path),
        ] {
            if v.trim().is_empty() {
                return Err(MvcError::Config(format!("http.{key} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| MvcError::Config(format!("http.listen must be a valid SocketAddr: {e}")))
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_system_prefix() -> String {
    "/api/system".into()
}
fn default_layout() -> String {
    "main".into()
}
fn default_layouts_path() -> String {
    "views/layouts".into()
}
fn default_partials_path() -> String {
    "views/partials".into()
}
fn default_views_path() -> String {
    "views".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
        }
    }
}

impl SessionSection {
    pub fn validate(&self) -> Result<()> {
        let ok = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !ok {
            return Err(MvcError::Config(
                "session.cookie_name must be non-empty [A-Za-z0-9._-]".into(),
            ));
        }
        Ok(())
    }
}

fn default_cookie_name() -> String {
    "tenantmvc.sid".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    pub domain: String,
}
