//! Concrete MVC server stages: flash over sessions, handlebars views,
//! placeholder 404 and the centralized error handler.

use axum::middleware;

use tenantmvc_core::error::Result;

use crate::config::{Environment, HttpSection, ServerConfig};
use crate::errors::{self, ErrorPolicy};
use crate::lifecycle::{Pipeline, ServerStages};
use crate::session::{self, flash};
use crate::views::ViewEngine;

/// Tenant-aware MVC server.
///
/// The environment is fixed at construction and drives view caching and
/// error verbosity.
#[derive(Debug, Clone)]
pub struct MvcServer {
    environment: Environment,
    http: HttpSection,
}

impl MvcServer {
    pub fn new(environment: Environment, http: HttpSection) -> Self {
        Self { environment, http }
    }

    pub fn from_config(cfg: &ServerConfig) -> Self {
        Self::new(cfg.environment, cfg.http.clone())
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }
}

impl ServerStages for MvcServer {
    fn init_session(&self, p: &mut Pipeline) -> Result<()> {
        session::install_sessions(p)?;
        p.use_middleware("flash", |router| {
            router.layer(middleware::from_fn(flash::expose_flash))
        });
        Ok(())
    }

    fn init_view_engine(&self, p: &mut Pipeline) -> Result<()> {
        let views = ViewEngine::from_config(&self.http, self.environment.is_production())?;
        tracing::info!(
            views = %self.http.views_path,
            layout = %self.http.views_default_layout,
            cache = views.caching(),
            "view engine registered"
        );
        p.set_views(views);
        Ok(())
    }

    fn init_404_error(&self, p: &mut Pipeline) -> Result<()> {
        p.set_not_found(|router| router.fallback(errors::not_found));
        Ok(())
    }

    fn init_error_handler(&self, p: &mut Pipeline) -> Result<()> {
        let policy = ErrorPolicy {
            development: self.environment.is_development(),
        };
        p.set_error_handler(move |router| {
            router.layer(middleware::from_fn_with_state(policy, errors::handle_errors))
        });
        Ok(())
    }
}
