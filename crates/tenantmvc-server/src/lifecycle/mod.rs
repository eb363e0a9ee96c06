//! Bootstrap lifecycle controller.
//!
//! A server supplies one implementation per stage through [`ServerStages`];
//! [`Lifecycle::run`] invokes them exactly once, in a fixed order:
//!
//! `session -> view engine -> mount routes -> 404 -> error handler`
//!
//! Any stage failure aborts startup. There is no partially built pipeline.

pub mod pipeline;

use axum::Router;

use tenantmvc_core::error::{MvcError, Result};

use crate::app_state::AppState;
use crate::session;

pub use pipeline::Pipeline;

/// Startup position of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Uninitialized,
    SessionReady,
    ViewEngineReady,
    RoutesMounted,
    ErrorHandlingReady,
    Running,
}

/// Named startup stage, used in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Session,
    ViewEngine,
    Routes,
    NotFound,
    ErrorHandler,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Session => "session",
            Stage::ViewEngine => "view_engine",
            Stage::Routes => "routes",
            Stage::NotFound => "not_found",
            Stage::ErrorHandler => "error_handler",
        }
    }

    /// State reached once this stage succeeds. The 404 stage has none of its own.
    fn reaches(self) -> Option<LifecycleState> {
        match self {
            Stage::Session => Some(LifecycleState::SessionReady),
            Stage::ViewEngine => Some(LifecycleState::ViewEngineReady),
            Stage::Routes => Some(LifecycleState::RoutesMounted),
            Stage::NotFound => None,
            Stage::ErrorHandler => Some(LifecycleState::ErrorHandlingReady),
        }
    }
}

/// Per-stage hooks of a concrete server.
///
/// Default methods are the base behavior: sessions only. Overrides that need
/// the base call the matching function (e.g. [`session::install_sessions`])
/// first and layer on top of it.
pub trait ServerStages: Send + Sync {
    fn init_session(&self, p: &mut Pipeline) -> Result<()> {
        session::install_sessions(p)
    }

    fn init_view_engine(&self, _p: &mut Pipeline) -> Result<()> {
        Ok(())
    }

    fn init_404_error(&self, _p: &mut Pipeline) -> Result<()> {
        Ok(())
    }

    fn init_error_handler(&self, _p: &mut Pipeline) -> Result<()> {
        Ok(())
    }
}

/// Fixed driver over a server's stages.
pub struct Lifecycle<S> {
    server: S,
    state: LifecycleState,
    started: bool,
    mounts: Vec<(String, Router<AppState>)>,
}

impl<S: ServerStages> Lifecycle<S> {
    pub fn new(server: S) -> Self {
        Self {
            server,
            state: LifecycleState::Uninitialized,
            started: false,
            mounts: Vec::new(),
        }
    }

    /// Register a primary router; mounted after the view engine stage.
    pub fn mount(mut self, path: impl Into<String>, router: Router<AppState>) -> Self {
        self.mounts.push((path.into(), router));
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Run every stage once and return the finished router.
    ///
    /// A second call fails, including after a failed first run.
    pub fn run(&mut self, app: AppState) -> Result<Router> {
        if self.started {
            return Err(MvcError::LifecycleReentered);
        }
        self.started = true;

        let mut p = Pipeline::new(app);

        self.step(Stage::Session, &mut p, |s, p| s.init_session(p))?;
        self.step(Stage::ViewEngine, &mut p, |s, p| s.init_view_engine(p))?;

        let mounts = std::mem::take(&mut self.mounts);
        self.step(Stage::Routes, &mut p, move |_, p| {
            for (path, router) in mounts {
                tracing::debug!(%path, "mount routes");
                p.mount(&path, router);
            }
            Ok(())
        })?;

        self.step(Stage::NotFound, &mut p, |s, p| s.init_404_error(p))?;
        self.step(Stage::ErrorHandler, &mut p, |s, p| s.init_error_handler(p))?;

        tracing::info!(middleware = ?p.middleware_names(), "pipeline ready");
        self.state = LifecycleState::Running;
        Ok(p.into_router())
    }

    fn step<F>(&mut self, stage: Stage, p: &mut Pipeline, f: F) -> Result<()>
    where
        F: FnOnce(&S, &mut Pipeline) -> Result<()>,
    {
        tracing::debug!(stage = stage.as_str(), "lifecycle stage start");
        if let Err(e) = f(&self.server, p) {
            tracing::error!(stage = stage.as_str(), error = %e, "lifecycle stage failed");
            return Err(MvcError::stage(stage.as_str(), e));
        }
        if let Some(next) = stage.reaches() {
            self.state = next;
        }
        Ok(())
    }
}
