//! Ordered request pipeline assembled by the lifecycle stages.

use std::sync::Arc;

use axum::{Extension, Router};

use crate::app_state::AppState;
use crate::views::ViewEngine;

type Apply = Box<dyn FnOnce(Router<AppState>) -> Router<AppState> + Send>;

/// Middleware, routes and handlers in the order requests traverse them.
///
/// Entries added first run first. [`into_router`](Pipeline::into_router)
/// applies them in reverse because each axum layer wraps the ones before it.
pub struct Pipeline {
    state: AppState,
    entries: Vec<(&'static str, Apply)>,
    mounts: Vec<(String, Router<AppState>)>,
    views: Option<Arc<ViewEngine>>,
    not_found: Option<Apply>,
    error_handler: Option<Apply>,
}

impl Pipeline {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            entries: Vec::new(),
            mounts: Vec::new(),
            views: None,
            not_found: None,
            error_handler: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Append a middleware entry.
    pub fn use_middleware<F>(&mut self, name: &'static str, apply: F)
    where
        F: FnOnce(Router<AppState>) -> Router<AppState> + Send + 'static,
    {
        tracing::debug!(middleware = name, position = self.entries.len(), "pipeline entry added");
        self.entries.push((name, Box::new(apply)));
    }

    /// Names of the middleware entries in request order.
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    /// Mount a router under `path` (`/` merges at the root).
    pub fn mount(&mut self, path: &str, router: Router<AppState>) {
        self.mounts.push((path.to_string(), router));
    }

    pub fn set_views(&mut self, views: ViewEngine) {
        self.views = Some(Arc::new(views));
    }

    pub fn views(&self) -> Option<&ViewEngine> {
        self.views.as_deref()
    }

    /// Install the handler for requests no mounted route matches.
    pub fn set_not_found<F>(&mut self, apply: F)
    where
        F: FnOnce(Router<AppState>) -> Router<AppState> + Send + 'static,
    {
        self.not_found = Some(Box::new(apply));
    }

    pub fn has_not_found(&self) -> bool {
        self.not_found.is_some()
    }

    /// Install the error handler; it wraps every other entry.
    pub fn set_error_handler<F>(&mut self, apply: F)
    where
        F: FnOnce(Router<AppState>) -> Router<AppState> + Send + 'static,
    {
        self.error_handler = Some(Box::new(apply));
    }

    pub fn has_error_handler(&self) -> bool {
        self.error_handler.is_some()
    }

    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        for (path, r) in self.mounts {
            router = if path == "/" {
                router.merge(r)
            } else {
                router.nest(&path, r)
            };
        }
        if let Some(apply) = self.not_found {
            router = apply(router);
        }
        if let Some(views) = self.views {
            router = router.layer(Extension(views));
        }
        for (_, apply) in self.entries.into_iter().rev() {
            router = apply(router);
        }
        if let Some(apply) = self.error_handler {
            router = apply(router);
        }
        router.with_state(self.state)
    }
}
