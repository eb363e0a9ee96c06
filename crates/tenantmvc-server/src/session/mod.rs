//! Cookie-identified in-memory sessions and flash messages.
//!
//! `install_sessions` is the base session layer. Flash support
//! ([`flash::expose_flash`]) only works on top of it.

pub mod flash;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    middleware::{self, Next},
    response::Response,
};
use dashmap::DashMap;
use uuid::Uuid;

use tenantmvc_core::error::{MvcError, Result};

use crate::app_state::AppState;
use crate::errors::AppError;
use crate::lifecycle::Pipeline;

pub use flash::ViewLocals;

#[derive(Debug, Default)]
struct SessionData {
    flash: HashMap<String, Vec<String>>,
}

/// Shared session storage.
///
/// Only sessions holding pending flash messages are stored. An entry is
/// created by the first [`Session::flash`] and dropped once its queue drains.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<Uuid, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.inner.contains_key(&id)
    }

    /// Open the stored session for `id`, or hand out a fresh unstored id
    /// when `id` is missing or unknown.
    pub fn open(&self, id: Option<Uuid>) -> Session {
        let id = id
            .filter(|id| self.inner.contains_key(id))
            .unwrap_or_else(Uuid::new_v4);
        self.handle(id)
    }

    fn handle(&self, id: Uuid) -> Session {
        Session {
            id,
            store: self.clone(),
        }
    }
}

/// Handle to the current request's session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    store: SessionStore,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queue a flash message for the next rendered view.
    pub fn flash(&self, kind: &str, msg: impl Into<String>) {
        self.store
            .inner
            .entry(self.id)
            .or_default()
            .flash
            .entry(kind.to_string())
            .or_default()
            .push(msg.into());
    }

    /// Drain pending flash messages of one kind.
    pub fn take_flash(&self, kind: &str) -> Vec<String> {
        let taken = self
            .store
            .inner
            .get_mut(&self.id)
            .and_then(|mut data| data.flash.remove(kind))
            .unwrap_or_default();
        // shard guard is released above
        self.store
            .inner
            .remove_if(&self.id, |_, data| data.flash.is_empty());
        taken
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError(MvcError::Internal("session layer not installed".into())))
    }
}

/// Install the base session layer into the pipeline.
pub fn install_sessions(p: &mut Pipeline) -> Result<()> {
    let state = p.state().clone();
    p.use_middleware("session", move |router| {
        router.layer(middleware::from_fn_with_state(state, session_layer))
    });
    Ok(())
}

async fn session_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let cookie_name = state.cfg().session.cookie_name.as_str();
    let presented = session_cookie(req.headers(), cookie_name);
    let session = state.sessions().open(presented);
    let id = session.id();
    let known = presented == Some(id);
    req.extensions_mut().insert(session);

    let mut res = next.run(req).await;
    if !known && state.sessions().contains(id) {
        let cookie = format!("{cookie_name}={id}; Path=/; HttpOnly; SameSite=Lax");
        match HeaderValue::from_str(&cookie) {
            Ok(v) => {
                res.headers_mut().append(SET_COOKIE, v);
            }
            Err(e) => tracing::warn!(error = %e, "session cookie not set"),
        }
    }
    res
}

fn session_cookie(headers: &HeaderMap, name: &str) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| Uuid::parse_str(v.trim()).ok())
}
