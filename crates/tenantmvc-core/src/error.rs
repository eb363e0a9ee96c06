//! Shared error type across tenantmvc crates.

use std::error::Error as StdError;

use thiserror::Error;

/// Generic message shown to clients outside development.
pub const GENERIC_MESSAGE: &str = "Server Error";

/// Shared result type.
pub type Result<T> = std::result::Result<T, MvcError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum MvcError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("lifecycle stage `{stage}` failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<MvcError>,
    },
    #[error("lifecycle already started")]
    LifecycleReentered,
    #[error("view: {0}")]
    View(String),
    #[error("system probe unavailable: {0}")]
    Probe(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl MvcError {
    /// Error carrying an explicit HTTP status.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        MvcError::Status {
            status,
            message: message.into(),
        }
    }

    /// Wrap a failure raised while running a lifecycle stage.
    pub fn stage(stage: &'static str, source: MvcError) -> Self {
        MvcError::Stage {
            stage,
            source: Box::new(source),
        }
    }

    /// HTTP status the error declares; 500 unless one was given.
    pub fn status(&self) -> u16 {
        match self {
            MvcError::Status { status, .. } => *status,
            _ => 500,
        }
    }

    /// Message plus the `source()` chain, one cause per line.
    ///
    /// Falls back to the bare message when there is no chain.
    pub fn trace(&self) -> String {
        let mut out = self.to_string();
        let mut cause = self.source();
        while let Some(c) = cause {
            out.push_str("\n  caused by: ");
            out.push_str(&c.to_string());
            cause = c.source();
        }
        out
    }

    /// Message to surface to clients for the given verbosity.
    pub fn public_message(&self, development: bool) -> String {
        if development {
            self.to_string()
        } else {
            GENERIC_MESSAGE.to_string()
        }
    }
}
