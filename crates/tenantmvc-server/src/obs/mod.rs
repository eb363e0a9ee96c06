//! Request-scoped logging.
//!
//! The host may attach a [`RequestLog`] to each request. Consumers such as the
//! error handler use it when present and skip logging when it is not.

pub mod request_log;

pub use request_log::{attach_request_log, RequestLog, RequestLogger, TracingRequestLogger};
