//! Service internals.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env runtime configuration.
//! - [`error`] - unified service error type.
//! - [`service`] - HTTP routing, validation, and request handling.
//! - [`source`] - the upstream random-integer source.
//! - [`streaming`] - the fan-out/aggregation pipeline.
//! - [`telemetry`] - tracing subscriber setup.

pub mod config;
pub mod error;
pub mod service;
pub mod source;
pub mod streaming;
pub mod telemetry;
