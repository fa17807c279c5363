//! HTTP middleware for request processing.
//!
//! Provides request tracing for observability.

pub mod tracing;
