//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - Target URL validation and normalization
//! - [`client_ip`] - Client address extraction from the peer or proxy headers

pub mod client_ip;
pub mod code_generator;
pub mod url_normalizer;
