//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Code allocation, lookup, listing, deletion
//! - [`services::click_service::ClickService`] - Transactional click recording
//! - [`services::analytics_service::AnalyticsService`] - Zero-filled per-day histograms
//! - [`services::resolver::Resolver`] - Cached code resolution for the redirect path

pub mod services;
