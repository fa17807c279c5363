//! Domain layer containing business entities and store contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Store trait definitions and the typed [`repositories::StoreError`]
//! - [`day_series`] - Zero-filling of sparse per-day aggregates
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business rules are orchestrated in [`crate::application::services`].
//!
//! # Visit Flow
//!
//! 1. The redirect handler resolves the code through the resolver
//! 2. The click recorder appends a click and bumps the link counter in one transaction
//! 3. Analytics queries group the recorded clicks by their `day` column

pub mod day_series;
pub mod entities;
pub mod repositories;
