//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without persistence concerns.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to a target URL, with denormalized click counters
//! - [`Click`] - A single recorded visit
//! - [`DayCount`] - One bucket of a day-level click histogram
//!
//! Creation inputs live next to their entity (`NewLink`, `NewClick`).

pub mod click;
pub mod day_count;
pub mod link;

pub use click::{Click, ClientInfo, NewClick};
pub use day_count::{DayCount, LinkDayCount};
pub use link::{Link, LinkQuery, NewLink, ResolvedLink};
