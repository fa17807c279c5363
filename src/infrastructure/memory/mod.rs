//! In-process store implementations.
//!
//! [`MemoryStore`] implements every repository trait on top of a single
//! mutex-guarded state. It backs `STORAGE_BACKEND=memory` and the handler
//! integration tests.

pub mod memory_store;

pub use memory_store::MemoryStore;
