//! Durable project record storage.
//!
//! The pipeline depends only on the [`ProjectStore`] trait. The JSON file
//! implementation keeps one document per project id and survives process
//! restarts; the in-memory implementation backs tests.

pub mod error;
pub mod json_store;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use json_store::JsonProjectStore;
pub use memory::MemoryProjectStore;
pub use store::ProjectStore;
