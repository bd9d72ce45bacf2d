//! The question catalog for Quizcast.
//!
//! Holds the full question list plus an `active` flag per question and
//! exposes the filtered, order-preserving subset that rounds are built
//! from. Edits are validated, applied in memory, and persisted through
//! a [`CatalogStore`] before the caller is acknowledged; gameplay only
//! ever reads.
//!
//! # Key types
//!
//! - [`Catalog`]: the in-memory catalog and its edit operations
//! - [`CatalogStore`]: the versioned persistence contract
//!   (`load() → snapshot`, `save(questions) → version`)
//! - [`JsonFileStore`]: snapshot persistence as a single JSON file
//! - [`MemoryStore`]: in-process store for tests

mod catalog;
mod error;
mod store;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use store::{CatalogSnapshot, CatalogStore, JsonFileStore, MemoryStore};
