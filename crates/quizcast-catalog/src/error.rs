//! Error types for the catalog layer.

/// Errors that can occur while editing or persisting the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A malformed question draft: wrong option count, out-of-range
    /// correct index, or empty text. The catalog is left untouched.
    #[error("invalid question: {0}")]
    Validation(String),

    /// The backing store failed to read or write.
    #[error("catalog store error: {0}")]
    Store(#[from] std::io::Error),

    /// The persisted snapshot could not be parsed.
    #[error("corrupt catalog snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),
}
