//! The versioned persistence contract and its implementations.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use quizcast_protocol::Question;

use crate::CatalogError;

/// What a store hands back on load: the question list and the version
/// of the snapshot it came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub questions: Vec<Question>,
    pub version: u64,
}

/// Versioned snapshot persistence for the catalog.
///
/// `save` returns the new version. The contract is all-or-nothing: a
/// failed save must leave the previously persisted snapshot readable,
/// never a partial write.
pub trait CatalogStore: Send + 'static {
    /// Loads the persisted snapshot. A store with no prior snapshot
    /// returns an empty catalog rather than an error.
    fn load(&self) -> Result<CatalogSnapshot, CatalogError>;

    /// Persists the question list, bumping and returning the version.
    fn save(&self, questions: &[Question]) -> Result<u64, CatalogError>;
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Persists the catalog as a single pretty-printed JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the
/// target, so a crash mid-write never leaves a torn snapshot visible.
pub struct JsonFileStore {
    path: PathBuf,
    /// Version of the last snapshot read or written through this store.
    version: AtomicU64,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version: AtomicU64::new(0),
        }
    }
}

impl CatalogStore for JsonFileStore {
    fn load(&self) -> Result<CatalogSnapshot, CatalogError> {
        let snapshot = match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<CatalogSnapshot>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no catalog file, starting fresh");
                CatalogSnapshot {
                    questions: Vec::new(),
                    version: 1,
                }
            }
            Err(e) => return Err(e.into()),
        };
        self.version.store(snapshot.version, Ordering::Relaxed);
        Ok(snapshot)
    }

    fn save(&self, questions: &[Question]) -> Result<u64, CatalogError> {
        let version = self.version.load(Ordering::Relaxed) + 1;
        let snapshot = CatalogSnapshot {
            questions: questions.to_vec(),
            version,
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;

        self.version.store(version, Ordering::Relaxed);
        tracing::debug!(version, path = %self.path.display(), "catalog saved");
        Ok(version)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-process store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<CatalogSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with questions at version 1.
    pub fn seeded(questions: Vec<Question>) -> Self {
        Self {
            inner: Mutex::new(CatalogSnapshot {
                questions,
                version: 1,
            }),
        }
    }
}

impl CatalogStore for MemoryStore {
    fn load(&self) -> Result<CatalogSnapshot, CatalogError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if inner.version == 0 {
            inner.version = 1;
        }
        Ok(inner.clone())
    }

    fn save(&self, questions: &[Question]) -> Result<u64, CatalogError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.questions = questions.to_vec();
        inner.version += 1;
        Ok(inner.version)
    }
}
