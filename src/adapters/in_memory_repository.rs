//! In-memory Q-table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of QTableRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedQTable};

/// In-memory repository for testing.
///
/// Stores encoded tables in a shared HashMap keyed by path. All clones share
/// the same underlying storage, so a test can hand one clone to an engine and
/// inspect writes through another.
///
/// # Examples
///
/// ```
/// use gladiator::adapters::InMemoryRepository;
/// use gladiator::ports::QTableRepository;
/// use gladiator::q_learning::{QTable, SavedQTable};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let saved = SavedQTable::from_table(&QTable::new(6), 4);
///
/// repo.save(&saved, Path::new("brain"))?;
/// assert_eq!(repo.load(Path::new("brain"))?, saved);
/// # Ok::<(), gladiator::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored tables.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Store raw bytes at `path`, e.g. to simulate a corrupt file.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(Self::key(path), bytes);
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }
}

impl QTableRepository for InMemoryRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec_named(table).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(Self::key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let storage = self.storage();
        let bytes = storage.get(&Self::key(path)).ok_or_else(|| Error::Io {
            operation: format!("load Q-table from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize Q-table from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.storage().contains_key(&Self::key(path))
    }
}
