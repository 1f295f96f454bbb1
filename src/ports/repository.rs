//! Repository port for Q-table persistence.
//!
//! This module defines the trait boundary between the learning engine and
//! the storage layer for saving and restoring learned value tables.

use std::path::Path;

use crate::{Result, q_learning::SavedQTable};

/// Port for persisting and loading learned Q-tables.
///
/// This trait abstracts the storage mechanism, allowing different
/// implementations (JSON, MessagePack, in-memory) without coupling the
/// decision engine to a specific serialization format.
///
/// # Examples
///
/// ```no_run
/// use gladiator::ports::QTableRepository;
/// use gladiator::q_learning::SavedQTable;
/// use std::path::Path;
///
/// fn backup<R: QTableRepository>(repo: &R, table: &SavedQTable) -> gladiator::Result<()> {
///     repo.save(table, Path::new("brain.backup.json"))
/// }
/// ```
pub trait QTableRepository: Send + Sync {
    /// Overwrite whatever is stored at `path` with `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path cannot be created or written to
    /// - Serialization fails
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()>;

    /// Load the record stored at `path`.
    ///
    /// Only the encoding is checked here; structural validation happens in
    /// [`SavedQTable::into_table`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing is stored at `path`
    /// - The stored bytes cannot be decoded
    fn load(&self, path: &Path) -> Result<SavedQTable>;

    /// Whether anything is stored at `path`.
    fn exists(&self, path: &Path) -> bool;
}
