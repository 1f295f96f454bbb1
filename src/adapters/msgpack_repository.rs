//! MessagePack implementation of the Q-table repository.
//!
//! This adapter implements the QTableRepository port using rmp_serde for
//! compact binary serialization of large trained tables.

use std::{fs::File, path::Path};

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedQTable};

/// MessagePack-based Q-table repository.
///
/// # Examples
///
/// ```no_run
/// use gladiator::adapters::MsgPackRepository;
/// use gladiator::ports::QTableRepository;
/// use gladiator::q_learning::{QTable, SavedQTable};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let saved = SavedQTable::from_table(&QTable::new(6), 4);
///
/// repo.save(&saved, Path::new("brain.msgpack"))?;
/// let loaded = repo.load(Path::new("brain.msgpack"))?;
/// # Ok::<(), gladiator::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl QTableRepository for MsgPackRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        rmp_serde::encode::write_named(&mut file, table).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize Q-table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let table =
            rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
                operation: "deserialize Q-table from MessagePack".to_string(),
                message: e.to_string(),
            })?;

        Ok(table)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
