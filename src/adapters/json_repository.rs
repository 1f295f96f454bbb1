//! JSON implementation of the Q-table repository.
//!
//! Pretty-printed JSON is the default brain format: it is human-readable and
//! can be inspected or hand-edited between sessions.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedQTable};

/// JSON-based Q-table repository.
///
/// # Examples
///
/// ```no_run
/// use gladiator::adapters::JsonRepository;
/// use gladiator::ports::QTableRepository;
/// use gladiator::q_learning::{QTable, SavedQTable};
/// use std::path::Path;
///
/// let repo = JsonRepository::new();
/// let saved = SavedQTable::from_table(&QTable::new(6), 4);
///
/// repo.save(&saved, Path::new("brain.json"))?;
/// let loaded = repo.load(Path::new("brain.json"))?;
/// # Ok::<(), gladiator::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
    /// Create a new JSON repository.
    pub fn new() -> Self {
        Self
    }
}

impl QTableRepository for JsonRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, table)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write file {path:?}"),
            source,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let table = serde_json::from_reader(BufReader::new(file))?;
        Ok(table)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
