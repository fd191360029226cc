//! In-memory table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of TableRepository.
//! It stores the same text the file repository would write, so the format
//! code is exercised without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    Result,
    ports::TableRepository,
    q_learning::{LoadReport, QTable, read_table, write_table},
};

/// In-memory repository for testing.
///
/// # Examples
///
/// ```
/// use gridnav::adapters::InMemoryRepository;
/// use gridnav::ports::TableRepository;
/// use gridnav::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let table = QTable::default();
///
/// repo.save(&table, Path::new("qtable"))?;
/// assert!(repo.contains(Path::new("qtable")));
/// # Ok::<(), gridnav::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with raw table text, as if a file held it.
    pub fn with_contents(self, path: &Path, contents: &str) -> Self {
        self.lock().insert(key(path), contents.as_bytes().to_vec());
        self
    }

    /// Get the number of tables currently stored.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(&key(path))
    }

    /// Stored text for `path`, if any.
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.lock()
            .get(&key(path))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl TableRepository for InMemoryRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        let mut bytes = Vec::new();
        write_table(table, &mut bytes)?;
        self.lock().insert(key(path), bytes);
        Ok(())
    }

    fn load_into(&self, table: &QTable, path: &Path) -> Result<LoadReport> {
        let bytes = match self.lock().get(&key(path)) {
            Some(bytes) => bytes.clone(),
            None => return Ok(LoadReport::default()),
        };
        read_table(table, bytes.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{perception::PerceivedState, types::Position};

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let table = QTable::default();
        table.update(&PerceivedState::at(Position::new(0, 0)).key(), Position::new(0, 1), -9.0);

        let path = Path::new("table");
        assert_eq!(repo.count(), 0);
        repo.save(&table, path).unwrap();
        assert!(repo.contains(path));

        let loaded = QTable::default();
        let report = repo.load_into(&loaded, path).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(loaded.snapshot(), table.snapshot());
    }

    #[test]
    fn test_load_missing_is_noop() {
        let table = QTable::default();
        let report = InMemoryRepository::new()
            .load_into(&table, Path::new("nothing"))
            .unwrap();
        assert_eq!(report.loaded, 0);
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        repo1.save(&QTable::default(), Path::new("shared")).unwrap();
        assert_eq!(repo2.count(), 1);
        assert_eq!(repo2.contents(Path::new("shared")).as_deref(), Some(""));
    }
}
