//! Plain-text file implementation of the table repository.
//!
//! This adapter implements the TableRepository port with the line format
//! from [`crate::q_learning::serialization`].

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    Result,
    error::Error,
    ports::TableRepository,
    q_learning::{LoadReport, QTable, read_table, write_table},
};

/// File-backed table repository.
///
/// Saves write the whole table to a temporary file next to the target and
/// then rename it over the target, so readers and concurrent savers only
/// ever see a complete table. Loading a path that does not exist loads
/// nothing.
///
/// # Examples
///
/// ```no_run
/// use gridnav::adapters::TextFileRepository;
/// use gridnav::ports::TableRepository;
/// use gridnav::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = TextFileRepository;
/// let table = QTable::default();
/// repo.save(&table, Path::new("qtable.txt"))?;
/// # Ok::<(), gridnav::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileRepository;

impl TextFileRepository {
    /// Create a new text file repository.
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for TextFileRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        let written = replace_file(path, |writer| write_table(table, writer))?;
        info!(path = %path.display(), entries = written, "saved Q-table");
        Ok(())
    }

    fn load_into(&self, table: &QTable, path: &Path) -> Result<LoadReport> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no persisted Q-table, starting empty");
                return Ok(LoadReport::default());
            }
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open file {path:?}"),
                    source,
                });
            }
        };

        let report = read_table(table, BufReader::new(file))?;
        info!(
            path = %path.display(),
            loaded = report.loaded,
            duplicates = report.duplicates,
            skipped = report.skipped,
            "loaded Q-table"
        );
        Ok(report)
    }
}

/// Write `path` through a temporary file in the same directory.
///
/// The target is only replaced once `write` has succeeded and the data has
/// been flushed. On any failure the temporary file is removed and the
/// previous contents of `path` are left untouched.
fn replace_file<F>(path: &Path, write: F) -> Result<usize>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> io::Result<usize>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_error = |source: io::Error| Error::Io {
        operation: format!("write table to {path:?}"),
        source,
    };

    let temp = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
        operation: format!("create temporary file in {dir:?}"),
        source,
    })?;
    let mut writer = BufWriter::new(temp);
    let written = write(&mut writer).map_err(write_error)?;
    writer.flush().map_err(write_error)?;

    let temp = writer
        .into_inner()
        .map_err(|error| write_error(error.into_error()))?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|error| Error::Io {
        operation: format!("replace file {path:?}"),
        source: error.error,
    })?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{perception::PerceivedState, types::Position};

    #[test]
    fn test_file_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("qtable.txt");

        let table = QTable::default();
        let state = PerceivedState::at(Position::new(2, 2)).with_doors([Position::new(3, 2)]);
        table.update(&state.key(), Position::new(3, 2), 4.5);

        let repo = TextFileRepository::new();
        repo.save(&table, &file_path).expect("Failed to save");

        let loaded = QTable::default();
        let report = repo.load_into(&loaded, &file_path).expect("Failed to load");
        assert_eq!(report.loaded, 1);
        assert_eq!(loaded.get(&state.key(), Position::new(3, 2)), Some(4.5));
    }

    #[test]
    fn test_load_nonexistent_is_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let table = QTable::default();
        let report = TextFileRepository::new()
            .load_into(&table, &temp_dir.path().join("missing.txt"))
            .unwrap();
        assert_eq!(report, LoadReport::default());
        assert!(table.is_empty());
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let table = QTable::default();
        let result = TextFileRepository::new().save(&table, Path::new("/invalid_dir_12345/q.txt"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_failed_write_keeps_previous_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("qtable.txt");

        let table = QTable::default();
        table.update(
            &PerceivedState::at(Position::new(1, 1)).key(),
            Position::new(2, 1),
            7.0,
        );
        let repo = TextFileRepository::new();
        repo.save(&table, &file_path).expect("Failed to save");
        let before = std::fs::read_to_string(&file_path).unwrap();

        let result = replace_file(&file_path, |writer| {
            writer.write_all(b"?half a line")?;
            Err(io::Error::other("disk full"))
        });

        assert!(matches!(result, Err(Error::Io { .. })));
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), before);
        // The temporary file is cleaned up.
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_concurrent_saves_never_interleave() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("shared.txt");

        let table = std::sync::Arc::new(QTable::default());
        for x in 0..50 {
            table.update(
                &PerceivedState::at(Position::new(x, 0)).key(),
                Position::new(x, 1),
                f64::from(x),
            );
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = std::sync::Arc::clone(&table);
                let path = file_path.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        TextFileRepository::new().save(&table, &path).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let loaded = QTable::default();
        let report = TextFileRepository::new()
            .load_into(&loaded, &file_path)
            .unwrap();
        assert!(report.is_clean());
        assert_eq!(report.loaded, 50);
        assert_eq!(loaded.snapshot(), table.snapshot());
    }
}
