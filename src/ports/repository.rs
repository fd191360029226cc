//! Repository port for Q-table persistence.

use std::path::Path;

use crate::{Result, q_learning::LoadReport, q_learning::QTable};

/// Port for persisting and loading Q-tables.
///
/// # Examples
///
/// ```no_run
/// use gridnav::adapters::TextFileRepository;
/// use gridnav::ports::TableRepository;
/// use gridnav::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = TextFileRepository::new();
/// let table = QTable::default();
/// let report = repo.load_into(&table, Path::new("qtable.txt"))?;
/// println!("loaded {} entries", report.loaded);
/// repo.save(&table, Path::new("qtable.txt"))?;
/// # Ok::<(), gridnav::Error>(())
/// ```
pub trait TableRepository: Send + Sync {
    /// Write every entry of `table` to `path`, replacing previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written.
    fn save(&self, table: &QTable, path: &Path) -> Result<()>;

    /// Merge the entries stored at `path` into `table`.
    ///
    /// A missing source is not an error and loads nothing. Malformed records
    /// are skipped and counted in the report; duplicate keys overwrite.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing source cannot be read.
    fn load_into(&self, table: &QTable, path: &Path) -> Result<LoadReport>;
}
