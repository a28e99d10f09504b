//! examsheet-core: import of exam definitions and student scores from a workbook
//!
//! A master sheet lists the tests and their questions; every test has an answer
//! sheet, found by its sheet code, with the points of each student. Parsed
//! records are written to a [`Store`], keeping the stored identity of records
//! that were imported before.

pub mod config;
pub mod enums;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod reader;
pub mod reconcile;
pub mod store;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};

pub use config::ImportConfig;
pub use error::{ImportError, SheetNotFoundError};
pub use layout::Layout;
pub use parser::{ParsedWorkbook, parse_workbook};
pub use reader::{Workbook, read_workbook};
pub use reconcile::{ImportSummary, Tally, reconcile};
pub use store::{SqliteStore, Store, StoreError};

/// Main import interface
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    /// Create an importer with the default configuration
    pub fn new() -> Self {
        Self::with_config(ImportConfig::default())
    }

    pub fn with_config(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Read and parse the configured workbook without touching the store
    pub fn parse(&self) -> Result<ParsedWorkbook> {
        let workbook = read_workbook(&self.config.workbook).with_context(|| {
            format!("Failed to read workbook {}", self.config.workbook.display())
        })?;
        Ok(parse_workbook(&workbook, &self.config.layout)?)
    }

    /// Import the configured workbook into the configured database
    pub fn import(&self) -> Result<ImportSummary> {
        let parsed = self.parse()?;
        let mut store = SqliteStore::open(&self.config.database).with_context(|| {
            format!("Failed to open database {}", self.config.database.display())
        })?;
        Ok(reconcile(&mut store, parsed)?)
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `workbook` and write its records to `store`.
///
/// Every cell is validated before the first write.
pub fn import_workbook<S: Store + ?Sized>(
    workbook: &Workbook,
    layout: &Layout,
    store: &mut S,
) -> Result<ImportSummary, ImportError> {
    let parsed = parse_workbook(workbook, layout)?;
    reconcile(store, parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellValue;
    use crate::testing::scenario_workbook;

    #[test]
    fn test_import_workbook() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let summary =
            import_workbook(&scenario_workbook(), &Layout::default(), &mut store).unwrap();

        assert_eq!(summary.tests.inserted, 1);
        assert_eq!(summary.answers.inserted, 2);
    }

    #[test]
    fn test_invalid_cell_writes_nothing() {
        let mut wb = scenario_workbook();
        wb.sheets[0].set_cell(3, 4, CellValue::from("X"));
        let mut store = SqliteStore::open_in_memory().unwrap();

        let err = import_workbook(&wb, &Layout::default(), &mut store).unwrap_err();
        assert!(matches!(err, ImportError::UnknownCode { .. }));
        assert_eq!(store.counts().unwrap(), Default::default());
    }

    #[test]
    fn test_missing_workbook_file() {
        let dir = tempfile::tempdir().unwrap();
        let importer = Importer::with_config(ImportConfig {
            workbook: dir.path().join("missing.xlsx"),
            database: dir.path().join("db.sqlite3"),
            ..ImportConfig::default()
        });

        let err = importer.import().unwrap_err();
        assert!(err.to_string().starts_with("Failed to read workbook"));
        assert!(!dir.path().join("db.sqlite3").exists());
    }
}
