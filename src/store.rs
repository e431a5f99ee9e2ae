//! Workbook-backed ledger store
//!
//! Every command loads the whole workbook, changes the in-memory ledger and
//! rewrites all three sheets on save. Series and predictions are upserted by
//! date, results are appended.
//!
//! There is no locking: two processes saving the same file race and the last
//! writer wins.

use crate::error::{TirageError, TirageResult};
use crate::excel::{WorkbookExporter, WorkbookImporter};
use crate::types::{DailySeries, DrawResult, Ledger, Prediction};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug)]
pub struct WorkbookStore {
    path: PathBuf,
    ledger: Ledger,
}

impl WorkbookStore {
    /// Load an existing workbook
    pub fn open<P: AsRef<Path>>(path: P) -> TirageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let ledger = WorkbookImporter::new(&path).import()?;
        info!(path = %path.display(), "workbook loaded");
        Ok(Self { path, ledger })
    }

    /// Create a workbook holding only the three sheet headers
    pub fn init<P: AsRef<Path>>(path: P, force: bool) -> TirageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() && !force {
            return Err(TirageError::Validation(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        let store = Self {
            path,
            ledger: Ledger::new(),
        };
        store.save()?;
        Ok(store)
    }

    /// Rewrite the whole workbook from the in-memory ledger
    pub fn save(&self) -> TirageResult<()> {
        WorkbookExporter::new(&self.ledger)
            .export(&self.path)
            .inspect_err(|e| warn!(path = %self.path.display(), error = %e, "save failed"))?;
        info!(path = %self.path.display(), "workbook saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn record_series(&mut self, series: DailySeries) {
        self.ledger.upsert_series(series);
    }

    pub fn record_prediction(&mut self, prediction: Prediction) {
        self.ledger.upsert_prediction(prediction);
    }

    pub fn record_result(&mut self, result: DrawResult) {
        self.ledger.append_result(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Donnees_Tirage.xlsx");

        WorkbookStore::init(&path, false).unwrap();
        let err = WorkbookStore::init(&path, false).unwrap_err();
        assert!(matches!(err, TirageError::Validation(_)));
        assert!(WorkbookStore::init(&path, true).is_ok());
    }

    #[test]
    fn test_open_missing_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let err = WorkbookStore::open(temp_dir.path().join("nope.xlsx")).unwrap_err();
        assert!(matches!(err, TirageError::WorkbookNotFound(_)));
    }

    #[test]
    fn test_init_then_open_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.xlsx");

        WorkbookStore::init(&path, false).unwrap();
        let store = WorkbookStore::open(&path).unwrap();
        assert!(store.ledger().is_empty());
        assert_eq!(store.path(), path.as_path());
    }
}
