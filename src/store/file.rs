use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

use super::{CancelToken, DataStore};
use crate::error::{LedgerError, Result};
use crate::invoice::{FiscalNoteRow, ReceivableRow};

/// Reads `<dir>/<table>.json` exports, each a JSON array of rows
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    receivables_table: String,
    fiscal_notes_table: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, receivables_table: &str, fiscal_notes_table: &str) -> Self {
        Self {
            dir: dir.into(),
            receivables_table: receivables_table.to_string(),
            fiscal_notes_table: fiscal_notes_table.to_string(),
        }
    }

    fn read_table<T: DeserializeOwned>(&self, table: &str, cancel: &CancelToken) -> Result<Vec<T>> {
        cancel.check()?;
        let path = self.dir.join(format!("{table}.json"));
        if !path.exists() {
            return Err(LedgerError::ExportNotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        let rows: Vec<T> = serde_json::from_str(&content)?;
        tracing::debug!(table, rows = rows.len(), path = %path.display(), "read table export");
        cancel.check()?;
        Ok(rows)
    }
}

impl DataStore for FileStore {
    fn fetch_receivables(&self, cancel: &CancelToken) -> Result<Vec<ReceivableRow>> {
        self.read_table(&self.receivables_table, cancel)
    }

    fn fetch_fiscal_notes(&self, cancel: &CancelToken) -> Result<Vec<FiscalNoteRow>> {
        self.read_table(&self.fiscal_notes_table, cancel)
    }
}
