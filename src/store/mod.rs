mod file;
mod rest;

pub use file::FileStore;
pub use rest::RestStore;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::StoreSettings;
use crate::error::{LedgerError, Result};
use crate::invoice::{FiscalNoteRow, ReceivableRow};

/// Read-only access to the two source tables. No filtering or paging is
/// pushed down; each call returns the whole table.
pub trait DataStore {
    fn fetch_receivables(&self, cancel: &CancelToken) -> Result<Vec<ReceivableRow>>;
    fn fetch_fiscal_notes(&self, cancel: &CancelToken) -> Result<Vec<FiscalNoteRow>>;
}

/// Shared flag a caller flips to abandon an in-flight load.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once the token has been cancelled
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(LedgerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Where the `[store]` config section points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChoice<'a> {
    Exports(&'a str),
    Hosted(&'a str),
}

/// Exactly one of `data_dir` and `url` must be set.
pub fn choose_store(settings: &StoreSettings) -> Result<StoreChoice<'_>> {
    match (settings.data_dir.as_deref(), settings.url.as_deref()) {
        (Some(_), Some(_)) => Err(LedgerError::ConflictingStores),
        (Some(dir), None) => Ok(StoreChoice::Exports(dir)),
        (None, Some(url)) => Ok(StoreChoice::Hosted(url)),
        (None, None) => Err(LedgerError::NoStoreConfigured),
    }
}

/// Build the store described by the `[store]` config section
pub fn open_store(settings: &StoreSettings) -> Result<Box<dyn DataStore>> {
    let store: Box<dyn DataStore> = match choose_store(settings)? {
        StoreChoice::Exports(dir) => Box::new(FileStore::new(
            dir,
            &settings.receivables_table,
            &settings.fiscal_notes_table,
        )),
        StoreChoice::Hosted(url) => Box::new(RestStore::new(
            url,
            settings.api_key.as_deref(),
            &settings.receivables_table,
            &settings.fiscal_notes_table,
            settings.timeout_secs,
        )),
    };
    Ok(store)
}
