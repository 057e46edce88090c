use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Config directory not found at {0}. Run 'receivables init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("No data store configured. Set store.url or store.data_dir in config.toml.")]
    NoStoreConfigured,

    #[error("Both store.url and store.data_dir are set in config.toml. Keep exactly one.")]
    ConflictingStores,

    #[error("Store request failed: {0}")]
    Request(#[from] ureq::Error),

    #[error("Store returned malformed rows: {0}")]
    MalformedRows(#[from] serde_json::Error),

    #[error("Export file not found: {0}")]
    ExportNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Load cancelled")]
    Cancelled,

    #[error("Could not load {0}")]
    LoadFailed(String),

    #[error("Invoice '{0}' not found in the loaded data")]
    InvoiceNotFound(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
