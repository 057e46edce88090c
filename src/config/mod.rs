mod settings;

pub use settings::{Config, StoreSettings};

use crate::error::{LedgerError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `store.api_key` so keys can stay out of config.toml
pub const API_KEY_ENV: &str = "RECEIVABLES_API_KEY";

/// Get the config directory path (XDG config dir, or ~/.receivables/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "receivables") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        LedgerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".receivables"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml, applying environment overrides
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(LedgerError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(LedgerError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    let mut config: Config =
        toml::from_str(&content).map_err(|e| LedgerError::ConfigParse { path, source: e })?;

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.is_empty() {
            config.store.api_key = Some(key);
        }
    }

    // Relative export dirs are relative to the config dir
    if let Some(dir) = config.store.data_dir.take() {
        let expanded = expand_path(&dir);
        let resolved = if expanded.is_relative() {
            config_dir.join(expanded)
        } else {
            expanded
        };
        config.store.data_dir = Some(resolved.to_string_lossy().into_owned());
    }

    Ok(config)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[store]
# Set exactly one of data_dir or url.

# JSON exports: <table>.json, an array of rows.
data_dir = "data"

# Hosted store (PostgREST API). Comment out data_dir above when enabling it.
# The key can also come from RECEIVABLES_API_KEY.
# url = "https://your-project.supabase.co"
# api_key = "your-anon-key"

receivables_table = "contas_receber"
fiscal_notes_table = "notas_fiscais"
timeout_secs = 10

[mapping]
# Fiscal notes carry no payment date. When enabled, a note older than
# presumed_paid_after_days (and not yet overdue) is shown as paid.
presume_paid = true
presumed_paid_after_days = 15
"#;
