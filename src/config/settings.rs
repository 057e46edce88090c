use serde::{Deserialize, Serialize};

use crate::invoice::MappingRules;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub mapping: MappingRules,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreSettings {
    /// Base URL of the hosted store, e.g. https://project.supabase.co
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Directory of JSON table exports; mutually exclusive with `url`
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default = "default_receivables_table")]
    pub receivables_table: String,
    #[serde(default = "default_fiscal_notes_table")]
    pub fiscal_notes_table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_receivables_table() -> String {
    "contas_receber".to_string()
}

fn default_fiscal_notes_table() -> String {
    "notas_fiscais".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            data_dir: None,
            receivables_table: default_receivables_table(),
            fiscal_notes_table: default_fiscal_notes_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
