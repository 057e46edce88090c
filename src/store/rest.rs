use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::Agent;

use super::{CancelToken, DataStore};
use crate::error::Result;
use crate::invoice::{FiscalNoteRow, ReceivableRow};

/// Hosted store speaking the PostgREST dialect (`/rest/v1/<table>?select=*`)
pub struct RestStore {
    agent: Agent,
    base_url: String,
    api_key: Option<String>,
    receivables_table: String,
    fiscal_notes_table: String,
}

impl RestStore {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        receivables_table: &str,
        fiscal_notes_table: &str,
        timeout_secs: u64,
    ) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
            receivables_table: receivables_table.to_string(),
            fiscal_notes_table: fiscal_notes_table.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}?select=*", self.base_url, table)
    }

    fn fetch_table<T: DeserializeOwned>(&self, table: &str, cancel: &CancelToken) -> Result<Vec<T>> {
        cancel.check()?;

        let url = self.table_url(table);
        let mut request = self.agent.get(&url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", &format!("Bearer {key}"));
        }

        tracing::debug!(%url, "fetching table");
        let body: String = request.call()?.body_mut().read_to_string()?;
        let rows: Vec<T> = serde_json::from_str(&body)?;
        tracing::debug!(table, rows = rows.len(), "fetched table");

        // A load abandoned mid-flight must not hand back stale rows
        cancel.check()?;
        Ok(rows)
    }
}

impl DataStore for RestStore {
    fn fetch_receivables(&self, cancel: &CancelToken) -> Result<Vec<ReceivableRow>> {
        self.fetch_table(&self.receivables_table, cancel)
    }

    fn fetch_fiscal_notes(&self, cancel: &CancelToken) -> Result<Vec<FiscalNoteRow>> {
        self.fetch_table(&self.fiscal_notes_table, cancel)
    }
}
