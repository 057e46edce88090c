use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::invoice::{fiscal_due_date, map_fiscal_note, FiscalNoteRow, MappingRules};
use crate::sort::{SortField, SortValue, Sortable};

/// Delivery state of a fiscal note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    InTransit,
    Issue,
}

impl DeliveryStatus {
    /// Map the store's free-text delivery status. Unknown values are pending.
    pub fn from_store(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("entregue") => DeliveryStatus::Delivered,
            Some("em_transito") => DeliveryStatus::InTransit,
            Some("problema") => DeliveryStatus::Issue,
            _ => DeliveryStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::InTransit => "in-transit",
            DeliveryStatus::Issue => "issue",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(DeliveryStatus::Pending),
            "delivered" => Ok(DeliveryStatus::Delivered),
            "in-transit" | "in_transit" => Ok(DeliveryStatus::InTransit),
            "issue" => Ok(DeliveryStatus::Issue),
            other => Err(format!(
                "unknown delivery status '{other}' (expected pending, delivered, in-transit or issue)"
            )),
        }
    }
}

/// Field the tracking search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchBy {
    #[default]
    Number,
    Cnpj,
}

impl FromStr for SearchBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "number" => Ok(SearchBy::Number),
            "cnpj" => Ok(SearchBy::Cnpj),
            other => Err(format!("unknown search field '{other}' (expected number or cnpj)")),
        }
    }
}

/// A fiscal note as shown in the delivery tracking list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedInvoice {
    pub id: String,
    pub number: String,
    pub client: String,
    #[serde(rename = "clientCNPJ")]
    pub client_cnpj: String,
    pub issue_date: String,
    pub due_date: String,
    pub value: f64,
    pub status: DeliveryStatus,
    pub payment_status: String,
}

impl TrackedInvoice {
    pub fn from_row(
        row: &FiscalNoteRow,
        ordinal: usize,
        now: DateTime<Utc>,
        rules: &MappingRules,
    ) -> Self {
        let derived = map_fiscal_note(row, ordinal, now, rules);
        let issue_date = row.data_emissao.clone().unwrap_or_default();

        Self {
            id: derived.id,
            number: row.numero_nf.clone().unwrap_or_default(),
            client: row.cliente.clone().unwrap_or_default(),
            client_cnpj: row.cod_cliente.clone().unwrap_or_default(),
            due_date: fiscal_due_date(&issue_date).unwrap_or_default(),
            issue_date,
            value: derived.value,
            status: DeliveryStatus::from_store(row.status_entrega.as_deref()),
            payment_status: derived.status.to_string(),
        }
    }
}

impl Sortable for TrackedInvoice {
    fn sort_value(&self, field: SortField) -> SortValue<'_> {
        match field {
            SortField::Number => SortValue::Text(&self.number),
            SortField::Client => SortValue::Text(&self.client),
            SortField::Cnpj => SortValue::Text(&self.client_cnpj),
            SortField::IssueDate => SortValue::Text(&self.issue_date),
            SortField::DueDate => SortValue::Text(&self.due_date),
            SortField::Value => SortValue::Number(self.value),
            SortField::Status => SortValue::Text(self.status.as_str()),
            SortField::PaymentStatus => SortValue::Text(&self.payment_status),
        }
    }
}

/// Search and status filter of the tracking list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingFilter {
    pub search: String,
    pub search_by: SearchBy,
    /// `None` shows every delivery status
    pub status: Option<DeliveryStatus>,
}

impl TrackingFilter {
    pub fn matches(&self, record: &TrackedInvoice) -> bool {
        let search_ok = self.search.is_empty() || {
            let haystack = match self.search_by {
                SearchBy::Number => &record.number,
                SearchBy::Cnpj => &record.client_cnpj,
            };
            haystack.to_lowercase().contains(&self.search.to_lowercase())
        };
        let status_ok = self.status.map_or(true, |s| record.status == s);
        search_ok && status_ok
    }
}
