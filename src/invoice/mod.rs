mod filter;
mod mapper;
mod raw;
mod summary;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use filter::{filter_invoices, InvoiceFilter};
pub use mapper::{
    fiscal_due_date, map_fiscal_note, map_receivable, map_record, parse_instant, MappingRules,
    FISCAL_NOTE_DUE_DAYS, NO_NUMBER, UNSPECIFIED_CLIENT, UNSPECIFIED_SUPPLIER,
};
pub use raw::{FiscalNoteRow, RawRecord, ReceivableRow};
pub use summary::{calculate_summary_metrics, StatusTotals, SummaryMetrics};

/// Payment status derived from an invoice's dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            other => Err(format!(
                "unknown status '{other}' (expected pending, paid or overdue)"
            )),
        }
    }
}

/// Which table a batch of raw rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Receivables,
    FiscalNotes,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Receivables => f.write_str("receivables"),
            SourceKind::FiscalNotes => f.write_str("fiscal-notes"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "receivables" => Ok(SourceKind::Receivables),
            "fiscal-notes" | "fiscal_notes" => Ok(SourceKind::FiscalNotes),
            other => Err(format!(
                "unknown source '{other}' (expected receivables or fiscal-notes)"
            )),
        }
    }
}

/// Unified invoice view model shared by every listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub client: String,
    pub invoice_number: String,
    pub value: f64,
    pub due_date: String,
    pub status: InvoiceStatus,
}
