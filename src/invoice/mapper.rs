use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::raw::{FiscalNoteRow, RawRecord, ReceivableRow};
use super::{Invoice, InvoiceStatus};

pub const UNSPECIFIED_SUPPLIER: &str = "Unspecified supplier";
pub const UNSPECIFIED_CLIENT: &str = "Unspecified client";
pub const NO_NUMBER: &str = "No number";

/// Fiscal notes carry no due date; it is always issue date + this many days.
pub const FISCAL_NOTE_DUE_DAYS: i64 = 30;

/// Tunable parts of status derivation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MappingRules {
    /// Treat a fiscal note as paid once it is older than `presumed_paid_after_days`
    #[serde(default = "default_presume_paid")]
    pub presume_paid: bool,
    #[serde(default = "default_presumed_paid_after_days")]
    pub presumed_paid_after_days: u32,
}

fn default_presume_paid() -> bool {
    true
}

fn default_presumed_paid_after_days() -> u32 {
    15
}

impl Default for MappingRules {
    fn default() -> Self {
        Self {
            presume_paid: default_presume_paid(),
            presumed_paid_after_days: default_presumed_paid_after_days(),
        }
    }
}

/// Convert one raw record into an invoice.
///
/// `ordinal` is the record's position within its load and is only used to
/// synthesize an id when the row has none. Never fails: missing or invalid
/// fields fall back to placeholders.
pub fn map_record(
    record: &RawRecord,
    ordinal: usize,
    now: DateTime<Utc>,
    rules: &MappingRules,
) -> Invoice {
    match record {
        RawRecord::Receivable(row) => map_receivable(row, ordinal, now),
        RawRecord::FiscalNote(row) => map_fiscal_note(row, ordinal, now, rules),
    }
}

pub fn map_receivable(row: &ReceivableRow, ordinal: usize, now: DateTime<Utc>) -> Invoice {
    let due = row.data_vencimento.as_deref().and_then(parse_instant);

    let status = if row.data_quitacao.is_some() {
        InvoiceStatus::Paid
    } else if due.is_some_and(|d| d < now) {
        InvoiceStatus::Overdue
    } else {
        InvoiceStatus::Pending
    };

    Invoice {
        id: row
            .sequencial_cr
            .clone()
            .unwrap_or_else(|| format!("CR-{}", ordinal + 1)),
        client: row
            .nome_fornecedor
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_SUPPLIER.to_string()),
        invoice_number: format_number(row.num_nf.as_deref()),
        value: coerce_value(row.valor_parcela),
        due_date: row
            .data_vencimento
            .clone()
            .unwrap_or_else(|| iso_date(now)),
        status,
    }
}

pub fn map_fiscal_note(
    row: &FiscalNoteRow,
    ordinal: usize,
    now: DateTime<Utc>,
    rules: &MappingRules,
) -> Invoice {
    let issued = row.data_emissao.as_deref().and_then(parse_instant);
    let due = issued.and_then(|d| d.checked_add_signed(Duration::days(FISCAL_NOTE_DUE_DAYS)));
    let presumed_after = Duration::days(i64::from(rules.presumed_paid_after_days));

    let status = match (issued, due) {
        (_, Some(due)) if due < now => InvoiceStatus::Overdue,
        (Some(issued), _) if rules.presume_paid && now - issued > presumed_after => {
            InvoiceStatus::Paid
        }
        _ => InvoiceStatus::Pending,
    };

    Invoice {
        id: row
            .id
            .clone()
            .unwrap_or_else(|| format!("NF-{}", ordinal + 1)),
        client: row
            .cliente
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_CLIENT.to_string()),
        invoice_number: format_number(row.numero_nf.as_deref()),
        value: coerce_value(row.valor_total),
        due_date: iso_date(due.unwrap_or(now)),
        status,
    }
}

/// Due date of a fiscal note, if its issue date parses
pub fn fiscal_due_date(issue_date: &str) -> Option<String> {
    parse_instant(issue_date)
        .and_then(|d| d.checked_add_signed(Duration::days(FISCAL_NOTE_DUE_DAYS)))
        .map(iso_date)
}

/// Parse a store timestamp. Naive values are taken as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn iso_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

fn format_number(number: Option<&str>) -> String {
    match number {
        Some(n) => format!("NF-e {n}"),
        None => NO_NUMBER.to_string(),
    }
}

fn coerce_value(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
