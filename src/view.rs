//! Page-level state: one loaded snapshot plus the filters applied to it.
//!
//! Views never mutate their snapshot in place. Filtered and sorted
//! collections are recomputed from it on every call, and a load either
//! replaces the whole snapshot or leaves it untouched.

use chrono::{DateTime, Utc};

use crate::delivery::{TrackedInvoice, TrackingFilter};
use crate::error::{LedgerError, Result};
use crate::invoice::{
    calculate_summary_metrics, filter_invoices, map_record, Invoice, InvoiceFilter,
    InvoiceStatus, MappingRules, RawRecord, SourceKind, SummaryMetrics,
};
use crate::notify::Notifier;
use crate::sort::{sort_records, SortField, SortState};
use crate::store::{CancelToken, DataStore};

pub const LOAD_ERROR_TITLE: &str = "Failed to load data";
pub const LOAD_ERROR_DESCRIPTION: &str = "An unexpected error occurred.";

/// Result of one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
    Cancelled,
}

/// Fetch one source and map every row to an invoice
pub fn load_invoices(
    store: &dyn DataStore,
    source: SourceKind,
    now: DateTime<Utc>,
    rules: &MappingRules,
    cancel: &CancelToken,
) -> Result<Vec<Invoice>> {
    let records: Vec<RawRecord> = match source {
        SourceKind::Receivables => store
            .fetch_receivables(cancel)?
            .into_iter()
            .map(RawRecord::Receivable)
            .collect(),
        SourceKind::FiscalNotes => store
            .fetch_fiscal_notes(cancel)?
            .into_iter()
            .map(RawRecord::FiscalNote)
            .collect(),
    };

    Ok(records
        .iter()
        .enumerate()
        .map(|(ordinal, record)| map_record(record, ordinal, now, rules))
        .collect())
}

/// Fetch fiscal notes as delivery tracking records
pub fn load_tracked(
    store: &dyn DataStore,
    now: DateTime<Utc>,
    rules: &MappingRules,
    cancel: &CancelToken,
) -> Result<Vec<TrackedInvoice>> {
    Ok(store
        .fetch_fiscal_notes(cancel)?
        .iter()
        .enumerate()
        .map(|(ordinal, row)| TrackedInvoice::from_row(row, ordinal, now, rules))
        .collect())
}

/// Turn a fetch result into the new snapshot, or report why there is none.
fn settle<T>(
    fetched: Result<Vec<T>>,
    cancel: &CancelToken,
    notifier: &dyn Notifier,
    what: &str,
) -> std::result::Result<Vec<T>, LoadOutcome> {
    match fetched {
        _ if cancel.is_cancelled() => {
            tracing::debug!(what, "discarding cancelled load");
            Err(LoadOutcome::Cancelled)
        }
        Ok(rows) => {
            tracing::info!(what, count = rows.len(), "loaded");
            Ok(rows)
        }
        Err(e) => {
            tracing::error!(what, error = %e, "load failed");
            notifier.error(LOAD_ERROR_TITLE, Some(LOAD_ERROR_DESCRIPTION));
            Err(LoadOutcome::Failed)
        }
    }
}

/// The financial status page: receivables or fiscal notes as invoices
pub struct FinancialView {
    source: SourceKind,
    rules: MappingRules,
    invoices: Vec<Invoice>,
    filter: InvoiceFilter,
    loading: bool,
}

impl FinancialView {
    pub fn new(source: SourceKind, rules: MappingRules) -> Self {
        Self {
            source,
            rules,
            invoices: Vec::new(),
            filter: InvoiceFilter::default(),
            loading: true,
        }
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The full loaded snapshot, unfiltered
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn load(
        &mut self,
        store: &dyn DataStore,
        now: DateTime<Utc>,
        cancel: &CancelToken,
        notifier: &dyn Notifier,
    ) -> LoadOutcome {
        self.loading = true;
        let fetched = load_invoices(store, self.source, now, &self.rules, cancel);
        let what = self.source.to_string();
        let outcome = match settle(fetched, cancel, notifier, &what) {
            Ok(invoices) => {
                let count = invoices.len();
                self.invoices = invoices;
                LoadOutcome::Loaded(count)
            }
            Err(outcome) => outcome,
        };
        self.loading = false;
        outcome
    }

    pub fn apply_filters(
        &mut self,
        status: Option<InvoiceStatus>,
        search: impl Into<String>,
        due_date: impl Into<String>,
    ) {
        self.filter = InvoiceFilter {
            status,
            search: search.into(),
            due_date: due_date.into(),
        };
    }

    pub fn filtered(&self) -> Vec<Invoice> {
        filter_invoices(&self.invoices, &self.filter)
    }

    /// Totals over the filtered invoices
    pub fn summary(&self) -> SummaryMetrics {
        calculate_summary_metrics(&self.filtered())
    }

    pub fn send_payment_reminder(&self, invoice_id: &str, notifier: &dyn Notifier) -> Result<()> {
        let invoice = self
            .invoices
            .iter()
            .find(|inv| inv.id == invoice_id)
            .ok_or_else(|| LedgerError::InvoiceNotFound(invoice_id.to_string()))?;

        notifier.success(
            &format!("Payment reminder sent to {}", invoice.client),
            Some(&format!("Regarding invoice {}", invoice.invoice_number)),
        );
        Ok(())
    }

    /// Notify every overdue invoice in the snapshot, ignoring active filters.
    /// Returns how many were overdue.
    pub fn send_all_reminders(&self, notifier: &dyn Notifier) -> usize {
        let overdue = self
            .invoices
            .iter()
            .filter(|inv| inv.status == InvoiceStatus::Overdue)
            .count();

        notifier.success(
            &format!("Reminders sent to {overdue} overdue clients"),
            Some("All clients with overdue invoices were notified."),
        );
        overdue
    }
}

/// The delivery tracking page
pub struct TrackingView {
    rules: MappingRules,
    records: Vec<TrackedInvoice>,
    filter: TrackingFilter,
    sort: SortState,
    loading: bool,
}

impl TrackingView {
    pub fn new(rules: MappingRules) -> Self {
        Self {
            rules,
            records: Vec::new(),
            filter: TrackingFilter::default(),
            sort: SortState::default(),
            loading: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn records(&self) -> &[TrackedInvoice] {
        &self.records
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn load(
        &mut self,
        store: &dyn DataStore,
        now: DateTime<Utc>,
        cancel: &CancelToken,
        notifier: &dyn Notifier,
    ) -> LoadOutcome {
        self.loading = true;
        let fetched = load_tracked(store, now, &self.rules, cancel);
        let outcome = match settle(fetched, cancel, notifier, "deliveries") {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                LoadOutcome::Loaded(count)
            }
            Err(outcome) => outcome,
        };
        self.loading = false;
        outcome
    }

    pub fn update_filter(&mut self, filter: TrackingFilter) {
        self.filter = filter;
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// Filtered, then sorted by the current sort state
    pub fn visible(&self) -> Vec<TrackedInvoice> {
        let mut rows: Vec<TrackedInvoice> = self
            .records
            .iter()
            .filter(|r| self.filter.matches(r))
            .cloned()
            .collect();
        sort_records(&mut rows, self.sort);
        rows
    }
}
