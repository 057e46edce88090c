use serde::Serialize;

use super::{Invoice, InvoiceStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusTotals {
    pub total: f64,
    pub count: usize,
}

/// Per-status totals of a set of invoices
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub pending: StatusTotals,
    pub paid: StatusTotals,
    pub overdue: StatusTotals,
}

impl SummaryMetrics {
    pub fn for_status(&self, status: InvoiceStatus) -> StatusTotals {
        match status {
            InvoiceStatus::Pending => self.pending,
            InvoiceStatus::Paid => self.paid,
            InvoiceStatus::Overdue => self.overdue,
        }
    }

    pub fn grand_total(&self) -> f64 {
        self.pending.total + self.paid.total + self.overdue.total
    }

    pub fn invoice_count(&self) -> usize {
        self.pending.count + self.paid.count + self.overdue.count
    }
}

pub fn calculate_summary_metrics(invoices: &[Invoice]) -> SummaryMetrics {
    invoices.iter().fold(SummaryMetrics::default(), |mut acc, inv| {
        let slot = match inv.status {
            InvoiceStatus::Pending => &mut acc.pending,
            InvoiceStatus::Paid => &mut acc.paid,
            InvoiceStatus::Overdue => &mut acc.overdue,
        };
        slot.total += inv.value;
        slot.count += 1;
        acc
    })
}
