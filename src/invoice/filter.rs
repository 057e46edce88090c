use super::{Invoice, InvoiceStatus};

/// Active filter set of the financial listing. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    /// Case-insensitive substring of the client or the invoice number
    pub search: String,
    /// Exact `YYYY-MM-DD` due date
    pub due_date: String,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.matches_status(invoice) && self.matches_search(invoice) && self.matches_due_date(invoice)
    }

    fn matches_status(&self, invoice: &Invoice) -> bool {
        self.status.map_or(true, |s| invoice.status == s)
    }

    fn matches_search(&self, invoice: &Invoice) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        invoice.client.to_lowercase().contains(&needle)
            || invoice.invoice_number.to_lowercase().contains(&needle)
    }

    fn matches_due_date(&self, invoice: &Invoice) -> bool {
        self.due_date.is_empty() || invoice.due_date == self.due_date
    }
}

/// Invoices matching `filter`, in their original order
pub fn filter_invoices(invoices: &[Invoice], filter: &InvoiceFilter) -> Vec<Invoice> {
    invoices
        .iter()
        .filter(|inv| filter.matches(inv))
        .cloned()
        .collect()
}
