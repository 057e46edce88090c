pub mod config;
pub mod delivery;
pub mod error;
pub mod format;
pub mod invoice;
pub mod notify;
pub mod sort;
pub mod store;
pub mod view;

pub use config::{Config, StoreSettings};
pub use delivery::{DeliveryStatus, SearchBy, TrackedInvoice, TrackingFilter};
pub use error::{LedgerError, Result};
pub use invoice::{
    calculate_summary_metrics, filter_invoices, map_record, Invoice, InvoiceFilter,
    InvoiceStatus, MappingRules, RawRecord, SourceKind, SummaryMetrics,
};
pub use notify::{MemoryNotifier, Notifier, TerminalNotifier, Toast, ToastLevel};
pub use sort::{SortDirection, SortField, SortState, Sortable};
pub use store::{open_store, CancelToken, DataStore, FileStore, RestStore};
pub use view::{FinancialView, LoadOutcome, TrackingView};
