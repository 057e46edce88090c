use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use receivables::config::{config_dir, load_config, CONFIG_TEMPLATE};
use receivables::format::{format_currency, format_date};
use receivables::invoice::{Invoice, InvoiceStatus, SourceKind, SummaryMetrics};
use receivables::sort::{sort_records, SortField, SortState};
use receivables::store::{choose_store, open_store, CancelToken, StoreChoice};
use receivables::view::{FinancialView, LoadOutcome, TrackingView};
use receivables::{
    DeliveryStatus, LedgerError, Result, SearchBy, TerminalNotifier, TrackedInvoice,
    TrackingFilter,
};

#[derive(Parser)]
#[command(name = "receivables")]
#[command(version, about = "Receivables, fiscal notes and delivery status from the command line", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.receivables or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Evaluate statuses as of this date (YYYY-MM-DD, default: now)
    #[arg(long, global = true, value_name = "DATE")]
    as_of: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Table to read: receivables or fiscal-notes
    #[arg(long, default_value = "receivables")]
    source: SourceKind,

    /// Only show this status (pending, paid, overdue)
    #[arg(long)]
    status: Option<InvoiceStatus>,

    /// Case-insensitive match on client or invoice number
    #[arg(long, default_value = "")]
    search: String,

    /// Only show invoices due on this exact date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", default_value = "")]
    due_date: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config and empty exports
    Init,

    /// Show the active configuration
    Status,

    /// List invoices with their derived payment status
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Sort column; repeat to toggle direction (e.g. --sort value --sort value)
        #[arg(long, value_name = "FIELD")]
        sort: Vec<SortField>,

        /// Number of invoices to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show totals and counts per payment status
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List fiscal notes with their delivery status
    Deliveries {
        /// Case-insensitive match on the field chosen by --search-by
        #[arg(long, default_value = "")]
        search: String,

        /// Field to search: number or cnpj
        #[arg(long, default_value = "number")]
        search_by: SearchBy,

        /// Delivery status (pending, delivered, in-transit, issue) or all
        #[arg(long, default_value = "all", value_parser = parse_delivery_choice)]
        status: DeliveryChoice,

        /// Sort column; repeat to toggle direction (default: issue-date, newest first)
        #[arg(long, value_name = "FIELD")]
        sort: Vec<SortField>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Send a payment reminder for one invoice, or for every overdue one
    Remind {
        /// Invoice id as shown by 'list'
        #[arg(required_unless_present = "all")]
        invoice: Option<String>,

        /// Remind every client with an overdue invoice
        #[arg(long, conflicts_with = "invoice")]
        all: bool,

        /// Table to read: receivables or fiscal-notes
        #[arg(long, default_value = "receivables")]
        source: SourceKind,
    },
}

#[derive(Clone, Copy)]
struct DeliveryChoice(Option<DeliveryStatus>);

fn parse_delivery_choice(s: &str) -> std::result::Result<DeliveryChoice, String> {
    if s.trim().eq_ignore_ascii_case("all") {
        return Ok(DeliveryChoice(None));
    }
    s.parse().map(|status| DeliveryChoice(Some(status)))
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    let as_of = cli.as_of.as_deref();

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::List {
            filters,
            sort,
            limit,
            json,
        } => cmd_list(&cfg_dir, resolve_now(as_of)?, &filters, &sort, limit, json),
        Commands::Summary { filters, json } => {
            cmd_summary(&cfg_dir, resolve_now(as_of)?, &filters, json)
        }
        Commands::Deliveries {
            search,
            search_by,
            status,
            sort,
            json,
        } => {
            let filter = TrackingFilter {
                search,
                search_by,
                status: status.0,
            };
            cmd_deliveries(&cfg_dir, resolve_now(as_of)?, filter, &sort, json)
        }
        Commands::Remind {
            invoice,
            all,
            source,
        } => cmd_remind(&cfg_dir, resolve_now(as_of)?, source, invoice.as_deref(), all),
    }
}

/// Pin "now" to midnight UTC of the given date, or read the clock
fn resolve_now(as_of: Option<&str>) -> Result<DateTime<Utc>> {
    match as_of {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| LedgerError::InvalidDate(raw.to_string())),
        None => Ok(Utc::now()),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(LedgerError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    let data_dir = cfg_dir.join("data");
    fs::create_dir_all(&data_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(data_dir.join("contas_receber.json"), "[]\n")?;
    fs::write(data_dir.join("notas_fiscais.json"), "[]\n")?;

    println!("Initialized receivables config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point [store] at your data:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Or drop JSON exports into:   {}",
        data_dir.display()
    );
    println!();
    println!("Then list your invoices:");
    println!("  receivables list --status overdue");

    Ok(())
}

/// Show the active configuration
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;

    let store = match choose_store(&config.store) {
        Ok(StoreChoice::Exports(dir)) => format!("JSON exports in {dir}"),
        Ok(StoreChoice::Hosted(url)) => format!("hosted store at {url}"),
        Err(LedgerError::NoStoreConfigured) => "not configured".to_string(),
        Err(e) => return Err(e),
    };

    println!("Receivables Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Store:            {store}");
    println!("Receivables:      {}", config.store.receivables_table);
    println!("Fiscal notes:     {}", config.store.fiscal_notes_table);
    if config.mapping.presume_paid {
        println!(
            "Presumed paid:    after {} days",
            config.mapping.presumed_paid_after_days
        );
    } else {
        println!("Presumed paid:    off");
    }

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "DUE")]
    due_date: String,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(inv: &Invoice) -> Self {
        Self {
            id: inv.id.clone(),
            client: inv.client.clone(),
            number: inv.invoice_number.clone(),
            due_date: format_date(&inv.due_date),
            value: format_currency(inv.value),
            status: inv.status.as_str().to_uppercase(),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "COUNT")]
    count: usize,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct DeliveryRow {
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "CNPJ")]
    cnpj: String,
    #[tabled(rename = "ISSUED")]
    issue_date: String,
    #[tabled(rename = "DUE")]
    due_date: String,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "DELIVERY")]
    status: String,
    #[tabled(rename = "PAYMENT")]
    payment_status: String,
}

impl From<&TrackedInvoice> for DeliveryRow {
    fn from(rec: &TrackedInvoice) -> Self {
        Self {
            number: rec.number.clone(),
            client: rec.client.clone(),
            cnpj: rec.client_cnpj.clone(),
            issue_date: format_date(&rec.issue_date),
            due_date: format_date(&rec.due_date),
            value: format_currency(rec.value),
            status: rec.status.as_str().to_uppercase(),
            payment_status: rec.payment_status.to_uppercase(),
        }
    }
}

fn summary_table(summary: &SummaryMetrics) -> String {
    let mut rows: Vec<SummaryRow> = [
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ]
    .iter()
    .map(|status| {
        let totals = summary.for_status(*status);
        SummaryRow {
            status: status.as_str().to_uppercase(),
            count: totals.count,
            total: format_currency(totals.total),
        }
    })
    .collect();

    rows.push(SummaryRow {
        status: "TOTAL".to_string(),
        count: summary.invoice_count(),
        total: format_currency(summary.grand_total()),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Build the financial view for one source and load it once
fn load_financial(
    cfg_dir: &Path,
    now: DateTime<Utc>,
    source: SourceKind,
) -> Result<FinancialView> {
    let config = load_config(cfg_dir)?;
    let store = open_store(&config.store)?;
    let mut view = FinancialView::new(source, config.mapping.clone());

    match view.load(store.as_ref(), now, &CancelToken::new(), &TerminalNotifier) {
        LoadOutcome::Loaded(_) => Ok(view),
        LoadOutcome::Failed | LoadOutcome::Cancelled => {
            Err(LedgerError::LoadFailed(source.to_string()))
        }
    }
}

fn filtered_view(cfg_dir: &Path, now: DateTime<Utc>, filters: &FilterArgs) -> Result<FinancialView> {
    let mut view = load_financial(cfg_dir, now, filters.source)?;
    view.apply_filters(filters.status, filters.search.as_str(), filters.due_date.as_str());
    Ok(view)
}

/// List invoices with a per-status summary of everything that matched
fn cmd_list(
    cfg_dir: &Path,
    now: DateTime<Utc>,
    filters: &FilterArgs,
    sort: &[SortField],
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let view = filtered_view(cfg_dir, now, filters)?;
    let summary = view.summary();
    let mut invoices = view.filtered();

    if !sort.is_empty() {
        let mut state = SortState::default();
        for field in sort {
            state.toggle(*field);
        }
        sort_records(&mut invoices, state);
    }

    let matched = invoices.len();
    if let Some(n) = limit {
        invoices.truncate(n);
    }

    if json {
        let out = serde_json::json!({
            "invoices": invoices,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if matched == 0 {
        println!("No records found.");
        return Ok(());
    }

    if !invoices.is_empty() {
        let rows: Vec<InvoiceRow> = invoices.iter().map(InvoiceRow::from).collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
        println!();
    }
    println!("{}", summary_table(&summary));
    println!();
    println!(
        "Showing {} of {} matching invoices ({} loaded from {})",
        invoices.len(),
        matched,
        view.invoices().len(),
        view.source()
    );

    Ok(())
}

fn cmd_summary(cfg_dir: &Path, now: DateTime<Utc>, filters: &FilterArgs, json: bool) -> Result<()> {
    let view = filtered_view(cfg_dir, now, filters)?;
    let summary = view.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary_table(&summary));
    }

    Ok(())
}

fn cmd_deliveries(
    cfg_dir: &Path,
    now: DateTime<Utc>,
    filter: TrackingFilter,
    sort: &[SortField],
    json: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let store = open_store(&config.store)?;
    let mut view = TrackingView::new(config.mapping.clone());

    match view.load(store.as_ref(), now, &CancelToken::new(), &TerminalNotifier) {
        LoadOutcome::Loaded(_) => {}
        LoadOutcome::Failed | LoadOutcome::Cancelled => {
            return Err(LedgerError::LoadFailed("deliveries".to_string()))
        }
    }

    view.update_filter(filter);
    for field in sort {
        view.toggle_sort(*field);
    }
    let records = view.visible();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No records found.");
        return Ok(());
    }

    let rows: Vec<DeliveryRow> = records.iter().map(DeliveryRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    println!();

    let count = |status: DeliveryStatus| records.iter().filter(|r| r.status == status).count();
    println!(
        "In transit: {}  Delivered: {}  Issues: {}  Pending: {}",
        count(DeliveryStatus::InTransit),
        count(DeliveryStatus::Delivered),
        count(DeliveryStatus::Issue),
        count(DeliveryStatus::Pending),
    );

    Ok(())
}

fn cmd_remind(
    cfg_dir: &Path,
    now: DateTime<Utc>,
    source: SourceKind,
    invoice: Option<&str>,
    all: bool,
) -> Result<()> {
    let view = load_financial(cfg_dir, now, source)?;

    if all {
        view.send_all_reminders(&TerminalNotifier);
        return Ok(());
    }

    match invoice {
        Some(id) => view.send_payment_reminder(id, &TerminalNotifier),
        None => Ok(()),
    }
}
