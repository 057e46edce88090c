use chrono::{DateTime, NaiveDate, Utc};
use receivables::invoice::{
    calculate_summary_metrics, filter_invoices, map_record, FiscalNoteRow, Invoice,
    InvoiceFilter, InvoiceStatus, MappingRules, RawRecord, ReceivableRow, NO_NUMBER,
    UNSPECIFIED_CLIENT, UNSPECIFIED_SUPPLIER,
};
use receivables::sort::{sort_records, SortDirection, SortField, SortState};

fn at(date: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

fn receivable(value: f64, due: &str, settled: Option<&str>) -> ReceivableRow {
    ReceivableRow {
        sequencial_cr: Some("1".to_string()),
        nome_fornecedor: Some("Farmácia Santa Maria".to_string()),
        num_nf: Some("1001".to_string()),
        valor_parcela: Some(value),
        data_vencimento: Some(due.to_string()),
        data_quitacao: settled.map(str::to_string),
    }
}

fn fiscal_note(issued: &str) -> FiscalNoteRow {
    FiscalNoteRow {
        id: Some("77".to_string()),
        cliente: Some("Drogasil".to_string()),
        numero_nf: Some("5500".to_string()),
        valor_total: Some(250.0),
        data_emissao: Some(issued.to_string()),
        ..Default::default()
    }
}

fn map_receivable_at(row: ReceivableRow, now: &str) -> Invoice {
    map_record(&RawRecord::Receivable(row), 0, at(now), &MappingRules::default())
}

fn map_note_at(row: FiscalNoteRow, now: &str, rules: &MappingRules) -> Invoice {
    map_record(&RawRecord::FiscalNote(row), 0, at(now), rules)
}

fn invoice(id: &str, client: &str, value: f64, due: &str, status: InvoiceStatus) -> Invoice {
    Invoice {
        id: id.to_string(),
        client: client.to_string(),
        invoice_number: format!("NF-e {id}"),
        value,
        due_date: due.to_string(),
        status,
    }
}

fn sample() -> Vec<Invoice> {
    vec![
        invoice("1", "Farmácia Santa Maria", 100.0, "2025-01-10", InvoiceStatus::Overdue),
        invoice("2", "Drogaria São Paulo", 350.5, "2025-02-01", InvoiceStatus::Pending),
        invoice("3", "Pague Menos", 80.0, "2025-01-10", InvoiceStatus::Paid),
        invoice("4", "Droga Raia", 1200.0, "2025-03-15", InvoiceStatus::Overdue),
        invoice("5", "Farmácia Popular", 42.0, "2025-02-01", InvoiceStatus::Pending),
    ]
}

#[test]
fn settled_receivable_is_paid_regardless_of_due_date() {
    for due in ["2000-01-01", "2025-01-01", "2099-12-31", "not a date"] {
        let inv = map_receivable_at(receivable(10.0, due, Some("2024-06-01")), "2025-01-01");
        assert_eq!(inv.status, InvoiceStatus::Paid, "due {due}");
    }
}

#[test]
fn blank_but_non_empty_settlement_date_counts_as_settled() {
    let row: ReceivableRow = serde_json::from_str(
        r#"{"valor_parcela": 10, "data_vencimento": "2020-01-01", "data_quitacao": "  "}"#,
    )
    .unwrap();
    assert_eq!(map_receivable_at(row, "2025-01-01").status, InvoiceStatus::Paid);

    let empty: ReceivableRow = serde_json::from_str(
        r#"{"valor_parcela": 10, "data_vencimento": "2020-01-01", "data_quitacao": ""}"#,
    )
    .unwrap();
    assert_eq!(map_receivable_at(empty, "2025-01-01").status, InvoiceStatus::Overdue);
}

#[test]
fn unsettled_receivable_past_due_is_overdue() {
    let inv = map_receivable_at(receivable(100.0, "2020-01-01", None), "2025-01-01");
    assert_eq!(inv.status, InvoiceStatus::Overdue);
    assert_eq!(inv.due_date, "2020-01-01");

    let on_the_day = map_receivable_at(receivable(100.0, "2025-01-01", None), "2025-01-01");
    assert_eq!(on_the_day.status, InvoiceStatus::Pending);

    let future = map_receivable_at(receivable(100.0, "2025-06-01", None), "2025-01-01");
    assert_eq!(future.status, InvoiceStatus::Pending);
}

#[test]
fn receivable_defaults() {
    let inv = map_record(
        &RawRecord::Receivable(ReceivableRow::default()),
        4,
        at("2025-01-01"),
        &MappingRules::default(),
    );

    assert_eq!(inv.id, "CR-5");
    assert_eq!(inv.client, UNSPECIFIED_SUPPLIER);
    assert_eq!(inv.invoice_number, NO_NUMBER);
    assert_eq!(inv.value, 0.0);
    assert_eq!(inv.due_date, "2025-01-01");
    assert_eq!(inv.status, InvoiceStatus::Pending);
}

#[test]
fn receivable_number_is_formatted() {
    let inv = map_receivable_at(receivable(1.0, "2025-01-01", None), "2024-01-01");
    assert_eq!(inv.invoice_number, "NF-e 1001");
    assert_eq!(inv.id, "1");
}

#[test]
fn fiscal_note_due_date_is_issue_plus_thirty_days() {
    let rules = MappingRules::default();
    for (issued, due) in [
        ("2025-03-10", "2025-04-09"),
        ("2024-02-15", "2024-03-16"),
        ("2024-12-20T14:30:00", "2025-01-19"),
    ] {
        let inv = map_note_at(fiscal_note(issued), "2025-01-01", &rules);
        assert_eq!(inv.due_date, due, "issued {issued}");
    }
}

#[test]
fn fiscal_note_status_follows_issue_age() {
    let rules = MappingRules::default();

    // 5 days old
    let fresh = map_note_at(fiscal_note("2025-01-10"), "2025-01-15", &rules);
    assert_eq!(fresh.status, InvoiceStatus::Pending);

    // 20 days old, due in 10
    let presumed = map_note_at(fiscal_note("2025-01-10"), "2025-01-30", &rules);
    assert_eq!(presumed.status, InvoiceStatus::Paid);

    // 40 days old, due 10 days ago
    let late = map_note_at(fiscal_note("2025-01-10"), "2025-02-19", &rules);
    assert_eq!(late.status, InvoiceStatus::Overdue);
}

#[test]
fn presumed_paid_can_be_disabled() {
    let rules = MappingRules {
        presume_paid: false,
        ..Default::default()
    };
    let inv = map_note_at(fiscal_note("2025-01-10"), "2025-01-30", &rules);
    assert_eq!(inv.status, InvoiceStatus::Pending);
}

#[test]
fn fiscal_note_defaults() {
    let inv = map_record(
        &RawRecord::FiscalNote(FiscalNoteRow::default()),
        0,
        at("2025-05-05"),
        &MappingRules::default(),
    );

    assert_eq!(inv.id, "NF-1");
    assert_eq!(inv.client, UNSPECIFIED_CLIENT);
    assert_eq!(inv.invoice_number, NO_NUMBER);
    assert_eq!(inv.due_date, "2025-05-05");
    assert_eq!(inv.status, InvoiceStatus::Pending);
}

#[test]
fn overdue_receivable_survives_only_the_overdue_filter() {
    let inv = map_receivable_at(receivable(100.0, "2020-01-01", None), "2025-01-01");
    let invoices = vec![inv];

    let overdue = InvoiceFilter {
        status: Some(InvoiceStatus::Overdue),
        ..Default::default()
    };
    let paid = InvoiceFilter {
        status: Some(InvoiceStatus::Paid),
        ..Default::default()
    };

    assert_eq!(filter_invoices(&invoices, &overdue).len(), 1);
    assert!(filter_invoices(&invoices, &paid).is_empty());
}

#[test]
fn search_is_case_insensitive() {
    let invoices = sample();
    let filter = InvoiceFilter {
        search: "maria".to_string(),
        ..Default::default()
    };

    let found = filter_invoices(&invoices, &filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].client, "Farmácia Santa Maria");

    let by_number = InvoiceFilter {
        search: "nf-e 4".to_string(),
        ..Default::default()
    };
    assert_eq!(filter_invoices(&invoices, &by_number)[0].id, "4");
}

#[test]
fn empty_filter_keeps_everything_in_order() {
    let invoices = sample();
    assert_eq!(filter_invoices(&invoices, &InvoiceFilter::default()), invoices);
}

#[test]
fn filter_criteria_commute() {
    let invoices = sample();
    let status = InvoiceFilter {
        status: Some(InvoiceStatus::Pending),
        ..Default::default()
    };
    let search = InvoiceFilter {
        search: "farm".to_string(),
        ..Default::default()
    };
    let due = InvoiceFilter {
        due_date: "2025-02-01".to_string(),
        ..Default::default()
    };
    let combined = InvoiceFilter {
        status: Some(InvoiceStatus::Pending),
        search: "farm".to_string(),
        due_date: "2025-02-01".to_string(),
    };

    let chain = |order: [&InvoiceFilter; 3]| {
        order
            .iter()
            .fold(invoices.clone(), |acc, f| filter_invoices(&acc, f))
    };

    let expected = filter_invoices(&invoices, &combined);
    assert_eq!(expected.len(), 1);
    assert_eq!(expected[0].id, "5");
    assert_eq!(chain([&status, &search, &due]), expected);
    assert_eq!(chain([&due, &status, &search]), expected);
    assert_eq!(chain([&search, &due, &status]), expected);
}

#[test]
fn summary_is_idempotent_and_adds_up() {
    let invoices = sample();
    let first = calculate_summary_metrics(&invoices);
    let second = calculate_summary_metrics(&invoices);
    assert_eq!(first, second);

    assert_eq!(first.pending.count, 2);
    assert_eq!(first.paid.count, 1);
    assert_eq!(first.overdue.count, 2);
    assert_eq!(first.overdue.total, 1300.0);

    let all: f64 = invoices.iter().map(|i| i.value).sum();
    assert!((first.pending.total + first.paid.total + first.overdue.total - all).abs() < 1e-9);
    assert_eq!(first.invoice_count(), invoices.len());
}

#[test]
fn summary_of_nothing_is_zero() {
    let summary = calculate_summary_metrics(&[]);
    assert_eq!(summary.grand_total(), 0.0);
    assert_eq!(summary.invoice_count(), 0);
}

#[test]
fn toggling_value_twice_restores_ascending_order() {
    let mut state = SortState::new(SortField::Value, SortDirection::Asc);
    let mut initial = sample();
    sort_records(&mut initial, state);
    let values: Vec<f64> = initial.iter().map(|i| i.value).collect();
    assert_eq!(values, vec![42.0, 80.0, 100.0, 350.5, 1200.0]);

    state.toggle(SortField::Value);
    let mut desc = initial.clone();
    sort_records(&mut desc, state);
    assert_eq!(desc[0].value, 1200.0);

    state.toggle(SortField::Value);
    let mut again = desc.clone();
    sort_records(&mut again, state);
    assert_eq!(again, initial);
}

#[test]
fn client_sort_is_locale_aware() {
    let mut invoices = sample();
    sort_records(
        &mut invoices,
        SortState::new(SortField::Client, SortDirection::Asc),
    );
    let clients: Vec<&str> = invoices.iter().map(|i| i.client.as_str()).collect();
    assert_eq!(
        clients,
        vec![
            "Droga Raia",
            "Drogaria São Paulo",
            "Farmácia Popular",
            "Farmácia Santa Maria",
            "Pague Menos",
        ]
    );
}

#[test]
fn fields_an_invoice_lacks_keep_input_order() {
    let mut invoices = sample();
    sort_records(
        &mut invoices,
        SortState::new(SortField::Cnpj, SortDirection::Desc),
    );
    assert_eq!(invoices, sample());
}
