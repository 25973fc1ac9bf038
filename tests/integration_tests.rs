use chrono::NaiveDate;
use invoice_insights::*;

/// In-memory store honoring every predicate kind, standing in for the real
/// persistence collaborator.
struct MemoryStore {
    invoices: Vec<Invoice>,
}

impl MemoryStore {
    fn matches(invoice: &Invoice, predicates: &PredicateSet) -> bool {
        if let Some(status) = predicates.status {
            if invoice.status != status {
                return false;
            }
        }
        if let Some(vendor) = &predicates.vendor_name {
            let Some(name) = &invoice.vendor_name else {
                return false;
            };
            if !name.to_lowercase().contains(&vendor.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &predicates.category_name {
            let Some(cat) = &invoice.category else {
                return false;
            };
            if !cat.name.to_lowercase().contains(&category.to_lowercase()) {
                return false;
            }
        }
        if !predicates.tags.is_empty()
            && !predicates.tags.iter().any(|t| invoice.tags.contains(t))
        {
            return false;
        }
        if let Some(filter) = predicates.amount {
            let Some(amount) = invoice.amount else {
                return false;
            };
            let ok = match filter {
                AmountFilter::Equals(v) => amount == v,
                AmountFilter::Between { gte, lte } => amount >= gte && amount <= lte,
                AmountFilter::Comparator { lt, gt } => {
                    lt.map(|v| amount < v).unwrap_or(true)
                        && gt.map(|v| amount > v).unwrap_or(true)
                }
            };
            if !ok {
                return false;
            }
        }
        if let Some(range) = predicates.issue_date {
            let Some(date) = invoice.issue_date else {
                return false;
            };
            if range.gte.map(|d| date < d).unwrap_or(false)
                || range.lte.map(|d| date > d).unwrap_or(false)
            {
                return false;
            }
        }
        if !predicates.any_of.is_empty() {
            let hit = predicates.any_of.iter().any(|m| {
                let value = match m.field {
                    SearchField::InvoiceNumber => invoice.invoice_number.clone(),
                    SearchField::VendorName => invoice.vendor_name.clone(),
                    SearchField::Title => Some(invoice.title.clone()),
                    SearchField::Notes => invoice.notes.clone(),
                };
                value
                    .map(|v| v.to_lowercase().contains(&m.contains.to_lowercase()))
                    .unwrap_or(false)
            });
            if !hit {
                return false;
            }
        }
        true
    }
}

impl InvoiceStore for MemoryStore {
    fn count(&self, predicates: &PredicateSet) -> Result<u64> {
        Ok(self
            .invoices
            .iter()
            .filter(|i| Self::matches(i, predicates))
            .count() as u64)
    }

    fn fetch(&self, predicates: &PredicateSet, page: Page) -> Result<Vec<Invoice>> {
        Ok(self
            .invoices
            .iter()
            .filter(|i| Self::matches(i, predicates))
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }
}

struct FailingStore;

impl InvoiceStore for FailingStore {
    fn count(&self, _: &PredicateSet) -> Result<u64> {
        Err(InsightsError::Store("connection refused".to_string()))
    }

    fn fetch(&self, _: &PredicateSet, _: Page) -> Result<Vec<Invoice>> {
        Err(InsightsError::Store("connection refused".to_string()))
    }
}

#[allow(clippy::too_many_arguments)]
fn invoice(
    id: &str,
    vendor: Option<(&str, &str)>,
    category: Option<(&str, &str)>,
    amount: Option<f64>,
    status: InvoiceStatus,
    issue_date: Option<NaiveDate>,
    tags: &[&str],
    notes: Option<&str>,
) -> Invoice {
    Invoice {
        id: id.to_string(),
        amount,
        currency: "USD".to_string(),
        vendor_name: vendor.map(|(_, name)| name.to_string()),
        vendor_id: vendor.map(|(vid, _)| vid.to_string()),
        status,
        issue_date,
        due_date: None,
        category: category.map(|(cid, name)| Category {
            id: cid.to_string(),
            name: name.to_string(),
        }),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        invoice_number: Some(format!("INV-{id}")),
        title: format!("Invoice {id}"),
        notes: notes.map(str::to_string),
    }
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn today() -> NaiveDate {
    // A Wednesday, so the "last week" phrase is exercised mid-week.
    NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
}

fn fixture_store() -> MemoryStore {
    MemoryStore {
        invoices: vec![
            invoice(
                "1",
                Some(("v-acme", "Acme Corp")),
                Some(("c-soft", "Software")),
                Some(750.0),
                InvoiceStatus::Overdue,
                date(2026, 8, 3),
                &["recurring"],
                Some("august hosting bill"),
            ),
            invoice(
                "2",
                Some(("v-acme", "Acme Corp")),
                Some(("c-soft", "Software")),
                Some(120.0),
                InvoiceStatus::Paid,
                date(2026, 7, 14),
                &[],
                None,
            ),
            invoice(
                "3",
                Some(("v-globex", "Globex")),
                Some(("c-office", "Office")),
                Some(900.0),
                InvoiceStatus::Overdue,
                date(2026, 8, 19),
                &["travel"],
                Some("conference travel costs"),
            ),
            invoice(
                "4",
                None,
                None,
                None,
                InvoiceStatus::Pending,
                None,
                &[],
                Some("scanned document, amount unreadable"),
            ),
        ],
    }
}

#[test]
fn test_compiled_query_filters_through_the_store() {
    let store = fixture_store();
    let invoices = query_invoices(
        &store,
        "overdue invoices from acme over 500",
        None,
        today(),
        Page::first(50),
    )
    .unwrap();

    assert_eq!(invoices.len(), 1, "only the large overdue Acme invoice matches");
    assert_eq!(invoices[0].id, "1");
}

#[test]
fn test_date_phrase_and_explicit_filters_combine() {
    let store = fixture_store();
    let filters = InvoiceFilters {
        status: Some(InvoiceStatus::Overdue),
        ..Default::default()
    };

    // "last week" of Wed 2026-08-26 is Mon 17th..Sat 22nd; only invoice 3 fits.
    let invoices = query_invoices(&store, "last week", Some(&filters), today(), Page::first(50))
        .unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].id, "3");
}

#[test]
fn test_residual_terms_search_across_fields() {
    let store = fixture_store();
    let predicates = compile_query("conference spending", None, today());
    assert!(!predicates.any_of.is_empty());

    let invoices = store.fetch(&predicates, Page::first(50)).unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].id, "3", "residual term matches the notes field");
}

#[test]
fn test_unrecognized_text_is_an_unfiltered_query() {
    let store = fixture_store();
    let predicates = compile_query("", None, today());
    assert!(predicates.is_empty());
    assert_eq!(store.count(&predicates).unwrap(), 4);
}

#[test]
fn test_store_failure_propagates() {
    let result = query_invoices(&FailingStore, "paid invoices", None, today(), Page::first(10));
    match result {
        Err(InsightsError::Store(message)) => assert!(message.contains("connection refused")),
        other => panic!("expected a store failure, got {other:?}"),
    }
}

#[test]
fn test_vendor_ranking_end_to_end() {
    let invoices = vec![
        invoice(
            "a1",
            Some(("v-a", "Alpha")),
            None,
            Some(300.0),
            InvoiceStatus::Paid,
            date(2026, 5, 1),
            &[],
            None,
        ),
        invoice(
            "b1",
            Some(("v-b", "Beta")),
            None,
            Some(700.0),
            InvoiceStatus::Paid,
            date(2026, 6, 1),
            &[],
            None,
        ),
    ];

    let intent = detect_intent("which vendor do we spend the most with");
    let report = run_analytics(intent, &invoices, today());

    match report {
        AnalyticsReport::VendorRanking(ranking) => {
            assert_eq!(ranking.vendor_id, "v-b");
            assert_eq!(ranking.percentage_of_expenses, 70.0);
        }
        other => panic!("expected a vendor ranking, got {other:?}"),
    }
}

#[test]
fn test_forecast_end_to_end_over_year_boundary() {
    // Six flat months from October 2025 through March 2026.
    let invoices: Vec<Invoice> = [
        (2026, 3),
        (2026, 2),
        (2026, 1),
        (2025, 12),
        (2025, 11),
        (2025, 10),
    ]
    .iter()
    .enumerate()
    .map(|(i, (y, m))| {
        invoice(
            &format!("f{i}"),
            Some(("v-a", "Alpha")),
            None,
            Some(100.0),
            InvoiceStatus::Paid,
            date(*y, *m, 10),
            &[],
            None,
        )
    })
    .collect();

    let march = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
    let report = run_analytics(detect_intent("forecast next month"), &invoices, march);

    match report {
        AnalyticsReport::Forecast(forecast) => {
            assert_eq!(forecast.mean, 100.0);
            assert_eq!(forecast.predicted_low, 100.0);
            assert_eq!(forecast.predicted_high, 100.0);
            assert_eq!(forecast.percentage_change, 0.0);
            assert_eq!(
                forecast.expected_expenses.last().unwrap().description,
                "Regular monthly expenses"
            );
        }
        other => panic!("expected a forecast, got {other:?}"),
    }
}

#[test]
fn test_duplicate_detection_end_to_end() {
    let invoices = vec![
        invoice(
            "d1",
            Some(("v-a", "Alpha")),
            None,
            Some(100.0),
            InvoiceStatus::Pending,
            date(2026, 8, 10),
            &[],
            None,
        ),
        invoice(
            "d2",
            Some(("v-a", "Alpha")),
            None,
            Some(100.50),
            InvoiceStatus::Pending,
            date(2026, 8, 15),
            &[],
            None,
        ),
        invoice(
            "d3",
            Some(("v-a", "Alpha")),
            None,
            Some(102.0),
            InvoiceStatus::Pending,
            date(2026, 8, 16),
            &[],
            None,
        ),
    ];

    let report = run_analytics(detect_intent("find duplicate invoices"), &invoices, today());
    match report {
        AnalyticsReport::Duplicates(duplicates) => {
            assert_eq!(duplicates.pairs.len(), 1);
            let ids = [
                duplicates.pairs[0].original.id.as_str(),
                duplicates.pairs[0].duplicate.id.as_str(),
            ];
            assert!(ids.contains(&"d1") && ids.contains(&"d2"));
        }
        other => panic!("expected duplicates, got {other:?}"),
    }
}

#[test]
fn test_quarterly_report_end_to_end() {
    let invoices = vec![
        invoice(
            "q1",
            Some(("v-a", "Alpha")),
            Some(("c-soft", "Software")),
            Some(1000.0),
            InvoiceStatus::Paid,
            date(2026, 2, 1),
            &[],
            None,
        ),
        invoice(
            "q2",
            Some(("v-a", "Alpha")),
            Some(("c-soft", "Software")),
            Some(500.0),
            InvoiceStatus::Paid,
            date(2025, 2, 1),
            &[],
            None,
        ),
    ];

    let report = run_analytics(detect_intent("q1 financial report"), &invoices, today());
    match report {
        AnalyticsReport::Quarterly(quarterly) => {
            assert_eq!(quarterly.total_expenses, 1000.0);
            assert_eq!(quarterly.prev_year_expenses, 500.0);
            assert_eq!(quarterly.expense_percent_change, 100.0);
            assert_eq!(quarterly.total_revenue, 1500.0);
            assert_eq!(quarterly.top_categories.len(), 1);
        }
        other => panic!("expected a quarterly report, got {other:?}"),
    }
}
