//! # Invoice Insights
//!
//! Natural-language invoice query compiler and financial analytics engine.
//!
//! ## Core Concepts
//!
//! - **Entity**: a typed fragment (status, date range, amount constraint,
//!   vendor/category/tag target, residual term) extracted from free text
//! - **Predicate Set**: the canonical, store-agnostic representation of
//!   "which invoices match", executed by an external store collaborator
//! - **Analytics Report**: a derived computation (vendor ranking, quarterly
//!   report, expense forecast, duplicate detection) over an already-fetched
//!   invoice collection
//!
//! Every computation is pure and synchronous: the current date is always an
//! explicit parameter, the same input always produces the same output, and
//! input records are never mutated.
//!
//! ## Example
//!
//! ```rust,ignore
//! use invoice_insights::*;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
//!
//! let predicates = compile_query("overdue invoices from acme over 500", None, today);
//! let invoices = store.fetch(&predicates, Page::first(50))?;
//!
//! let intent = detect_intent("which vendor do we spend the most with");
//! let report = run_analytics(intent, &invoices, today);
//! ```

pub mod duplicates;
pub mod error;
pub mod extractor;
pub mod forecast;
pub mod intent;
pub mod predicate;
pub mod report;
pub mod schema;
pub mod store;
pub mod utils;
pub mod vendors;

pub use duplicates::{find_duplicates, DuplicatePair, DuplicateReport};
pub use error::{InsightsError, Result};
pub use extractor::{Entity, EntityExtractor};
pub use forecast::{expense_forecast, ExpectedExpense, ForecastReport};
pub use intent::{detect_intent, run_analytics, AnalyticsIntent, AnalyticsReport};
pub use predicate::{
    compile_query, AmountFilter, DateRangeFilter, FieldMatch, PredicateBuilder, PredicateSet,
    SearchField,
};
pub use report::{
    default_revenue_estimate, quarterly_report, quarterly_report_with_estimator, CategoryExpense,
    QuarterlyReport, RevenueEstimator,
};
pub use schema::{Category, Invoice, InvoiceFilters, InvoiceStatus};
pub use store::{InvoiceStore, Page};
pub use vendors::{top_vendor, VendorRankingReport};

use chrono::NaiveDate;
use log::{debug, info};

/// Facade over the compiler and analytics entry points.
pub struct InsightsEngine;

impl InsightsEngine {
    /// Compiles free text plus optional explicit filters into a predicate
    /// set. Total for any input.
    pub fn compile(
        free_text: &str,
        filters: Option<&InvoiceFilters>,
        today: NaiveDate,
    ) -> PredicateSet {
        info!("Compiling invoice query");
        compile_query(free_text, filters, today)
    }

    pub fn detect_intent(free_text: &str) -> Option<AnalyticsIntent> {
        detect_intent(free_text)
    }

    pub fn analyze(
        intent: Option<AnalyticsIntent>,
        invoices: &[Invoice],
        today: NaiveDate,
    ) -> AnalyticsReport {
        info!("Running analytics over {} invoices", invoices.len());
        run_analytics(intent, invoices, today)
    }

    /// Compiles a query and fetches the matching page from the store. The
    /// store is the only fallible collaborator on this path; its failures
    /// propagate untouched.
    pub fn query_invoices<S: InvoiceStore + ?Sized>(
        store: &S,
        free_text: &str,
        filters: Option<&InvoiceFilters>,
        today: NaiveDate,
        page: Page,
    ) -> Result<Vec<Invoice>> {
        let predicates = Self::compile(free_text, filters, today);
        debug!(
            "Fetching invoices at offset {} (limit {})",
            page.offset, page.limit
        );
        store.fetch(&predicates, page)
    }
}

/// Compiles a free-text query and fetches the matching invoices in one step.
pub fn query_invoices<S: InvoiceStore + ?Sized>(
    store: &S,
    free_text: &str,
    filters: Option<&InvoiceFilters>,
    today: NaiveDate,
    page: Page,
) -> Result<Vec<Invoice>> {
    InsightsEngine::query_invoices(store, free_text, filters, today, page)
}
