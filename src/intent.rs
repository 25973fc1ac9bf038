use crate::duplicates::{find_duplicates, DuplicateReport};
use crate::forecast::{expense_forecast, ForecastReport};
use crate::report::{quarterly_report, QuarterlyReport};
use crate::schema::Invoice;
use crate::vendors::{top_vendor, VendorRankingReport};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Analytics intents recognized in free text, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyticsIntent {
    VendorRanking,
    QuarterlyReport,
    Forecast,
    Duplicates,
}

/// Recognizes an analytics intent in free text; the first matching intent in
/// priority order wins, and unrecognized text yields None.
pub fn detect_intent(text: &str) -> Option<AnalyticsIntent> {
    let text = text.to_lowercase();
    let has = |needle: &str| text.contains(needle);

    let intent = if has("vendor") && (has("most") || has("top") || has("highest")) {
        AnalyticsIntent::VendorRanking
    } else if has("financial report") || has("q1") || has("quarter") {
        AnalyticsIntent::QuarterlyReport
    } else if has("predict") || has("forecast") || has("next month") {
        AnalyticsIntent::Forecast
    } else if has("duplicate") || has("same invoice") {
        AnalyticsIntent::Duplicates
    } else {
        return None;
    };

    debug!("Detected analytics intent {:?}", intent);
    Some(intent)
}

/// A derived analytics result; stateless, never persisted, scoped to one
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AnalyticsReport {
    VendorRanking(VendorRankingReport),
    Quarterly(QuarterlyReport),
    Forecast(ForecastReport),
    Duplicates(DuplicateReport),
    NoData { message: String },
}

/// Runs the analytics computation selected by `intent` over an
/// already-fetched invoice collection. `today` is explicit so report and
/// forecast output is reproducible. A missing intent or a vendor ranking
/// with no qualifying data yields a NoData report, never an error.
pub fn run_analytics(
    intent: Option<AnalyticsIntent>,
    invoices: &[Invoice],
    today: NaiveDate,
) -> AnalyticsReport {
    match intent {
        Some(AnalyticsIntent::VendorRanking) => match top_vendor(invoices) {
            Some(ranking) => AnalyticsReport::VendorRanking(ranking),
            None => AnalyticsReport::NoData {
                message: "No vendor data available".to_string(),
            },
        },
        Some(AnalyticsIntent::QuarterlyReport) => {
            AnalyticsReport::Quarterly(quarterly_report(invoices, today))
        }
        Some(AnalyticsIntent::Forecast) => {
            AnalyticsReport::Forecast(expense_forecast(invoices, today))
        }
        Some(AnalyticsIntent::Duplicates) => {
            AnalyticsReport::Duplicates(find_duplicates(invoices))
        }
        None => AnalyticsReport::NoData {
            message: "No specific data found for this query".to_string(),
        },
    }
}
