use crate::schema::Invoice;
use crate::utils::{months_forward, percent_change};
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

/// Number of calendar-month buckets the forecast looks back over, including
/// the current month at index 0.
const LOOKBACK_MONTHS: usize = 6;

/// Annual payments are flagged when a year-old invoice exceeds this fraction
/// of the mean monthly spend.
const ANNUAL_PAYMENT_THRESHOLD: f64 = 0.2;

/// The recurring baseline line is valued at this fraction of the mean.
const RECURRING_SHARE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedExpense {
    pub description: String,
    pub amount: f64,
}

/// Next-month expense forecast derived from the 6 most recent calendar
/// months of spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    /// Bucket totals; index 0 is the current month, index 5 five months back.
    pub monthly_totals: Vec<f64>,
    pub mean: f64,
    /// Population standard deviation across the bucket totals.
    pub std_dev: f64,
    pub predicted_low: f64,
    pub predicted_high: f64,
    /// Rounded change of the mean relative to the current month's spend,
    /// 0 when the current month has no spend.
    pub percentage_change: f64,
    pub expected_expenses: Vec<ExpectedExpense>,
}

pub fn expense_forecast(invoices: &[Invoice], today: NaiveDate) -> ForecastReport {
    let current = today.year() * 12 + today.month() as i32 - 1;
    let mut totals = vec![0.0; LOOKBACK_MONTHS];

    for invoice in invoices {
        let (Some(date), Some(amount)) = (invoice.issue_date, invoice.amount) else {
            continue;
        };
        let offset = current - (date.year() * 12 + date.month() as i32 - 1);
        if (0..LOOKBACK_MONTHS as i32).contains(&offset) {
            totals[offset as usize] += amount;
        }
    }

    let mean = totals.iter().sum::<f64>() / LOOKBACK_MONTHS as f64;
    let variance = totals
        .iter()
        .map(|t| (t - mean).powi(2))
        .sum::<f64>()
        / LOOKBACK_MONTHS as f64;
    let std_dev = variance.sqrt();

    debug!(
        "Forecast over {} months: mean {:.2}, std dev {:.2}",
        LOOKBACK_MONTHS, mean, std_dev
    );

    ForecastReport {
        predicted_low: (mean - std_dev).round(),
        predicted_high: (mean + std_dev).round(),
        percentage_change: percent_change(mean, totals[0]),
        expected_expenses: expected_expenses(invoices, today, mean),
        monthly_totals: totals,
        mean,
        std_dev,
    }
}

/// Known upcoming expenses: invoices issued in the same calendar month one
/// year before the upcoming month that are large relative to the mean, plus
/// an always-present recurring baseline.
fn expected_expenses(invoices: &[Invoice], today: NaiveDate, mean: f64) -> Vec<ExpectedExpense> {
    let (upcoming_year, upcoming_month) = months_forward(today.year(), today.month(), 1);
    let (target_year, target_month) = (upcoming_year - 1, upcoming_month);

    let mut lines = Vec::new();
    for invoice in invoices {
        let (Some(date), Some(amount), Some(vendor)) =
            (invoice.issue_date, invoice.amount, &invoice.vendor_name)
        else {
            continue;
        };
        if date.year() == target_year
            && date.month() == target_month
            && amount > mean * ANNUAL_PAYMENT_THRESHOLD
        {
            lines.push(ExpectedExpense {
                description: format!("Annual payment to {vendor}"),
                amount,
            });
        }
    }

    lines.push(ExpectedExpense {
        description: "Regular monthly expenses".to_string(),
        amount: (mean * RECURRING_SHARE).round(),
    });
    lines
}
