use crate::schema::Invoice;
use crate::utils::percent_change;
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Revenue model seam. No real revenue ledger exists in this core, so the
/// report derives revenue from expenses; swap the estimator once one does.
pub type RevenueEstimator = fn(expenses: f64) -> f64;

/// Placeholder model: revenue is assumed to be 1.5x expenses.
pub fn default_revenue_estimate(expenses: f64) -> f64 {
    expenses * 1.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryExpense {
    pub category_id: String,
    pub category_name: String,
    pub total: f64,
}

/// Q1 financial report for the year containing `today`, with a
/// year-over-year comparison against the same window one year back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyReport {
    pub year: i32,
    pub total_expenses: f64,
    pub prev_year_expenses: f64,
    pub expense_percent_change: f64,
    pub total_revenue: f64,
    pub prev_year_revenue: f64,
    pub revenue_percent_change: f64,
    pub net_profit: f64,
    pub prev_year_net_profit: f64,
    pub net_profit_percent_change: f64,
    /// Top 5 expense categories by Q1 spend, descending.
    pub top_categories: Vec<CategoryExpense>,
}

pub fn quarterly_report(invoices: &[Invoice], today: NaiveDate) -> QuarterlyReport {
    quarterly_report_with_estimator(invoices, today, default_revenue_estimate)
}

pub fn quarterly_report_with_estimator(
    invoices: &[Invoice],
    today: NaiveDate,
    estimate_revenue: RevenueEstimator,
) -> QuarterlyReport {
    let year = today.year();
    let total_expenses = q1_expenses(invoices, year);
    let prev_year_expenses = q1_expenses(invoices, year - 1);

    let total_revenue = estimate_revenue(total_expenses);
    let prev_year_revenue = estimate_revenue(prev_year_expenses);

    let net_profit = total_revenue - total_expenses;
    let prev_year_net_profit = prev_year_revenue - prev_year_expenses;

    debug!(
        "Q1 {} report: expenses {:.2} (prev {:.2})",
        year, total_expenses, prev_year_expenses
    );

    QuarterlyReport {
        year,
        total_expenses,
        prev_year_expenses,
        expense_percent_change: percent_change(total_expenses, prev_year_expenses),
        total_revenue,
        prev_year_revenue,
        revenue_percent_change: percent_change(total_revenue, prev_year_revenue),
        net_profit,
        prev_year_net_profit,
        net_profit_percent_change: percent_change(net_profit, prev_year_net_profit),
        top_categories: top_categories(invoices, year, 5),
    }
}

fn in_q1(invoice: &Invoice, year: i32) -> bool {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(year, 3, 31).unwrap();
    invoice
        .issue_date
        .map(|d| d >= start && d <= end)
        .unwrap_or(false)
}

/// Q1 expenses count only categorized, amount-bearing invoices.
fn q1_expenses(invoices: &[Invoice], year: i32) -> f64 {
    invoices
        .iter()
        .filter(|i| i.category.is_some() && in_q1(i, year))
        .filter_map(|i| i.amount)
        .sum()
}

fn top_categories(invoices: &[Invoice], year: i32, limit: usize) -> Vec<CategoryExpense> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<CategoryExpense> = Vec::new();

    for invoice in invoices.iter().filter(|i| in_q1(i, year)) {
        let (Some(category), Some(amount)) = (&invoice.category, invoice.amount) else {
            continue;
        };
        let slot = *index.entry(category.id.clone()).or_insert_with(|| {
            totals.push(CategoryExpense {
                category_id: category.id.clone(),
                category_name: category.name.clone(),
                total: 0.0,
            });
            totals.len() - 1
        });
        totals[slot].total += amount;
    }

    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    totals.truncate(limit);
    totals
}
