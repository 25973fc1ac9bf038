use crate::schema::Invoice;
use crate::utils::date_or_epoch;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Amounts within this relative tolerance of each other count as matching.
const AMOUNT_TOLERANCE: f64 = 0.01;

/// Issue dates within this many days of each other count as matching.
const DATE_TOLERANCE_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePair {
    pub original: Invoice,
    pub duplicate: Invoice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub pairs: Vec<DuplicatePair>,
}

/// Greedy pairwise duplicate scan.
///
/// Invoices are ordered by issue date descending (dateless ones last); each
/// unprocessed invoice is committed to at most one partner, the first later
/// invoice with the same vendor, an amount within 1 % and an issue date
/// within 30 days. Once two closest neighbours of a three-invoice cluster
/// pair off, the third stays unmatched; that one-partner-per-invoice policy
/// is part of the observable contract.
pub fn find_duplicates(invoices: &[Invoice]) -> DuplicateReport {
    let mut sorted: Vec<&Invoice> = invoices.iter().collect();
    sorted.sort_by(|a, b| date_or_epoch(b.issue_date).cmp(&date_or_epoch(a.issue_date)));

    let mut processed: HashSet<&str> = HashSet::new();
    let mut pairs = Vec::new();

    for i in 0..sorted.len() {
        let candidate = sorted[i];
        if processed.contains(candidate.id.as_str()) {
            continue;
        }
        let (Some(vendor_id), Some(amount)) = (&candidate.vendor_id, candidate.amount) else {
            continue;
        };

        for other in &sorted[i + 1..] {
            if processed.contains(other.id.as_str()) {
                continue;
            }
            if other.vendor_id.as_deref() != Some(vendor_id) {
                continue;
            }
            let Some(other_amount) = other.amount else {
                continue;
            };

            if !amounts_match(amount, other_amount) {
                continue;
            }

            let days_apart =
                (date_or_epoch(candidate.issue_date) - date_or_epoch(other.issue_date)).num_days();
            if days_apart.abs() > DATE_TOLERANCE_DAYS {
                continue;
            }

            pairs.push(DuplicatePair {
                original: candidate.clone(),
                duplicate: (*other).clone(),
            });
            processed.insert(candidate.id.as_str());
            processed.insert(other.id.as_str());
            break;
        }
    }

    debug!(
        "Duplicate scan over {} invoices found {} pairs",
        invoices.len(),
        pairs.len()
    );
    DuplicateReport { pairs }
}

fn amounts_match(reference: f64, other: f64) -> bool {
    if reference == 0.0 {
        return other == 0.0;
    }
    (reference - other).abs() / reference <= AMOUNT_TOLERANCE
}
