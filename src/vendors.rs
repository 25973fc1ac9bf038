use crate::schema::Invoice;
use crate::utils::{date_or_epoch, percent_of};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The vendor with the highest total spend in the supplied collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRankingReport {
    pub vendor_id: String,
    pub vendor_name: Option<String>,
    pub total: f64,
    pub invoice_count: usize,
    /// Rounded share of total expenses across all vendor-attributed,
    /// amount-bearing invoices; 0 when that total is 0.
    pub percentage_of_expenses: f64,
    /// The top vendor's 5 most recently issued invoices.
    pub recent_invoices: Vec<Invoice>,
}

struct VendorGroup {
    vendor_id: String,
    vendor_name: Option<String>,
    total: f64,
    invoices: Vec<Invoice>,
}

/// Ranks vendors by total spend and returns the top one.
///
/// Only invoices carrying both a vendor id and an amount participate.
/// Groups accumulate in input order and a total tie keeps the group
/// encountered first, so the result is deterministic for a given input
/// ordering. Returns None when no invoice qualifies.
pub fn top_vendor(invoices: &[Invoice]) -> Option<VendorRankingReport> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<VendorGroup> = Vec::new();

    for invoice in invoices {
        let (Some(vendor_id), Some(amount)) = (&invoice.vendor_id, invoice.amount) else {
            continue;
        };

        let slot = *index.entry(vendor_id.clone()).or_insert_with(|| {
            groups.push(VendorGroup {
                vendor_id: vendor_id.clone(),
                vendor_name: None,
                total: 0.0,
                invoices: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.total += amount;
        if group.vendor_name.is_none() {
            group.vendor_name = invoice.vendor_name.clone();
        }
        group.invoices.push(invoice.clone());
    }

    if groups.is_empty() {
        debug!("Vendor ranking requested on a collection with no vendor-attributed amounts");
        return None;
    }

    let total_expenses: f64 = groups.iter().map(|g| g.total).sum();

    let mut best = 0;
    for (i, group) in groups.iter().enumerate().skip(1) {
        if group.total > groups[best].total {
            best = i;
        }
    }

    let top = groups.swap_remove(best);
    let mut recent = top.invoices;
    recent.sort_by(|a, b| date_or_epoch(b.issue_date).cmp(&date_or_epoch(a.issue_date)));
    let invoice_count = recent.len();
    recent.truncate(5);

    Some(VendorRankingReport {
        vendor_id: top.vendor_id,
        vendor_name: top.vendor_name,
        total: top.total,
        invoice_count,
        percentage_of_expenses: percent_of(top.total, total_expenses),
        recent_invoices: recent,
    })
}
