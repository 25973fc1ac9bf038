use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[schemars(description = "Awaiting payment, due date not yet passed")]
    Pending,

    #[schemars(description = "Payment received in full")]
    Paid,

    #[schemars(description = "Past due date and still unpaid")]
    Overdue,

    #[schemars(description = "Voided or archived; excluded from active workflows")]
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// An invoice record as returned by the store, with category and vendor
/// already joined. Consumed read-only by every component in this crate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,

    #[schemars(description = "Gross amount. Absent amounts are excluded from all aggregations.")]
    pub amount: Option<f64>,

    #[serde(default = "default_currency")]
    pub currency: String,

    pub vendor_name: Option<String>,

    #[schemars(description = "Reference to a vendor entity; may be absent even when vendorName is set")]
    pub vendor_id: Option<String>,

    pub status: InvoiceStatus,

    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,

    pub category: Option<Category>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub invoice_number: Option<String>,
    pub title: String,
    pub notes: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Explicit structured filters a caller may pass alongside free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilters {
    pub status: Option<InvoiceStatus>,

    #[schemars(description = "Keyword searched across invoice number, vendor name, title and notes")]
    pub search: Option<String>,

    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
