use crate::error::Result;
use crate::predicate::PredicateSet;
use crate::schema::Invoice;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    pub fn first(limit: u64) -> Self {
        Self { offset: 0, limit }
    }
}

/// The external query-execution collaborator.
///
/// Implementations must support every constraint kind a predicate set can
/// carry: case-insensitive substring, numeric comparator/range, date range,
/// tag membership and the OR disjunction across named fields. Fetched
/// records come back with category and vendor joined. Failures surface as
/// [`crate::InsightsError::Store`] and are propagated to the caller
/// untouched; this crate never retries.
pub trait InvoiceStore {
    fn count(&self, predicates: &PredicateSet) -> Result<u64>;

    fn fetch(&self, predicates: &PredicateSet, page: Page) -> Result<Vec<Invoice>>;
}
