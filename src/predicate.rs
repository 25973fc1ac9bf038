use crate::extractor::{Entity, EntityExtractor};
use crate::schema::{InvoiceFilters, InvoiceStatus};
use chrono::NaiveDate;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Numeric constraint on the invoice amount.
///
/// Less-than and greater-than bounds compose into one comparator; an exact
/// value or an explicit inclusive range each stand alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AmountFilter {
    Equals(f64),
    Between { gte: f64, lte: f64 },
    Comparator {
        #[serde(skip_serializing_if = "Option::is_none")]
        lt: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        gt: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DateRangeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<NaiveDate>,
}

/// Free-text-searchable invoice fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    InvoiceNumber,
    VendorName,
    Title,
    Notes,
}

const SEARCH_FIELDS: [SearchField; 4] = [
    SearchField::InvoiceNumber,
    SearchField::VendorName,
    SearchField::Title,
    SearchField::Notes,
];

/// One alternative in the OR list: a case-insensitive substring match on a
/// named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldMatch {
    pub field: SearchField,
    pub contains: String,
}

/// Canonical, store-agnostic representation of "which invoices match".
///
/// Immutable once built for a query; handed unchanged to the store
/// collaborator. Substring constraints are case-insensitive, tags are
/// any-of membership, and `or` is a disjunction across named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredicateSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<DateRangeFilter>,

    #[serde(rename = "or", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<FieldMatch>,
}

impl PredicateSet {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.vendor_name.is_none()
            && self.category_name.is_none()
            && self.tags.is_empty()
            && self.amount.is_none()
            && self.issue_date.is_none()
            && self.any_of.is_empty()
    }
}

/// Merges caller-supplied explicit filters with extracted entities into one
/// predicate set. Total for any input: unrecognized text just yields an
/// empty (or caller-filters-only) set.
pub struct PredicateBuilder {
    today: NaiveDate,
}

impl PredicateBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn build(&self, free_text: &str, filters: Option<&InvoiceFilters>) -> PredicateSet {
        let mut set = PredicateSet::default();

        if let Some(filters) = filters {
            apply_explicit_filters(&mut set, filters);
        }

        let entities = EntityExtractor::new(self.today).extract(free_text);
        for entity in entities {
            merge_entity(&mut set, entity);
        }

        debug!(
            "Compiled predicate set with {} OR alternatives",
            set.any_of.len()
        );
        set
    }
}

/// Compiles a free-text query (plus optional explicit filters) into the
/// canonical predicate set. Never fails.
pub fn compile_query(
    free_text: &str,
    filters: Option<&InvoiceFilters>,
    today: NaiveDate,
) -> PredicateSet {
    PredicateBuilder::new(today).build(free_text, filters)
}

fn apply_explicit_filters(set: &mut PredicateSet, filters: &InvoiceFilters) {
    set.status = filters.status;
    set.category_name = filters.category.clone();
    set.tags.extend(filters.tags.iter().cloned());

    if let Some(search) = &filters.search {
        let keyword = search.trim();
        if !keyword.is_empty() {
            for field in SEARCH_FIELDS {
                set.any_of.push(FieldMatch {
                    field,
                    contains: keyword.to_string(),
                });
            }
        }
    }

    if filters.start_date.is_some() || filters.end_date.is_some() {
        set.issue_date = Some(DateRangeFilter {
            gte: filters.start_date,
            lte: filters.end_date,
        });
    }
}

/// Folds one extracted entity into the set. Explicit filters win for every
/// field except the date range, which merges key-by-key with the
/// later-applied (extracted) keys taking precedence.
fn merge_entity(set: &mut PredicateSet, entity: Entity) {
    match entity {
        Entity::Status(status) => {
            if set.status.is_none() {
                set.status = Some(status);
            }
        }
        Entity::DateRange { start, end } => {
            let range = set.issue_date.get_or_insert_with(DateRangeFilter::default);
            range.gte = Some(start);
            range.lte = Some(end);
        }
        Entity::Vendor(vendor) => {
            if set.vendor_name.is_none() {
                set.vendor_name = Some(vendor);
            }
        }
        Entity::Category(category) => {
            if set.category_name.is_none() {
                set.category_name = Some(category);
            }
        }
        Entity::Tag(tag) => {
            if !set.tags.contains(&tag) {
                set.tags.push(tag);
            }
        }
        Entity::Amount(amount) => {
            set.amount = Some(amount);
        }
        Entity::Term(term) => {
            for field in SEARCH_FIELDS {
                set.any_of.push(FieldMatch {
                    field,
                    contains: term.clone(),
                });
            }
        }
    }
}
