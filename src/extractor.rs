use crate::predicate::AmountFilter;
use crate::schema::InvoiceStatus;
use crate::utils::{last_completed_week, month_window, months_back};
use chrono::{Datelike, NaiveDate};
use log::debug;

/// A typed fragment recognized in free query text.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Status(InvoiceStatus),
    DateRange { start: NaiveDate, end: NaiveDate },
    Vendor(String),
    Category(String),
    Tag(String),
    Amount(AmountFilter),
    Term(String),
}

const STATUS_WORDS: &[&str] = &["overdue", "paid", "pending", "archived", "cancelled"];
const DATE_WORDS: &[&str] = &["last", "this", "month", "year", "week"];
const CONNECTOR_WORDS: &[&str] = &[
    "from", "vendor", "category", "tag", "tagged", "with", "as", "and", "in",
];
const AMOUNT_WORDS: &[&str] = &[
    "less", "than", "under", "below", "maximum", "max", "more", "over", "above", "minimum", "min",
    "exactly", "equal", "equals", "between", "<", ">", "=",
];
// Query filler that should never survive as a residual search term.
const FILLER_WORDS: &[&str] = &[
    "show", "find", "list", "display", "search", "give", "please", "invoice", "invoices", "bill",
    "bills",
];

const LT_SINGLE: &[&str] = &["under", "below", "maximum", "max", "<"];
const LT_PAIRS: &[(&str, &str)] = &[("less", "than")];
const GT_SINGLE: &[&str] = &["over", "above", "minimum", "min", ">"];
const GT_PAIRS: &[(&str, &str)] = &[("more", "than")];
const EQ_SINGLE: &[&str] = &["exactly", "equals", "="];
const EQ_PAIRS: &[(&str, &str)] = &[("equal", "to")];

/// Extracts typed entities from a free-text invoice query.
///
/// Each pattern family is evaluated independently in a fixed order; within a
/// family the first satisfied alternative wins. The current date is an
/// explicit parameter so date-phrase resolution stays deterministic.
pub struct EntityExtractor {
    today: NaiveDate,
}

impl EntityExtractor {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn extract(&self, text: &str) -> Vec<Entity> {
        let text = text.to_lowercase();
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let words: Vec<String> = tokens.iter().map(|t| clean_word(t)).collect();
        let mut consumed = vec![false; tokens.len()];
        let mut entities = Vec::new();

        if let Some(status) = extract_status(&words) {
            entities.push(Entity::Status(status));
        }

        if let Some((start, end)) = self.extract_date_range(&text) {
            entities.push(Entity::DateRange { start, end });
        }

        if let Some(vendor) = capture_after(&words, &mut consumed, &["from", "vendor"], &[]) {
            entities.push(Entity::Vendor(vendor));
        }

        if let Some(category) = capture_after(&words, &mut consumed, &["category"], &[]) {
            entities.push(Entity::Category(category));
        }

        if let Some(tag) = capture_after(&words, &mut consumed, &["tag", "tagged"], &["with", "as"])
        {
            entities.push(Entity::Tag(tag));
        }

        if let Some(amount) = extract_amount(&words, &mut consumed) {
            entities.push(Entity::Amount(amount));
        }

        for term in residual_terms(&words, &consumed) {
            entities.push(Entity::Term(term));
        }

        debug!("Extracted {} entities from query text", entities.len());
        entities
    }

    fn extract_date_range(&self, text: &str) -> Option<(NaiveDate, NaiveDate)> {
        let (year, month) = (self.today.year(), self.today.month());

        if text.contains("last month") {
            let (y, m) = months_back(year, month, 1);
            return Some(month_window(y, m));
        }
        if text.contains("this month") {
            return Some(month_window(year, month));
        }
        if text.contains("this year") {
            return Some(year_window(year));
        }
        if text.contains("last year") {
            return Some(year_window(year - 1));
        }
        if text.contains("last week") {
            return Some(last_completed_week(self.today));
        }
        None
    }
}

fn year_window(year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
    )
}

/// Word with surrounding punctuation stripped, for vocabulary comparisons.
/// Pure-symbol tokens (`<`, `>`, `=`) pass through untouched.
fn clean_word(token: &str) -> String {
    let cleaned =
        token.trim_matches(|c: char| !(c.is_alphanumeric() || c == '$' || c == '€' || c == '£'));
    if cleaned.is_empty() {
        token.to_string()
    } else {
        cleaned.to_string()
    }
}

fn extract_status(words: &[String]) -> Option<InvoiceStatus> {
    let has = |w: &str| words.iter().any(|t| t == w);

    if has("overdue") {
        Some(InvoiceStatus::Overdue)
    } else if has("paid") {
        Some(InvoiceStatus::Paid)
    } else if has("pending") {
        Some(InvoiceStatus::Pending)
    } else if has("archived") || has("cancelled") {
        Some(InvoiceStatus::Cancelled)
    } else {
        None
    }
}

fn is_reserved(word: &str) -> bool {
    STATUS_WORDS.contains(&word)
        || DATE_WORDS.contains(&word)
        || CONNECTOR_WORDS.contains(&word)
        || AMOUNT_WORDS.contains(&word)
        || FILLER_WORDS.contains(&word)
}

/// Captures the trailing word run after the first occurrence of a trigger
/// word, skipping an optional leading connector, stopping at any reserved
/// vocabulary word or numeric token. Returns None when nothing follows.
fn capture_after(
    words: &[String],
    consumed: &mut [bool],
    triggers: &[&str],
    skip_leading: &[&str],
) -> Option<String> {
    let trigger_at = words
        .iter()
        .position(|w| triggers.contains(&w.as_str()))?;

    let mut idx = trigger_at + 1;
    if idx < words.len() && skip_leading.contains(&words[idx].as_str()) {
        idx += 1;
    }

    let mut run = Vec::new();
    while idx < words.len() {
        let word = &words[idx];
        if is_reserved(word) || parse_amount_literal(word).is_some() {
            break;
        }
        consumed[idx] = true;
        run.push(word.clone());
        idx += 1;
    }

    if run.is_empty() {
        None
    } else {
        Some(run.join(" "))
    }
}

/// Parses a number literal, stripping a leading currency symbol and
/// thousands separators first. Returns None when nothing numeric remains.
fn parse_amount_literal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim_start_matches(['$', '€', '£'])
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Finds the first comparator synonym followed by a parseable number.
/// Two-word synonyms are tried at each position before single words.
fn find_comparator(
    words: &[String],
    consumed: &mut [bool],
    singles: &[&str],
    pairs: &[(&str, &str)],
) -> Option<f64> {
    for i in 0..words.len() {
        for (first, second) in pairs {
            if words[i] == *first && words.get(i + 1).map(|w| w.as_str()) == Some(*second) {
                if let Some(value) = words.get(i + 2).and_then(|w| parse_amount_literal(w)) {
                    consumed[i] = true;
                    consumed[i + 1] = true;
                    consumed[i + 2] = true;
                    return Some(value);
                }
            }
        }
        if singles.contains(&words[i].as_str()) {
            if let Some(value) = words.get(i + 1).and_then(|w| parse_amount_literal(w)) {
                consumed[i] = true;
                consumed[i + 1] = true;
                return Some(value);
            }
        }
    }
    None
}

fn find_between(words: &[String], consumed: &mut [bool]) -> Option<(f64, f64)> {
    for i in 0..words.len() {
        if words[i] != "between" {
            continue;
        }
        let low = words.get(i + 1).and_then(|w| parse_amount_literal(w));
        let connector = words.get(i + 2).map(|w| w.as_str()) == Some("and");
        let high = words.get(i + 3).and_then(|w| parse_amount_literal(w));
        if let (Some(low), true, Some(high)) = (low, connector, high) {
            for offset in 0..4 {
                consumed[i + offset] = true;
            }
            return Some((low, high));
        }
    }
    None
}

/// The four amount sub-patterns, evaluated in order. Less-than and
/// greater-than compose into one comparator; equality and an explicit
/// `between A and B` range each overwrite whatever was set before them.
fn extract_amount(words: &[String], consumed: &mut [bool]) -> Option<AmountFilter> {
    let lt = find_comparator(words, consumed, LT_SINGLE, LT_PAIRS);
    let gt = find_comparator(words, consumed, GT_SINGLE, GT_PAIRS);

    let mut amount = match (lt, gt) {
        (None, None) => None,
        _ => Some(AmountFilter::Comparator { lt, gt }),
    };

    if let Some(value) = find_comparator(words, consumed, EQ_SINGLE, EQ_PAIRS) {
        amount = Some(AmountFilter::Equals(value));
    }

    if let Some((low, high)) = find_between(words, consumed) {
        amount = Some(AmountFilter::Between {
            gte: low,
            lte: high,
        });
    }

    amount
}

/// Tokens left over once every recognized-vocabulary word and captured value
/// is removed: longer than 3 characters, not purely numeric, duplicates kept.
fn residual_terms(words: &[String], consumed: &[bool]) -> Vec<String> {
    words
        .iter()
        .zip(consumed.iter())
        .filter(|(word, &used)| {
            !used
                && word.len() > 3
                && !is_reserved(word)
                && parse_amount_literal(word).is_none()
        })
        .map(|(word, _)| word.clone())
        .collect()
}
