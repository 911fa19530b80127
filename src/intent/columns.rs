use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::intent::synonyms::COLUMN_SYNONYMS;
use crate::intent::tables::contains_word;
use crate::intent::{Aggregate, AggregateFn};
use crate::schema::Table;

/// What the SELECT list should contain for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSelection {
    /// Every column of the table (`SELECT *` semantics, rendered as the
    /// explicit column list).
    All,
    /// Specific columns, ordered by match score.
    Columns(Vec<String>),
    /// A single aggregate expression replacing the column list.
    Aggregate(Aggregate),
}

static COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:how many|count(?:\s+of)?|number of|total number)\b").unwrap());
static AVG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:average|avg|mean)(?:\s+of)?\s+(\w+)").unwrap());
static SUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:sum|total)(?:\s+of)?\s+(\w+)").unwrap());
static MAX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:maximum|max)(?:\s+of)?\s+(\w+)").unwrap());
static MIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:minimum|min)(?:\s+of)?\s+(\w+)").unwrap());
static ALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\ball\b|\beverything\b|\*").unwrap());

/// Detect the column selection for a query against one table.
///
/// "all"/"everything"/"*" short-circuits to every column; aggregate phrasing
/// ("count of X", "average X") yields a single aggregate expression;
/// otherwise columns are scored — direct name match above synonym match —
/// and returned in descending score order. No reference at all means every
/// column.
pub fn detect_columns(text: &str, table: &Table) -> ColumnSelection {
    let lower = text.to_lowercase();

    if let Some(aggregate) = detect_aggregate(&lower, table) {
        debug!(function = %aggregate.function, field = %aggregate.field, "aggregate phrasing detected");
        return ColumnSelection::Aggregate(aggregate);
    }

    if ALL_RE.is_match(&lower) {
        return ColumnSelection::All;
    }

    let mut scored: Vec<(i32, String)> = vec![];
    for column in &table.columns {
        let score = column_score(&lower, table, &column.name);
        if score > 0 {
            scored.push((score, column.name.clone()));
        }
    }

    if scored.is_empty() {
        return ColumnSelection::All;
    }

    // Stable sort keeps schema order among equal scores.
    scored.sort_by_key(|(score, _)| -score);
    ColumnSelection::Columns(scored.into_iter().map(|(_, name)| name).collect())
}

/// Direct name match scores higher than a synonym match.
fn column_score(lower: &str, table: &Table, column: &str) -> i32 {
    if contains_word(lower, &column.to_lowercase()) {
        return 2;
    }
    let matched = COLUMN_SYNONYMS
        .iter()
        .any(|(word, target)| *target == column && contains_word(lower, word));
    if matched && table.has_column(column) { 1 } else { 0 }
}

/// Map aggregate phrasing to a single aggregate expression. Count may be
/// bare (`COUNT(*)`); the other functions require a resolvable column.
fn detect_aggregate(lower: &str, table: &Table) -> Option<Aggregate> {
    for (re, function) in [
        (&*AVG_RE, AggregateFn::Avg),
        (&*SUM_RE, AggregateFn::Sum),
        (&*MAX_RE, AggregateFn::Max),
        (&*MIN_RE, AggregateFn::Min),
    ] {
        if let Some(caps) = re.captures(lower) {
            let word = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            if let Some(field) = resolve_column(word, table) {
                return Some(Aggregate::new(function, &field));
            }
        }
    }

    if COUNT_RE.is_match(lower) {
        return Some(Aggregate::count_all());
    }

    None
}

/// Resolve a word to a column of the table, directly or through the synonym
/// dictionary.
pub(crate) fn resolve_column(word: &str, table: &Table) -> Option<String> {
    if let Some(column) = table.column(word) {
        return Some(column.name.clone());
    }
    COLUMN_SYNONYMS
        .iter()
        .find(|(syn, target)| *syn == word && table.has_column(target))
        .map(|(_, target)| (*target).to_string())
}
