use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::intent::columns::resolve_column;
use crate::intent::tables::contains_word;
use crate::intent::{OrderBy, SortDirection};
use crate::schema::Table;

static SORT_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:sort(?:ed)?\s+by|order(?:ed)?\s+by)\s+(\w+)").unwrap());
static DESC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bdesc(?:ending)?\b|\bhighest\s+to\s+lowest\b|\bhigh\s+to\s+low\b").unwrap()
});
static ASC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\basc(?:ending)?\b|\blowest\s+to\s+highest\b|\blow\s+to\s+high\b").unwrap()
});
static OLDEST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:oldest|elder(?:ly)?)\b").unwrap());
static YOUNGEST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\byoung(?:est)?\b").unwrap());

/// Detect ORDER BY fields.
///
/// "sort by X"/"order by X" names the field directly; bare direction phrases
/// ("ascending", "highest to lowest") order whichever columns the text
/// mentions. An explicit asc/desc token anywhere overrides the phrase
/// default. "oldest" and "youngest" are age shorthands when the table has an
/// age column.
pub fn detect_sorting(text: &str, table: &Table) -> Vec<OrderBy> {
    let lower = text.to_lowercase();
    let mut order_by: Vec<OrderBy> = vec![];

    // Age shorthands first so "oldest patients sorted by name" keeps age as
    // the primary sort key.
    if table.has_column("age") {
        if OLDEST_RE.is_match(&lower) {
            order_by.push(OrderBy { field: "age".to_string(), direction: SortDirection::Desc });
        } else if YOUNGEST_RE.is_match(&lower) {
            order_by.push(OrderBy { field: "age".to_string(), direction: SortDirection::Asc });
        }
    }

    let explicit = explicit_direction(&lower);

    for caps in SORT_BY_RE.captures_iter(&lower) {
        if let Some(field) = resolve_column(&caps[1], table) {
            push_order(&mut order_by, field, explicit.unwrap_or_default());
        }
    }

    // Bare direction phrase without "sort by": order the mentioned columns.
    if order_by.is_empty() {
        if let Some(direction) = explicit {
            for column in &table.columns {
                if contains_word(&lower, &column.name.to_lowercase()) {
                    push_order(&mut order_by, column.name.clone(), direction);
                }
            }
        }
    }

    if !order_by.is_empty() {
        debug!(order = ?order_by, "sorting detected");
    }
    order_by
}

/// An asc/desc token anywhere in the text wins over phrase defaults.
fn explicit_direction(lower: &str) -> Option<SortDirection> {
    if DESC_RE.is_match(lower) {
        Some(SortDirection::Desc)
    } else if ASC_RE.is_match(lower) {
        Some(SortDirection::Asc)
    } else {
        None
    }
}

fn push_order(order_by: &mut Vec<OrderBy>, field: String, direction: SortDirection) {
    if !order_by.iter().any(|o| o.field == field) {
        order_by.push(OrderBy { field, direction });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::patients_table;

    #[test]
    fn sort_by_defaults_to_ascending() {
        let table = patients_table();
        let order = detect_sorting("patients sorted by name", &table);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].field, "name");
        assert_eq!(order[0].direction, SortDirection::Asc);
    }

    #[test]
    fn explicit_descending_token_overrides() {
        let table = patients_table();
        let order = detect_sorting("patients sorted by age descending", &table);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].field, "age");
        assert_eq!(order[0].direction, SortDirection::Desc);
    }

    #[test]
    fn highest_to_lowest_orders_mentioned_column() {
        let table = patients_table();
        let order = detect_sorting("patient age from highest to lowest", &table);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].field, "age");
        assert_eq!(order[0].direction, SortDirection::Desc);
    }

    #[test]
    fn oldest_shorthand() {
        let table = patients_table();
        let order = detect_sorting("show the oldest patients", &table);
        assert_eq!(order, vec![OrderBy { field: "age".to_string(), direction: SortDirection::Desc }]);
    }

    #[test]
    fn youngest_shorthand() {
        let table = patients_table();
        let order = detect_sorting("who are the youngest patients", &table);
        assert_eq!(order, vec![OrderBy { field: "age".to_string(), direction: SortDirection::Asc }]);
    }

    #[test]
    fn no_trigger_no_sorting() {
        let table = patients_table();
        assert!(detect_sorting("show me all patients", &table).is_empty());
    }
}
