use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::intent::columns::resolve_column;
use crate::schema::Table;

static EXPLICIT_GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:group(?:ed)?\s+by|categoriz(?:e|ed)\s+by|categoris(?:e|ed)\s+by)\s+(\w+(?:\s*,\s*\w+)*)")
        .unwrap()
});
static AGGREGATE_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:count|sum|average|avg|mean|min|minimum|max|maximum|total|how many)\b").unwrap()
});
static BY_FIELD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bby\s+(\w+)").unwrap());
static GENDER_DISTRIBUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bgender\s+distribution\b|\bby\s+gender\b").unwrap());

/// Detect GROUP BY fields.
///
/// Triggered by an explicit grouping phrase ("group by X", "categorized by
/// X") or, when an aggregate keyword is present, by a "by X" phrase naming a
/// column. "gender distribution"/"by gender" on the patients table groups by
/// gender even without any trigger phrase.
pub fn detect_grouping(text: &str, table: &Table) -> Vec<String> {
    let mut group_by: Vec<String> = vec![];

    if table.name.eq_ignore_ascii_case("patients")
        && table.has_column("gender")
        && GENDER_DISTRIBUTION_RE.is_match(text)
    {
        group_by.push("gender".to_string());
    }

    if let Some(caps) = EXPLICIT_GROUP_RE.captures(text) {
        for word in caps[1].split(',') {
            push_resolved(word.trim(), table, &mut group_by);
        }
    } else if AGGREGATE_KEYWORD_RE.is_match(text) {
        for caps in BY_FIELD_RE.captures_iter(text) {
            push_resolved(&caps[1], table, &mut group_by);
        }
    }

    if !group_by.is_empty() {
        debug!(fields = ?group_by, "grouping detected");
    }
    group_by
}

fn push_resolved(word: &str, table: &Table, group_by: &mut Vec<String>) {
    if let Some(field) = resolve_column(&word.to_lowercase(), table) {
        if !group_by.contains(&field) {
            group_by.push(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::{doctors_table, patients_table};

    #[test]
    fn explicit_group_by_phrase() {
        let table = doctors_table();
        assert_eq!(
            detect_grouping("count doctors grouped by specialty", &table),
            vec!["specialty".to_string()]
        );
    }

    #[test]
    fn aggregate_keyword_with_by_field() {
        let table = doctors_table();
        assert_eq!(
            detect_grouping("how many doctors by specialty", &table),
            vec!["specialty".to_string()]
        );
    }

    #[test]
    fn by_field_without_aggregate_keyword_is_ignored() {
        let table = doctors_table();
        assert!(detect_grouping("doctors by specialty", &table).is_empty());
    }

    #[test]
    fn gender_distribution_special_case() {
        let table = patients_table();
        assert_eq!(
            detect_grouping("patients by gender", &table),
            vec!["gender".to_string()]
        );
        assert_eq!(
            detect_grouping("show the gender distribution", &table),
            vec!["gender".to_string()]
        );
    }

    #[test]
    fn gender_special_case_does_not_duplicate() {
        let table = patients_table();
        assert_eq!(
            detect_grouping("count patients by gender", &table),
            vec!["gender".to_string()]
        );
    }

    #[test]
    fn unknown_field_is_dropped() {
        let table = doctors_table();
        assert!(detect_grouping("count doctors grouped by shoe_size", &table).is_empty());
    }
}
