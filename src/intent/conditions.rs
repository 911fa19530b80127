use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::intent::columns::resolve_column;
use crate::intent::{Condition, Operator, SqlValue};
use crate::schema::Table;

/// Ordered condition templates. Compound operators come before the plain
/// ones they contain ("greater than or equal to" before "greater than",
/// "is not" before "is") and matched fields are deduplicated so a later
/// template cannot re-capture an already-claimed field.
static CONDITION_TEMPLATES: Lazy<Vec<(Regex, Operator)>> = Lazy::new(|| {
    let value = r#"['"]?([\w.@-]+)['"]?"#;
    let mut templates = vec![];
    for (phrase, operator) in [
        (r"(?:is\s+)?(?:greater than or equal to|at least|>=)", Operator::GtEq),
        (r"(?:is\s+)?(?:less than or equal to|at most|<=)", Operator::LtEq),
        (r"(?:is not|not equal to|does not equal|!=|<>)", Operator::NotEq),
        (r"(?:is\s+)?(?:greater than|more than|above|over|>)", Operator::Gt),
        (r"(?:is\s+)?(?:less than|smaller than|below|under|<)", Operator::Lt),
        (r"(?:contains|has|includes|like)", Operator::Like),
        (r"(?:is|equals|equal to|=)", Operator::Eq),
    ] {
        let re = Regex::new(&format!(r"(?i)(\w+)\s+{phrase}\s+{value}")).unwrap();
        templates.push((re, operator));
    }
    templates
});

static FEMALE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfemales?\b").unwrap());
static MALE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmales?\b").unwrap());

/// Detect WHERE conditions from the text. A match is kept only when the
/// referenced field exists on the table (directly or by synonym);
/// numeric-looking values are coerced and LIKE values are wrapped in `%`.
pub fn detect_conditions(text: &str, table: &Table) -> Vec<Condition> {
    let mut conditions: Vec<Condition> = vec![];

    for (re, operator) in CONDITION_TEMPLATES.iter() {
        for caps in re.captures_iter(text) {
            let word = caps.get(1).map(|m| m.as_str()).unwrap_or_default().to_lowercase();
            let raw = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            let Some(field) = resolve_column(&word, table) else {
                continue;
            };
            if conditions.iter().any(|c| c.field == field) {
                continue;
            }

            let value = match operator {
                Operator::Like => SqlValue::Text(format!("%{raw}%")),
                _ => SqlValue::coerce(raw),
            };
            debug!(field = %field, operator = %operator, "condition matched");
            conditions.push(Condition {
                field,
                operator: *operator,
                value,
            });
        }
    }

    // Domain shorthand: "male"/"female" on the patients table is a gender
    // equality filter even without an explicit "gender is ..." phrase.
    if table.name.eq_ignore_ascii_case("patients")
        && table.has_column("gender")
        && !conditions.iter().any(|c| c.field == "gender")
    {
        if FEMALE_RE.is_match(text) {
            conditions.push(gender_condition("female"));
        } else if MALE_RE.is_match(text) {
            conditions.push(gender_condition("male"));
        }
    }

    conditions
}

fn gender_condition(value: &str) -> Condition {
    Condition {
        field: "gender".to_string(),
        operator: Operator::Eq,
        value: SqlValue::Text(value.to_string()),
    }
}
