use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::intent::synonyms::TABLE_SYNONYMS;
use crate::intent::tables::contains_word;
use crate::intent::{JoinSpec, JoinType};
use crate::schema::{SchemaModel, Table};

static LEFT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bleft\s+join\b|\bincluding\s+all\b").unwrap());
static RIGHT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bright\s+join\b").unwrap());
static FULL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfull\s+join\b|\ball\s+records\b").unwrap());

/// Detect joins to every other table mentioned in the text.
///
/// Join conditions come from a foreign-key column on either side whose name
/// embeds the other table's singularized name plus `_id` (or a declared
/// foreign key). The patients↔doctors relationship is hardcoded as a LEFT
/// JOIN via `doctor_id` whenever the other table is mentioned.
pub fn detect_joins(text: &str, primary: &str, schema: &SchemaModel) -> Vec<JoinSpec> {
    let lower = text.to_lowercase();
    let Some(primary_table) = schema.get(primary) else {
        return vec![];
    };

    let mut joins: Vec<JoinSpec> = vec![];
    for other in &schema.tables {
        if other.name.eq_ignore_ascii_case(primary) {
            continue;
        }
        if !mentions_table(&lower, &other.name) {
            continue;
        }

        if let Some(spec) = patient_doctor_join(primary, &other.name) {
            debug!(table = %spec.table, "hardcoded patient/doctor join");
            joins.push(spec);
            continue;
        }

        if let Some(condition) = join_condition(primary_table, other) {
            joins.push(JoinSpec {
                table: other.name.clone(),
                condition,
                join_type: join_type_from_text(&lower),
            });
        }
    }

    joins
}

fn mentions_table(lower: &str, name: &str) -> bool {
    if contains_word(lower, &name.to_lowercase()) {
        return true;
    }
    TABLE_SYNONYMS
        .iter()
        .any(|(word, target)| target.eq_ignore_ascii_case(name) && contains_word(lower, word))
}

/// patients↔doctors is always a LEFT JOIN through `patients.doctor_id`,
/// regardless of what generic detection would produce.
fn patient_doctor_join(primary: &str, other: &str) -> Option<JoinSpec> {
    let pair = (primary.to_lowercase(), other.to_lowercase());
    match (pair.0.as_str(), pair.1.as_str()) {
        ("patients", "doctors") | ("doctors", "patients") => Some(JoinSpec {
            table: other.to_string(),
            condition: "patients.doctor_id = doctors.id".to_string(),
            join_type: JoinType::Left,
        }),
        _ => None,
    }
}

/// Find the FK column linking the two tables: `<singular>_id` on either
/// side, falling back to declared foreign keys.
fn join_condition(primary: &Table, other: &Table) -> Option<String> {
    let fk_on_primary = format!("{}_id", singularize(&other.name));
    if primary.has_column(&fk_on_primary) {
        return Some(format!("{}.{} = {}.id", primary.name, fk_on_primary, other.name));
    }

    let fk_on_other = format!("{}_id", singularize(&primary.name));
    if other.has_column(&fk_on_other) {
        return Some(format!("{}.{} = {}.id", other.name, fk_on_other, primary.name));
    }

    if let Some(fk) = primary.foreign_key_to(&other.name) {
        return Some(format!(
            "{}.{} = {}.{}",
            primary.name, fk.column, other.name, fk.foreign_column
        ));
    }
    if let Some(fk) = other.foreign_key_to(&primary.name) {
        return Some(format!(
            "{}.{} = {}.{}",
            other.name, fk.column, primary.name, fk.foreign_column
        ));
    }

    None
}

fn join_type_from_text(lower: &str) -> JoinType {
    if LEFT_RE.is_match(lower) {
        JoinType::Left
    } else if RIGHT_RE.is_match(lower) {
        JoinType::Right
    } else if FULL_RE.is_match(lower) {
        JoinType::Full
    } else {
        JoinType::Inner
    }
}

fn singularize(name: &str) -> &str {
    name.strip_suffix('s').unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::clinic_schema;

    #[test]
    fn patient_doctor_is_hardcoded_left_join() {
        let schema = clinic_schema();
        let joins = detect_joins("patients with their doctors", "patients", &schema);
        assert_eq!(joins.len(), 1);
        assert_eq!(joins[0].table, "doctors");
        assert_eq!(joins[0].join_type, JoinType::Left);
        assert_eq!(joins[0].condition, "patients.doctor_id = doctors.id");
    }

    #[test]
    fn doctor_organization_join_via_fk_column() {
        let schema = clinic_schema();
        let joins = detect_joins("doctors and their organizations", "doctors", &schema);
        assert_eq!(joins.len(), 1);
        assert_eq!(joins[0].table, "organizations");
        assert_eq!(joins[0].join_type, JoinType::Inner);
        assert_eq!(joins[0].condition, "doctors.organization_id = organizations.id");
    }

    #[test]
    fn left_join_phrase_sets_type() {
        let schema = clinic_schema();
        let joins = detect_joins("doctors including all organizations", "doctors", &schema);
        assert_eq!(joins[0].join_type, JoinType::Left);
    }

    #[test]
    fn unmentioned_tables_are_not_joined() {
        let schema = clinic_schema();
        assert!(detect_joins("show me all doctors", "doctors", &schema).is_empty());
    }
}
