use tracing::debug;

use crate::sql::SqlClauses;

const ORGANIZATION_JOIN: &str =
    "LEFT JOIN organizations ON doctors.organization_id = organizations.id";
const ORGANIZATION_NAME_ITEM: &str = "organizations.name as organization_name";

/// Add the organization name to doctor queries.
///
/// Statements selecting FROM doctors without an organizations join get a
/// LEFT JOIN and an `organization_name` display column appended to the
/// SELECT list. Total and idempotent: anything that does not match the
/// trigger — including statements the clause splitter cannot shape — is
/// returned unchanged.
pub fn enhance_doctor_queries(sql: &str) -> String {
    let Some(mut clauses) = SqlClauses::parse(sql) else {
        return sql.to_string();
    };
    if !clauses.from_table().eq_ignore_ascii_case("doctors") {
        return sql.to_string();
    }
    if clauses.has_join_with("organizations") {
        return sql.to_string();
    }

    clauses.joins.push(ORGANIZATION_JOIN.to_string());
    if !clauses.selects_column("organization_name") {
        clauses.select.push(ORGANIZATION_NAME_ITEM.to_string());
    }

    let enhanced = clauses.render();
    debug!(sql = %enhanced, "enhanced doctor query");
    enhanced
}
