use tracing::debug;

use crate::sql::SqlClauses;

const DOCTOR_JOIN: &str = "LEFT JOIN doctors ON patients.doctor_id = doctors.id";
const DOCTOR_NAME_ITEM: &str = "doctors.name as doctor_name";

/// Explicit patient column list used to replace `*` once a join is in play,
/// so `id`/`name` from the joined doctors table cannot collide.
const PATIENT_COLUMNS: &str = "patients.id, patients.name, patients.age, patients.gender, \
patients.address, patients.phone, patients.email, patients.doctor_id, \
patients.medical_history, patients.last_visit";

/// Raise undersized limits so the joined view shows a useful page.
const MIN_LIMIT: u64 = 10;
const RAISED_LIMIT: u64 = 20;

/// Add the doctor name to patient queries.
///
/// Mirrors `enhance_doctor_queries` for the patients→doctors relationship,
/// and additionally expands `SELECT *` / `SELECT patients.*` into the
/// explicit column list and raises a LIMIT below 10 up to 20. Total and
/// idempotent.
pub fn enhance_patient_queries(sql: &str) -> String {
    let Some(mut clauses) = SqlClauses::parse(sql) else {
        return sql.to_string();
    };
    if !clauses.from_table().eq_ignore_ascii_case("patients") {
        return sql.to_string();
    }

    let had_doctor_join = clauses.has_join_with("doctors");
    if !had_doctor_join {
        clauses.joins.insert(0, DOCTOR_JOIN.to_string());
        if !clauses.selects_column("doctor_name") {
            clauses.select.push(DOCTOR_NAME_ITEM.to_string());
        }
    }

    // With a join present, a bare star is ambiguous; expand it.
    for item in clauses.select.iter_mut() {
        if *item == "*" || item.eq_ignore_ascii_case("patients.*") {
            *item = PATIENT_COLUMNS.to_string();
        }
    }

    if let Some(limit) = clauses.limit {
        if limit < MIN_LIMIT {
            clauses.limit = Some(RAISED_LIMIT);
        }
    }

    let enhanced = clauses.render();
    debug!(sql = %enhanced, "enhanced patient query");
    enhanced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injects_join_display_column_and_expands_star() {
        let enhanced = enhance_patient_queries("SELECT * FROM patients WHERE age > 30;");
        assert!(enhanced.contains("LEFT JOIN doctors ON patients.doctor_id = doctors.id"));
        assert!(enhanced.contains("doctors.name as doctor_name"));
        assert!(enhanced.contains("patients.medical_history"));
        assert!(!enhanced.contains("SELECT *"));
        assert!(enhanced.contains("WHERE age > 30"));
    }

    #[test]
    fn expands_qualified_star_when_join_already_present() {
        let sql = "SELECT patients.* FROM patients LEFT JOIN doctors ON patients.doctor_id = doctors.id;";
        let enhanced = enhance_patient_queries(sql);
        assert!(enhanced.starts_with("SELECT patients.id, patients.name"));
        // the existing join is kept, not duplicated
        assert_eq!(enhanced.matches("JOIN doctors").count(), 1);
    }

    #[test]
    fn raises_small_limits() {
        let enhanced = enhance_patient_queries("SELECT name FROM patients LIMIT 5;");
        assert!(enhanced.ends_with("LIMIT 20;"));
    }

    #[test]
    fn keeps_reasonable_limits() {
        let enhanced = enhance_patient_queries("SELECT name FROM patients LIMIT 50;");
        assert!(enhanced.ends_with("LIMIT 50;"));
    }

    #[test]
    fn idempotent() {
        let once = enhance_patient_queries("SELECT * FROM patients LIMIT 5;");
        let twice = enhance_patient_queries(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn non_patient_queries_untouched() {
        let sql = "SELECT * FROM doctors;";
        assert_eq!(enhance_patient_queries(sql), sql);
    }
}
