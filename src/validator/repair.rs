use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Outcome of a validation pass, tagged so callers can tell a clean
/// statement from a mechanical repair from a user-facing diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// No recognized error; the trimmed input (trailing semicolon stripped).
    Passed(String),
    /// A mechanical rewrite was applied; safe to retry.
    Repaired(String),
    /// Not repairable; a message for the user.
    Diagnostic(String),
}

impl Validation {
    /// Collapse to the string the original UI displayed: repaired/clean SQL
    /// or the diagnostic text.
    pub fn into_string(self) -> String {
        match self {
            Validation::Passed(s) | Validation::Repaired(s) | Validation::Diagnostic(s) => s,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Validation::Diagnostic(_))
    }
}

static CLAUSE_WITHOUT_FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)SELECT.*?(?:WHERE|GROUP BY|ORDER BY|LIMIT)").unwrap());
static FROM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFROM\b").unwrap());
static MISSING_FROM_ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)missing FROM-clause entry for table "([^"]+)""#).unwrap());
static MISSING_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)column "([^"]+)" does not exist"#).unwrap());
static AMBIGUOUS_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)column reference "([^"]+)" is ambiguous"#).unwrap());
static FROM_DOCTORS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)FROM\s+doctors\b").unwrap());
static FROM_PATIENTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)FROM\s+patients\b").unwrap());
static FROM_ORGANIZATIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)FROM\s+organizations\b").unwrap());
static JOIN_DOCTORS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)JOIN\s+doctors\b").unwrap());
static JOIN_PATIENTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)JOIN\s+patients\b").unwrap());
static JOIN_ORGANIZATIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)JOIN\s+organizations\b").unwrap());

/// Best-effort validation and repair of a SQL string or database error
/// message.
///
/// This operates on error-message substrings and table-name regexes only;
/// it is a pattern-matched repair tool, not a SQL parser. Trailing
/// semicolons are stripped up front because the execution RPC rejects them.
pub fn validate_and_repair(input: &str) -> Validation {
    let sql = input.trim().trim_end_matches(';').trim_end().to_string();

    if CLAUSE_WITHOUT_FROM_RE.is_match(&sql) && !FROM_RE.is_match(&sql) {
        warn!("sql is missing a FROM clause");
        return Validation::Diagnostic(
            "Error: Missing FROM clause. Please specify which table to query from.".to_string(),
        );
    }

    if let Some(caps) = MISSING_FROM_ENTRY_RE.captures(&sql) {
        let table = caps[1].to_string();
        warn!(table = %table, "missing FROM-clause entry");
        return repair_missing_from_entry(&sql, &table);
    }

    if let Some(caps) = MISSING_COLUMN_RE.captures(&sql) {
        return Validation::Diagnostic(format!(
            "Error: Column \"{}\" does not exist. Please check the column name and table reference.",
            &caps[1]
        ));
    }

    if sql.to_lowercase().contains("syntax error") {
        return Validation::Diagnostic(
            "Error: SQL syntax error. Please check your query syntax.".to_string(),
        );
    }

    if let Some(caps) = AMBIGUOUS_COLUMN_RE.captures(&sql) {
        let column = caps[1].to_string();
        warn!(column = %column, "ambiguous column reference");
        return repair_ambiguous_column(&sql, &column);
    }

    Validation::Passed(sql)
}

/// Inject the appropriate LEFT JOIN when a known sibling table is already
/// in the FROM clause; otherwise suggest a better query.
fn repair_missing_from_entry(sql: &str, table: &str) -> Validation {
    let repaired = match table {
        "organizations" if FROM_DOCTORS_RE.is_match(sql) && !JOIN_ORGANIZATIONS_RE.is_match(sql) => {
            Some(FROM_DOCTORS_RE.replace(
                sql,
                "FROM doctors LEFT JOIN organizations ON doctors.organization_id = organizations.id",
            ))
        }
        "doctors" if FROM_PATIENTS_RE.is_match(sql) && !JOIN_DOCTORS_RE.is_match(sql) => {
            Some(FROM_PATIENTS_RE.replace(
                sql,
                "FROM patients LEFT JOIN doctors ON patients.doctor_id = doctors.id",
            ))
        }
        "patients" if FROM_DOCTORS_RE.is_match(sql) && !JOIN_PATIENTS_RE.is_match(sql) => {
            Some(FROM_DOCTORS_RE.replace(
                sql,
                "FROM doctors LEFT JOIN patients ON patients.doctor_id = doctors.id",
            ))
        }
        _ => None,
    };

    if let Some(fixed) = repaired {
        debug!(sql = %fixed, "repaired missing FROM-clause entry");
        return Validation::Repaired(fixed.into_owned());
    }

    let message = match table {
        "patients" => {
            "Error: To query patient data, try asking 'Show me all patients' or 'List patients with their doctors'"
                .to_string()
        }
        "doctors" => {
            "Error: To query doctor data, try asking 'Show me all doctors' or 'List doctors with their organizations'"
                .to_string()
        }
        "organizations" => {
            "Error: To query organization data, try asking 'Show me all organizations' or 'List doctors by organization'"
                .to_string()
        }
        other => format!(
            "Error: Missing FROM-clause entry for table \"{other}\". Please include this table in your query with the appropriate JOIN."
        ),
    };
    Validation::Diagnostic(message)
}

/// Qualify a bare `id`/`name` with the single known table present in FROM;
/// anything else asks the caller to qualify it.
fn repair_ambiguous_column(sql: &str, column: &str) -> Validation {
    let table = match column {
        "id" if FROM_DOCTORS_RE.is_match(sql) => Some("doctors"),
        "id" if FROM_PATIENTS_RE.is_match(sql) => Some("patients"),
        "name" if FROM_DOCTORS_RE.is_match(sql) => Some("doctors"),
        "name" if FROM_ORGANIZATIONS_RE.is_match(sql) => Some("organizations"),
        _ => None,
    };

    if let Some(table) = table {
        if let Some(fixed) = qualify_first_bare(sql, column, table) {
            debug!(sql = %fixed, "qualified ambiguous column");
            return Validation::Repaired(fixed);
        }
    }

    Validation::Diagnostic(format!(
        "Error: Column reference \"{column}\" is ambiguous. Please qualify this column with the appropriate table name."
    ))
}

/// Replace the first word-bounded occurrence of `column` that is not
/// already qualified (no `.` on either side) with `table.column`.
fn qualify_first_bare(sql: &str, column: &str, table: &str) -> Option<String> {
    let re = Regex::new(&format!(r"\b{}\b", regex::escape(column))).ok()?;
    for m in re.find_iter(sql) {
        let before = sql[..m.start()].chars().next_back();
        let after = sql[m.end()..].chars().next();
        if before == Some('.') || after == Some('.') {
            continue;
        }
        let mut fixed = String::with_capacity(sql.len() + table.len() + 1);
        fixed.push_str(&sql[..m.start()]);
        fixed.push_str(table);
        fixed.push('.');
        fixed.push_str(column);
        fixed.push_str(&sql[m.end()..]);
        return Some(fixed);
    }
    None
}
