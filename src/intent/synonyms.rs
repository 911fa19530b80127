//! Fixed synonym dictionaries mapping everyday phrasing to schema names.
//!
//! Entries are checked in order, so more specific words come first. The
//! dictionaries are intentionally small and domain-shaped; anything not
//! listed here must be matched by its real schema name.

use once_cell::sync::Lazy;

/// word → table name. Only applies when the target table exists in the
/// supplied schema.
pub static TABLE_SYNONYMS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("physicians", "doctors"),
        ("physician", "doctors"),
        ("clinicians", "doctors"),
        ("clinician", "doctors"),
        ("doctor", "doctors"),
        ("patient", "patients"),
        ("hospitals", "organizations"),
        ("hospital", "organizations"),
        ("clinics", "organizations"),
        ("clinic", "organizations"),
        ("practices", "organizations"),
        ("practice", "organizations"),
        ("organisations", "organizations"),
        ("organisation", "organizations"),
        ("organization", "organizations"),
        ("orgs", "organizations"),
        ("org", "organizations"),
    ]
});

/// word → column name. Checked against a table only when that table has the
/// target column.
pub static COLUMN_SYNONYMS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("speciality", "specialty"),
        ("specialization", "specialty"),
        ("specialisation", "specialty"),
        ("sex", "gender"),
        ("phone number", "phone"),
        ("telephone", "phone"),
        ("e-mail", "email"),
        ("mail", "email"),
        ("location", "address"),
        ("residence", "address"),
        ("medical record", "medical_history"),
        ("medical records", "medical_history"),
        ("history", "medical_history"),
        ("last seen", "last_visit"),
        ("visit", "last_visit"),
        ("years old", "age"),
    ]
});

/// Look up the table a synonym maps to, if any.
pub fn table_for_synonym(word: &str) -> Option<&'static str> {
    TABLE_SYNONYMS
        .iter()
        .find(|(syn, _)| *syn == word)
        .map(|(_, table)| *table)
}
