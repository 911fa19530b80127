use tracing::debug;

use crate::error::NlqueryError;
use crate::intent::synonyms::TABLE_SYNONYMS;
use crate::schema::{SchemaModel, Table};

/// Detect the primary table for a query.
///
/// Three passes, in order: direct case-insensitive substring match of each
/// table name, the fixed synonym dictionary, then inference from column
/// names (the table with the most columns mentioned in the text wins).
pub fn detect_table(text: &str, schema: &SchemaModel) -> Option<String> {
    let lower = text.to_lowercase();

    for table in &schema.tables {
        if lower.contains(&table.name.to_lowercase()) {
            return Some(table.name.clone());
        }
    }

    for (word, target) in TABLE_SYNONYMS.iter() {
        if contains_word(&lower, word) && schema.get(target).is_some() {
            debug!(synonym = word, table = target, "table matched by synonym");
            return Some((*target).to_string());
        }
    }

    best_by_column_overlap(&lower, schema).map(|t| {
        debug!(table = %t.name, "table inferred from column names");
        t.name.clone()
    })
}

/// Detect every table named in the query, ordered by first appearance.
///
/// When no table is named directly or by synonym, tables are ranked by how
/// many of their columns appear in the text and the best match is returned
/// alone. When nothing matches at all this is an explicit `NoTableMatched`
/// error; callers decide on a default, not the detector.
pub fn detect_tables(text: &str, schema: &SchemaModel) -> Result<Vec<String>, NlqueryError> {
    if schema.is_empty() {
        return Err(NlqueryError::NoTableMatched);
    }

    let lower = text.to_lowercase();
    let mut matched: Vec<(usize, String)> = vec![];

    for table in &schema.tables {
        let name = table.name.to_lowercase();
        let position = lower.find(&name).or_else(|| {
            TABLE_SYNONYMS
                .iter()
                .filter(|(_, target)| target.eq_ignore_ascii_case(&table.name))
                .filter_map(|(word, _)| find_word(&lower, word))
                .min()
        });
        if let Some(pos) = position {
            matched.push((pos, table.name.clone()));
        }
    }

    if !matched.is_empty() {
        matched.sort_by_key(|(pos, _)| *pos);
        return Ok(matched.into_iter().map(|(_, name)| name).collect());
    }

    best_by_column_overlap(&lower, schema)
        .map(|t| vec![t.name.clone()])
        .ok_or(NlqueryError::NoTableMatched)
}

/// Rank tables by the count of their column names appearing in the text.
/// Ties keep schema order. Returns `None` when no column matches at all.
fn best_by_column_overlap<'a>(lower: &str, schema: &'a SchemaModel) -> Option<&'a Table> {
    let mut best: Option<(&Table, usize)> = None;
    for table in &schema.tables {
        let score = table
            .columns
            .iter()
            .filter(|c| contains_word(lower, &c.name.to_lowercase()))
            .count();
        if score > 0 && best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((table, score));
        }
    }
    best.map(|(t, _)| t)
}

/// Substring match bounded by non-word characters, so "age" does not match
/// inside "page".
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    find_word(haystack, needle).is_some()
}

/// Position of the first word-bounded occurrence of `needle` in `haystack`.
pub(crate) fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let at = start + pos;
        let before_ok = !haystack[..at].chars().next_back().map(is_word).unwrap_or(false);
        let after = at + needle.len();
        let after_ok = !haystack[after..].chars().next().map(is_word).unwrap_or(false);
        if before_ok && after_ok {
            return Some(at);
        }
        start = at + 1;
    }
    None
}
