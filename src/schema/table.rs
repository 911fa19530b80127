use serde::{Deserialize, Serialize};

use crate::schema::Column;

/// A foreign-key edge between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
}

/// A table as reported by the schema-introspection collaborator.
///
/// `error` carries a diagnostic when introspection partially failed for this
/// table; the detector still uses whatever columns were reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Table {
    pub fn new(name: &str, columns: Vec<Column>) -> Self {
        Self {
            name: name.to_string(),
            columns,
            foreign_keys: vec![],
            error: None,
        }
    }

    pub fn with_foreign_key(mut self, column: &str, foreign_table: &str, foreign_column: &str) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.to_string(),
            foreign_table: foreign_table.to_string(),
            foreign_column: foreign_column.to_string(),
        });
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// The foreign key pointing at `other`, if one is declared.
    pub fn foreign_key_to(&self, other: &str) -> Option<&ForeignKey> {
        self.foreign_keys
            .iter()
            .find(|fk| fk.foreign_table.eq_ignore_ascii_case(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_is_case_insensitive() {
        let table = Table::new("doctors", vec![Column::new("Specialty", "text")]);
        assert!(table.has_column("specialty"));
        assert!(!table.has_column("age"));
    }

    #[test]
    fn foreign_key_to_finds_declared_edge() {
        let table = Table::new("doctors", vec![Column::new("organization_id", "uuid").foreign()])
            .with_foreign_key("organization_id", "organizations", "id");
        let fk = table.foreign_key_to("organizations").expect("fk should exist");
        assert_eq!(fk.column, "organization_id");
        assert!(table.foreign_key_to("patients").is_none());
    }
}
