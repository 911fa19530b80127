use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::schema::Table;

/// The full set of tables known to the application.
///
/// Built once from the introspection collaborator's payload and treated as
/// read-only afterwards; every detection pass borrows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaModel {
    pub tables: Vec<Table>,
}

impl SchemaModel {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Render the schema as the textual context block embedded in AI
    /// translation prompts: one section per table with column type and
    /// constraint markers, followed by its foreign keys.
    pub fn prompt_context(&self) -> String {
        if self.tables.is_empty() {
            return "No schema information available".to_string();
        }

        let mut context = String::from("Tables in the database:\n\n");
        for table in &self.tables {
            let _ = writeln!(context, "Table: {}", table.name);
            context.push_str("Columns:\n");
            for column in &table.columns {
                let _ = write!(context, "- {} ({})", column.name, column.ty);
                if column.is_primary_key {
                    context.push_str(" PRIMARY KEY");
                }
                if !column.is_nullable {
                    context.push_str(" NOT NULL");
                }
                context.push('\n');
            }
            if !table.foreign_keys.is_empty() {
                context.push_str("Foreign Keys:\n");
                for fk in &table.foreign_keys {
                    let _ = writeln!(
                        context,
                        "- {} references {}.{}",
                        fk.column, fk.foreign_table, fk.foreign_column
                    );
                }
            }
            context.push('\n');
        }

        context
    }
}

impl From<Vec<Table>> for SchemaModel {
    fn from(tables: Vec<Table>) -> Self {
        Self::new(tables)
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::fixtures::clinic_schema;

    #[test]
    fn lookup_is_case_insensitive() {
        let schema = clinic_schema();
        assert!(schema.get("Doctors").is_some());
        assert!(schema.get("appointments").is_none());
    }

    #[test]
    fn prompt_context_lists_tables_columns_and_foreign_keys() {
        let schema = clinic_schema();
        let context = schema.prompt_context();
        assert!(context.contains("Table: patients"));
        assert!(context.contains("- specialty (text)"));
        assert!(context.contains("- id (uuid) PRIMARY KEY"));
        assert!(context.contains("- doctor_id references doctors.id"));
    }

    #[test]
    fn prompt_context_for_empty_schema() {
        let schema = super::SchemaModel::default();
        assert_eq!(schema.prompt_context(), "No schema information available");
    }
}
