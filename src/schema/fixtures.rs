//! Shared fixture schema for unit tests: the clinic tables the original
//! application ran against.

use crate::schema::{Column, SchemaModel, Table};

pub fn patients_table() -> Table {
    Table::new(
        "patients",
        vec![
            Column::new("id", "uuid").primary_key(),
            Column::new("name", "text").not_null(),
            Column::new("age", "integer"),
            Column::new("gender", "text"),
            Column::new("address", "text"),
            Column::new("phone", "text"),
            Column::new("email", "text"),
            Column::new("doctor_id", "uuid").foreign(),
            Column::new("medical_history", "text"),
            Column::new("last_visit", "timestamp"),
        ],
    )
    .with_foreign_key("doctor_id", "doctors", "id")
}

pub fn doctors_table() -> Table {
    Table::new(
        "doctors",
        vec![
            Column::new("id", "uuid").primary_key(),
            Column::new("name", "text").not_null(),
            Column::new("specialty", "text"),
            Column::new("email", "text"),
            Column::new("phone", "text"),
            Column::new("organization_id", "uuid").foreign(),
        ],
    )
    .with_foreign_key("organization_id", "organizations", "id")
}

pub fn organizations_table() -> Table {
    Table::new(
        "organizations",
        vec![
            Column::new("id", "uuid").primary_key(),
            Column::new("name", "text").not_null(),
            Column::new("address", "text"),
        ],
    )
}

pub fn clinic_schema() -> SchemaModel {
    SchemaModel::new(vec![patients_table(), doctors_table(), organizations_table()])
}
