use std::fmt::Write as _;

use crate::intent::{IntentKind, QueryIntent, SqlValue};

/// Deterministically renders a `QueryIntent` into a single SQL statement
/// terminated with `;`.
///
/// Clause order: SELECT, FROM, JOINs in detection order, WHERE (conditions
/// ANDed), GROUP BY, ORDER BY, LIMIT, OFFSET. Aggregates take precedence
/// over the column list, with any GROUP BY fields placed first. A pure
/// count intent with no grouping short-circuits to
/// `SELECT COUNT(*) as count FROM table;`.
pub struct SqlGenerator;

impl SqlGenerator {
    /// Render with values inlined. Text values are single-quoted with
    /// embedded quotes doubled; numbers are bare.
    pub fn render(intent: &QueryIntent) -> String {
        let (sql, params) = Self::build(intent, false);
        debug_assert!(params.is_empty());
        sql
    }

    /// Render with `$1`-style placeholders and the values returned
    /// separately, for executors that can bind parameters.
    pub fn render_parameterized(intent: &QueryIntent) -> (String, Vec<SqlValue>) {
        Self::build(intent, true)
    }

    fn build(intent: &QueryIntent, parameterized: bool) -> (String, Vec<SqlValue>) {
        if intent.kind == IntentKind::Count && intent.group_by.is_empty() {
            return (format!("SELECT COUNT(*) as count FROM {};", intent.table), vec![]);
        }

        let mut sql = String::from("SELECT ");
        sql.push_str(&Self::select_list(intent));

        let _ = write!(sql, " FROM {}", intent.table);

        for join in &intent.joins {
            let _ = write!(sql, " {} JOIN {} ON {}", join.join_type, join.table, join.condition);
        }

        let mut params: Vec<SqlValue> = vec![];
        if !intent.conditions.is_empty() {
            let rendered: Vec<String> = intent
                .conditions
                .iter()
                .map(|c| {
                    if parameterized {
                        params.push(c.value.clone());
                        format!("{} {} ${}", c.field, c.operator, params.len())
                    } else {
                        format!("{} {} {}", c.field, c.operator, render_value(&c.value))
                    }
                })
                .collect();
            let _ = write!(sql, " WHERE {}", rendered.join(" AND "));
        }

        if !intent.group_by.is_empty() {
            let _ = write!(sql, " GROUP BY {}", intent.group_by.join(", "));
        }

        if !intent.order_by.is_empty() {
            let rendered: Vec<String> = intent
                .order_by
                .iter()
                .map(|o| format!("{} {}", o.field, o.direction))
                .collect();
            let _ = write!(sql, " ORDER BY {}", rendered.join(", "));
        }

        if let Some(limit) = intent.limit {
            let _ = write!(sql, " LIMIT {limit}");
        }
        if let Some(offset) = intent.offset {
            let _ = write!(sql, " OFFSET {offset}");
        }

        sql.push(';');
        (sql, params)
    }

    fn select_list(intent: &QueryIntent) -> String {
        if !intent.aggregates.is_empty() {
            let mut items = intent.group_by.clone();
            for aggregate in &intent.aggregates {
                items.push(format!(
                    "{}({}) as {}",
                    aggregate.function, aggregate.field, aggregate.alias
                ));
            }
            return items.join(", ");
        }

        if !intent.columns.is_empty() {
            return intent.columns.join(", ");
        }

        "*".to_string()
    }
}

fn render_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Text(text) => format!("'{}'", text.replace('\'', "''")),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::Float(n) => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{
        Aggregate, Condition, IntentKind, JoinSpec, JoinType, Operator, OrderBy, SortDirection,
    };

    #[test]
    fn columns_and_limit() {
        let intent = QueryIntent {
            table: "doctors".to_string(),
            columns: vec!["name".to_string(), "specialty".to_string()],
            limit: Some(10),
            ..QueryIntent::default()
        };
        assert_eq!(SqlGenerator::render(&intent), "SELECT name, specialty FROM doctors LIMIT 10;");
    }

    #[test]
    fn count_short_circuit() {
        let intent = QueryIntent {
            kind: IntentKind::Count,
            table: "doctors".to_string(),
            aggregates: vec![Aggregate::count_all()],
            limit: Some(100),
            ..QueryIntent::default()
        };
        assert_eq!(SqlGenerator::render(&intent), "SELECT COUNT(*) as count FROM doctors;");
    }

    #[test]
    fn grouped_count_renders_group_field_first() {
        let intent = QueryIntent {
            kind: IntentKind::Group,
            table: "patients".to_string(),
            group_by: vec!["gender".to_string()],
            aggregates: vec![Aggregate::count_all()],
            ..QueryIntent::default()
        };
        assert_eq!(
            SqlGenerator::render(&intent),
            "SELECT gender, COUNT(*) as count FROM patients GROUP BY gender;"
        );
    }

    #[test]
    fn where_values_quoted_and_escaped() {
        let intent = QueryIntent {
            table: "patients".to_string(),
            columns: vec!["name".to_string()],
            conditions: vec![
                Condition {
                    field: "name".to_string(),
                    operator: Operator::Like,
                    value: SqlValue::Text("%o'brien%".to_string()),
                },
                Condition {
                    field: "age".to_string(),
                    operator: Operator::Gt,
                    value: SqlValue::Int(30),
                },
            ],
            ..QueryIntent::default()
        };
        assert_eq!(
            SqlGenerator::render(&intent),
            "SELECT name FROM patients WHERE name LIKE '%o''brien%' AND age > 30;"
        );
    }

    #[test]
    fn joins_and_order_by() {
        let intent = QueryIntent {
            table: "patients".to_string(),
            columns: vec!["patients.name".to_string()],
            joins: vec![JoinSpec {
                table: "doctors".to_string(),
                condition: "patients.doctor_id = doctors.id".to_string(),
                join_type: JoinType::Left,
            }],
            order_by: vec![OrderBy { field: "age".to_string(), direction: SortDirection::Desc }],
            limit: Some(100),
            ..QueryIntent::default()
        };
        assert_eq!(
            SqlGenerator::render(&intent),
            "SELECT patients.name FROM patients LEFT JOIN doctors ON patients.doctor_id = doctors.id ORDER BY age DESC LIMIT 100;"
        );
    }

    #[test]
    fn parameterized_rendering_binds_values() {
        let intent = QueryIntent {
            table: "patients".to_string(),
            columns: vec!["name".to_string()],
            conditions: vec![Condition {
                field: "gender".to_string(),
                operator: Operator::Eq,
                value: SqlValue::Text("female".to_string()),
            }],
            ..QueryIntent::default()
        };
        let (sql, params) = SqlGenerator::render_parameterized(&intent);
        assert_eq!(sql, "SELECT name FROM patients WHERE gender = $1;");
        assert_eq!(params, vec![SqlValue::Text("female".to_string())]);
    }
}
