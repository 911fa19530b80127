use tracing::debug;

use crate::error::NlqueryError;
use crate::intent::{
    Aggregate, ColumnSelection, IntentKind, QueryIntent, detect_columns, detect_conditions,
    detect_grouping, detect_joins, detect_limit, detect_sorting, detect_table, detect_tables,
};
use crate::schema::SchemaModel;

/// Converts free text plus the schema into a `QueryIntent` by running the
/// individual sub-detectors and assembling their results.
///
/// Table detection is the only fatal step; every other sub-detector
/// degrades to an empty result.
#[derive(Debug, Clone)]
pub struct IntentDetector {
    schema: SchemaModel,
}

impl IntentDetector {
    pub fn new(schema: SchemaModel) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &SchemaModel {
        &self.schema
    }

    /// Every table the text refers to, in mention order.
    pub fn detect_tables(&self, text: &str) -> Result<Vec<String>, NlqueryError> {
        detect_tables(text, &self.schema)
    }

    pub fn detect(&self, text: &str) -> Result<QueryIntent, NlqueryError> {
        let table_name = detect_table(text, &self.schema).ok_or(NlqueryError::NoTableMatched)?;
        // detect_table only returns names present in the schema
        let table = self
            .schema
            .get(&table_name)
            .ok_or(NlqueryError::NoTableMatched)?;

        let mut intent = QueryIntent {
            table: table_name.clone(),
            ..QueryIntent::default()
        };

        match detect_columns(text, table) {
            ColumnSelection::All => intent.columns = table.column_names(),
            ColumnSelection::Columns(columns) => intent.columns = columns,
            ColumnSelection::Aggregate(aggregate) => intent.aggregates.push(aggregate),
        }

        intent.conditions = detect_conditions(text, table);
        intent.group_by = detect_grouping(text, table);
        intent.order_by = detect_sorting(text, table);
        intent.limit = Some(detect_limit(text));
        intent.joins = detect_joins(text, &table_name, &self.schema);

        // A grouped query with no aggregate gets COUNT(*) per group, the
        // "gender distribution" shape.
        if !intent.group_by.is_empty() && intent.aggregates.is_empty() {
            intent.aggregates.push(Aggregate::count_all());
        }

        intent.kind = classify(&intent);
        debug!(table = %intent.table, kind = ?intent.kind, "intent detected");
        Ok(intent)
    }
}

/// Kind precedence: count, aggregate, group, join, filter, sort, select.
fn classify(intent: &QueryIntent) -> IntentKind {
    let pure_count = intent
        .aggregates
        .first()
        .map(|a| a.field == "*" && intent.aggregates.len() == 1)
        .unwrap_or(false);

    if pure_count && intent.group_by.is_empty() {
        IntentKind::Count
    } else if !intent.group_by.is_empty() {
        IntentKind::Group
    } else if !intent.aggregates.is_empty() {
        IntentKind::Aggregate
    } else if !intent.joins.is_empty() {
        IntentKind::Join
    } else if !intent.conditions.is_empty() {
        IntentKind::Filter
    } else if !intent.order_by.is_empty() {
        IntentKind::Sort
    } else {
        IntentKind::Select
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{AggregateFn, SortDirection};
    use crate::schema::fixtures::clinic_schema;

    fn detector() -> IntentDetector {
        IntentDetector::new(clinic_schema())
    }

    #[test]
    fn plain_select_with_default_limit() {
        let intent = detector().detect("show me all patients").expect("should detect");
        assert_eq!(intent.kind, IntentKind::Select);
        assert_eq!(intent.table, "patients");
        assert_eq!(intent.columns.len(), 10);
        assert_eq!(intent.limit, Some(100));
        assert!(intent.conditions.is_empty());
    }

    #[test]
    fn count_intent() {
        let intent = detector().detect("how many doctors are there").expect("should detect");
        assert_eq!(intent.kind, IntentKind::Count);
        assert_eq!(intent.aggregates.len(), 1);
        assert_eq!(intent.aggregates[0].function, AggregateFn::Count);
    }

    #[test]
    fn grouped_count_for_gender_distribution() {
        let intent = detector().detect("patients by gender").expect("should detect");
        assert_eq!(intent.kind, IntentKind::Group);
        assert_eq!(intent.group_by, vec!["gender".to_string()]);
        assert_eq!(intent.aggregates, vec![Aggregate::count_all()]);
    }

    #[test]
    fn sorted_select() {
        let intent = detector()
            .detect("Show me all patients sorted by age descending")
            .expect("should detect");
        assert_eq!(intent.table, "patients");
        assert_eq!(intent.order_by.len(), 1);
        assert_eq!(intent.order_by[0].field, "age");
        assert_eq!(intent.order_by[0].direction, SortDirection::Desc);
    }

    #[test]
    fn no_table_is_fatal() {
        let err = detector().detect("what time is it").unwrap_err();
        assert!(matches!(err, NlqueryError::NoTableMatched));
    }
}
