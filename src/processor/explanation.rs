use std::fmt;

use crate::intent::{IntentKind, Operator, QueryIntent, SortDirection, SqlValue};

/// Human-readable breakdown of a query, used as the explanation fallback
/// when the AI collaborator cannot be reached. Built fresh per request and
/// discarded with the intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryExplanation {
    pub action: String,
    pub tables: Vec<String>,
    pub filters: Option<String>,
    pub grouping: Option<String>,
    pub sorting: Option<String>,
    pub limit: Option<String>,
    pub joins: Option<String>,
}

impl QueryExplanation {
    pub fn from_intent(intent: &QueryIntent) -> Self {
        let mut tables = vec![intent.table.clone()];
        tables.extend(intent.joins.iter().map(|j| j.table.clone()));

        let action = match intent.kind {
            IntentKind::Count => "counts the rows".to_string(),
            IntentKind::Group => "summarizes the rows".to_string(),
            IntentKind::Aggregate => intent
                .aggregates
                .first()
                .map(|a| format!("computes {} of {}", describe_function(a.function), a.field))
                .unwrap_or_else(|| "retrieves data".to_string()),
            _ => {
                if intent.columns.is_empty() {
                    "retrieves all columns".to_string()
                } else {
                    format!("retrieves {}", intent.columns.join(", "))
                }
            }
        };

        let filters = (!intent.conditions.is_empty()).then(|| {
            intent
                .conditions
                .iter()
                .map(|c| {
                    format!("{} {} {}", c.field, describe_operator(c.operator), describe_value(&c.value))
                })
                .collect::<Vec<_>>()
                .join(" and ")
        });

        let grouping = (!intent.group_by.is_empty()).then(|| intent.group_by.join(", "));

        let sorting = (!intent.order_by.is_empty()).then(|| {
            intent
                .order_by
                .iter()
                .map(|o| {
                    let dir = match o.direction {
                        SortDirection::Asc => "ascending",
                        SortDirection::Desc => "descending",
                    };
                    format!("{} {}", o.field, dir)
                })
                .collect::<Vec<_>>()
                .join(", ")
        });

        let limit = intent.limit.map(|n| format!("at most {n} rows"));

        let joins = (!intent.joins.is_empty()).then(|| {
            intent
                .joins
                .iter()
                .map(|j| j.table.clone())
                .collect::<Vec<_>>()
                .join(", ")
        });

        Self {
            action,
            tables,
            filters,
            grouping,
            sorting,
            limit,
            joins,
        }
    }
}

fn describe_function(function: crate::intent::AggregateFn) -> &'static str {
    use crate::intent::AggregateFn;
    match function {
        AggregateFn::Count => "the count",
        AggregateFn::Sum => "the sum",
        AggregateFn::Avg => "the average",
        AggregateFn::Min => "the minimum",
        AggregateFn::Max => "the maximum",
    }
}

fn describe_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Eq => "is",
        Operator::NotEq => "is not",
        Operator::Gt => "is greater than",
        Operator::Lt => "is less than",
        Operator::GtEq => "is at least",
        Operator::LtEq => "is at most",
        Operator::Like => "contains",
    }
}

fn describe_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Text(text) => format!("'{}'", text.trim_matches('%')),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::Float(n) => n.to_string(),
    }
}

impl fmt::Display for QueryExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.tables.first().map(String::as_str).unwrap_or("requested");
        write!(f, "This query {} from the {} table", self.action, table)?;
        if let Some(joins) = &self.joins {
            write!(f, ", combined with {joins}")?;
        }
        if let Some(filters) = &self.filters {
            write!(f, ", where {filters}")?;
        }
        if let Some(grouping) = &self.grouping {
            write!(f, ", grouped by {grouping}")?;
        }
        if let Some(sorting) = &self.sorting {
            write!(f, ", sorted by {sorting}")?;
        }
        if let Some(limit) = &self.limit {
            write!(f, ", returning {limit}")?;
        }
        write!(f, ".")
    }
}
