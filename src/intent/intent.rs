use std::fmt;

/// The broad shape of what a query is asking for. Mostly informational —
/// rendering is driven by the intent's fields — except `Count`, which
/// short-circuits to `SELECT COUNT(*) as count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntentKind {
    #[default]
    Select,
    Count,
    Aggregate,
    Group,
    Filter,
    Sort,
    Join,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    Like,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::GtEq => ">=",
            Operator::LtEq => "<=",
            Operator::Like => "LIKE",
        };
        write!(f, "{s}")
    }
}

/// A condition value, coerced to a number when the matched text looks
/// numeric so the generator can render it unquoted.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl SqlValue {
    /// Coerce a matched token: integers and floats become numbers,
    /// everything else stays text.
    pub fn coerce(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return SqlValue::Int(n);
        }
        if let Ok(n) = raw.parse::<f64>() {
            return SqlValue::Float(n);
        }
        SqlValue::Text(raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: SqlValue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
            JoinType::Full => write!(f, "FULL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub table: String,
    pub condition: String,
    pub join_type: JoinType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFn::Count => write!(f, "COUNT"),
            AggregateFn::Sum => write!(f, "SUM"),
            AggregateFn::Avg => write!(f, "AVG"),
            AggregateFn::Min => write!(f, "MIN"),
            AggregateFn::Max => write!(f, "MAX"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub function: AggregateFn,
    pub field: String,
    pub alias: String,
}

impl Aggregate {
    pub fn count_all() -> Self {
        Self {
            function: AggregateFn::Count,
            field: "*".to_string(),
            alias: "count".to_string(),
        }
    }

    pub fn new(function: AggregateFn, field: &str) -> Self {
        let alias = match function {
            AggregateFn::Count if field == "*" => "count".to_string(),
            AggregateFn::Count => format!("count_{field}"),
            AggregateFn::Sum => format!("sum_{field}"),
            AggregateFn::Avg => format!("avg_{field}"),
            AggregateFn::Min => format!("min_{field}"),
            AggregateFn::Max => format!("max_{field}"),
        };
        Self {
            function,
            field: field.to_string(),
            alias,
        }
    }
}

/// Structured representation of a single natural-language query, built fresh
/// per request and discarded once SQL has been rendered.
///
/// Exactly one primary `table` once detection succeeds; `aggregates` takes
/// rendering precedence over `columns` when both are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryIntent {
    pub kind: IntentKind,
    pub table: String,
    pub columns: Vec<String>,
    pub conditions: Vec<Condition>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub joins: Vec<JoinSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub aggregates: Vec<Aggregate>,
}
