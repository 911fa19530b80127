use once_cell::sync::Lazy;
use regex::Regex;

/// A `SELECT` statement split at its clause boundaries.
///
/// This is deliberately not a SQL parser: it locates the top-level clause
/// keywords of a single plain statement and slices the text between them,
/// which is all the enhancers need to pick unambiguous insertion points.
/// Statements it cannot shape (no leading SELECT, nested SELECT, missing
/// FROM, unparsable LIMIT) yield `None` and callers pass the input through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlClauses {
    /// SELECT list items, comma-split and trimmed.
    pub select: Vec<String>,
    /// Everything between FROM and the next clause, minus joins.
    pub from: String,
    /// Full join clauses in order ("LEFT JOIN x ON ...").
    pub joins: Vec<String>,
    pub where_clause: Option<String>,
    pub group_by: Option<String>,
    pub having: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Whether the original statement carried a trailing semicolon.
    pub terminated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
}

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:SELECT|FROM|(?:INNER\s+|LEFT\s+(?:OUTER\s+)?|RIGHT\s+(?:OUTER\s+)?|FULL\s+(?:OUTER\s+)?|CROSS\s+)?JOIN|WHERE|GROUP\s+BY|HAVING|ORDER\s+BY|LIMIT|OFFSET)\b",
    )
    .unwrap()
});

fn classify(matched: &str) -> Keyword {
    let upper = matched.to_uppercase();
    let collapsed = upper.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.as_str() {
        "SELECT" => Keyword::Select,
        "FROM" => Keyword::From,
        "WHERE" => Keyword::Where,
        "GROUP BY" => Keyword::GroupBy,
        "HAVING" => Keyword::Having,
        "ORDER BY" => Keyword::OrderBy,
        "LIMIT" => Keyword::Limit,
        "OFFSET" => Keyword::Offset,
        _ => Keyword::Join,
    }
}

/// A position is inside a single-quoted string when an odd number of quotes
/// precede it.
fn inside_quotes(sql: &str, position: usize) -> bool {
    sql[..position].matches('\'').count() % 2 == 1
}

impl SqlClauses {
    /// Split a statement at its clause boundaries. `None` when the text is
    /// not a single plain SELECT statement.
    pub fn parse(sql: &str) -> Option<SqlClauses> {
        let trimmed = sql.trim();
        let terminated = trimmed.ends_with(';');
        let body = trimmed.trim_end_matches(';').trim_end();

        let mut boundaries: Vec<(usize, usize, Keyword)> = vec![];
        for m in KEYWORD_RE.find_iter(body) {
            if inside_quotes(body, m.start()) {
                continue;
            }
            boundaries.push((m.start(), m.end(), classify(m.as_str())));
        }

        match boundaries.first() {
            Some((0, _, Keyword::Select)) => {}
            _ => return None,
        }
        // A second SELECT means a subquery; out of scope for this splitter.
        if boundaries.iter().filter(|(_, _, k)| *k == Keyword::Select).count() > 1 {
            return None;
        }
        if !boundaries.iter().any(|(_, _, k)| *k == Keyword::From) {
            return None;
        }

        let mut clauses = SqlClauses {
            terminated,
            ..SqlClauses::default()
        };

        for (i, (start, end, keyword)) in boundaries.iter().enumerate() {
            let segment_end = boundaries.get(i + 1).map(|(s, _, _)| *s).unwrap_or(body.len());
            let segment = body[*end..segment_end].trim();
            match keyword {
                Keyword::Select => {
                    clauses.select = segment.split(',').map(|s| s.trim().to_string()).collect();
                }
                Keyword::From => clauses.from = segment.to_string(),
                Keyword::Join => {
                    clauses.joins.push(body[*start..segment_end].trim().to_string());
                }
                Keyword::Where => clauses.where_clause = Some(segment.to_string()),
                Keyword::GroupBy => clauses.group_by = Some(segment.to_string()),
                Keyword::Having => clauses.having = Some(segment.to_string()),
                Keyword::OrderBy => clauses.order_by = Some(segment.to_string()),
                Keyword::Limit => clauses.limit = Some(segment.parse().ok()?),
                Keyword::Offset => clauses.offset = Some(segment.parse().ok()?),
            }
        }

        if clauses.select.is_empty() || clauses.from.is_empty() {
            return None;
        }
        Some(clauses)
    }

    /// Reassemble the statement, preserving clause order and the original
    /// semicolon.
    pub fn render(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.select.join(", "), self.from);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if let Some(where_clause) = &self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(where_clause);
        }
        if let Some(group_by) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }
        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        if self.terminated {
            sql.push(';');
        }
        sql
    }

    /// First token of the FROM clause (ignores any alias).
    pub fn from_table(&self) -> &str {
        self.from.split_whitespace().next().unwrap_or("")
    }

    pub fn has_join_with(&self, table: &str) -> bool {
        let needle = table.to_lowercase();
        self.joins.iter().any(|j| {
            j.to_lowercase()
                .split(|c: char| !c.is_alphanumeric() && c != '_')
                .any(|word| word == needle)
        })
    }

    /// Whether any SELECT item references `name` as a word.
    pub fn selects_column(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.select.iter().any(|item| {
            item.to_lowercase()
                .split(|c: char| !c.is_alphanumeric() && c != '_')
                .any(|word| word == needle)
        })
    }
}
