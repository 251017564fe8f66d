//! Optional clauses shared by the statement builders.
//!
//! Every clause renders to an empty segment when unset; [`join_segments`]
//! drops empty segments so no dangling keyword or doubled space is produced.

use crate::error::{OrmError, OrmResult};
use crate::qb::expr::Expr;
use crate::qb::param::ParamList;

/// Sort direction for ORDER BY.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// SQL keyword. Ascending is the server default and renders as nothing.
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "",
            Direction::Desc => "DESC",
        }
    }
}

/// A single ORDER BY column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// `ORDER BY <column> <keyword>`; ascending keeps its trailing separator.
    pub(crate) fn render(&self) -> String {
        format!("ORDER BY {} {}", self.column, self.direction.keyword())
    }
}

/// WHERE / ORDER BY / LIMIT, in that order.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Tail {
    pub(crate) filter: Option<Expr>,
    pub(crate) order: Option<Order>,
    pub(crate) limit: Option<u64>,
}

impl Tail {
    pub(crate) fn and_where(&mut self, expr: Expr) {
        self.filter = Some(match self.filter.take() {
            None => expr,
            Some(Expr::And(mut exprs)) => {
                exprs.push(expr);
                Expr::And(exprs)
            }
            Some(existing) => Expr::And(vec![existing, expr]),
        });
    }

    pub(crate) fn validate(&self) -> OrmResult<()> {
        if let Some(order) = &self.order {
            validate_name("order column", &order.column)?;
        }
        Ok(())
    }

    pub(crate) fn render(&self, segments: &mut Vec<String>, params: &mut ParamList) {
        segments.push(render_where(self.filter.as_ref(), params));
        segments.push(self.order.as_ref().map(Order::render).unwrap_or_default());
        segments.push(
            self.limit
                .map(|limit| format!("LIMIT {}", limit))
                .unwrap_or_default(),
        );
    }
}

/// `WHERE <expr>`, or nothing when the filter is unset or empty.
pub(crate) fn render_where(filter: Option<&Expr>, params: &mut ParamList) -> String {
    match filter {
        Some(expr) if !expr.is_empty() => {
            let sql = expr.build(params);
            if sql.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", sql)
            }
        }
        _ => String::new(),
    }
}

/// Comma-joined column list, `*` when unset.
pub(crate) fn render_columns(columns: Option<&[String]>) -> String {
    match columns {
        None => "*".to_string(),
        Some(cols) => cols.join(", "),
    }
}

pub(crate) fn validate_columns(columns: Option<&[String]>) -> OrmResult<()> {
    if let Some(cols) = columns {
        if cols.is_empty() {
            return Err(OrmError::validation("column list must not be empty"));
        }
        for col in cols {
            validate_name("column", col)?;
        }
    }
    Ok(())
}

pub(crate) fn validate_name(what: &str, name: &str) -> OrmResult<()> {
    if name.trim().is_empty() {
        return Err(OrmError::validation(format!("{what} name must not be empty")));
    }
    Ok(())
}

/// Join non-empty segments with single spaces.
pub(crate) fn join_segments(segments: &[String]) -> String {
    let mut sql = String::new();
    for segment in segments.iter().filter(|s| !s.is_empty()) {
        if !sql.is_empty() && !sql.ends_with(' ') {
            sql.push(' ');
        }
        sql.push_str(segment);
    }
    sql
}
