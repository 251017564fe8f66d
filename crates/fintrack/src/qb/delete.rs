//! DELETE statements.

use crate::error::{OrmError, OrmResult};
use crate::qb::clause::{join_segments, render_where, validate_name};
use crate::qb::expr::Expr;
use crate::qb::param::{BuiltQuery, ParamList, Placeholder};

/// `DELETE FROM <table> WHERE <filter>`
///
/// The filter is part of the statement, not an optional clause. A filter that
/// renders no condition is a validation error.
#[derive(Clone, Debug, PartialEq)]
pub struct Delete {
    table: String,
    filter: Expr,
}

impl Delete {
    pub fn new(table: &str, filter: Expr) -> Self {
        Self {
            table: table.to_string(),
            filter,
        }
    }

    /// AND another condition onto the filter.
    pub fn and_where(mut self, expr: Expr) -> Self {
        self.filter = match self.filter {
            Expr::And(mut exprs) => {
                exprs.push(expr);
                Expr::And(exprs)
            }
            existing => Expr::And(vec![existing, expr]),
        };
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Render with `$n` placeholders.
    pub fn build(&self) -> OrmResult<BuiltQuery> {
        self.build_with(Placeholder::default())
    }

    /// Render with the given placeholder style.
    pub fn build_with(&self, style: Placeholder) -> OrmResult<BuiltQuery> {
        validate_name("table", &self.table)?;

        let mut params = ParamList::new(style);
        let where_sql = render_where(Some(&self.filter), &mut params);
        if where_sql.is_empty() {
            return Err(OrmError::validation(format!(
                "DELETE FROM {} has an empty filter",
                self.table
            )));
        }

        Ok(BuiltQuery::new(
            join_segments(&[format!("DELETE FROM {}", self.table), where_sql]),
            params.into_values(),
        ))
    }

    /// Get the built SQL string (for debugging).
    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|q| q.sql)
    }
}
