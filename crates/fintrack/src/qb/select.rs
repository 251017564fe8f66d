//! SELECT statements: single table and two-table join.

use crate::error::OrmResult;
use crate::qb::clause::{
    Order, Tail, join_segments, render_columns, validate_columns, validate_name,
};
use crate::qb::expr::Expr;
use crate::qb::param::{BuiltQuery, ParamList, Placeholder};

/// `SELECT <columns> FROM <table> [WHERE] [ORDER BY] [LIMIT]`
#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    /// Table name
    table: String,
    /// SELECT columns (None => *)
    columns: Option<Vec<String>>,
    tail: Tail,
}

impl Select {
    /// Create a new SELECT for a table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: None,
            tail: Tail::default(),
        }
    }

    /// Set SELECT columns.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = Some(cols.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Replace the WHERE filter.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.tail.filter = Some(expr);
        self
    }

    /// AND another condition onto the WHERE filter.
    pub fn and_where(mut self, expr: Expr) -> Self {
        self.tail.and_where(expr);
        self
    }

    /// Set ORDER BY.
    pub fn order(mut self, order: Order) -> Self {
        self.tail.order = Some(order);
        self
    }

    /// ORDER BY column ascending.
    pub fn order_by(self, column: &str) -> Self {
        self.order(Order::asc(column))
    }

    /// ORDER BY column descending.
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order(Order::desc(column))
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.tail.limit = Some(limit);
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
        validate_columns(self.columns.as_deref())?;
        self.tail.validate()?;

        let mut params = ParamList::new(style);
        let mut segments = vec![format!(
            "SELECT {} FROM {}",
            render_columns(self.columns.as_deref()),
            self.table
        )];
        self.tail.render(&mut segments, &mut params);

        Ok(BuiltQuery::new(join_segments(&segments), params.into_values()))
    }

    /// Get the built SQL string (for debugging).
    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|q| q.sql)
    }
}

/// A table name plus the alias it is referred to by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    pub alias: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    fn render(&self) -> String {
        if self.alias.is_empty() {
            self.name.clone()
        } else {
            format!("{} AS {}", self.name, self.alias)
        }
    }
}

/// `SELECT <columns> FROM <a> AS <x> JOIN <b> AS <y> ON <condition> [WHERE] [ORDER BY] [LIMIT]`
///
/// The join condition is emitted verbatim, like [`Expr::Raw`].
#[derive(Clone, Debug, PartialEq)]
pub struct JoinSelect {
    left: TableRef,
    right: TableRef,
    on: String,
    columns: Option<Vec<String>>,
    tail: Tail,
}

impl JoinSelect {
    /// Create a new inner join of `left` and `right` on `on`.
    pub fn new(left: TableRef, right: TableRef, on: &str) -> Self {
        Self {
            left,
            right,
            on: on.to_string(),
            columns: None,
            tail: Tail::default(),
        }
    }

    /// Set SELECT columns.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = Some(cols.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Replace the WHERE filter.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.tail.filter = Some(expr);
        self
    }

    /// AND another condition onto the WHERE filter.
    pub fn and_where(mut self, expr: Expr) -> Self {
        self.tail.and_where(expr);
        self
    }

    /// Set ORDER BY.
    pub fn order(mut self, order: Order) -> Self {
        self.tail.order = Some(order);
        self
    }

    /// ORDER BY column ascending.
    pub fn order_by(self, column: &str) -> Self {
        self.order(Order::asc(column))
    }

    /// ORDER BY column descending.
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order(Order::desc(column))
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.tail.limit = Some(limit);
        self
    }

    /// Render with `$n` placeholders.
    pub fn build(&self) -> OrmResult<BuiltQuery> {
        self.build_with(Placeholder::default())
    }

    /// Render with the given placeholder style.
    pub fn build_with(&self, style: Placeholder) -> OrmResult<BuiltQuery> {
        validate_name("table", &self.left.name)?;
        validate_name("table", &self.right.name)?;
        validate_name("join condition", &self.on)?;
        validate_columns(self.columns.as_deref())?;
        self.tail.validate()?;

        let mut params = ParamList::new(style);
        let mut segments = vec![format!(
            "SELECT {} FROM {} JOIN {} ON {}",
            render_columns(self.columns.as_deref()),
            self.left.render(),
            self.right.render(),
            self.on
        )];
        self.tail.render(&mut segments, &mut params);

        Ok(BuiltQuery::new(join_segments(&segments), params.into_values()))
    }

    /// Get the built SQL string (for debugging).
    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|q| q.sql)
    }
}
