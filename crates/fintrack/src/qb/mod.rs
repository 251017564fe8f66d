//! Statement builders for fintrack.
//!
//! A [`Statement`] is a closed description of one SQL operation. Rendering is a
//! pure function from a statement to a [`BuiltQuery`]: SQL text plus the values
//! bound to its placeholders. Nothing here touches a connection.
//!
//! # Usage
//!
//! ```ignore
//! use fintrack::qb::{self, Expr};
//!
//! // SELECT
//! let q = qb::select("expense_categories")
//!     .columns(&["cat_name"])
//!     .filter(Expr::ne("id", 1))
//!     .order_by("cat_name")
//!     .build()?;
//!
//! // INSERT
//! let q = qb::insert("expenses")
//!     .set("amount", amount)
//!     .set("cat_id", cat_id)
//!     .build()?;
//!
//! // DELETE
//! let q = qb::delete("expense_categories", Expr::eq("cat_name", name)).build()?;
//! ```
//!
//! # Trust boundary
//!
//! Table names, column lists, ORDER BY columns, join conditions and
//! [`Expr::Raw`] fragments are emitted verbatim. They must come from code, not
//! from user input. Values compared through [`Expr::eq`] and friends, and all
//! INSERT values, are bound as parameters.

mod clause;
mod delete;
mod expr;
mod insert;
mod param;
mod select;

pub use clause::{Direction, Order};
pub use delete::Delete;
pub use expr::{CompareOp, Expr, Period};
pub use insert::Insert;
pub use param::{BuiltQuery, ParamList, Placeholder};
pub use select::{JoinSelect, Select, TableRef};

use crate::error::OrmResult;

/// One SQL operation, prior to rendering.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Select(Select),
    JoinSelect(JoinSelect),
    Insert(Insert),
    Delete(Delete),
}

impl Statement {
    /// Render with `$n` placeholders.
    pub fn build(&self) -> OrmResult<BuiltQuery> {
        self.build_with(Placeholder::default())
    }

    /// Render with the given placeholder style.
    pub fn build_with(&self, style: Placeholder) -> OrmResult<BuiltQuery> {
        match self {
            Statement::Select(s) => s.build_with(style),
            Statement::JoinSelect(s) => s.build_with(style),
            Statement::Insert(s) => s.build_with(style),
            Statement::Delete(s) => s.build_with(style),
        }
    }

    /// Whether the statement returns rows.
    pub fn is_read(&self) -> bool {
        matches!(self, Statement::Select(_) | Statement::JoinSelect(_))
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "select",
            Statement::JoinSelect(_) => "join_select",
            Statement::Insert(_) => "insert",
            Statement::Delete(_) => "delete",
        }
    }
}

impl From<Select> for Statement {
    fn from(s: Select) -> Self {
        Statement::Select(s)
    }
}

impl From<JoinSelect> for Statement {
    fn from(s: JoinSelect) -> Self {
        Statement::JoinSelect(s)
    }
}

impl From<Insert> for Statement {
    fn from(s: Insert) -> Self {
        Statement::Insert(s)
    }
}

impl From<Delete> for Statement {
    fn from(s: Delete) -> Self {
        Statement::Delete(s)
    }
}

/// Create a SELECT for the given table.
///
/// # Example
/// ```ignore
/// let qb = fintrack::qb::select("expenses").limit(5);
/// ```
pub fn select(table: &str) -> Select {
    Select::new(table)
}

/// Create a two-table join SELECT.
///
/// # Example
/// ```ignore
/// let qb = fintrack::qb::join(
///     TableRef::new("expenses", "e"),
///     TableRef::new("expense_categories", "ec"),
///     "e.cat_id=ec.id",
/// );
/// ```
pub fn join(left: TableRef, right: TableRef, on: &str) -> JoinSelect {
    JoinSelect::new(left, right, on)
}

/// Create an INSERT for the given table.
pub fn insert(table: &str) -> Insert {
    Insert::new(table)
}

/// Create a DELETE of the rows of `table` matching `filter`.
pub fn delete(table: &str, filter: Expr) -> Delete {
    Delete::new(table, filter)
}

#[cfg(test)]
mod tests;
