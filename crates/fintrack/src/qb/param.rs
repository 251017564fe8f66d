//! Bound parameter collection and placeholder numbering.

use crate::value::Value;
use tokio_postgres::types::ToSql;

/// Placeholder syntax used in rendered SQL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placeholder {
    /// `$1, $2, ...` (PostgreSQL wire protocol, tokio-postgres)
    #[default]
    Dollar,
    /// `%s` (DB-API "format" paramstyle)
    Format,
}

impl Placeholder {
    /// Render the placeholder for the 1-based parameter index `idx`.
    pub fn render(self, idx: usize) -> String {
        match self {
            Placeholder::Dollar => format!("${idx}"),
            Placeholder::Format => "%s".to_string(),
        }
    }
}

/// Parameters collected while rendering a statement, in placeholder order.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    style: Placeholder,
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list using `style` placeholders.
    pub fn new(style: Placeholder) -> Self {
        Self {
            style,
            params: Vec::new(),
        }
    }

    /// Add a value and return the placeholder text that refers to it.
    pub fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        self.style.render(self.params.len())
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.params
    }
}

/// A rendered statement: SQL text plus the values bound to its placeholders.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }
}
