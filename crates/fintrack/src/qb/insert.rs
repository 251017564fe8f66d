//! INSERT statements with bound values.

use crate::error::{OrmError, OrmResult};
use crate::qb::clause::validate_name;
use crate::qb::param::{BuiltQuery, ParamList, Placeholder};
use crate::value::Value;

/// `INSERT INTO <table> (<columns>) VALUES (<placeholders>)`
///
/// Values never appear in the SQL text; they are returned in column order for
/// binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Insert {
    /// Table name
    table: String,
    /// Column/value pairs in declaration order
    values: Vec<(String, Value)>,
}

impl Insert {
    /// Create a new INSERT for a table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            values: Vec::new(),
        }
    }

    /// Set a column value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.push((column.to_string(), value.into()));
        self
    }

    /// Set an optional column value (None => skip).
    pub fn set_opt<T: Into<Value>>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of column/value pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render with `$n` placeholders.
    pub fn build(&self) -> OrmResult<BuiltQuery> {
        self.build_with(Placeholder::default())
    }

    /// Render with the given placeholder style.
    pub fn build_with(&self, style: Placeholder) -> OrmResult<BuiltQuery> {
        validate_name("table", &self.table)?;

        if self.values.is_empty() {
            return Ok(BuiltQuery::new(
                format!("INSERT INTO {} DEFAULT VALUES", self.table),
                Vec::new(),
            ));
        }

        let mut seen = std::collections::HashSet::<&str>::new();
        for (column, _) in &self.values {
            validate_name("column", column)?;
            if !seen.insert(column.as_str()) {
                return Err(OrmError::validation(format!(
                    "duplicate insert column: {column}"
                )));
            }
        }

        let mut params = ParamList::new(style);
        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.as_str()).collect();
        let placeholders: Vec<String> = self
            .values
            .iter()
            .map(|(_, v)| params.bind(v.clone()))
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok(BuiltQuery::new(sql, params.into_values()))
    }

    /// Get the built SQL string (for debugging).
    pub fn to_sql(&self) -> OrmResult<String> {
        self.build().map(|q| q.sql)
    }
}
