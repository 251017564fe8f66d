//! Executor trait for running built statements.

use crate::error::{OrmError, OrmResult};
use crate::qb::{BuiltQuery, Statement};
use crate::value::Value;

/// Anything that can run a [`BuiltQuery`] against a database.
///
/// Result rows come back as plain [`Value`] vectors so callers (and test
/// doubles) never deal with driver row types.
pub trait Executor: Send + Sync {
    /// Execute a query and return all rows.
    fn fetch(
        &self,
        query: &BuiltQuery,
    ) -> impl std::future::Future<Output = OrmResult<Vec<Vec<Value>>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        query: &BuiltQuery,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Render `stmt` and fetch its rows.
    fn fetch_statement(
        &self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = OrmResult<Vec<Vec<Value>>>> + Send {
        async move {
            let query = stmt.build()?;
            tracing::debug!(target: "fintrack.sql", statement = stmt.kind(), "statement built");
            self.fetch(&query).await
        }
    }

    /// Render `stmt` and execute it.
    fn execute_statement(
        &self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        async move {
            let query = stmt.build()?;
            tracing::debug!(target: "fintrack.sql", statement = stmt.kind(), "statement built");
            self.execute(&query).await
        }
    }
}

pub(crate) fn log_query(op: &'static str, query: &BuiltQuery) {
    tracing::debug!(
        target: "fintrack.sql",
        op,
        param_count = query.params.len(),
        sql = %query.sql,
    );
}

impl Executor for tokio_postgres::Client {
    async fn fetch(&self, query: &BuiltQuery) -> OrmResult<Vec<Vec<Value>>> {
        log_query("fetch", query);
        let params = query.params_ref();
        let rows = tokio_postgres::Client::query(self, query.sql.as_str(), &params)
            .await
            .map_err(OrmError::from_db_error)?;
        rows.iter().map(Value::from_row).collect()
    }

    async fn execute(&self, query: &BuiltQuery) -> OrmResult<u64> {
        log_query("execute", query);
        let params = query.params_ref();
        tokio_postgres::Client::execute(self, query.sql.as_str(), &params)
            .await
            .map_err(OrmError::from_db_error)
    }
}
