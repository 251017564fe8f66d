//! # fintrack
//!
//! Building blocks for a PostgreSQL-backed expense tracker.
//!
//! ## Features
//!
//! - **Pure statement rendering**: [`qb::Statement`] renders to SQL text plus bound
//!   values without touching a connection
//! - **Bound values by default**: INSERT values and filter comparisons are placeholders;
//!   only code-supplied identifiers and [`qb::Expr::Raw`] fragments are emitted verbatim
//! - **No unfiltered deletes**: a DELETE always carries a filter, and an empty one is rejected
//! - **Text tables**: [`Table`] renders rows as a left-aligned, pipe-delimited table
//! - **Explicit connections**: the [`Executor`] trait is implemented for
//!   `tokio_postgres::Client` and (with the `pool` feature) a deadpool `Pool`
//!
//! ## Example
//!
//! ```ignore
//! use fintrack::{Executor, Table, qb};
//!
//! let stmt = qb::select("expense_categories")
//!     .columns(&["cat_name"])
//!     .filter(qb::Expr::ne("id", 1))
//!     .order_by("cat_name");
//! let rows = pool.fetch_statement(&stmt.into()).await?;
//! let reply = Table::from_rows(&["Categories"], rows)?.render();
//! ```

pub mod client;
pub mod error;
pub mod qb;
pub mod table;
pub mod value;

pub use client::Executor;
pub use error::{ConstraintKind, OrmError, OrmResult, TableError};
pub use qb::{BuiltQuery, Placeholder, Statement};
pub use table::Table;
pub use value::Value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::create_pool;

// Re-exported so downstream crates can name pool types without a direct dependency.
#[cfg(feature = "pool")]
pub use deadpool_postgres::Pool;
