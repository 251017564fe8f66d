//! Error types for fintrack

use std::fmt;
use thiserror::Error;

/// Result alias used across the crate.
pub type OrmResult<T> = Result<T, OrmError>;

/// Everything that can go wrong between building a statement and reading its rows.
#[derive(Debug, Error)]
pub enum OrmError {
    /// The database could not be reached or the connection string is malformed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Driver error that is not a recognized constraint violation.
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A statement was rejected by a table constraint.
    #[error("{kind} violation on {constraint}: {message}")]
    Constraint {
        kind: ConstraintKind,
        constraint: String,
        message: String,
    },

    /// A result column could not be turned into a [`crate::Value`].
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// The statement is malformed and was never sent.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    #[error("{0}")]
    Other(String),
}

/// Constraint classes distinguished by SQLSTATE.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// 23505
    Unique,
    /// 23503
    ForeignKey,
    /// 23514
    Check,
}

impl ConstraintKind {
    fn from_sqlstate(code: &str) -> Option<Self> {
        match code {
            "23505" => Some(Self::Unique),
            "23503" => Some(Self::ForeignKey),
            "23514" => Some(Self::Check),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unique => "Unique constraint",
            Self::ForeignKey => "Foreign key",
            Self::Check => "Check constraint",
        })
    }
}

/// Errors raised by the table renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A body row does not have as many cells as the header.
    #[error("row {row} has {found} cells, header has {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl OrmError {
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn constraint(
        kind: ConstraintKind,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Constraint {
            kind,
            constraint: constraint.into(),
            message: message.into(),
        }
    }

    /// The violated constraint class, if this is a constraint error.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.constraint_kind() == Some(ConstraintKind::Unique)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.constraint_kind() == Some(ConstraintKind::ForeignKey)
    }

    /// Classify a driver error, pulling constraint violations out of [`OrmError::Query`].
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        let classified = err.as_db_error().and_then(|db| {
            ConstraintKind::from_sqlstate(db.code().code()).map(|kind| {
                Self::constraint(kind, db.constraint().unwrap_or("unknown"), db.message())
            })
        });
        classified.unwrap_or(Self::Query(err))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
