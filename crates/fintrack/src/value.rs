//! Primitive values carried by bound parameters and result rows.
//!
//! [`Value`] is the closed set of scalar types the tracker stores. It is used in
//! both directions: as a bind parameter (via [`ToSql`]) and as a decoded result
//! cell (via [`Value::from_column`]). Its `Display` impl is the text form used by
//! the table renderer.

use crate::error::{OrmError, OrmResult};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::error::Error;
use std::fmt;
use tokio_postgres::Row;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// A single scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact decimal, used for money amounts
    Numeric(Decimal),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Numeric(_) => "numeric",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Decode column `idx` of `row` by its PostgreSQL type.
    ///
    /// NULLs become [`Value::Null`]. Column types outside the supported set
    /// return [`OrmError::Decode`].
    pub fn from_column(row: &Row, idx: usize) -> OrmResult<Value> {
        let column = row
            .columns()
            .get(idx)
            .ok_or_else(|| OrmError::decode(idx.to_string(), "column index out of range"))?;

        let decoded = match column.type_().name() {
            "bool" => row.try_get::<_, Option<bool>>(idx).map(|v| v.map(Value::Bool)),
            "int2" => row
                .try_get::<_, Option<i16>>(idx)
                .map(|v| v.map(|n| Value::Int(n.into()))),
            "int4" => row
                .try_get::<_, Option<i32>>(idx)
                .map(|v| v.map(|n| Value::Int(n.into()))),
            "int8" => row.try_get::<_, Option<i64>>(idx).map(|v| v.map(Value::Int)),
            "float4" => row
                .try_get::<_, Option<f32>>(idx)
                .map(|v| v.map(|n| Value::Float(n.into()))),
            "float8" => row.try_get::<_, Option<f64>>(idx).map(|v| v.map(Value::Float)),
            "numeric" => row
                .try_get::<_, Option<Decimal>>(idx)
                .map(|v| v.map(Value::Numeric)),
            "text" | "varchar" | "bpchar" | "name" => row
                .try_get::<_, Option<String>>(idx)
                .map(|v| v.map(Value::Text)),
            "date" => row
                .try_get::<_, Option<NaiveDate>>(idx)
                .map(|v| v.map(Value::Date)),
            "timestamp" => row
                .try_get::<_, Option<NaiveDateTime>>(idx)
                .map(|v| v.map(|ts| Value::Timestamp(ts.and_utc()))),
            "timestamptz" => row
                .try_get::<_, Option<DateTime<Utc>>>(idx)
                .map(|v| v.map(Value::Timestamp)),
            other => {
                return Err(OrmError::decode(
                    column.name(),
                    format!("unsupported column type '{other}'"),
                ));
            }
        };

        decoded
            .map(|v| v.unwrap_or(Value::Null))
            .map_err(|e| OrmError::decode(column.name(), e.to_string()))
    }

    /// Decode every column of `row`.
    pub fn from_row(row: &Row) -> OrmResult<Vec<Value>> {
        (0..row.len()).map(|idx| Value::from_column(row, idx)).collect()
    }

    fn mismatch(&self, ty: &Type) -> BoxError {
        format!("cannot bind {} value to column of type {}", self.kind(), ty).into()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Numeric(d) => write!(f, "{d}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) if *ty == Type::BOOL => b.to_sql(ty, out),
            Value::Int(n) => match ty.name() {
                "int2" => i16::try_from(*n)?.to_sql(ty, out),
                "int4" => i32::try_from(*n)?.to_sql(ty, out),
                "int8" => n.to_sql(ty, out),
                "float4" => (*n as f32).to_sql(ty, out),
                "float8" => (*n as f64).to_sql(ty, out),
                "numeric" => Decimal::from(*n).to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            Value::Float(n) => match ty.name() {
                "float4" => (*n as f32).to_sql(ty, out),
                "float8" => n.to_sql(ty, out),
                "numeric" => Decimal::try_from(*n)?.to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            Value::Numeric(d) => match ty.name() {
                "numeric" => d.to_sql(ty, out),
                "float8" => d
                    .to_f64()
                    .ok_or_else(|| self.mismatch(ty))?
                    .to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            Value::Text(s) if <String as ToSql>::accepts(ty) => s.to_sql(ty, out),
            Value::Date(d) if *ty == Type::DATE => d.to_sql(ty, out),
            Value::Timestamp(ts) => match ty.name() {
                "timestamptz" => ts.to_sql(ty, out),
                "timestamp" => ts.naive_utc().to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            _ => Err(self.mismatch(ty)),
        }
    }

    // Type checking happens per variant in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Numeric(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
