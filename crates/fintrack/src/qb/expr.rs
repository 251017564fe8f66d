//! Filter expressions for WHERE clauses.
//!
//! Comparisons carry their right-hand side as a bound [`Value`], so user text
//! never ends up inside the SQL string. [`Expr::Raw`] is the one exception: its
//! text is emitted verbatim and must only ever come from trusted code (fixed
//! fragments, never message input).

use crate::qb::param::ParamList;
use crate::value::Value;
use std::fmt;

/// Trailing time window, measured back from `now()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// The unit name as PostgreSQL spells it in interval literals.
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operator of a bound comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    ILike,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::ILike => "ILIKE",
        }
    }
}

/// A WHERE condition tree.
///
/// Groups with no non-empty children render as nothing, so an empty
/// `And(vec![])` is the same as having no filter at all.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),

    /// `<column> <op> <placeholder>`
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },

    /// `<column> IS [NOT] NULL`
    Null { column: String, negated: bool },

    /// `<column> > now() - interval '1 <period>'`
    Since { column: String, period: Period },

    /// Emitted as-is.
    Raw(String),
}

impl Expr {
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// Bound comparison of `column` against `value`.
    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Expr::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Gte, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Lte, value)
    }

    /// Case-insensitive pattern match; `pattern` may contain `%` and `_`.
    pub fn ilike(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::ILike, pattern)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::Null {
            column: column.into(),
            negated: false,
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::Null {
            column: column.into(),
            negated: true,
        }
    }

    /// Rows whose `column` falls within the trailing `period`.
    pub fn since(column: impl Into<String>, period: Period) -> Self {
        Expr::Since {
            column: column.into(),
            period,
        }
    }

    /// Trusted SQL text. Never pass message input here.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    /// True when the expression would render no condition.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::And(children) | Expr::Or(children) => children.iter().all(Expr::is_empty),
            Expr::Not(inner) => inner.is_empty(),
            Expr::Raw(sql) => sql.trim().is_empty(),
            Expr::Compare { .. } | Expr::Null { .. } | Expr::Since { .. } => false,
        }
    }

    /// Render this condition, pushing bound values onto `params`.
    ///
    /// Placeholder numbers follow push order, so clauses have to be built in
    /// the order they appear in the statement.
    pub fn build(&self, params: &mut ParamList) -> String {
        match self {
            Expr::And(children) => join_children(children, " AND ", params),
            Expr::Or(children) => join_children(children, " OR ", params),
            Expr::Not(inner) => match inner.build(params) {
                sql if sql.is_empty() => sql,
                sql => format!("NOT ({sql})"),
            },
            Expr::Compare { column, op, value } => {
                let placeholder = params.bind(value.clone());
                format!("{column} {} {placeholder}", op.as_sql())
            }
            Expr::Null { column, negated } => {
                let not = if *negated { "NOT " } else { "" };
                format!("{column} IS {not}NULL")
            }
            Expr::Since { column, period } => {
                format!("{column} > now() - interval '1 {period}'")
            }
            Expr::Raw(sql) => sql.clone(),
        }
    }

    fn live_children(&self) -> usize {
        match self {
            Expr::And(children) | Expr::Or(children) => {
                children.iter().filter(|c| !c.is_empty()).count()
            }
            _ => 1,
        }
    }
}

fn join_children(children: &[Expr], sep: &str, params: &mut ParamList) -> String {
    let live: Vec<&Expr> = children.iter().filter(|c| !c.is_empty()).collect();
    let mut out = String::new();
    for child in &live {
        if !out.is_empty() {
            out.push_str(sep);
        }
        let sql = child.build(params);
        // Multi-term subgroups and raw text next to siblings keep their own precedence.
        let wrap = match child {
            Expr::And(_) | Expr::Or(_) => child.live_children() > 1,
            Expr::Raw(_) => live.len() > 1,
            _ => false,
        };
        if wrap {
            out.push('(');
            out.push_str(&sql);
            out.push(')');
        } else {
            out.push_str(&sql);
        }
    }
    out
}
