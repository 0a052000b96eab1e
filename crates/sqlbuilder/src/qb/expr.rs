//! Free constructor functions for operands and conditions.
//!
//! Column arguments are taken verbatim; value arguments accept anything that
//! converts into an [`Operand`]: plain Rust values become `?` literals, while
//! [`col`], named parameters, CASE expressions and sub-queries keep their own
//! rendering.
//!
//! ```ignore
//! use sqlbuilder::qb::*;
//!
//! let cond = eq("status", "active").and().gt("age", 18);
//! let join_on = eq("o.user_id", col("u.id"));
//! ```

use crate::error::BuildResult;
use crate::qb::case::CaseBuilder;
use crate::qb::condition::{CompareOp, Condition};
use crate::qb::operand::{Operand, ValueSource};
use crate::qb::param::Value;
use crate::qb::select::SelectBuilder;

/// A column reference.
pub fn col(name: impl Into<String>) -> Operand {
    Operand::Column(name.into())
}

/// A column reference qualified by `alias`.
///
/// Any existing qualifier on `column` is replaced: `col_in("o", "orders.id")`
/// is `o.id`. A blank alias leaves the column untouched.
pub fn col_in(alias: &str, column: &str) -> Operand {
    if alias.trim().is_empty() {
        return col(column);
    }
    let bare = column.rsplit('.').next().unwrap_or(column);
    Operand::Column(format!("{alias}.{bare}"))
}

/// A literal value, rendered as `?`.
pub fn value(v: impl Into<Value>) -> Operand {
    Operand::Literal(v.into())
}

/// `ANY (?, ...)`; fails with `EmptyValue` for an empty list.
pub fn any<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> BuildResult<Operand> {
    Ok(Operand::Any(ValueSource::list(values, "values")?))
}

/// `ANY (<sub-query>)`
pub fn any_subquery(sub: SelectBuilder) -> Operand {
    Operand::Any(ValueSource::SubQuery(Box::new(sub)))
}

/// `ALL (?, ...)`; fails with `EmptyValue` for an empty list.
pub fn all<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> BuildResult<Operand> {
    Ok(Operand::All(ValueSource::list(values, "values")?))
}

/// `ALL (<sub-query>)`
pub fn all_subquery(sub: SelectBuilder) -> Operand {
    Operand::All(ValueSource::SubQuery(Box::new(sub)))
}

/// Start a CASE expression.
pub fn case() -> CaseBuilder {
    CaseBuilder::new()
}

fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Operand>) -> Condition {
    Condition::compare(col(column), op, value)
}

/// `column = value`
pub fn eq(column: impl Into<String>, value: impl Into<Operand>) -> Condition {
    compare(column, CompareOp::Eq, value)
}

/// `column <> value`
pub fn neq(column: impl Into<String>, value: impl Into<Operand>) -> Condition {
    compare(column, CompareOp::Neq, value)
}

/// `column < value`
pub fn lt(column: impl Into<String>, value: impl Into<Operand>) -> Condition {
    compare(column, CompareOp::Lt, value)
}

/// `column <= value`
pub fn leq(column: impl Into<String>, value: impl Into<Operand>) -> Condition {
    compare(column, CompareOp::Leq, value)
}

/// `column > value`
pub fn gt(column: impl Into<String>, value: impl Into<Operand>) -> Condition {
    compare(column, CompareOp::Gt, value)
}

/// `column >= value`
pub fn geq(column: impl Into<String>, value: impl Into<Operand>) -> Condition {
    compare(column, CompareOp::Geq, value)
}

/// `column LIKE pattern`
pub fn like(column: impl Into<String>, pattern: impl Into<Operand>) -> Condition {
    compare(column, CompareOp::Like, pattern)
}

/// `column NOT LIKE pattern`
pub fn not_like(column: impl Into<String>, pattern: impl Into<Operand>) -> Condition {
    compare(column, CompareOp::NotLike, pattern)
}

/// `column IS NULL`
pub fn is_null(column: impl Into<String>) -> Condition {
    Condition::NullCheck {
        column: column.into(),
        negated: false,
    }
}

/// `column IS NOT NULL`
pub fn is_not_null(column: impl Into<String>) -> Condition {
    Condition::NullCheck {
        column: column.into(),
        negated: true,
    }
}

/// `NOT condition`
pub fn not(condition: Condition) -> Condition {
    Condition::Not(Box::new(condition))
}

/// `(condition)`
pub fn brackets(condition: Condition) -> Condition {
    Condition::Grouped(Box::new(condition))
}

/// `column IN (?, ...)`; fails with `EmptyValue` for an empty list.
pub fn in_list<T: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> BuildResult<Condition> {
    Ok(Condition::In {
        column: column.into(),
        source: ValueSource::list(values, "values")?,
        negated: false,
    })
}

/// `column NOT IN (?, ...)`; fails with `EmptyValue` for an empty list.
pub fn not_in<T: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> BuildResult<Condition> {
    Ok(Condition::In {
        column: column.into(),
        source: ValueSource::list(values, "values")?,
        negated: true,
    })
}

/// `column IN (<sub-query>)`
pub fn in_subquery(column: impl Into<String>, sub: SelectBuilder) -> Condition {
    Condition::In {
        column: column.into(),
        source: ValueSource::SubQuery(Box::new(sub)),
        negated: false,
    }
}

/// `column NOT IN (<sub-query>)`
pub fn not_in_subquery(column: impl Into<String>, sub: SelectBuilder) -> Condition {
    Condition::In {
        column: column.into(),
        source: ValueSource::SubQuery(Box::new(sub)),
        negated: true,
    }
}

/// `EXISTS (<sub-query>)`
pub fn exists(sub: SelectBuilder) -> Condition {
    Condition::Exists {
        query: Box::new(sub),
        negated: false,
    }
}

/// `NOT EXISTS (<sub-query>)`
pub fn not_exists(sub: SelectBuilder) -> Condition {
    Condition::Exists {
        query: Box::new(sub),
        negated: true,
    }
}

/// `column BETWEEN lower AND upper`
pub fn between(
    column: impl Into<String>,
    lower: impl Into<Operand>,
    upper: impl Into<Operand>,
) -> Condition {
    Condition::Between {
        column: col(column),
        lower: lower.into(),
        upper: upper.into(),
        negated: false,
    }
}

/// `column NOT BETWEEN lower AND upper`
pub fn not_between(
    column: impl Into<String>,
    lower: impl Into<Operand>,
    upper: impl Into<Operand>,
) -> Condition {
    Condition::Between {
        column: col(column),
        lower: lower.into(),
        upper: upper.into(),
        negated: true,
    }
}

/// AND all conditions together.
pub fn and_all(conditions: Vec<Condition>) -> Condition {
    Condition::all(conditions)
}

/// OR all conditions together.
pub fn or_all(conditions: Vec<Condition>) -> Condition {
    Condition::any(conditions)
}
