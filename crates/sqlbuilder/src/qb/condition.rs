//! Boolean expression nodes for WHERE and JOIN ... ON clauses.
//!
//! [`Condition::build`] renders SQL with `?` placeholders and pushes the matching
//! parameters in a single left-to-right pass, so the placeholder order of the
//! text and the order of the parameter stream can never disagree.

use crate::dialect::Dialect;
use crate::error::BuildResult;
use crate::qb::operand::{BuildCtx, Operand, ValueSource, build_subquery};
use crate::qb::param::{ParamList, Value};
use crate::qb::select::SelectBuilder;

/// Binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
    Like,
    NotLike,
}

impl CompareOp {
    pub const fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "<>",
            CompareOp::Lt => "<",
            CompareOp::Leq => "<=",
            CompareOp::Gt => ">",
            CompareOp::Geq => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
        }
    }
}

/// Boolean connective of a composite condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    And,
    Or,
}

impl Joiner {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

/// A node that renders to a boolean SQL predicate.
#[derive(Clone, Debug)]
pub enum Condition {
    /// `left op right`
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },

    /// `column IS NULL` / `column IS NOT NULL`
    NullCheck { column: String, negated: bool },

    /// `NOT inner`
    Not(Box<Condition>),

    /// `column IN (...)` / `column NOT IN (...)`
    In {
        column: String,
        source: ValueSource,
        negated: bool,
    },

    /// `EXISTS (...)` / `NOT EXISTS (...)`
    Exists {
        query: Box<SelectBuilder>,
        negated: bool,
    },

    /// `column BETWEEN lower AND upper`
    Between {
        column: Operand,
        lower: Operand,
        upper: Operand,
        negated: bool,
    },

    /// Children joined by AND / OR, in order.
    Composite {
        joiner: Joiner,
        conditions: Vec<Condition>,
    },

    /// Explicit brackets: `(inner)`
    Grouped(Box<Condition>),
}

impl Condition {
    /// Build `left op right`.
    pub fn compare(left: impl Into<Operand>, op: CompareOp, right: impl Into<Operand>) -> Self {
        Condition::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    /// Join `conditions` with AND.
    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::Composite {
            joiner: Joiner::And,
            conditions,
        }
    }

    /// Join `conditions` with OR.
    pub fn any(conditions: Vec<Condition>) -> Self {
        Condition::Composite {
            joiner: Joiner::Or,
            conditions,
        }
    }

    /// Start an AND chain with this condition on the left.
    pub fn and(self) -> ConditionChain {
        ConditionChain {
            left: self,
            joiner: Joiner::And,
        }
    }

    /// Start an OR chain with this condition on the left.
    pub fn or(self) -> ConditionChain {
        ConditionChain {
            left: self,
            joiner: Joiner::Or,
        }
    }

    /// Whether this renders to nothing (a composite with no non-empty children).
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::Composite { conditions, .. } => conditions.iter().all(Condition::is_empty),
            Condition::Not(inner) | Condition::Grouped(inner) => inner.is_empty(),
            _ => false,
        }
    }

    /// A composite that renders more than one child.
    fn is_compound(&self) -> bool {
        match self {
            Condition::Composite { conditions, .. } => {
                conditions.iter().filter(|c| !c.is_empty()).count() > 1
            }
            _ => false,
        }
    }

    /// Render the SQL fragment and collect its parameters into `params`.
    pub(crate) fn build(&self, ctx: &BuildCtx<'_>, params: &mut ParamList) -> BuildResult<String> {
        match self {
            Condition::Compare { left, op, right } => {
                let left = left.build(ctx, params)?;
                let right = right.build(ctx, params)?;
                Ok(format!("{} {} {}", left, op.as_sql(), right))
            }
            Condition::NullCheck { column, negated } => {
                let column = ctx.dialect.format_table_identifier(column, ctx.known_tables);
                if *negated {
                    Ok(format!("{column} IS NOT NULL"))
                } else {
                    Ok(format!("{column} IS NULL"))
                }
            }
            Condition::Not(inner) => {
                let sql = inner.build(ctx, params)?;
                if sql.is_empty() {
                    Ok(sql)
                } else if inner.is_compound() {
                    Ok(format!("NOT ({sql})"))
                } else {
                    Ok(format!("NOT {sql}"))
                }
            }
            Condition::In {
                column,
                source,
                negated,
            } => {
                let column = ctx.dialect.format_table_identifier(column, ctx.known_tables);
                let op = if *negated { "NOT IN" } else { "IN" };
                Ok(format!("{} {} {}", column, op, source.build(params)?))
            }
            Condition::Exists { query, negated } => {
                let op = if *negated { "NOT EXISTS" } else { "EXISTS" };
                Ok(format!("{} {}", op, build_subquery(query, params)?))
            }
            Condition::Between {
                column,
                lower,
                upper,
                negated,
            } => {
                let column = column.build(ctx, params)?;
                let lower = lower.build(ctx, params)?;
                let upper = upper.build(ctx, params)?;
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                Ok(format!("{column} {op} {lower} AND {upper}"))
            }
            Condition::Composite { joiner, conditions } => {
                let mut parts = Vec::with_capacity(conditions.len());
                for condition in conditions {
                    let sql = condition.build(ctx, params)?;
                    if sql.is_empty() {
                        continue;
                    }
                    // A nested group with the other connective keeps its own precedence.
                    let nested_other = matches!(
                        condition,
                        Condition::Composite { joiner: inner, .. } if inner != joiner
                    );
                    if nested_other && condition.is_compound() {
                        parts.push(format!("({sql})"));
                    } else {
                        parts.push(sql);
                    }
                }
                Ok(parts.join(&format!(" {} ", joiner.as_sql())))
            }
            Condition::Grouped(inner) => {
                let sql = inner.build(ctx, params)?;
                if sql.is_empty() {
                    Ok(sql)
                } else {
                    Ok(format!("({sql})"))
                }
            }
        }
    }

    /// Render this condition on its own.
    pub fn to_sql(&self, dialect: Dialect) -> BuildResult<String> {
        self.build(&BuildCtx::detached(dialect), &mut ParamList::new())
    }

    /// Append this condition's parameters to `sink`, in rendering order.
    pub fn collect_params(&self, sink: &mut ParamList) -> BuildResult<()> {
        self.build(&BuildCtx::detached(Dialect::default()), sink)?;
        Ok(())
    }
}

/// A pending `left AND|OR ...` combination.
///
/// Each predicate method wraps `{left, joiner, new}` into a binary composite, so
/// chains nest to the left: `a.and().eq(..).or().eq(..)` is `((a AND x) OR y)`.
#[derive(Clone, Debug)]
#[must_use = "a chain does nothing until a predicate is added"]
pub struct ConditionChain {
    left: Condition,
    joiner: Joiner,
}

impl ConditionChain {
    /// Combine with an already-built condition.
    pub fn condition(self, right: Condition) -> Condition {
        Condition::Composite {
            joiner: self.joiner,
            conditions: vec![self.left, right],
        }
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Operand>) -> Condition {
        self.condition(crate::qb::eq(column, value))
    }

    pub fn neq(self, column: impl Into<String>, value: impl Into<Operand>) -> Condition {
        self.condition(crate::qb::neq(column, value))
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<Operand>) -> Condition {
        self.condition(crate::qb::lt(column, value))
    }

    pub fn leq(self, column: impl Into<String>, value: impl Into<Operand>) -> Condition {
        self.condition(crate::qb::leq(column, value))
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Operand>) -> Condition {
        self.condition(crate::qb::gt(column, value))
    }

    pub fn geq(self, column: impl Into<String>, value: impl Into<Operand>) -> Condition {
        self.condition(crate::qb::geq(column, value))
    }

    pub fn like(self, column: impl Into<String>, pattern: impl Into<Operand>) -> Condition {
        self.condition(crate::qb::like(column, pattern))
    }

    pub fn not_like(self, column: impl Into<String>, pattern: impl Into<Operand>) -> Condition {
        self.condition(crate::qb::not_like(column, pattern))
    }

    pub fn is_null(self, column: impl Into<String>) -> Condition {
        self.condition(crate::qb::is_null(column))
    }

    pub fn is_not_null(self, column: impl Into<String>) -> Condition {
        self.condition(crate::qb::is_not_null(column))
    }

    pub fn not(self, inner: Condition) -> Condition {
        self.condition(crate::qb::not(inner))
    }

    pub fn in_list<T: Into<Value>>(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> BuildResult<Condition> {
        Ok(self.condition(crate::qb::in_list(column, values)?))
    }

    pub fn not_in<T: Into<Value>>(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> BuildResult<Condition> {
        Ok(self.condition(crate::qb::not_in(column, values)?))
    }

    pub fn in_subquery(self, column: impl Into<String>, sub: SelectBuilder) -> Condition {
        self.condition(crate::qb::in_subquery(column, sub))
    }

    pub fn not_in_subquery(self, column: impl Into<String>, sub: SelectBuilder) -> Condition {
        self.condition(crate::qb::not_in_subquery(column, sub))
    }

    pub fn between(
        self,
        column: impl Into<String>,
        lower: impl Into<Operand>,
        upper: impl Into<Operand>,
    ) -> Condition {
        self.condition(crate::qb::between(column, lower, upper))
    }

    pub fn not_between(
        self,
        column: impl Into<String>,
        lower: impl Into<Operand>,
        upper: impl Into<Operand>,
    ) -> Condition {
        self.condition(crate::qb::not_between(column, lower, upper))
    }

    pub fn exists(self, sub: SelectBuilder) -> Condition {
        self.condition(crate::qb::exists(sub))
    }

    pub fn not_exists(self, sub: SelectBuilder) -> Condition {
        self.condition(crate::qb::not_exists(sub))
    }
}
