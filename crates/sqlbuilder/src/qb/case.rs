//! `CASE WHEN ... THEN ... [ELSE ...] END` expressions.

use crate::error::{BuildResult, BuilderError};
use crate::qb::condition::Condition;
use crate::qb::operand::{BuildCtx, Operand};
use crate::qb::param::ParamList;

/// A finished CASE expression with at least one WHEN/THEN arm.
#[derive(Clone, Debug)]
pub struct CaseExpr {
    arms: Vec<(Condition, Operand)>,
    otherwise: Option<Box<Operand>>,
}

impl CaseExpr {
    pub(crate) fn build(&self, ctx: &BuildCtx<'_>, params: &mut ParamList) -> BuildResult<String> {
        let mut sql = String::from("CASE");
        for (when, then) in &self.arms {
            sql.push_str(" WHEN ");
            sql.push_str(&when.build(ctx, params)?);
            sql.push_str(" THEN ");
            sql.push_str(&then.build(ctx, params)?);
        }
        if let Some(otherwise) = &self.otherwise {
            sql.push_str(" ELSE ");
            sql.push_str(&otherwise.build(ctx, params)?);
        }
        sql.push_str(" END");
        Ok(sql)
    }
}

/// Accumulates WHEN/THEN arms in insertion order.
#[derive(Clone, Debug, Default)]
pub struct CaseBuilder {
    arms: Vec<(Condition, Operand)>,
    otherwise: Option<Operand>,
}

impl CaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `WHEN <when> THEN <then>` arm.
    pub fn when_then(mut self, when: Condition, then: impl Into<Operand>) -> Self {
        self.arms.push((when, then.into()));
        self
    }

    /// Set the `ELSE` branch, replacing any earlier one.
    pub fn otherwise(mut self, value: impl Into<Operand>) -> Self {
        self.otherwise = Some(value.into());
        self
    }

    /// Finish the expression; fails with `InvalidState` when no arm was added.
    pub fn end(self) -> BuildResult<CaseExpr> {
        if self.arms.is_empty() {
            return Err(BuilderError::invalid_state(
                "At least one WHEN/THEN combination is needed",
            ));
        }
        Ok(CaseExpr {
            arms: self.arms,
            otherwise: self.otherwise.map(Box::new),
        })
    }
}
