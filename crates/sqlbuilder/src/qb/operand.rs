//! Value-producing expression nodes.

use crate::dialect::Dialect;
use crate::error::{BuildResult, BuilderError};
use crate::qb::case::CaseExpr;
use crate::qb::param::{ParamList, Value};
use crate::qb::registry::NamedParam;
use crate::qb::select::SelectBuilder;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Rendering context threaded through one build pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BuildCtx<'a> {
    pub dialect: Dialect,
    /// Tables (and join tables) introduced before the fragment being rendered.
    pub known_tables: &'a BTreeSet<String>,
}

static NO_TABLES: BTreeSet<String> = BTreeSet::new();

impl BuildCtx<'static> {
    pub(crate) fn detached(dialect: Dialect) -> Self {
        Self {
            dialect,
            known_tables: &NO_TABLES,
        }
    }
}

/// Literal values or a sub-query, as accepted by IN / ANY / ALL.
#[derive(Clone, Debug)]
pub enum ValueSource {
    List(Vec<Value>),
    SubQuery(Box<SelectBuilder>),
}

impl ValueSource {
    /// Wrap a literal list; an empty list is rejected.
    pub(crate) fn list<T: Into<Value>>(
        values: impl IntoIterator<Item = T>,
        argument: &str,
    ) -> BuildResult<Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(BuilderError::empty(argument));
        }
        Ok(ValueSource::List(values))
    }

    /// Render the parenthesised body, `(?, ?)` or `(<sub-query>)`.
    pub(crate) fn build(&self, params: &mut ParamList) -> BuildResult<String> {
        match self {
            ValueSource::List(values) => {
                let placeholders: Vec<&str> = values
                    .iter()
                    .map(|v| {
                        params.push_value(v.clone());
                        "?"
                    })
                    .collect();
                Ok(format!("({})", placeholders.join(", ")))
            }
            ValueSource::SubQuery(sub) => build_subquery(sub, params),
        }
    }
}

/// Build a nested statement and splice its parameters in place.
pub(crate) fn build_subquery(sub: &SelectBuilder, params: &mut ParamList) -> BuildResult<String> {
    let (sql, sub_params) = sub.build_parts()?;
    params.extend(sub_params);
    Ok(format!("({sql})"))
}

/// A node that renders to one SQL value expression.
#[derive(Clone, Debug)]
pub enum Operand {
    /// Column reference, rendered verbatim.
    Column(String),
    /// Literal value, rendered as `?`.
    Literal(Value),
    /// Named parameter; each use yields a new binding.
    Named(NamedParam),
    /// Nested SELECT, rendered as `(<sub-query>)`.
    SubQuery(Box<SelectBuilder>),
    /// `ANY (...)`
    Any(ValueSource),
    /// `ALL (...)`
    All(ValueSource),
    /// `CASE WHEN ... END`
    Case(CaseExpr),
}

impl Operand {
    /// Render the SQL fragment and push parameters in the same pass.
    pub(crate) fn build(&self, ctx: &BuildCtx<'_>, params: &mut ParamList) -> BuildResult<String> {
        match self {
            Operand::Column(name) => Ok(ctx
                .dialect
                .format_table_identifier(name, ctx.known_tables)),
            Operand::Literal(value) => {
                params.push_value(value.clone());
                Ok("?".to_string())
            }
            Operand::Named(param) => {
                params.push_binding(param.key());
                Ok("?".to_string())
            }
            Operand::SubQuery(sub) => build_subquery(sub, params),
            Operand::Any(source) => Ok(format!("ANY {}", source.build(params)?)),
            Operand::All(source) => Ok(format!("ALL {}", source.build(params)?)),
            Operand::Case(case) => case.build(ctx, params),
        }
    }

    /// Render this operand on its own.
    pub fn to_sql(&self, dialect: Dialect) -> BuildResult<String> {
        self.build(&BuildCtx::detached(dialect), &mut ParamList::new())
    }

    /// Append this operand's parameters to `sink`, in rendering order.
    pub fn collect_params(&self, sink: &mut ParamList) -> BuildResult<()> {
        self.build(&BuildCtx::detached(Dialect::default()), sink)?;
        Ok(())
    }
}

macro_rules! impl_literal_operand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Operand::Literal(Value::from(v))
                }
            }
        )*
    };
}

impl_literal_operand!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    &String,
    NaiveDate,
    NaiveDateTime,
    Uuid,
);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Literal(Value::from(v))
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Literal(v)
    }
}

impl From<NamedParam> for Operand {
    fn from(p: NamedParam) -> Self {
        Operand::Named(p)
    }
}

impl From<&NamedParam> for Operand {
    fn from(p: &NamedParam) -> Self {
        Operand::Named(p.clone())
    }
}

impl From<CaseExpr> for Operand {
    fn from(c: CaseExpr) -> Self {
        Operand::Case(c)
    }
}

impl From<SelectBuilder> for Operand {
    fn from(sub: SelectBuilder) -> Self {
        Operand::SubQuery(Box::new(sub))
    }
}
