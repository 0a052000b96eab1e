//! Query builder (QB) for SELECT statements.
//!
//! # Features
//!
//! - **Closed expression trees**: [`Operand`] and [`Condition`] render SQL and collect
//!   parameters in one pass, so placeholder order always matches the text
//! - **Named parameters**: keys handed out by a [`ParamRegistry`], values supplied
//!   later on the built [`Query`]
//! - **Sub-queries**: any [`SelectBuilder`] can be used inside IN / EXISTS / ANY / ALL
//!   or as a comparison operand
//!
//! # Usage
//!
//! ```ignore
//! use sqlbuilder::qb::*;
//!
//! let mut registry = ParamRegistry::new();
//! let min_age = registry.param("min_age")?;
//!
//! let mut sub = select(Dialect::Postgres);
//! sub.select(["user_id"])?.from("orders")?.where_(gt("total", 100));
//!
//! let mut query = select(Dialect::Postgres)
//!     .from("users")?
//!     .where_(eq("status", "active").and().geq("age", &min_age))
//!     .where_(in_subquery("id", sub))
//!     .build()?;
//!
//! query.set_parameter("min_age", 18)?;
//! println!("{}", query.populated_statement());
//! ```

mod case;
mod condition;
mod expr;
mod operand;
mod param;
mod query;
mod registry;
mod select;

pub use case::{CaseBuilder, CaseExpr};
pub use condition::{CompareOp, Condition, ConditionChain, Joiner};
pub use expr::*;
pub use operand::{Operand, ValueSource};
pub use param::{Binding, Bindings, Param, ParamList, Value};
pub use query::Query;
pub use registry::{NamedParam, ParamRegistry};
pub use select::{JoinKind, OrderDirection, SelectBuilder};

pub use crate::dialect::Dialect;

/// Create a SELECT builder for `dialect`.
pub fn select(dialect: Dialect) -> SelectBuilder {
    SelectBuilder::new(dialect)
}

#[cfg(test)]
mod tests;
