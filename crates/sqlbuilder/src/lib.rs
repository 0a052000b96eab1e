//! # sqlbuilder
//!
//! A fluent builder for SQL SELECT statements.
//!
//! ## Features
//!
//! - **Prepared statements**: every value becomes a `?` placeholder, collected in text order
//! - **Composable conditions**: comparisons, NULL checks, IN / EXISTS / BETWEEN, AND/OR/NOT groups
//! - **Sub-queries**: nest a builder anywhere a value list or operand is accepted
//! - **Named parameters**: reserve keys up front, supply values on the built query
//! - **Dialects**: quoting, paging and literal rendering for Generic, DB2, MS SQL, Postgres and H2
//! - **Logging**: SQL debug events via `tracing` (feature `tracing`, on by default)
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use sqlbuilder::qb::*;
//!
//! let query = select(Dialect::Generic)
//!     .select(["id", "name"])?
//!     .from("users")?
//!     .where_(eq("status", "active").and().gt("age", 18))
//!     .order_by(["name"])?
//!     .asc()?
//!     .build()?;
//!
//! assert_eq!(
//!     query.statement(),
//!     r#"SELECT "id", "name" FROM users WHERE status = ? AND age > ? ORDER BY name ASC"#
//! );
//! assert_eq!(
//!     query.populated_statement(),
//!     r#"SELECT "id", "name" FROM users WHERE status = 'active' AND age > 18 ORDER BY name ASC"#
//! );
//! ```

pub mod config;
pub mod dialect;
pub mod error;
mod monitor;
pub mod qb;

pub use config::BuilderConfig;
pub use dialect::Dialect;
pub use error::{BuildResult, BuilderError};

// Re-export qb module for easy access
pub use qb::{
    Bindings, CaseBuilder, CaseExpr, Condition, NamedParam, Operand, Param, ParamRegistry, Query,
    SelectBuilder, Value, select,
};
