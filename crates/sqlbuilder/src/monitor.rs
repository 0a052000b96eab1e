//! SQL debug logging via `tracing`.
//!
//! Every successful `build()` emits a DEBUG event on target `sqlbuilder.sql`
//! carrying the dialect, the parameter count and the prepared statement
//! (truncated per [`BuilderConfig::max_logged_sql_length`]). Failed builds are
//! logged on the same target before the error is returned.
//!
//! Enable via the crate feature: `sqlbuilder = { features = ["tracing"] }` (on by default).

use crate::config::BuilderConfig;
use crate::error::BuilderError;
use crate::qb::Query;

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn query_built(config: &BuilderConfig, query: &Query) {
    let sql = truncate_sql(query.statement(), config.max_logged_sql_length);
    tracing::debug!(
        target: "sqlbuilder.sql",
        dialect = %config.dialect,
        param_count = query.param_count(),
        sql = %sql,
        "select built"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn query_built(_config: &BuilderConfig, _query: &Query) {}

#[cfg(feature = "tracing")]
pub(crate) fn build_failed(config: &BuilderConfig, error: &BuilderError) {
    tracing::debug!(
        target: "sqlbuilder.sql",
        dialect = %config.dialect,
        error = %error,
        "select build failed"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn build_failed(_config: &BuilderConfig, _error: &BuilderError) {}
