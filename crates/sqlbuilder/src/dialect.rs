//! Vendor-specific SQL formatting.
//!
//! A [`Dialect`] is a plain `Copy` value: it carries no state and can be shared
//! freely between builders.

use crate::error::BuilderError;
use crate::qb::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Generic, Oracle-like dialect (`LIMIT n OFFSET m`)
    #[default]
    Generic,
    /// IBM DB2
    Db2,
    /// Microsoft SQL Server
    MsSql,
    /// PostgreSQL
    Postgres,
    /// H2; strips known-table prefixes from join columns
    H2,
}

impl Dialect {
    /// All dialects, in declaration order.
    pub const ALL: [Dialect; 5] = [
        Dialect::Generic,
        Dialect::Db2,
        Dialect::MsSql,
        Dialect::Postgres,
        Dialect::H2,
    ];

    /// Lowercase configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Db2 => "db2",
            Dialect::MsSql => "mssql",
            Dialect::Postgres => "postgres",
            Dialect::H2 => "h2",
        }
    }

    /// Quote an identifier.
    ///
    /// Each `.`-separated segment is wrapped in double quotes with embedded
    /// quotes doubled; a `*` segment is left bare so `t.*` stays valid.
    /// `u.name` becomes `"u"."name"`, which the database labels `name`.
    pub fn quote(self, identifier: &str) -> String {
        let mut out = String::with_capacity(identifier.len() + 2);
        for (i, segment) in identifier.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            if segment == "*" {
                out.push('*');
                continue;
            }
            out.push('"');
            for ch in segment.chars() {
                if ch == '"' {
                    out.push('"');
                }
                out.push(ch);
            }
            out.push('"');
        }
        out
    }

    /// The paging clause for `limit` rows starting at `offset`.
    ///
    /// Returns `None` when the dialect has no paging syntax implemented.
    pub fn apply_paging(self, limit: u64, offset: u64) -> Option<String> {
        match self {
            Dialect::Generic | Dialect::Postgres | Dialect::H2 => {
                Some(format!("LIMIT {limit} OFFSET {offset}"))
            }
            Dialect::MsSql => Some(format!("OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY")),
            // TODO: DB2 paging; FETCH FIRST is only combinable with OFFSET from DB2 11.1 on,
            // so this needs a version switch in BuilderConfig first.
            Dialect::Db2 => None,
        }
    }

    /// Format a column reference given the tables introduced so far.
    ///
    /// H2 strips the longest leading `<table>.` whose `<table>` is already
    /// known, every other dialect returns the identifier unchanged.
    pub fn format_table_identifier(
        self,
        identifier: &str,
        known_tables: &BTreeSet<String>,
    ) -> String {
        if self != Dialect::H2 {
            return identifier.to_string();
        }
        known_tables
            .iter()
            .filter(|table| !table.is_empty())
            .filter_map(|table| {
                identifier
                    .strip_prefix(table.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (table.len(), rest))
            })
            .max_by_key(|(len, _)| *len)
            .map_or(identifier, |(_, rest)| rest)
            .to_string()
    }

    /// Render a value as a literal for the populated statement.
    ///
    /// Strings are single-quoted without escaping; everything else uses its
    /// natural textual form.
    pub fn render_literal(self, value: &Value) -> String {
        match value {
            Value::Text(s) => format!("'{s}'"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "generic" | "oracle" => Ok(Dialect::Generic),
            "sqlserver" => Ok(Dialect::MsSql),
            "postgresql" => Ok(Dialect::Postgres),
            _ => Dialect::ALL
                .into_iter()
                .find(|d| d.name() == wanted)
                .ok_or_else(|| BuilderError::Config(format!("unknown dialect '{s}'"))),
        }
    }
}
