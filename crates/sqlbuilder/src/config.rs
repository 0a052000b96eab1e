use crate::dialect::Dialect;
use crate::error::BuildResult;
use serde::{Deserialize, Serialize};

/// Configuration shared by the builders of one session.
///
/// ```ignore
/// let config = BuilderConfig::new(Dialect::Postgres).with_schema("app");
/// let mut b = SelectBuilder::with_config(config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// SQL dialect used for quoting, paging and literal rendering.
    pub dialect: Dialect,
    /// Schema prefixed to every table. `None` means unqualified tables (default).
    pub schema: Option<String>,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            schema: None,
            max_logged_sql_length: Some(200),
        }
    }
}

impl BuilderConfig {
    /// Create a configuration for `dialect` with defaults otherwise.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON, e.g. `{"dialect": "postgres", "schema": "app"}`.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> BuildResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Prefix every table with `schema`. A blank schema clears it.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        let schema = schema.into();
        self.schema = (!schema.trim().is_empty()).then_some(schema);
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }

    /// Qualify `table` with the configured schema.
    pub(crate) fn qualify_table(&self, table: &str) -> String {
        match self.schema.as_deref() {
            Some(schema) => format!("{schema}.{table}"),
            None => table.to_string(),
        }
    }
}
