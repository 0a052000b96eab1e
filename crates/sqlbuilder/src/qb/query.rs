//! The built, immutable statement and its population into literal SQL.

use crate::dialect::Dialect;
use crate::error::{BuildResult, BuilderError};
use crate::qb::param::{Bindings, Param, Value};
use serde::Serialize;
use std::fmt;

/// A prepared SELECT statement plus its ordered parameter stream.
///
/// The statement text never changes after `build()`. Values for named
/// parameters live in the query's own [`Bindings`] and only affect
/// [`populated_statement`](Self::populated_statement) and
/// [`resolved_values`](Self::resolved_values).
#[derive(Clone, Debug, Serialize)]
pub struct Query {
    statement: String,
    params: Vec<Param>,
    dialect: Dialect,
    bindings: Bindings,
}

impl Query {
    pub(crate) fn new(statement: String, params: Vec<Param>, dialect: Dialect) -> Self {
        Self {
            statement,
            params,
            dialect,
            bindings: Bindings::new(),
        }
    }

    /// Prepared text with `?` placeholders.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Parameter stream, one entry per placeholder in [`statement`](Self::statement).
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Number of `?` placeholders, not counting `?` inside quoted identifiers.
    pub fn placeholder_count(&self) -> usize {
        placeholder_offsets(&self.statement).len()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Distinct named-parameter keys, in stream order.
    pub fn binding_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for key in self.params.iter().filter_map(Param::key) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    fn has_binding(&self, key: &str) -> bool {
        self.params.iter().any(|p| p.key() == Some(key))
    }

    /// Supply the value for every binding carrying `key`.
    ///
    /// Fails with `UnknownParameterKey` when no binding in this query uses `key`.
    pub fn set_parameter(&mut self, key: &str, value: impl Into<Value>) -> BuildResult<&mut Self> {
        if !self.has_binding(key) {
            return Err(BuilderError::UnknownParameterKey(key.to_string()));
        }
        self.bindings.set(key, value);
        Ok(self)
    }

    /// Statement with every resolvable parameter replaced by its literal.
    ///
    /// Unbound named parameters stay `?`. Strings are quoted but not escaped,
    /// so the result is for display only.
    pub fn populated_statement(&self) -> String {
        self.render_with(&self.bindings)
    }

    /// Populate using `bindings` instead of the query's own values.
    ///
    /// Fails with `UnknownParameterKey` for a key no binding in this query uses.
    pub fn populate_with(&self, bindings: &Bindings) -> BuildResult<String> {
        if let Some(unknown) = bindings.keys().find(|key| !self.has_binding(key)) {
            return Err(BuilderError::UnknownParameterKey(unknown.to_string()));
        }
        Ok(self.render_with(bindings))
    }

    /// The parameter stream with bindings resolved; unbound entries are `None`.
    ///
    /// Maps 1:1 onto a driver's positional parameter API.
    pub fn resolved_values(&self) -> Vec<Option<Value>> {
        self.params
            .iter()
            .map(|param| resolve(param, &self.bindings).cloned())
            .collect()
    }

    /// JSON dump of statement, parameters, dialect and bindings.
    pub fn to_json(&self) -> BuildResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn render_with(&self, bindings: &Bindings) -> String {
        let mut out = String::with_capacity(self.statement.len() + self.params.len() * 8);
        let mut params = self.params.iter();
        let mut copied = 0;
        for offset in placeholder_offsets(&self.statement) {
            out.push_str(&self.statement[copied..offset]);
            match params.next().and_then(|param| resolve(param, bindings)) {
                Some(value) => out.push_str(&self.dialect.render_literal(value)),
                None => out.push('?'),
            }
            copied = offset + 1;
        }
        out.push_str(&self.statement[copied..]);
        out
    }
}

/// Byte offsets of the `?` placeholders, skipping quoted identifiers and strings.
fn placeholder_offsets(sql: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut open_quote: Option<char> = None;
    for (i, ch) in sql.char_indices() {
        match open_quote {
            Some(quote) if ch == quote => open_quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => open_quote = Some(ch),
            None if ch == '?' => offsets.push(i),
            None => {}
        }
    }
    offsets
}

fn resolve<'a>(param: &'a Param, bindings: &'a Bindings) -> Option<&'a Value> {
    match param {
        Param::Value(value) => Some(value),
        Param::Binding(binding) => bindings.get(&binding.key),
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement)
    }
}
