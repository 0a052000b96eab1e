//! Named parameters and their session-scoped key registry.

use crate::error::{BuildResult, BuilderError, require_non_blank};
use std::collections::HashSet;

/// A caller-named parameter placeholder.
///
/// Obtained from [`ParamRegistry::param`]; the same `NamedParam` may be used in
/// several expressions, each use becoming its own binding in the built query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedParam {
    key: String,
}

impl NamedParam {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Tracks the named-parameter keys handed out in one statement-construction session.
///
/// Keys are unique per registry. Sharing a registry between threads requires
/// external synchronisation, e.g. a `Mutex<ParamRegistry>`.
#[derive(Debug, Default)]
pub struct ParamRegistry {
    keys: HashSet<String>,
}

impl ParamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` and return its parameter.
    ///
    /// Fails with `EmptyValue` for a blank key and `DuplicateKey` when the key
    /// was already registered.
    pub fn param(&mut self, key: impl Into<String>) -> BuildResult<NamedParam> {
        let key = key.into();
        require_non_blank(&key, "parameter key")?;
        if !self.keys.insert(key.clone()) {
            return Err(BuilderError::DuplicateKey(key));
        }
        Ok(NamedParam { key })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
