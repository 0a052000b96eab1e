//! Error types for sqlbuilder

use thiserror::Error;

/// Result type alias for builder operations
pub type BuildResult<T> = Result<T, BuilderError>;

/// Usage errors raised while assembling or populating a statement.
///
/// Every variant is a programmer error detected at the call that violated
/// the contract. Nothing is coerced or silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// A required string or collection argument was blank or empty
    #[error("Value cannot be empty: {0}")]
    EmptyValue(String),

    /// The builder was used in a way its current state does not allow
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A named parameter key was registered twice
    #[error("Duplicate parameter key: {0}")]
    DuplicateKey(String),

    /// A value was supplied for a key no binding in the query carries
    #[error("Unknown parameter key: {0}")]
    UnknownParameterKey(String),

    /// Builder configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl BuilderError {
    /// Create an empty-value error naming the offending argument
    pub fn empty(argument: impl Into<String>) -> Self {
        Self::EmptyValue(argument.into())
    }

    /// Create an invalid-state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Check if this is an empty-value error
    pub fn is_empty_value(&self) -> bool {
        matches!(self, Self::EmptyValue(_))
    }

    /// Check if this is an invalid-state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    /// Check if this is a duplicate-key error
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }

    /// Check if this is an unknown-parameter-key error
    pub fn is_unknown_parameter_key(&self) -> bool {
        matches!(self, Self::UnknownParameterKey(_))
    }
}

impl From<serde_json::Error> for BuilderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Reject blank strings with [`BuilderError::EmptyValue`].
pub(crate) fn require_non_blank(value: &str, argument: &str) -> BuildResult<()> {
    if value.trim().is_empty() {
        return Err(BuilderError::empty(argument));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(require_non_blank("", "column").unwrap_err().is_empty_value());
        assert!(
            require_non_blank("   ", "column")
                .unwrap_err()
                .is_empty_value()
        );
        assert!(require_non_blank("id", "column").is_ok());
    }

    #[test]
    fn messages_name_the_argument() {
        assert_eq!(
            BuilderError::empty("tables").to_string(),
            "Value cannot be empty: tables"
        );
        assert_eq!(
            BuilderError::DuplicateKey("p1".into()).to_string(),
            "Duplicate parameter key: p1"
        );
    }
}
