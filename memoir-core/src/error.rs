use std::fmt;

use thiserror::Error;

/// Result type used by the memoizer.
pub type MemoResult<T> = Result<T, MemoError>;

/// Where an offending argument sits in a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgPosition {
    /// Zero-based positional index
    Positional(usize),
    /// Keyword argument name
    Keyword(String),
}

impl fmt::Display for ArgPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgPosition::Positional(index) => write!(f, "positional argument {}", index),
            ArgPosition::Keyword(name) => write!(f, "keyword argument `{}`", name),
        }
    }
}

/// Errors raised while building a call signature.
///
/// Both variants are reported before the wrapped function runs and before
/// the cache is read or written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    #[error("unhashable type `{type_name}` in {position}")]
    Unhashable {
        position: ArgPosition,
        type_name: &'static str,
    },

    #[error("keyword argument `{0}` given more than once")]
    DuplicateKeyword(String),
}

impl MemoError {
    /// Returns `true` for [`MemoError::Unhashable`].
    pub fn is_unhashable(&self) -> bool {
        matches!(self, MemoError::Unhashable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhashable_message_names_position() {
        let err = MemoError::Unhashable {
            position: ArgPosition::Positional(1),
            type_name: "list",
        };
        assert_eq!(
            err.to_string(),
            "unhashable type `list` in positional argument 1"
        );
        assert!(err.is_unhashable());
    }

    #[test]
    fn test_keyword_message() {
        let err = MemoError::Unhashable {
            position: ArgPosition::Keyword("tags".to_string()),
            type_name: "dict",
        };
        assert_eq!(
            err.to_string(),
            "unhashable type `dict` in keyword argument `tags`"
        );

        let dup = MemoError::DuplicateKeyword("b".to_string());
        assert_eq!(dup.to_string(), "keyword argument `b` given more than once");
        assert!(!dup.is_unhashable());
    }
}
