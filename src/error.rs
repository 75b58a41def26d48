//! Error types for pattern compilation.

use thiserror::Error;

/// The main error type for pattern compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The pattern contains a construct the compiler has no lowering for.
    #[error("unsupported pattern syntax: {0}")]
    UnsupportedSyntax(String),

    /// An internal invariant of the compiler was violated. This is a defect
    /// in the compiler, not in the pattern; compilation of the current
    /// query is abandoned.
    #[error("compiler invariant violated: {0}")]
    Internal(String),
}

impl CompileError {
    /// Create an unsupported-syntax error carrying the offending node.
    pub fn unsupported(node: &impl std::fmt::Debug) -> Self {
        Self::UnsupportedSyntax(format!("{node:?}"))
    }

    /// Create an internal invariant-violation error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Result type alias for pattern compilation.
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompileError::internal("pointer accessed outside a match");
        assert_eq!(
            err.to_string(),
            "compiler invariant violated: pointer accessed outside a match"
        );
    }

    #[test]
    fn test_unsupported_carries_offending_value() {
        let err = CompileError::unsupported(&"List");
        assert_eq!(err.to_string(), "unsupported pattern syntax: \"List\"");
    }
}
