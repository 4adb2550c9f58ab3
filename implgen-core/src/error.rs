//! Error types for implgen core operations.

use thiserror::Error;

/// Core error type for type-model operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A type expression could not be parsed.
    #[error("invalid type expression '{text}' at position {position}: {message}")]
    TypeSyntax {
        /// The full expression text.
        text: String,
        /// Character position of the failure.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// A dotted name is not a valid qualified identifier.
    #[error("invalid qualified name '{name}'")]
    InvalidName {
        /// The offending name.
        name: String,
    },
}

impl Error {
    /// Creates a type syntax error.
    pub fn syntax(text: impl Into<String>, position: usize, message: impl Into<String>) -> Self {
        Self::TypeSyntax {
            text: text.into(),
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for implgen core operations.
pub type Result<T> = std::result::Result<T, Error>;
