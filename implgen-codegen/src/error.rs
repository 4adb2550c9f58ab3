//! Error types for implementation generation.

use std::path::PathBuf;

use implgen_schema::ResolveError;
use thiserror::Error;

/// Error type for implementation generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The requested type could not be resolved.
    #[error("type '{name}' not found")]
    TypeNotFound {
        /// Requested name.
        name: String,
    },

    /// A descriptor was found but could not be turned into a type model.
    #[error("resolution error: {0}")]
    Resolve(#[source] ResolveError),

    /// The target is not an interface or abstract class that can be implemented.
    #[error("cannot generate an implementation of '{name}': {reason}")]
    NotGeneratable {
        /// Requested name.
        name: String,
        /// Why the target is rejected.
        reason: String,
    },

    /// Supertypes impose incompatible contracts on one method.
    #[error("conflicting declarations of '{method}': {reason}")]
    Conflict {
        /// Rendered method signature.
        method: String,
        /// What is incompatible.
        reason: String,
    },

    /// No superclass constructor can be invoked by a generated subclass.
    #[error("abstract class '{name}' has no constructor accessible to a subclass")]
    NoAccessibleConstructor {
        /// Abstract class name.
        name: String,
    },

    /// Internal invariant violated while assembling the output.
    #[error("emission error: {message}")]
    Emission {
        /// Error message.
        message: String,
    },

    /// The generated source could not be written.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Creates a not-generatable error.
    pub fn not_generatable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotGeneratable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Creates an emission error with the given message.
    pub fn emission(message: impl Into<String>) -> Self {
        Self::Emission {
            message: message.into(),
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<ResolveError> for CodegenError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::TypeNotFound { name } => Self::TypeNotFound { name },
            other => Self::Resolve(other),
        }
    }
}
