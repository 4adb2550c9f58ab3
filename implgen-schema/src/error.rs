//! Error types for descriptor parsing, validation and resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for descriptor parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed escape sequence in an attribute value.
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Unknown element encountered.
    #[error("unknown element '{element}' in context '{context}'")]
    UnknownElement {
        /// Element name.
        element: String,
        /// Parent context.
        context: String,
    },

    /// Malformed type expression in an attribute.
    #[error("invalid type on element '{element}': {source}")]
    TypeExpression {
        /// Element carrying the expression.
        element: String,
        /// Underlying syntax error.
        #[source]
        source: implgen_core::Error,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition.
        kind: String,
        /// Name of the duplicate.
        name: String,
    },

    /// Invalid document structure.
    #[error("invalid descriptor structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown element error.
    pub fn unknown_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates an invalid structure error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}

/// Error type for descriptor validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A declaration breaks a Java language rule.
    #[error("invalid declaration in '{type_name}': {message}")]
    InvalidDeclaration {
        /// Declaring type.
        type_name: String,
        /// What is wrong.
        message: String,
    },

    /// Two members of one type have the same erased signature.
    #[error("duplicate member '{member}' in '{type_name}'")]
    DuplicateMember {
        /// Declaring type.
        type_name: String,
        /// Rendered member signature.
        member: String,
    },
}

impl SchemaError {
    /// Creates an invalid declaration error.
    pub fn invalid(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// Error type for type resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No source describes the requested type.
    #[error("type '{name}' not found")]
    TypeNotFound {
        /// Requested name.
        name: String,
    },

    /// The requested name is not a valid qualified name.
    #[error("invalid type name '{name}'")]
    InvalidName {
        /// Requested name.
        name: String,
    },

    /// A descriptor could not be parsed.
    #[error("failed to parse descriptor of '{name}': {source}")]
    Parse {
        /// Type whose descriptor failed.
        name: String,
        /// Underlying parse error.
        #[source]
        source: ParseError,
    },

    /// A descriptor failed validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A descriptor file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Supertype links form a cycle.
    #[error("circular type reference detected: {path}")]
    CircularReference {
        /// Path of the circular reference.
        path: String,
    },

    /// Supertype links violate the language rules.
    #[error("invalid hierarchy for '{name}': {message}")]
    InvalidHierarchy {
        /// Type being linked.
        name: String,
        /// What is wrong.
        message: String,
    },

    /// A descriptor file declares a different type than its path implies.
    #[error("descriptor declares '{found}' but was found at the location of '{expected}'")]
    NameMismatch {
        /// Name implied by the path.
        expected: String,
        /// Name declared in the file.
        found: String,
    },
}

impl ResolveError {
    /// Creates an invalid hierarchy error.
    pub fn hierarchy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHierarchy {
            name: name.into(),
            message: message.into(),
        }
    }
}
