//! # implgen Core
//!
//! Type model shared by the implgen crates.
//!
//! This crate provides:
//! - Java type references with substitution and erasure
//! - A parser for Java type expressions
//! - The resolved [`TypeModel`] of classes and interfaces
//! - A subtyping oracle over resolved models

pub mod error;
pub mod model;
pub mod subtype;
pub mod syntax;
pub mod types;

pub use error::{Error, Result};
pub use model::{Access, ConstructorSignature, MethodSignature, Supertype, TypeKind, TypeModel};
pub use subtype::{NoLookup, Subtyping, TypeLookup};
pub use syntax::{TypeScope, parse_bounds, parse_class_ref, parse_parameter_type, parse_type};
pub use types::{
    ClassRef, ErasureScope, PrimitiveType, QualifiedName, Substitution, TypeParameter, TypeRef,
    Wildcard, is_java_identifier,
};

/// Error raised for malformed type expressions.
pub type TypeSyntaxError = Error;
