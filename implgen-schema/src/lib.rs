//! # implgen Schema
//!
//! Type descriptor parser and resolvers.
//!
//! This crate provides:
//! - XML descriptor parsing into unlinked type descriptors
//! - Descriptor validation against the Java language rules
//! - Resolvers that link descriptors into shared type models
//! - A built-in index of common standard library types

use std::path::Path;
use std::sync::Arc;

use implgen_core::{QualifiedName, TypeModel};

pub mod error;
pub mod parser;
pub mod resolver;
pub mod stdlib;
pub mod types;
pub mod validation;

pub use error::{ParseError, ResolveError, SchemaError};
pub use parser::{parse_descriptor, parse_descriptors};
pub use resolver::{DescriptorSource, DirectorySource, IndexSource, Resolver, TypeResolver};
pub use stdlib::{STANDARD_LIBRARY_XML, standard_library_source};
pub use types::{DescriptorIndex, TypeDescriptor};
pub use validation::validate_descriptor;

/// Resolves `name` from a descriptor directory.
///
/// Names with no descriptor under `root` fall back to the standard library.
///
/// # Errors
/// Returns `ResolveError::TypeNotFound` if the type is described nowhere.
pub fn resolve_from_directory(
    root: impl AsRef<Path>,
    name: &str,
) -> Result<Arc<TypeModel>, ResolveError> {
    let name = parse_name(name)?;
    Resolver::from_directory(root.as_ref())?.resolve(&name)
}

/// Resolves `name` from the built-in standard library index.
///
/// # Errors
/// Returns `ResolveError::TypeNotFound` if the type is not in the index.
pub fn resolve_from_standard_library(name: &str) -> Result<Arc<TypeModel>, ResolveError> {
    let name = parse_name(name)?;
    Resolver::standard_library()?.resolve(&name)
}

fn parse_name(name: &str) -> Result<QualifiedName, ResolveError> {
    QualifiedName::parse(name).map_err(|_| ResolveError::InvalidName {
        name: name.to_string(),
    })
}
