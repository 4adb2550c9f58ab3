//! # implgen Codegen
//!
//! Generation of Java implementation stubs from resolved type models.
//!
//! This crate provides:
//! - Obligation collection over the supertype graph
//! - Stub body synthesis with default return values
//! - Java source emission and atomic file output
//! - A generation driver and its builder

pub mod body;
pub mod builder;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod obligations;

pub use body::{Body, BodySynthesizer, DefaultValue};
pub use builder::ImplementorBuilder;
pub use emitter::{GeneratedUnit, SourceEmitter};
pub use error::CodegenError;
pub use generator::{GenerationOutcome, Implementor};
pub use obligations::{ConstructorObligation, MethodObligation, Obligation, ObligationCollector};

use std::path::Path;

/// Generates an implementation of `name` from a descriptor directory.
///
/// # Arguments
/// * `source_dir` - Root of the descriptor tree
/// * `name` - Fully-qualified name of an interface or abstract class
/// * `output_dir` - Root of the output source tree
///
/// # Returns
/// The generated type name and the path written.
///
/// # Errors
/// Returns `CodegenError` if resolution, collection or writing fails.
pub fn implement_from_directory(
    source_dir: impl AsRef<Path>,
    name: &str,
    output_dir: impl AsRef<Path>,
) -> Result<GenerationOutcome, CodegenError> {
    Implementor::new(output_dir.as_ref()).implement_from_directory(source_dir, name)
}

/// Generates an implementation of a standard library type.
///
/// # Errors
/// Returns `CodegenError` if resolution, collection or writing fails.
pub fn implement_from_standard_library(
    name: &str,
    output_dir: impl AsRef<Path>,
) -> Result<GenerationOutcome, CodegenError> {
    Implementor::new(output_dir.as_ref()).implement_from_standard_library(name)
}
