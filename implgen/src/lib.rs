//! # implgen
//!
//! Generates compilable Java implementations of interfaces and abstract classes.
//!
//! Given the fully-qualified name of a type, implgen walks its supertypes,
//! collects every method left abstract and every superclass constructor that
//! has to be forwarded, and writes `<Simple>Impl.java` with stub bodies.
//!
//! ## Quick Start
//!
//! ```ignore
//! use implgen::prelude::*;
//!
//! let outcome = Implementor::builder()
//!     .output_dir("generated")
//!     .build()
//!     .implement_from_standard_library("java.util.AbstractList")?;
//! println!("{} -> {}", outcome.type_name, outcome.path.display());
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Type references, type models and subtyping
//! - [`schema`] - Descriptor parsing, validation and resolvers
//! - [`codegen`] - Obligation collection and source emission
//! - [`toolchain`] - Compile checks with an installed `javac`

pub mod prelude;
pub mod toolchain;

/// Type references, type models and subtyping.
pub mod core {
    pub use implgen_core::*;
}

/// Descriptor parsing, validation and resolvers.
pub mod schema {
    pub use implgen_schema::*;
}

/// Obligation collection and source emission.
pub mod codegen {
    pub use implgen_codegen::*;
}

pub use implgen_codegen::{implement_from_directory, implement_from_standard_library};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
