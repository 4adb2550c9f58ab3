//! Prelude module for convenient imports.
//!
//! ```ignore
//! use implgen::prelude::*;
//! ```

// Core types
pub use implgen_core::{
    Access, ClassRef, ConstructorSignature, MethodSignature, PrimitiveType, QualifiedName,
    TypeKind, TypeLookup, TypeModel, TypeParameter, TypeRef,
};

// Resolution
pub use implgen_schema::{
    DescriptorSource, DirectorySource, IndexSource, ResolveError, Resolver, TypeResolver,
};

// Generation
pub use implgen_codegen::{
    Body, BodySynthesizer, CodegenError, GeneratedUnit, GenerationOutcome, Implementor,
    ImplementorBuilder, Obligation, ObligationCollector, SourceEmitter,
};

// Compile checks
pub use crate::toolchain::{CompileOutcome, Compiler, Javac};
