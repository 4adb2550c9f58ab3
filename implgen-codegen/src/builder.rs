//! Builder for configuring an [`Implementor`].

use std::path::PathBuf;

use crate::emitter::{DEFAULT_SOURCE_EXTENSION, DEFAULT_TYPE_SUFFIX, SourceEmitter};
use crate::generator::Implementor;

/// Builder for configuring and creating an implementor.
#[derive(Debug, Clone)]
pub struct ImplementorBuilder {
    output_dir: PathBuf,
    type_suffix: String,
    source_extension: String,
}

impl ImplementorBuilder {
    /// Creates a builder writing `<Simple>Impl.java` files under the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            type_suffix: DEFAULT_TYPE_SUFFIX.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }

    /// Sets the root of the output source tree.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the suffix appended to generated type names.
    #[must_use]
    pub fn type_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.type_suffix = suffix.into();
        self
    }

    /// Sets the extension of generated files.
    #[must_use]
    pub fn source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    /// Builds the implementor.
    #[must_use]
    pub fn build(self) -> Implementor {
        let emitter = SourceEmitter::new()
            .with_type_suffix(self.type_suffix)
            .with_source_extension(self.source_extension);
        Implementor::with_emitter(self.output_dir, emitter)
    }
}

impl Default for ImplementorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
