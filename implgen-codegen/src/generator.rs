//! Generation driver.

use std::path::{Path, PathBuf};

use implgen_core::{PrimitiveType, QualifiedName, TypeLookup, TypeModel};
use implgen_schema::{Resolver, TypeResolver};

use crate::body::BodySynthesizer;
use crate::builder::ImplementorBuilder;
use crate::emitter::{GeneratedUnit, SourceEmitter};
use crate::error::CodegenError;
use crate::obligations::ObligationCollector;

/// Result of a successful generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Qualified name of the generated type.
    pub type_name: QualifiedName,
    /// File that was written.
    pub path: PathBuf,
}

/// Generates implementations of interfaces and abstract classes.
///
/// A run resolves the target, collects its obligations, synthesizes stub
/// bodies and emits the source; the file is written only once every
/// earlier step has succeeded.
#[derive(Debug, Clone)]
pub struct Implementor {
    output_dir: PathBuf,
    emitter: SourceEmitter,
}

impl Implementor {
    /// Creates an implementor with default naming that writes under `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_emitter(output_dir, SourceEmitter::new())
    }

    /// Creates an implementor using a configured emitter.
    #[must_use]
    pub fn with_emitter(output_dir: impl Into<PathBuf>, emitter: SourceEmitter) -> Self {
        Self {
            output_dir: output_dir.into(),
            emitter,
        }
    }

    /// Returns a builder for configuring an implementor.
    #[must_use]
    pub fn builder() -> ImplementorBuilder {
        ImplementorBuilder::new()
    }

    /// Root of the output source tree.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Emitter used to render sources.
    #[must_use]
    pub fn emitter(&self) -> &SourceEmitter {
        &self.emitter
    }

    /// Renders the implementation of `name` without writing it.
    ///
    /// # Errors
    /// Returns `CodegenError` if the name is not a generation target, the
    /// type cannot be resolved, or its obligations cannot be met.
    pub fn render<R: TypeResolver>(
        &self,
        resolver: &R,
        name: &str,
    ) -> Result<GeneratedUnit, CodegenError> {
        let name = target_name(name)?;
        let root = resolver.resolve(&name)?;
        self.render_model(&root, resolver)
    }

    /// Renders the implementation of an already resolved model.
    ///
    /// # Errors
    /// Returns `CodegenError` if the model's obligations cannot be met.
    pub fn render_model(
        &self,
        root: &TypeModel,
        lookup: &dyn TypeLookup,
    ) -> Result<GeneratedUnit, CodegenError> {
        let obligations = ObligationCollector::new(lookup).collect(root)?;
        tracing::debug!(
            "Collected {} obligations for {}",
            obligations.len(),
            root.qualified_name
        );
        let bodies = BodySynthesizer::new().synthesize_all(&obligations);
        self.emitter
            .emit(root, &obligations, &bodies, &self.output_dir)
    }

    /// Generates and writes the implementation of `name`.
    ///
    /// # Arguments
    /// * `resolver` - Source of type models
    /// * `name` - Fully-qualified name of an interface or abstract class
    ///
    /// # Returns
    /// The generated type name and the path written.
    ///
    /// # Errors
    /// Returns `CodegenError`; nothing is written unless every step succeeds.
    pub fn generate<R: TypeResolver>(
        &self,
        resolver: &R,
        name: &str,
    ) -> Result<GenerationOutcome, CodegenError> {
        let unit = self.render(resolver, name)?;
        unit.write()?;
        tracing::debug!(
            "Generated {} at {}",
            unit.generated_type_name,
            unit.target_path.display()
        );
        Ok(GenerationOutcome {
            type_name: unit.generated_type_name,
            path: unit.target_path,
        })
    }

    /// Generates `name` from descriptors under `source_dir`, falling back to
    /// the standard library.
    ///
    /// # Errors
    /// Returns `CodegenError::TypeNotFound` if the type is described nowhere.
    pub fn implement_from_directory(
        &self,
        source_dir: impl AsRef<Path>,
        name: &str,
    ) -> Result<GenerationOutcome, CodegenError> {
        let resolver = Resolver::from_directory(source_dir.as_ref())?;
        self.generate(&resolver, name)
    }

    /// Generates `name` from the built-in standard library index.
    ///
    /// # Errors
    /// Returns `CodegenError::TypeNotFound` if the type is not in the index.
    pub fn implement_from_standard_library(
        &self,
        name: &str,
    ) -> Result<GenerationOutcome, CodegenError> {
        let resolver = Resolver::standard_library()?;
        self.generate(&resolver, name)
    }
}

fn target_name(name: &str) -> Result<QualifiedName, CodegenError> {
    if name == "void" || PrimitiveType::from_java_name(name).is_some() {
        return Err(CodegenError::not_generatable(name, "it is a primitive type"));
    }
    if name.ends_with("[]") {
        return Err(CodegenError::not_generatable(name, "it is an array type"));
    }
    QualifiedName::parse(name)
        .map_err(|_| CodegenError::not_generatable(name, "it is not a qualified type name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn file_count(dir: &Path) -> usize {
        if !dir.exists() {
            return 0;
        }
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| {
                let path = entry.unwrap().path();
                if path.is_dir() { file_count(&path) } else { 1 }
            })
            .sum()
    }

    #[test]
    fn test_implement_from_standard_library() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = Implementor::new(dir.path())
            .implement_from_standard_library("java.lang.Runnable")
            .unwrap();
        assert_eq!(outcome.type_name.as_str(), "java.lang.RunnableImpl");
        assert_eq!(outcome.path, dir.path().join("java/lang/RunnableImpl.java"));
        let text = fs::read_to_string(&outcome.path).unwrap();
        assert!(text.contains("public class RunnableImpl implements java.lang.Runnable {"));
    }

    #[test]
    fn test_implement_from_directory() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("shapes")).unwrap();
        fs::write(
            src.path().join("shapes/Shape.xml"),
            r#"<class name="shapes.Shape" abstract="true">
    <implements type="java.lang.Comparable&lt;shapes.Shape>"/>
    <constructor access="protected"><param type="java.lang.String"/></constructor>
    <method name="area" abstract="true" returns="double"/>
    <method name="name" returns="java.lang.String"/>
</class>"#,
        )
        .unwrap();

        let outcome = Implementor::builder()
            .output_dir(out.path())
            .build()
            .implement_from_directory(src.path(), "shapes.Shape")
            .unwrap();
        let text = fs::read_to_string(&outcome.path).unwrap();
        assert!(text.contains("public class ShapeImpl extends shapes.Shape {"));
        assert!(text.contains("    public ShapeImpl(java.lang.String arg0) {\n        super(arg0);\n    }"));
        assert!(text.contains("    public double area() {\n        return 0.0d;\n    }"));
        assert!(text.contains("    public int compareTo(shapes.Shape arg0) {\n        return 0;\n    }"));
        assert!(!text.contains(" name()"));
    }

    #[test]
    fn test_rejected_names_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let implementor = Implementor::new(dir.path());
        for name in ["int", "void", "java.lang.Runnable[]", "not a name", "java.lang.String"] {
            let err = implementor
                .implement_from_standard_library(name)
                .unwrap_err();
            assert!(matches!(err, CodegenError::NotGeneratable { .. }), "{name}: {err}");
        }
        assert!(matches!(
            implementor.implement_from_standard_library("java.util.Missing"),
            Err(CodegenError::TypeNotFound { .. })
        ));
        assert_eq!(file_count(dir.path()), 0);
    }

    #[test]
    fn test_conflict_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = Resolver::from_xml(
            r#"<types>
    <interface name="d.Counted"><method name="value" returns="java.lang.Integer"/></interface>
    <interface name="d.Named"><method name="value" returns="java.lang.String"/></interface>
    <interface name="d.Both"><extends type="d.Counted"/><extends type="d.Named"/></interface>
</types>"#,
        )
        .unwrap();
        let err = Implementor::new(dir.path())
            .generate(&resolver, "d.Both")
            .unwrap_err();
        assert!(matches!(err, CodegenError::Conflict { .. }));
        assert_eq!(file_count(dir.path()), 0);
    }

    #[test]
    fn test_regeneration_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let implementor = Implementor::new(dir.path());
        let first = implementor
            .implement_from_standard_library("java.util.Comparator")
            .unwrap();
        let before = fs::read_to_string(&first.path).unwrap();
        fs::write(&first.path, "stale").unwrap();
        let second = implementor
            .implement_from_standard_library("java.util.Comparator")
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second.path).unwrap(), before);
    }

    #[test]
    fn test_shared_resolver_across_threads() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = Resolver::standard_library().unwrap();
        let implementor = Implementor::new(dir.path());
        let names = [
            "java.lang.Runnable",
            "java.util.AbstractList",
            "java.io.Writer",
            "java.util.function.BiFunction",
        ];
        std::thread::scope(|scope| {
            for name in names {
                let resolver = &resolver;
                let implementor = &implementor;
                scope.spawn(move || implementor.generate(resolver, name).unwrap());
            }
        });
        assert_eq!(file_count(dir.path()), names.len());
    }
}
