//! Type resolution.
//!
//! A [`Resolver`] chains [`DescriptorSource`]s, validates what they return
//! and links supertypes transitively into a shared [`TypeModel`] graph.
//! Linked models are cached, so one resolver can serve many generation
//! runs, including runs on different threads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use implgen_core::{ClassRef, QualifiedName, Supertype, TypeKind, TypeLookup, TypeModel, TypeRef};
use parking_lot::Mutex;

use crate::error::ResolveError;
use crate::parser::{parse_descriptor, parse_descriptors};
use crate::stdlib::standard_library_source;
use crate::types::{DescriptorIndex, TypeDescriptor};
use crate::validation::validate_descriptor;

/// Capability that turns a qualified name into a linked [`TypeModel`].
pub trait TypeResolver: TypeLookup + Send + Sync {
    /// Resolves `name`.
    ///
    /// # Errors
    /// Returns `ResolveError::TypeNotFound` if no description exists, or
    /// another `ResolveError` if the description is malformed.
    fn resolve(&self, name: &QualifiedName) -> Result<Arc<TypeModel>, ResolveError>;
}

/// Provider of unlinked descriptors.
pub trait DescriptorSource: Send + Sync {
    /// Loads the descriptor of `name`, or `None` if this source does not know it.
    ///
    /// # Errors
    /// Returns `ResolveError` if a descriptor exists but cannot be read.
    fn load(&self, name: &QualifiedName) -> Result<Option<TypeDescriptor>, ResolveError>;

    /// Short description used in log messages.
    fn describe(&self) -> String;
}

/// Descriptors stored as `<root>/<package path>/<Simple>.xml` files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the descriptor path for `name`.
    #[must_use]
    pub fn path_for(&self, name: &QualifiedName) -> PathBuf {
        let mut path = self.root.clone();
        for segment in name.package_segments() {
            path.push(segment);
        }
        path.push(format!("{}.xml", name.simple_name()));
        path
    }
}

impl DescriptorSource for DirectorySource {
    fn load(&self, name: &QualifiedName) -> Result<Option<TypeDescriptor>, ResolveError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Ok(None);
        }
        let xml = std::fs::read_to_string(&path).map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        let descriptor = parse_descriptor(&xml).map_err(|source| ResolveError::Parse {
            name: name.to_string(),
            source,
        })?;
        if &descriptor.name != name {
            return Err(ResolveError::NameMismatch {
                expected: name.to_string(),
                found: descriptor.name.to_string(),
            });
        }
        validate_descriptor(&descriptor)?;
        tracing::trace!("Loaded descriptor of {} from {}", name, path.display());
        Ok(Some(descriptor))
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Descriptors held in memory.
#[derive(Debug, Clone)]
pub struct IndexSource {
    label: String,
    index: DescriptorIndex,
}

impl IndexSource {
    /// Wraps an index of descriptors that have already been validated.
    #[must_use]
    pub fn new(label: impl Into<String>, index: DescriptorIndex) -> Self {
        Self {
            label: label.into(),
            index,
        }
    }

    /// Parses and validates a multi-type descriptor document.
    ///
    /// # Arguments
    /// * `label` - Name reported in errors and logs
    /// * `xml` - Descriptor document
    ///
    /// # Errors
    /// Returns `ResolveError` if parsing or validation fails.
    pub fn from_xml(label: impl Into<String>, xml: &str) -> Result<Self, ResolveError> {
        let label = label.into();
        let parse_failure = |source| ResolveError::Parse {
            name: label.clone(),
            source,
        };
        let descriptors = parse_descriptors(xml).map_err(parse_failure)?;
        for descriptor in &descriptors {
            validate_descriptor(descriptor)?;
        }
        let index = DescriptorIndex::from_descriptors(descriptors).map_err(parse_failure)?;
        Ok(Self::new(label, index))
    }

    /// The wrapped index.
    #[must_use]
    pub fn index(&self) -> &DescriptorIndex {
        &self.index
    }
}

impl DescriptorSource for IndexSource {
    fn load(&self, name: &QualifiedName) -> Result<Option<TypeDescriptor>, ResolveError> {
        Ok(self.index.get(name).cloned())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Chains descriptor sources and links their descriptors.
///
/// Sources are consulted in the order they were added; the first that
/// knows a name wins.
#[derive(Default)]
pub struct Resolver {
    sources: Vec<Box<dyn DescriptorSource>>,
    cache: Mutex<HashMap<QualifiedName, Arc<TypeModel>>>,
}

impl Resolver {
    /// Creates a resolver with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source.
    #[must_use]
    pub fn with_source(mut self, source: impl DescriptorSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Creates a resolver over the built-in standard library index.
    ///
    /// # Errors
    /// Returns `ResolveError` if the embedded index is malformed.
    pub fn standard_library() -> Result<Self, ResolveError> {
        Ok(Self::new().with_source(standard_library_source()?))
    }

    /// Creates a resolver over a descriptor directory, falling back to the
    /// standard library for names not present on disk.
    ///
    /// # Errors
    /// Returns `ResolveError` if the embedded index is malformed.
    pub fn from_directory(root: impl Into<PathBuf>) -> Result<Self, ResolveError> {
        Ok(Self::new()
            .with_source(DirectorySource::new(root))
            .with_source(standard_library_source()?))
    }

    /// Creates a resolver over an in-memory descriptor document, falling back
    /// to the standard library.
    ///
    /// # Errors
    /// Returns `ResolveError` if either document fails to parse or validate.
    pub fn from_xml(xml: &str) -> Result<Self, ResolveError> {
        Ok(Self::new()
            .with_source(IndexSource::from_xml("<inline descriptors>", xml)?)
            .with_source(standard_library_source()?))
    }

    /// Number of linked models in the cache.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Resolves and links `name`.
    ///
    /// # Errors
    /// Returns `ResolveError` if the type or any supertype cannot be resolved.
    pub fn resolve(&self, name: &QualifiedName) -> Result<Arc<TypeModel>, ResolveError> {
        let mut in_progress = Vec::new();
        self.link(name, &mut in_progress)
    }

    fn load(&self, name: &QualifiedName) -> Result<TypeDescriptor, ResolveError> {
        for source in &self.sources {
            if let Some(descriptor) = source.load(name)? {
                tracing::debug!("Resolved {} from {}", name, source.describe());
                return Ok(descriptor);
            }
        }
        Err(ResolveError::TypeNotFound {
            name: name.to_string(),
        })
    }

    fn link(
        &self,
        name: &QualifiedName,
        in_progress: &mut Vec<QualifiedName>,
    ) -> Result<Arc<TypeModel>, ResolveError> {
        let cached = self.cache.lock().get(name).cloned();
        if let Some(model) = cached {
            return Ok(model);
        }

        if in_progress.contains(name) {
            let mut path: Vec<&str> = in_progress.iter().map(QualifiedName::as_str).collect();
            path.push(name.as_str());
            return Err(ResolveError::CircularReference {
                path: path.join(" -> "),
            });
        }

        let descriptor = self.load(name)?;
        in_progress.push(name.clone());
        let linked = self.link_descriptor(descriptor, in_progress);
        in_progress.pop();
        let model = Arc::new(linked?);

        let mut cache = self.cache.lock();
        Ok(Arc::clone(cache.entry(name.clone()).or_insert(model)))
    }

    fn link_descriptor(
        &self,
        descriptor: TypeDescriptor,
        in_progress: &mut Vec<QualifiedName>,
    ) -> Result<TypeModel, ResolveError> {
        let mut model = TypeModel::new(descriptor.name.clone(), descriptor.kind);
        model.access = descriptor.access;
        model.is_final = descriptor.is_final;
        model.type_parameters = descriptor.type_parameters;
        model.methods = descriptor.methods;
        model.constructors = descriptor.constructors;

        if let Some(reference) = descriptor.superclass {
            let superclass = self.link(&reference.name, in_progress)?;
            if superclass.is_interface() {
                return Err(ResolveError::hierarchy(
                    descriptor.name.as_str(),
                    format!("cannot extend interface '{}'", reference.name),
                ));
            }
            if superclass.is_final {
                return Err(ResolveError::hierarchy(
                    descriptor.name.as_str(),
                    format!("cannot extend final class '{}'", reference.name),
                ));
            }
            check_arguments(&descriptor.name, &reference, &superclass)?;
            model.superclass = Some(Supertype::new(reference, superclass));
        }

        for reference in descriptor.interfaces {
            let interface = self.link(&reference.name, in_progress)?;
            if interface.kind != TypeKind::Interface {
                return Err(ResolveError::hierarchy(
                    descriptor.name.as_str(),
                    format!("'{}' is a {}, not an interface", reference.name, interface.kind),
                ));
            }
            check_arguments(&descriptor.name, &reference, &interface)?;
            model.add_interface(Supertype::new(reference, interface));
        }

        tracing::debug!(
            "Linked {} {} with {} supertypes",
            model.kind,
            model.qualified_name,
            model.supertypes().count()
        );
        Ok(model)
    }
}

fn check_arguments(
    name: &QualifiedName,
    reference: &ClassRef,
    target: &TypeModel,
) -> Result<(), ResolveError> {
    if reference.args.is_empty() {
        return Ok(());
    }
    if reference.args.len() != target.type_parameters.len() {
        return Err(ResolveError::hierarchy(
            name.as_str(),
            format!(
                "'{}' takes {} type arguments, found {}",
                target.qualified_name,
                target.type_parameters.len(),
                reference.args.len()
            ),
        ));
    }
    if reference
        .args
        .iter()
        .any(|arg| matches!(arg, TypeRef::Wildcard(_) | TypeRef::Primitive(_)))
    {
        return Err(ResolveError::hierarchy(
            name.as_str(),
            format!("invalid type arguments in supertype '{reference}'"),
        ));
    }
    Ok(())
}

impl TypeResolver for Resolver {
    fn resolve(&self, name: &QualifiedName) -> Result<Arc<TypeModel>, ResolveError> {
        Resolver::resolve(self, name)
    }
}

impl TypeLookup for Resolver {
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeModel>> {
        Resolver::resolve(self, name).ok()
    }
}
