//! Unlinked type descriptors.
//!
//! A [`TypeDescriptor`] is what a descriptor document says about one type.
//! Supertypes are plain references here; the resolver links them into a
//! [`implgen_core::TypeModel`] graph.

use std::collections::HashMap;

use implgen_core::{
    Access, ClassRef, ConstructorSignature, MethodSignature, QualifiedName, TypeKind,
    TypeParameter,
};

use crate::error::ParseError;

/// Description of a single class or interface.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Fully-qualified name.
    pub name: QualifiedName,
    /// Interface, abstract class or class.
    pub kind: TypeKind,
    /// Access level of the type.
    pub access: Access,
    /// True for `final` classes.
    pub is_final: bool,
    /// Generic parameters.
    pub type_parameters: Vec<TypeParameter>,
    /// Superclass reference. Implicitly `java.lang.Object` for classes.
    pub superclass: Option<ClassRef>,
    /// Implemented (or, for interfaces, extended) interfaces.
    pub interfaces: Vec<ClassRef>,
    /// Declared methods.
    pub methods: Vec<MethodSignature>,
    /// Declared constructors.
    pub constructors: Vec<ConstructorSignature>,
}

impl TypeDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new(name: QualifiedName, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            access: Access::Public,
            is_final: false,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }
}

/// In-memory collection of descriptors indexed by name.
#[derive(Debug, Clone, Default)]
pub struct DescriptorIndex {
    descriptors: Vec<TypeDescriptor>,
    /// Name lookup map.
    index: HashMap<QualifiedName, usize>,
}

impl DescriptorIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index, rejecting duplicate names.
    ///
    /// # Errors
    /// Returns `ParseError::DuplicateDefinition` if two descriptors share a name.
    pub fn from_descriptors(descriptors: Vec<TypeDescriptor>) -> Result<Self, ParseError> {
        let mut index = Self::new();
        for descriptor in descriptors {
            index.add(descriptor)?;
        }
        Ok(index)
    }

    /// Adds a descriptor.
    ///
    /// # Errors
    /// Returns `ParseError::DuplicateDefinition` if the name is already present.
    pub fn add(&mut self, descriptor: TypeDescriptor) -> Result<(), ParseError> {
        if self.index.contains_key(&descriptor.name) {
            return Err(ParseError::duplicate("type", descriptor.name.as_str()));
        }
        self.index
            .insert(descriptor.name.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Looks up a descriptor by name.
    #[must_use]
    pub fn get(&self, name: &QualifiedName) -> Option<&TypeDescriptor> {
        self.index.get(name).map(|&idx| &self.descriptors[idx])
    }

    /// Returns true if a descriptor with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.index.contains_key(name)
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterates over descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_lookup_and_duplicates() {
        let mut index = DescriptorIndex::new();
        assert!(index.is_empty());
        index
            .add(TypeDescriptor::new(
                QualifiedName::new("a.Shape"),
                TypeKind::Interface,
            ))
            .unwrap();
        assert!(index.contains(&QualifiedName::new("a.Shape")));
        assert_eq!(index.len(), 1);

        let err = index
            .add(TypeDescriptor::new(
                QualifiedName::new("a.Shape"),
                TypeKind::AbstractClass,
            ))
            .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDefinition { .. }));
        assert_eq!(
            index.get(&QualifiedName::new("a.Shape")).unwrap().kind,
            TypeKind::Interface
        );
    }
}
