//! Resolved type model.
//!
//! A [`TypeModel`] is an immutable description of a Java class or interface:
//! its identity, modifiers, supertype links and declared members. Supertypes
//! are linked through `Arc` so a resolved graph can be shared freely.

use std::fmt;
use std::sync::Arc;

use crate::types::{ClassRef, ErasureScope, QualifiedName, Substitution, TypeParameter, TypeRef};

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `interface`.
    Interface,
    /// `abstract class`.
    AbstractClass,
    /// Concrete `class`.
    Class,
}

impl TypeKind {
    /// Returns a human-readable description.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::AbstractClass => "abstract class",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Java access level, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Access {
    /// `private`.
    Private,
    /// No modifier.
    Package,
    /// `protected`.
    Protected,
    /// `public`.
    #[default]
    Public,
}

impl Access {
    /// Parses an access level from a descriptor attribute.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "package" => Some(Self::Package),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    /// Returns the Java modifier keyword, if the level has one.
    #[must_use]
    pub const fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::Public => Some("public"),
            Self::Protected => Some("protected"),
            Self::Private => Some("private"),
            Self::Package => None,
        }
    }
}

/// A method declared on a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Method name.
    pub name: String,
    /// Method-level type parameters.
    pub type_parameters: Vec<TypeParameter>,
    /// Parameter types in order. A varargs parameter is an array type.
    pub parameter_types: Vec<TypeRef>,
    /// True if the last parameter is varargs.
    pub varargs: bool,
    /// Return type.
    pub return_type: TypeRef,
    /// Declared checked exceptions.
    pub declared_throws: Vec<TypeRef>,
    /// True if the method has no body.
    pub is_abstract: bool,
    /// True for `static` methods.
    pub is_static: bool,
    /// True for `final` methods.
    pub is_final: bool,
    /// Access level.
    pub access: Access,
    /// Declaring type.
    pub owner: QualifiedName,
}

impl MethodSignature {
    /// Creates a public, concrete, `void` method with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            type_parameters: Vec::new(),
            parameter_types: Vec::new(),
            varargs: false,
            return_type: TypeRef::Void,
            declared_throws: Vec::new(),
            is_abstract: false,
            is_static: false,
            is_final: false,
            access: Access::Public,
            owner: owner.into(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, ty: TypeRef) -> Self {
        self.parameter_types.push(ty);
        self
    }

    /// Sets the return type.
    #[must_use]
    pub fn returning(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    /// Appends a declared exception.
    #[must_use]
    pub fn throwing(mut self, ty: TypeRef) -> Self {
        self.declared_throws.push(ty);
        self
    }

    /// Sets the abstract flag.
    #[must_use]
    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }

    /// Returns true if a subtype could override this method.
    #[must_use]
    pub fn is_overridable(&self) -> bool {
        !self.is_static && !self.is_final && self.access != Access::Private
    }

    /// Applies a type-argument substitution.
    ///
    /// Method-level type parameters shadow the substituted names. A method
    /// type parameter whose name occurs in a replacement type is renamed to
    /// `<name><n>` so the replacement keeps referring to the outer variable.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        let mut effective: Substitution = subst
            .iter()
            .filter(|(name, _)| !self.declares_type_parameter(name))
            .map(|(name, ty)| (name.clone(), ty.clone()))
            .collect();

        let mut renamed: Vec<(String, String)> = Vec::new();
        for param in &self.type_parameters {
            if !effective.values().any(|ty| ty.mentions(&param.name)) {
                continue;
            }
            let mut suffix = 0usize;
            let fresh = loop {
                let candidate = format!("{}{}", param.name, suffix);
                let taken = self.uses_variable(&candidate)
                    || renamed.iter().any(|(_, to)| to == &candidate)
                    || effective.values().any(|ty| ty.mentions(&candidate));
                if !taken {
                    break candidate;
                }
                suffix += 1;
            };
            renamed.push((param.name.clone(), fresh));
        }
        for (from, to) in &renamed {
            effective.insert(from.clone(), TypeRef::variable(to.clone()));
        }
        let subst = &effective;

        Self {
            name: self.name.clone(),
            type_parameters: self
                .type_parameters
                .iter()
                .map(|p| {
                    let mut param = p.substitute(subst);
                    if let Some((_, to)) = renamed.iter().find(|(from, _)| from == &p.name) {
                        param.name = to.clone();
                    }
                    param
                })
                .collect(),
            parameter_types: self
                .parameter_types
                .iter()
                .map(|t| t.substitute(subst))
                .collect(),
            varargs: self.varargs,
            return_type: self.return_type.substitute(subst),
            declared_throws: self
                .declared_throws
                .iter()
                .map(|t| t.substitute(subst))
                .collect(),
            is_abstract: self.is_abstract,
            is_static: self.is_static,
            is_final: self.is_final,
            access: self.access,
            owner: self.owner.clone(),
        }
    }

    fn declares_type_parameter(&self, name: &str) -> bool {
        self.type_parameters.iter().any(|p| p.name == name)
    }

    /// True if `name` is declared by or occurs anywhere in the signature.
    fn uses_variable(&self, name: &str) -> bool {
        self.declares_type_parameter(name)
            || self
                .type_parameters
                .iter()
                .flat_map(|p| &p.bounds)
                .chain(&self.parameter_types)
                .chain(&self.declared_throws)
                .chain(std::iter::once(&self.return_type))
                .any(|ty| ty.mentions(name))
    }

    /// Returns the erased parameter types.
    ///
    /// # Arguments
    /// * `scope` - Erasures of the enclosing type's variables
    #[must_use]
    pub fn erased_parameters(&self, scope: &ErasureScope) -> Vec<TypeRef> {
        let scope = scope.clone().with_parameters(&self.type_parameters);
        self.parameter_types
            .iter()
            .map(|t| t.erasure(&scope))
            .collect()
    }
}

/// A constructor declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstructorSignature {
    /// Parameter types in order.
    pub parameter_types: Vec<TypeRef>,
    /// True if the last parameter is varargs.
    pub varargs: bool,
    /// Declared checked exceptions.
    pub declared_throws: Vec<TypeRef>,
    /// Access level.
    pub access: Access,
}

impl ConstructorSignature {
    /// Creates a public constructor with the given parameters.
    #[must_use]
    pub fn new(parameter_types: Vec<TypeRef>) -> Self {
        Self {
            parameter_types,
            ..Self::default()
        }
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }

    /// Returns true if a subclass in the same package can invoke it.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.access != Access::Private
    }
}

/// A linked supertype: the reference as written plus the resolved model.
#[derive(Debug, Clone)]
pub struct Supertype {
    /// Reference as written on the subtype, with type arguments.
    pub reference: ClassRef,
    /// Resolved model of the referenced type.
    pub model: Arc<TypeModel>,
}

impl Supertype {
    /// Creates a supertype link.
    #[must_use]
    pub fn new(reference: ClassRef, model: Arc<TypeModel>) -> Self {
        Self { reference, model }
    }

    /// Returns true if the reference omits the arguments of a generic type.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.reference.args.is_empty() && !self.model.type_parameters.is_empty()
    }

    /// Maps the supertype's parameters to the arguments written here.
    #[must_use]
    pub fn substitution(&self) -> Substitution {
        self.model.substitution_for(&self.reference)
    }
}

/// Resolved description of a class or interface.
#[derive(Debug, Clone)]
pub struct TypeModel {
    /// Fully-qualified name.
    pub qualified_name: QualifiedName,
    /// Interface, abstract class or class.
    pub kind: TypeKind,
    /// Access level of the type itself.
    pub access: Access,
    /// True for `final` classes.
    pub is_final: bool,
    /// Generic parameters.
    pub type_parameters: Vec<TypeParameter>,
    /// Superclass, absent for interfaces and `java.lang.Object`.
    pub superclass: Option<Supertype>,
    /// Implemented or extended interfaces, unique by name.
    pub interfaces: Vec<Supertype>,
    /// Declared methods in declaration order.
    pub methods: Vec<MethodSignature>,
    /// Declared constructors in declaration order.
    pub constructors: Vec<ConstructorSignature>,
}

impl TypeModel {
    /// Creates an empty public model.
    #[must_use]
    pub fn new(qualified_name: impl Into<QualifiedName>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
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

    /// Returns true for interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Returns true for interfaces and abstract classes.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::AbstractClass)
    }

    /// Returns true if the type is visible to code in its own package.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.access != Access::Private
    }

    /// Adds an interface unless one with the same name is already present.
    pub fn add_interface(&mut self, supertype: Supertype) {
        let name = &supertype.reference.name;
        if !self.interfaces.iter().any(|s| &s.reference.name == name) {
            self.interfaces.push(supertype);
        }
    }

    /// Iterates over the superclass (first) and interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &Supertype> {
        self.superclass.iter().chain(self.interfaces.iter())
    }

    /// Constructors a subclass in the same package can invoke.
    pub fn accessible_constructors(&self) -> impl Iterator<Item = &ConstructorSignature> {
        self.constructors.iter().filter(|c| c.is_accessible())
    }

    /// Reference to this type parameterized by its own type variables.
    #[must_use]
    pub fn self_reference(&self) -> ClassRef {
        ClassRef::with_args(
            self.qualified_name.clone(),
            self.type_parameters
                .iter()
                .map(|p| TypeRef::variable(p.name.clone()))
                .collect(),
        )
    }

    /// Erasures of this type's parameters.
    #[must_use]
    pub fn erasure_scope(&self) -> ErasureScope {
        ErasureScope::new().with_parameters(&self.type_parameters)
    }

    /// Maps this type's parameters to the arguments of `reference`.
    ///
    /// A raw reference maps every parameter to its erasure.
    #[must_use]
    pub fn substitution_for(&self, reference: &ClassRef) -> Substitution {
        if reference.args.is_empty() {
            let scope = self.erasure_scope();
            self.type_parameters
                .iter()
                .map(|p| (p.name.clone(), scope.erased(&p.name)))
                .collect()
        } else {
            self.type_parameters
                .iter()
                .zip(reference.args.iter())
                .map(|(p, arg)| (p.name.clone(), arg.clone()))
                .collect()
        }
    }

    /// Finds a declared method by name and parameter count.
    #[must_use]
    pub fn find_method(&self, name: &str, arity: usize) -> Option<&MethodSignature> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.arity() == arity)
    }
}
