//! Subtype checking over resolved type models.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::TypeModel;
use crate::types::{CLONEABLE, ClassRef, QualifiedName, SERIALIZABLE, TypeParameter, TypeRef, Wildcard};

/// Walks of the supertype graph deeper than this are abandoned.
const MAX_DEPTH: usize = 64;

/// Capability to look up the model of a named type.
pub trait TypeLookup {
    /// Returns the model for `name`, if it is known.
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeModel>>;
}

/// A lookup that knows no types.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl TypeLookup for NoLookup {
    fn lookup(&self, _name: &QualifiedName) -> Option<Arc<TypeModel>> {
        None
    }
}

impl TypeLookup for HashMap<QualifiedName, Arc<TypeModel>> {
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeModel>> {
        self.get(name).cloned()
    }
}

/// Subtyping oracle.
///
/// Type variables are judged by the bounds registered with
/// [`Subtyping::with_parameters`]; unregistered variables are bounded by
/// `Object`.
pub struct Subtyping<'a> {
    lookup: &'a dyn TypeLookup,
    bounds: HashMap<String, Vec<TypeRef>>,
}

impl<'a> Subtyping<'a> {
    /// Creates an oracle backed by `lookup`.
    #[must_use]
    pub fn new(lookup: &'a dyn TypeLookup) -> Self {
        Self {
            lookup,
            bounds: HashMap::new(),
        }
    }

    /// Registers the bounds of type parameters in scope.
    #[must_use]
    pub fn with_parameters(mut self, params: &[TypeParameter]) -> Self {
        for param in params {
            self.bounds.insert(param.name.clone(), param.bounds.clone());
        }
        self
    }

    /// Returns true if `sub` is a subtype of `sup`.
    #[must_use]
    pub fn is_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool {
        self.check(sub, sup, 0)
    }

    fn check(&self, sub: &TypeRef, sup: &TypeRef, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        if sub == sup {
            return true;
        }
        if sup.is_object() && sub.is_reference() {
            return true;
        }
        match (sub, sup) {
            (TypeRef::Variable(name), _) => match self.bounds.get(name) {
                Some(bounds) if !bounds.is_empty() => {
                    bounds.iter().any(|b| self.check(b, sup, depth + 1))
                }
                _ => false,
            },
            (TypeRef::Array(a), TypeRef::Array(b)) => {
                a.is_reference() && b.is_reference() && self.check(a, b, depth + 1)
            }
            (TypeRef::Array(_), TypeRef::Class(class)) => {
                class.args.is_empty()
                    && matches!(class.name.as_str(), CLONEABLE | SERIALIZABLE)
            }
            (TypeRef::Class(a), TypeRef::Class(b)) => self.class_subtype(a, b, depth + 1),
            _ => false,
        }
    }

    fn class_subtype(&self, sub: &ClassRef, sup: &ClassRef, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        if sub.name == sup.name {
            return self.arguments_compatible(&sub.args, &sup.args, depth);
        }
        let Some(model) = self.lookup.lookup(&sub.name) else {
            return false;
        };
        let raw = sub.args.is_empty() && !model.type_parameters.is_empty();
        let subst = model.substitution_for(sub);
        model.supertypes().any(|st| {
            let next = if raw {
                ClassRef::new(st.reference.name.clone())
            } else {
                st.reference.substitute(&subst)
            };
            self.class_subtype(&next, sup, depth + 1)
        })
    }

    fn arguments_compatible(&self, sub: &[TypeRef], sup: &[TypeRef], depth: usize) -> bool {
        // Raw types are compatible with every parameterization.
        if sub.is_empty() || sup.is_empty() {
            return true;
        }
        sub.len() == sup.len()
            && sub
                .iter()
                .zip(sup)
                .all(|(s, t)| self.contains(t, s, depth + 1))
    }

    /// Type-argument containment: does `outer` contain `inner`?
    fn contains(&self, outer: &TypeRef, inner: &TypeRef, depth: usize) -> bool {
        match outer {
            TypeRef::Wildcard(Wildcard::Unbounded) => true,
            TypeRef::Wildcard(Wildcard::Extends(bound)) => match inner {
                TypeRef::Wildcard(Wildcard::Extends(b)) => self.check(b, bound, depth),
                TypeRef::Wildcard(_) => bound.is_object(),
                other => self.check(other, bound, depth),
            },
            TypeRef::Wildcard(Wildcard::Super(bound)) => match inner {
                TypeRef::Wildcard(Wildcard::Super(b)) => self.check(bound, b, depth),
                TypeRef::Wildcard(_) => false,
                other => self.check(bound, other, depth),
            },
            _ => outer == inner,
        }
    }
}
