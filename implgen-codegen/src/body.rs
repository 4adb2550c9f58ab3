//! Stub body synthesis.

use implgen_core::{PrimitiveType, TypeRef};

use crate::obligations::Obligation;

/// Default value returned by a stub method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Literal zero of a numeric or `char` primitive.
    Zero(PrimitiveType),
    /// `false`.
    False,
    /// `null`.
    Null,
}

impl DefaultValue {
    /// Returns the default value for `ty`, or `None` for `void`.
    #[must_use]
    pub fn for_type(ty: &TypeRef) -> Option<Self> {
        match ty {
            TypeRef::Void => None,
            TypeRef::Primitive(PrimitiveType::Boolean) => Some(Self::False),
            TypeRef::Primitive(p) => Some(Self::Zero(*p)),
            TypeRef::Class(_) | TypeRef::Variable(_) | TypeRef::Array(_) | TypeRef::Wildcard(_) => {
                Some(Self::Null)
            }
        }
    }

    /// Java literal for this value.
    #[must_use]
    pub const fn literal(&self) -> &'static str {
        match self {
            Self::Zero(PrimitiveType::Byte) => "(byte) 0",
            Self::Zero(PrimitiveType::Short) => "(short) 0",
            Self::Zero(PrimitiveType::Char) => "'\\u0000'",
            Self::Zero(PrimitiveType::Long) => "0L",
            Self::Zero(PrimitiveType::Float) => "0.0f",
            Self::Zero(PrimitiveType::Double) => "0.0d",
            Self::Zero(PrimitiveType::Int) => "0",
            Self::Zero(PrimitiveType::Boolean) | Self::False => "false",
            Self::Null => "null",
        }
    }
}

/// Language-neutral description of a member body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// No statements.
    Empty,
    /// `return <value>;`
    Return(DefaultValue),
    /// `super(arg0, .., argN-1);`
    ForwardToSuper {
        /// Number of forwarded arguments.
        arity: usize,
    },
}

/// Produces the stub body of each obligation.
///
/// Synthesis never fails and never reads the declared exceptions: a body
/// that throws nothing is a legal override of any throws clause.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodySynthesizer;

impl BodySynthesizer {
    /// Creates a synthesizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Synthesizes the body of one obligation.
    #[must_use]
    pub fn synthesize(&self, obligation: &Obligation) -> Body {
        match obligation {
            Obligation::Constructor(ctor) => Body::ForwardToSuper {
                arity: ctor.signature.arity(),
            },
            Obligation::Method(method) => DefaultValue::for_type(&method.resolved_return_type)
                .map_or(Body::Empty, Body::Return),
        }
    }

    /// Synthesizes bodies for `obligations`, in order.
    #[must_use]
    pub fn synthesize_all(&self, obligations: &[Obligation]) -> Vec<Body> {
        obligations.iter().map(|o| self.synthesize(o)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obligations::{ConstructorObligation, MethodObligation};
    use implgen_core::{Access, ConstructorSignature, MethodSignature};

    fn method_returning(ty: TypeRef) -> Obligation {
        let signature = MethodSignature::new("value", "a.Source").returning(ty.clone());
        Obligation::Method(MethodObligation {
            signature,
            resolved_return_type: ty,
            resolved_throws: vec![TypeRef::class("java.io.IOException")],
            access: Access::Public,
            depth: 0,
        })
    }

    #[test]
    fn test_void_is_empty() {
        assert_eq!(
            BodySynthesizer::new().synthesize(&method_returning(TypeRef::Void)),
            Body::Empty
        );
    }

    #[test]
    fn test_primitive_literals() {
        let cases = [
            (PrimitiveType::Int, "0"),
            (PrimitiveType::Long, "0L"),
            (PrimitiveType::Float, "0.0f"),
            (PrimitiveType::Double, "0.0d"),
            (PrimitiveType::Byte, "(byte) 0"),
            (PrimitiveType::Short, "(short) 0"),
            (PrimitiveType::Char, "'\\u0000'"),
            (PrimitiveType::Boolean, "false"),
        ];
        for (primitive, literal) in cases {
            let body = BodySynthesizer::new().synthesize(&method_returning(TypeRef::Primitive(primitive)));
            match body {
                Body::Return(value) => assert_eq!(value.literal(), literal),
                other => panic!("unexpected body {other:?}"),
            }
        }
        assert_eq!(
            DefaultValue::for_type(&TypeRef::Primitive(PrimitiveType::Boolean)),
            Some(DefaultValue::False)
        );
    }

    #[test]
    fn test_references_return_null() {
        for ty in [
            TypeRef::class("java.lang.String"),
            TypeRef::variable("T"),
            TypeRef::array(TypeRef::Primitive(PrimitiveType::Int)),
        ] {
            assert_eq!(
                BodySynthesizer::new().synthesize(&method_returning(ty)),
                Body::Return(DefaultValue::Null)
            );
        }
    }

    #[test]
    fn test_constructor_forwards_every_argument() {
        let ctor = Obligation::Constructor(ConstructorObligation {
            signature: ConstructorSignature::new(vec![
                TypeRef::Primitive(PrimitiveType::Int),
                TypeRef::class("java.lang.String"),
            ]),
        });
        let bodies = BodySynthesizer::new().synthesize_all(&[ctor, method_returning(TypeRef::Void)]);
        assert_eq!(bodies, vec![Body::ForwardToSuper { arity: 2 }, Body::Empty]);
    }
}
