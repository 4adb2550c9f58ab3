//! Java type references.
//!
//! This module contains the value types used to describe the types that
//! appear in signatures: qualified names, primitives, parameterized class
//! references, type variables, arrays and wildcards.

use std::collections::HashMap;
use std::fmt;

/// Qualified name of `java.lang.Object`.
pub const OBJECT: &str = "java.lang.Object";
/// Qualified name of `java.lang.Cloneable`.
pub const CLONEABLE: &str = "java.lang.Cloneable";
/// Qualified name of `java.io.Serializable`.
pub const SERIALIZABLE: &str = "java.io.Serializable";

const KEYWORDS: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// Returns true if `s` is a legal Java identifier (and not a reserved word).
#[must_use]
pub fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c == '$' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric()) && !KEYWORDS.contains(&s)
}

/// Dotted, fully-qualified type name such as `java.util.List`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName(String);

impl QualifiedName {
    /// Creates a qualified name without validating it.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parses and validates a qualified name.
    ///
    /// # Errors
    /// Returns `Error::InvalidName` if any segment is not a Java identifier.
    pub fn parse(name: &str) -> crate::Result<Self> {
        let name = Self::new(name.trim());
        if name.is_valid() {
            Ok(name)
        } else {
            Err(crate::Error::InvalidName {
                name: name.0.clone(),
            })
        }
    }

    /// The name of `java.lang.Object`.
    #[must_use]
    pub fn object() -> Self {
        Self::new(OBJECT)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last segment.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Returns everything before the last segment, or `""` for the default package.
    #[must_use]
    pub fn package(&self) -> &str {
        self.0.rfind('.').map_or("", |idx| &self.0[..idx])
    }

    /// Iterates over the package segments.
    pub fn package_segments(&self) -> impl Iterator<Item = &str> {
        self.package().split('.').filter(|s| !s.is_empty())
    }

    /// Returns the name of a type in the same package.
    #[must_use]
    pub fn sibling(&self, simple_name: &str) -> Self {
        match self.package() {
            "" => Self::new(simple_name),
            package => Self::new(format!("{package}.{simple_name}")),
        }
    }

    /// Returns true if every segment is a Java identifier.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.split('.').all(is_java_identifier)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Java primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    /// `boolean`.
    Boolean,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// UTF-16 code unit.
    Char,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
}

impl PrimitiveType {
    /// Returns the Java keyword for this primitive.
    #[must_use]
    pub const fn java_name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Parses a primitive from its Java keyword.
    #[must_use]
    pub fn from_java_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Self::Boolean),
            "byte" => Some(Self::Byte),
            "short" => Some(Self::Short),
            "char" => Some(Self::Char),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    /// Returns true for every primitive except `boolean`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        !matches!(self, Self::Boolean)
    }
}

/// Reference to a (possibly parameterized) class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassRef {
    /// Qualified name of the referenced type.
    pub name: QualifiedName,
    /// Type arguments; empty for raw or non-generic references.
    pub args: Vec<TypeRef>,
}

impl ClassRef {
    /// Creates a reference without type arguments.
    #[must_use]
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a parameterized reference.
    #[must_use]
    pub fn with_args(name: impl Into<QualifiedName>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Applies a substitution to the type arguments.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        Self {
            name: self.name.clone(),
            args: self.args.iter().map(|a| a.substitute(subst)).collect(),
        }
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Wildcard type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Wildcard {
    /// `?`
    Unbounded,
    /// `? extends T`
    Extends(Box<TypeRef>),
    /// `? super T`
    Super(Box<TypeRef>),
}

/// A Java type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    /// `void`, only meaningful as a return type.
    Void,
    /// Primitive type.
    Primitive(PrimitiveType),
    /// Class or interface type.
    Class(ClassRef),
    /// Type variable.
    Variable(String),
    /// Array of the element type.
    Array(Box<TypeRef>),
    /// Wildcard, only valid as a type argument.
    Wildcard(Wildcard),
}

/// Mapping from type-variable names to the types that replace them.
pub type Substitution = HashMap<String, TypeRef>;

impl TypeRef {
    /// `java.lang.Object`.
    #[must_use]
    pub fn object() -> Self {
        Self::Class(ClassRef::new(OBJECT))
    }

    /// A class type without type arguments.
    #[must_use]
    pub fn class(name: impl Into<QualifiedName>) -> Self {
        Self::Class(ClassRef::new(name))
    }

    /// A type variable.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// An array of `element`.
    #[must_use]
    pub fn array(element: TypeRef) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns true for `void`.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Returns true for class, variable and array types.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Class(_) | Self::Variable(_) | Self::Array(_))
    }

    /// Returns true if this is `java.lang.Object`.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Class(c) if c.name.as_str() == OBJECT && c.args.is_empty())
    }

    /// Replaces type variables according to `subst`.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        match self {
            Self::Variable(name) => subst.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Class(class) => Self::Class(class.substitute(subst)),
            Self::Array(elem) => Self::Array(Box::new(elem.substitute(subst))),
            Self::Wildcard(Wildcard::Extends(bound)) => {
                Self::Wildcard(Wildcard::Extends(Box::new(bound.substitute(subst))))
            }
            Self::Wildcard(Wildcard::Super(bound)) => {
                Self::Wildcard(Wildcard::Super(Box::new(bound.substitute(subst))))
            }
            Self::Void | Self::Primitive(_) | Self::Wildcard(Wildcard::Unbounded) => self.clone(),
        }
    }

    /// Returns true if the type variable `name` occurs in this type.
    #[must_use]
    pub fn mentions(&self, name: &str) -> bool {
        match self {
            Self::Variable(var) => var == name,
            Self::Class(class) => class.args.iter().any(|arg| arg.mentions(name)),
            Self::Array(elem) => elem.mentions(name),
            Self::Wildcard(Wildcard::Extends(bound) | Wildcard::Super(bound)) => {
                bound.mentions(name)
            }
            Self::Void | Self::Primitive(_) | Self::Wildcard(Wildcard::Unbounded) => false,
        }
    }

    /// Returns the erasure of this type.
    #[must_use]
    pub fn erasure(&self, scope: &ErasureScope) -> Self {
        match self {
            Self::Void | Self::Primitive(_) => self.clone(),
            Self::Class(class) => Self::Class(ClassRef::new(class.name.clone())),
            Self::Variable(name) => scope.erased(name),
            Self::Array(elem) => Self::Array(Box::new(elem.erasure(scope))),
            Self::Wildcard(Wildcard::Extends(bound)) => bound.erasure(scope),
            Self::Wildcard(_) => Self::object(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Primitive(p) => f.write_str(p.java_name()),
            Self::Class(class) => write!(f, "{class}"),
            Self::Variable(name) => f.write_str(name),
            Self::Array(elem) => write!(f, "{elem}[]"),
            Self::Wildcard(Wildcard::Unbounded) => f.write_str("?"),
            Self::Wildcard(Wildcard::Extends(bound)) => write!(f, "? extends {bound}"),
            Self::Wildcard(Wildcard::Super(bound)) => write!(f, "? super {bound}"),
        }
    }
}

/// Declared generic parameter with its bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameter {
    /// Parameter name.
    pub name: String,
    /// Upper bounds, in declaration order. Empty means `Object`.
    pub bounds: Vec<TypeRef>,
}

impl TypeParameter {
    /// Creates an unbounded type parameter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    /// Creates a bounded type parameter.
    #[must_use]
    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// Applies a substitution to the bounds.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> Self {
        Self {
            name: self.name.clone(),
            bounds: self.bounds.iter().map(|b| b.substitute(subst)).collect(),
        }
    }
}

impl fmt::Display for TypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            f.write_str(if i == 0 { " extends " } else { " & " })?;
            write!(f, "{bound}")?;
        }
        Ok(())
    }
}

/// Erasures of the type variables in scope.
#[derive(Debug, Clone, Default)]
pub struct ErasureScope {
    erased: HashMap<String, TypeRef>,
}

impl ErasureScope {
    /// Creates an empty scope; unknown variables erase to `Object`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the erasures of `params`, each erasing to its first bound.
    #[must_use]
    pub fn with_parameters(mut self, params: &[TypeParameter]) -> Self {
        for param in params {
            let erased = param
                .bounds
                .first()
                .map_or_else(TypeRef::object, |bound| bound.erasure(&self));
            self.erased.insert(param.name.clone(), erased);
        }
        self
    }

    /// Returns the erasure of the named variable.
    #[must_use]
    pub fn erased(&self, name: &str) -> TypeRef {
        self.erased.get(name).cloned().unwrap_or_else(TypeRef::object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_parts() {
        let name = QualifiedName::new("java.util.concurrent.Callable");
        assert_eq!(name.simple_name(), "Callable");
        assert_eq!(name.package(), "java.util.concurrent");
        assert_eq!(
            name.package_segments().collect::<Vec<_>>(),
            vec!["java", "util", "concurrent"]
        );
        assert_eq!(name.sibling("CallableImpl").as_str(), "java.util.concurrent.CallableImpl");
    }

    #[test]
    fn test_default_package_name() {
        let name = QualifiedName::new("Shape");
        assert_eq!(name.simple_name(), "Shape");
        assert_eq!(name.package(), "");
        assert_eq!(name.package_segments().count(), 0);
        assert_eq!(name.sibling("ShapeImpl").as_str(), "ShapeImpl");
    }

    #[test]
    fn test_qualified_name_validation() {
        assert!(QualifiedName::parse("java.lang.Runnable").is_ok());
        assert!(QualifiedName::parse("int").is_err());
        assert!(QualifiedName::parse("java..Runnable").is_err());
        assert!(QualifiedName::parse("java.lang.Runnable[]").is_err());
        assert!(QualifiedName::parse("").is_err());
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_java_identifier("arg0"));
        assert!(is_java_identifier("$proxy"));
        assert!(!is_java_identifier("0arg"));
        assert!(!is_java_identifier("class"));
        assert!(!is_java_identifier("_"));
    }

    #[test]
    fn test_display_parameterized() {
        let ty = TypeRef::Class(ClassRef::with_args(
            "java.util.Map",
            vec![
                TypeRef::variable("K"),
                TypeRef::Wildcard(Wildcard::Extends(Box::new(TypeRef::class(
                    "java.lang.Number",
                )))),
            ],
        ));
        assert_eq!(ty.to_string(), "java.util.Map<K, ? extends java.lang.Number>");
        assert_eq!(
            TypeRef::array(TypeRef::Primitive(PrimitiveType::Int)).to_string(),
            "int[]"
        );
    }

    #[test]
    fn test_substitute_replaces_variables() {
        let ty = TypeRef::Class(ClassRef::with_args(
            "java.util.function.Function",
            vec![TypeRef::variable("T"), TypeRef::variable("R")],
        ));
        let mut subst = Substitution::new();
        subst.insert("T".to_string(), TypeRef::class("java.lang.String"));
        let result = ty.substitute(&subst);
        assert_eq!(
            result.to_string(),
            "java.util.function.Function<java.lang.String, R>"
        );
    }

    #[test]
    fn test_erasure_uses_first_bound() {
        let params = vec![
            TypeParameter::bounded(
                "T",
                vec![TypeRef::Class(ClassRef::with_args(
                    "java.lang.Comparable",
                    vec![TypeRef::variable("T")],
                ))],
            ),
            TypeParameter::new("U"),
        ];
        let scope = ErasureScope::new().with_parameters(&params);
        assert_eq!(
            TypeRef::variable("T").erasure(&scope),
            TypeRef::class("java.lang.Comparable")
        );
        assert_eq!(TypeRef::variable("U").erasure(&scope), TypeRef::object());
        assert_eq!(
            TypeRef::array(TypeRef::variable("T")).erasure(&scope),
            TypeRef::array(TypeRef::class("java.lang.Comparable"))
        );
    }

    #[test]
    fn test_type_parameter_display() {
        let param = TypeParameter::bounded(
            "T",
            vec![
                TypeRef::class("java.lang.Number"),
                TypeRef::class("java.lang.Runnable"),
            ],
        );
        assert_eq!(
            param.to_string(),
            "T extends java.lang.Number & java.lang.Runnable"
        );
    }
}
