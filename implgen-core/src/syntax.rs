//! Java type expression parser.
//!
//! Parses the textual type expressions found in descriptors, such as
//! `java.util.Map<K, ? extends java.util.List<V>>[]`, into [`TypeRef`]
//! values.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::types::{ClassRef, PrimitiveType, QualifiedName, TypeRef, Wildcard, is_java_identifier};

/// Naming context used to interpret bare identifiers.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    package: String,
    variables: HashSet<String>,
}

impl TypeScope {
    /// Creates a scope for types declared in `package`.
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            variables: HashSet::new(),
        }
    }

    /// Creates the scope of the type called `name`.
    #[must_use]
    pub fn for_type(name: &QualifiedName) -> Self {
        Self::new(name.package())
    }

    /// Returns a copy of this scope with additional type variables.
    #[must_use]
    pub fn with_variables<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scope = self.clone();
        scope.variables.extend(names.into_iter().map(Into::into));
        scope
    }

    /// Returns true if `name` is a type variable in this scope.
    #[must_use]
    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    /// Package used to qualify bare class names.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    fn qualify(&self, simple: &str) -> QualifiedName {
        if self.package.is_empty() {
            QualifiedName::new(simple)
        } else {
            QualifiedName::new(format!("{}.{simple}", self.package))
        }
    }
}

/// Parses a type expression; `void` is accepted.
///
/// # Arguments
/// * `text` - Java type expression
/// * `scope` - Scope used to interpret bare identifiers
///
/// # Errors
/// Returns `Error::TypeSyntax` if the expression is malformed.
pub fn parse_type(text: &str, scope: &TypeScope) -> Result<TypeRef> {
    if text.trim() == "void" {
        return Ok(TypeRef::Void);
    }
    let mut parser = Parser::new(text, scope);
    let ty = parser.parse_type(false)?;
    parser.finish()?;
    Ok(ty)
}

/// Parses a parameter type, recognising a trailing `...`.
///
/// Returns the parameter type (an array for varargs) and the varargs flag.
///
/// # Errors
/// Returns `Error::TypeSyntax` if the expression is malformed or `void`.
pub fn parse_parameter_type(text: &str, scope: &TypeScope) -> Result<(TypeRef, bool)> {
    let trimmed = text.trim();
    let (body, varargs) = match trimmed.strip_suffix("...") {
        Some(body) => (body, true),
        None => (trimmed, false),
    };
    let mut parser = Parser::new(body, scope);
    let ty = parser.parse_type(false)?;
    parser.finish()?;
    if varargs {
        Ok((TypeRef::array(ty), true))
    } else {
        Ok((ty, false))
    }
}

/// Parses a class or interface reference such as a supertype.
///
/// # Errors
/// Returns `Error::TypeSyntax` unless the expression is a class type.
pub fn parse_class_ref(text: &str, scope: &TypeScope) -> Result<ClassRef> {
    match parse_type(text, scope)? {
        TypeRef::Class(class) => Ok(class),
        other => Err(Error::syntax(
            text,
            0,
            format!("expected a class or interface type, found '{other}'"),
        )),
    }
}

/// Parses an `&`-separated bound list such as `java.lang.Number & java.lang.Comparable<T>`.
///
/// # Errors
/// Returns `Error::TypeSyntax` if any bound is malformed or not a reference type.
pub fn parse_bounds(text: &str, scope: &TypeScope) -> Result<Vec<TypeRef>> {
    let mut bounds = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '&' if depth == 0 => {
                bounds.push(parse_bound(&text[start..idx], scope, text, start)?);
                start = idx + 1;
            }
            _ => {}
        }
    }
    bounds.push(parse_bound(&text[start..], scope, text, start)?);
    Ok(bounds)
}

fn parse_bound(part: &str, scope: &TypeScope, full: &str, offset: usize) -> Result<TypeRef> {
    let ty = parse_type(part, scope)?;
    if ty.is_reference() {
        Ok(ty)
    } else {
        Err(Error::syntax(full, offset, "bounds must be reference types"))
    }
}

struct Parser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
    scope: &'a TypeScope,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, scope: &'a TypeScope) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            pos: 0,
            scope,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.text, self.pos, message)
    }

    fn skip_ws(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
        }
    }

    fn identifier(&mut self) -> Result<String> {
        self.skip_ws();
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// Looks ahead for a keyword without consuming anything else.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let save = self.pos;
        match self.identifier() {
            Ok(word) if word == keyword => true,
            _ => {
                self.pos = save;
                false
            }
        }
    }

    fn parse_type(&mut self, in_args: bool) -> Result<TypeRef> {
        let mut ty = if self.peek() == Some('?') {
            if !in_args {
                return Err(self.error("wildcards are only allowed as type arguments"));
            }
            self.pos += 1;
            let wildcard = if self.eat_keyword("extends") {
                Wildcard::Extends(Box::new(self.parse_reference()?))
            } else if self.eat_keyword("super") {
                Wildcard::Super(Box::new(self.parse_reference()?))
            } else {
                Wildcard::Unbounded
            };
            return Ok(TypeRef::Wildcard(wildcard));
        } else {
            self.parse_named()?
        };
        while self.eat('[') {
            self.expect(']')?;
            ty = TypeRef::array(ty);
        }
        Ok(ty)
    }

    fn parse_reference(&mut self) -> Result<TypeRef> {
        let start = self.pos;
        let ty = self.parse_type(false)?;
        if ty.is_reference() {
            Ok(ty)
        } else {
            self.pos = start;
            Err(self.error("wildcard bounds must be reference types"))
        }
    }

    fn parse_named(&mut self) -> Result<TypeRef> {
        let start = self.pos;
        let mut segments = vec![self.identifier()?];
        while self.eat('.') {
            segments.push(self.identifier()?);
        }

        if segments.len() == 1 {
            let word = segments[0].as_str();
            if let Some(primitive) = PrimitiveType::from_java_name(word) {
                if self.peek() == Some('<') {
                    return Err(self.error("primitive types take no type arguments"));
                }
                return Ok(TypeRef::Primitive(primitive));
            }
            if word == "void" {
                self.pos = start;
                return Err(self.error("'void' is only allowed as a return type"));
            }
            if self.scope.is_variable(word) {
                if self.peek() == Some('<') {
                    return Err(self.error("type variables take no type arguments"));
                }
                return Ok(TypeRef::variable(word));
            }
        }

        if let Some(bad) = segments.iter().find(|s| !is_java_identifier(s)) {
            self.pos = start;
            return Err(self.error(format!("'{bad}' is not a valid identifier")));
        }

        let name = if segments.len() == 1 {
            self.scope.qualify(&segments[0])
        } else {
            QualifiedName::new(segments.join("."))
        };

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type(true)?);
                if self.eat(',') {
                    continue;
                }
                self.expect('>')?;
                break;
            }
        }
        Ok(TypeRef::Class(ClassRef::with_args(name, args)))
    }
}
