//! Type descriptor XML parser.
//!
//! This module parses descriptor documents into [`TypeDescriptor`] values.
//! A document holds either a single `<interface>`/`<class>` element or a
//! `<types>` element listing many of them.

use implgen_core::types::OBJECT;
use implgen_core::{
    Access, ClassRef, ConstructorSignature, MethodSignature, QualifiedName, TypeKind,
    TypeParameter, TypeRef, TypeScope, is_java_identifier, parse_bounds, parse_class_ref,
    parse_parameter_type, parse_type,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ParseError;
use crate::types::TypeDescriptor;

/// Parses every type declared in a descriptor document.
///
/// # Arguments
/// * `xml` - Descriptor document content
///
/// # Returns
/// Declared types in document order.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or contains invalid declarations.
pub fn parse_descriptors(xml: &str) -> Result<Vec<TypeDescriptor>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut descriptors = Vec::new();
    let mut in_types = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e)?;
                match name.as_str() {
                    "types" if !in_types && descriptors.is_empty() => in_types = true,
                    "interface" | "class" => {
                        ensure_single_root(in_types, &descriptors)?;
                        descriptors.push(parse_type_element(&mut reader, e, true)?);
                    }
                    other => return Err(ParseError::unknown_element(other, "document")),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = element_name(e)?;
                match name.as_str() {
                    "types" if !in_types && descriptors.is_empty() => {}
                    "interface" | "class" => {
                        ensure_single_root(in_types, &descriptors)?;
                        descriptors.push(parse_type_element(&mut reader, e, false)?);
                    }
                    other => return Err(ParseError::unknown_element(other, "document")),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if descriptors.is_empty() {
        return Err(ParseError::structure("no interface or class element found"));
    }
    Ok(descriptors)
}

/// Parses a document that declares exactly one type.
///
/// # Errors
/// Returns `ParseError` if parsing fails or the document declares several types.
pub fn parse_descriptor(xml: &str) -> Result<TypeDescriptor, ParseError> {
    let mut descriptors = parse_descriptors(xml)?;
    if descriptors.len() != 1 {
        return Err(ParseError::structure(format!(
            "expected one type declaration, found {}",
            descriptors.len()
        )));
    }
    descriptors
        .pop()
        .ok_or_else(|| ParseError::structure("no interface or class element found"))
}

fn ensure_single_root(in_types: bool, descriptors: &[TypeDescriptor]) -> Result<(), ParseError> {
    if !in_types && !descriptors.is_empty() {
        return Err(ParseError::structure(
            "several type declarations must be wrapped in <types>",
        ));
    }
    Ok(())
}

fn element_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(e.name().as_ref())?.to_string())
}

/// Decodes and unescapes the attributes of an element.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        attrs.push((
            key.to_string(),
            quick_xml::escape::unescape(value)?.into_owned(),
        ));
    }
    Ok(attrs)
}

fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}

fn parse_access(element: &str, value: &str) -> Result<Access, ParseError> {
    Access::parse(value).ok_or_else(|| ParseError::invalid_attr(element, "access", value))
}

fn type_error(element: &str) -> impl Fn(implgen_core::Error) -> ParseError + '_ {
    move |source| ParseError::TypeExpression {
        element: element.to_string(),
        source,
    }
}

/// Reads up to the end tag of a leaf element.
fn expect_end(reader: &mut Reader<&[u8]>, element: &str) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = element_name(e)?;
                return Err(ParseError::unknown_element(name, element));
            }
            Ok(Event::End(_)) => return Ok(()),
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unexpected end of document inside <{element}>"
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
}

#[derive(Debug, Default)]
struct RawTypeParameter {
    name: String,
    bounds: Option<String>,
}

#[derive(Debug, Default)]
struct RawMember {
    name: String,
    returns: Option<String>,
    type_parameters: Vec<RawTypeParameter>,
    params: Vec<String>,
    throws: Vec<String>,
    is_abstract: Option<bool>,
    is_default: bool,
    is_static: bool,
    is_final: bool,
    access: Access,
}

#[derive(Debug, Default)]
struct RawType {
    type_parameters: Vec<RawTypeParameter>,
    extends: Vec<String>,
    implements: Vec<String>,
    methods: Vec<RawMember>,
    constructors: Vec<RawMember>,
}

fn parse_type_parameter(e: &BytesStart<'_>) -> Result<RawTypeParameter, ParseError> {
    let mut param = RawTypeParameter::default();
    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => param.name = value,
            "extends" => param.bounds = Some(value),
            _ => {}
        }
    }
    if param.name.is_empty() {
        return Err(ParseError::missing_attr("typeParameter", "name"));
    }
    if !is_java_identifier(&param.name) {
        return Err(ParseError::invalid_attr("typeParameter", "name", param.name));
    }
    Ok(param)
}

fn required_type_attr(e: &BytesStart<'_>, element: &str) -> Result<String, ParseError> {
    attributes(e)?
        .into_iter()
        .find(|(key, _)| key == "type")
        .map(|(_, value)| value)
        .ok_or_else(|| ParseError::missing_attr(element, "type"))
}

/// Parses an `<interface>` or `<class>` element and its children.
fn parse_type_element(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_body: bool,
) -> Result<TypeDescriptor, ParseError> {
    let element = element_name(e)?;
    let mut name = None;
    let mut is_abstract = false;
    let mut is_final = false;
    let mut access = Access::Public;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "abstract" => is_abstract = parse_bool(&element, "abstract", &value)?,
            "final" => is_final = parse_bool(&element, "final", &value)?,
            "access" => access = parse_access(&element, &value)?,
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr(&element, "name"))?;
    let qualified = QualifiedName::parse(&name)
        .map_err(|_| ParseError::invalid_attr(&element, "name", &name))?;
    let kind = match (element.as_str(), is_abstract) {
        ("interface", _) => TypeKind::Interface,
        (_, true) => TypeKind::AbstractClass,
        _ => TypeKind::Class,
    };

    let mut raw = RawType::default();
    if has_body {
        parse_type_body(reader, &element, &mut raw)?;
    }

    let mut descriptor = build_descriptor(qualified, kind, raw)?;
    descriptor.access = access;
    descriptor.is_final = is_final;
    Ok(descriptor)
}

fn parse_type_body(
    reader: &mut Reader<&[u8]>,
    element: &str,
    raw: &mut RawType,
) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => type_child(reader, e, true, element, raw)?,
            Ok(Event::Empty(ref e)) => type_child(reader, e, false, element, raw)?,
            Ok(Event::End(_)) => return Ok(()),
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unexpected end of document inside <{element}>"
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
}

fn type_child(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_body: bool,
    parent: &str,
    raw: &mut RawType,
) -> Result<(), ParseError> {
    let name = element_name(e)?;
    match name.as_str() {
        "typeParameter" => raw.type_parameters.push(parse_type_parameter(e)?),
        "extends" => raw.extends.push(required_type_attr(e, "extends")?),
        "implements" => raw.implements.push(required_type_attr(e, "implements")?),
        "method" => {
            let method = parse_member(reader, e, has_body, true)?;
            raw.methods.push(method);
            return Ok(());
        }
        "constructor" => {
            let constructor = parse_member(reader, e, has_body, false)?;
            raw.constructors.push(constructor);
            return Ok(());
        }
        other => return Err(ParseError::unknown_element(other, parent)),
    }
    if has_body {
        expect_end(reader, &name)?;
    }
    Ok(())
}

/// Parses a `<method>` or `<constructor>` element.
fn parse_member(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_body: bool,
    is_method: bool,
) -> Result<RawMember, ParseError> {
    let element = if is_method { "method" } else { "constructor" };
    let mut member = RawMember::default();

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" if is_method => member.name = value,
            "returns" if is_method => member.returns = Some(value),
            "abstract" if is_method => {
                member.is_abstract = Some(parse_bool(element, "abstract", &value)?)
            }
            "default" if is_method => member.is_default = parse_bool(element, "default", &value)?,
            "static" if is_method => member.is_static = parse_bool(element, "static", &value)?,
            "final" if is_method => member.is_final = parse_bool(element, "final", &value)?,
            "access" => member.access = parse_access(element, &value)?,
            _ => {}
        }
    }

    if is_method {
        if member.name.is_empty() {
            return Err(ParseError::missing_attr(element, "name"));
        }
        if !is_java_identifier(&member.name) {
            return Err(ParseError::invalid_attr(element, "name", member.name));
        }
        if member.is_default && member.is_abstract == Some(true) {
            return Err(ParseError::invalid_attr(element, "abstract", "true"));
        }
    }

    if !has_body {
        return Ok(member);
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref child)) => {
                member_child(child, element, is_method, &mut member)?;
                let child_name = element_name(child)?;
                expect_end(reader, &child_name)?;
            }
            Ok(Event::Empty(ref child)) => member_child(child, element, is_method, &mut member)?,
            Ok(Event::End(_)) => return Ok(member),
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unexpected end of document inside <{element}>"
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
}

fn member_child(
    e: &BytesStart<'_>,
    parent: &str,
    is_method: bool,
    member: &mut RawMember,
) -> Result<(), ParseError> {
    let name = element_name(e)?;
    match name.as_str() {
        "typeParameter" if is_method => member.type_parameters.push(parse_type_parameter(e)?),
        "param" => member.params.push(required_type_attr(e, "param")?),
        "throws" => member.throws.push(required_type_attr(e, "throws")?),
        other => return Err(ParseError::unknown_element(other, parent)),
    }
    Ok(())
}

fn convert_type_parameters(
    raw: &[RawTypeParameter],
    scope: &TypeScope,
) -> Result<Vec<TypeParameter>, ParseError> {
    let mut params = Vec::with_capacity(raw.len());
    for param in raw {
        if params.iter().any(|p: &TypeParameter| p.name == param.name) {
            return Err(ParseError::duplicate("type parameter", &param.name));
        }
        let bounds = match &param.bounds {
            Some(text) => parse_bounds(text, scope).map_err(type_error("typeParameter"))?,
            None => Vec::new(),
        };
        params.push(TypeParameter::bounded(param.name.clone(), bounds));
    }
    Ok(params)
}

fn convert_parameters(
    raw: &[String],
    scope: &TypeScope,
) -> Result<(Vec<TypeRef>, bool), ParseError> {
    let mut types = Vec::with_capacity(raw.len());
    let mut varargs = false;
    for (idx, text) in raw.iter().enumerate() {
        let (ty, is_varargs) = parse_parameter_type(text, scope).map_err(type_error("param"))?;
        if is_varargs && idx + 1 != raw.len() {
            return Err(ParseError::invalid_attr("param", "type", text));
        }
        varargs = is_varargs;
        types.push(ty);
    }
    Ok((types, varargs))
}

fn convert_throws(raw: &[String], scope: &TypeScope) -> Result<Vec<TypeRef>, ParseError> {
    let mut throws = Vec::with_capacity(raw.len());
    for text in raw {
        let ty = parse_type(text, scope).map_err(type_error("throws"))?;
        if !matches!(ty, TypeRef::Class(_) | TypeRef::Variable(_)) {
            return Err(ParseError::invalid_attr("throws", "type", text));
        }
        if !throws.contains(&ty) {
            throws.push(ty);
        }
    }
    Ok(throws)
}

fn build_descriptor(
    name: QualifiedName,
    kind: TypeKind,
    raw: RawType,
) -> Result<TypeDescriptor, ParseError> {
    let scope =
        TypeScope::for_type(&name).with_variables(raw.type_parameters.iter().map(|p| p.name.clone()));
    let mut descriptor = TypeDescriptor::new(name, kind);
    descriptor.type_parameters = convert_type_parameters(&raw.type_parameters, &scope)?;

    let extends = raw
        .extends
        .iter()
        .map(|text| parse_class_ref(text, &scope).map_err(type_error("extends")))
        .collect::<Result<Vec<ClassRef>, _>>()?;
    let implements = raw
        .implements
        .iter()
        .map(|text| parse_class_ref(text, &scope).map_err(type_error("implements")))
        .collect::<Result<Vec<ClassRef>, _>>()?;

    if kind == TypeKind::Interface {
        if !implements.is_empty() {
            return Err(ParseError::structure(format!(
                "interface '{}' cannot use <implements>; use <extends>",
                descriptor.name
            )));
        }
        descriptor.interfaces = extends;
    } else {
        if extends.len() > 1 {
            return Err(ParseError::structure(format!(
                "class '{}' extends more than one class",
                descriptor.name
            )));
        }
        descriptor.superclass = extends.into_iter().next();
        if descriptor.superclass.is_none() && descriptor.name.as_str() != OBJECT {
            descriptor.superclass = Some(ClassRef::new(OBJECT));
        }
        descriptor.interfaces = implements;
    }

    for method in raw.methods {
        descriptor
            .methods
            .push(build_method(&descriptor.name, kind, method, &scope)?);
    }
    for constructor in raw.constructors {
        if kind == TypeKind::Interface {
            return Err(ParseError::unknown_element("constructor", "interface"));
        }
        let (parameter_types, varargs) = convert_parameters(&constructor.params, &scope)?;
        descriptor.constructors.push(ConstructorSignature {
            parameter_types,
            varargs,
            declared_throws: convert_throws(&constructor.throws, &scope)?,
            access: constructor.access,
        });
    }

    Ok(descriptor)
}

fn build_method(
    owner: &QualifiedName,
    kind: TypeKind,
    raw: RawMember,
    type_scope: &TypeScope,
) -> Result<MethodSignature, ParseError> {
    if raw.is_default && kind != TypeKind::Interface {
        return Err(ParseError::structure(format!(
            "default method '{}' declared outside an interface",
            raw.name
        )));
    }

    let scope = type_scope.with_variables(raw.type_parameters.iter().map(|p| p.name.clone()));
    let type_parameters = convert_type_parameters(&raw.type_parameters, &scope)?;
    let (parameter_types, varargs) = convert_parameters(&raw.params, &scope)?;
    let return_type = match &raw.returns {
        Some(text) => parse_type(text, &scope).map_err(type_error("method"))?,
        None => TypeRef::Void,
    };

    let implicitly_abstract = kind == TypeKind::Interface
        && !raw.is_default
        && !raw.is_static
        && raw.access != Access::Private;
    let is_abstract = raw.is_abstract.unwrap_or(implicitly_abstract);

    Ok(MethodSignature {
        name: raw.name,
        type_parameters,
        parameter_types,
        varargs,
        return_type,
        declared_throws: convert_throws(&raw.throws, &scope)?,
        is_abstract,
        is_static: raw.is_static,
        is_final: raw.is_final,
        access: raw.access,
        owner: owner.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use implgen_core::{PrimitiveType, Wildcard};

    const TIMER_TASK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<class name="java.util.TimerTask" abstract="true" access="public">
    <implements type="java.lang.Runnable"/>
    <constructor access="protected"/>
    <method name="run" abstract="true"/>
    <method name="cancel" returns="boolean"/>
    <method name="scheduledExecutionTime" returns="long"/>
</class>"#;

    const FUNCTION: &str = r#"<interface name="java.util.function.Function">
    <typeParameter name="T"/>
    <typeParameter name="R"/>
    <method name="apply" returns="R"><param type="T"/></method>
    <method name="andThen" default="true" returns="java.util.function.Function&lt;T, V>">
        <typeParameter name="V"/>
        <param type="java.util.function.Function&lt;? super R, ? extends V>"/>
    </method>
    <method name="identity" static="true" returns="java.util.function.Function&lt;X, X>">
        <typeParameter name="X"/>
    </method>
</interface>"#;

    #[test]
    fn test_parse_abstract_class() {
        let descriptor = parse_descriptor(TIMER_TASK).expect("Failed to parse descriptor");
        assert_eq!(descriptor.name.as_str(), "java.util.TimerTask");
        assert_eq!(descriptor.kind, TypeKind::AbstractClass);
        assert_eq!(descriptor.superclass, Some(ClassRef::new(OBJECT)));
        assert_eq!(descriptor.interfaces, vec![ClassRef::new("java.lang.Runnable")]);
        assert_eq!(descriptor.constructors.len(), 1);
        assert_eq!(descriptor.constructors[0].access, Access::Protected);

        let run = &descriptor.methods[0];
        assert!(run.is_abstract);
        assert_eq!(run.return_type, TypeRef::Void);
        let cancel = &descriptor.methods[1];
        assert!(!cancel.is_abstract);
        assert_eq!(cancel.return_type, TypeRef::Primitive(PrimitiveType::Boolean));
    }

    #[test]
    fn test_parse_generic_interface() {
        let descriptor = parse_descriptor(FUNCTION).expect("Failed to parse descriptor");
        assert_eq!(descriptor.kind, TypeKind::Interface);
        assert_eq!(descriptor.type_parameters.len(), 2);
        assert!(descriptor.superclass.is_none());

        let apply = &descriptor.methods[0];
        assert!(apply.is_abstract);
        assert_eq!(apply.parameter_types, vec![TypeRef::variable("T")]);
        assert_eq!(apply.return_type, TypeRef::variable("R"));

        let and_then = &descriptor.methods[1];
        assert!(!and_then.is_abstract);
        assert_eq!(and_then.type_parameters[0].name, "V");
        let TypeRef::Class(param) = &and_then.parameter_types[0] else {
            panic!("expected class parameter");
        };
        assert_eq!(
            param.args[1],
            TypeRef::Wildcard(Wildcard::Extends(Box::new(TypeRef::variable("V"))))
        );

        let identity = &descriptor.methods[2];
        assert!(identity.is_static);
        assert!(!identity.is_abstract);
    }

    #[test]
    fn test_parse_types_document() {
        let xml = r#"<types>
    <interface name="shapes.Shape">
        <method name="area" returns="double"/>
    </interface>
    <interface name="shapes.Named"/>
    <class name="shapes.Base" abstract="true">
        <implements type="Shape"/>
        <implements type="shapes.Named"/>
        <constructor access="protected">
            <param type="int"/>
            <param type="java.lang.String..."/>
            <throws type="java.io.IOException"/>
        </constructor>
    </class>
</types>"#;
        let descriptors = parse_descriptors(xml).expect("Failed to parse descriptors");
        assert_eq!(descriptors.len(), 3);
        assert!(descriptors[1].methods.is_empty());

        let base = &descriptors[2];
        assert_eq!(base.interfaces[0], ClassRef::new("shapes.Shape"));
        let ctor = &base.constructors[0];
        assert!(ctor.varargs);
        assert_eq!(
            ctor.parameter_types[1],
            TypeRef::array(TypeRef::class("java.lang.String"))
        );
        assert_eq!(ctor.declared_throws, vec![TypeRef::class("java.io.IOException")]);
    }

    #[test]
    fn test_type_parameter_bounds() {
        let xml = r#"<interface name="a.Sorted">
    <typeParameter name="T" extends="java.lang.Comparable&lt;T> &amp; java.io.Serializable"/>
    <method name="first" returns="T"/>
</interface>"#;
        let descriptor = parse_descriptor(xml).unwrap();
        assert_eq!(
            descriptor.type_parameters[0].to_string(),
            "T extends java.lang.Comparable<T> & java.io.Serializable"
        );
    }

    #[test]
    fn test_unknown_element_is_error() {
        let xml = r#"<interface name="a.Shape"><field name="x"/></interface>"#;
        let err = parse_descriptor(xml).unwrap_err();
        assert!(matches!(err, ParseError::UnknownElement { .. }));

        let xml = r#"<interface name="a.Shape"><method name="x"><body/></method></interface>"#;
        assert!(matches!(
            parse_descriptor(xml).unwrap_err(),
            ParseError::UnknownElement { .. }
        ));
    }

    #[test]
    fn test_invalid_attributes() {
        let missing = r#"<interface><method name="run"/></interface>"#;
        assert!(matches!(
            parse_descriptor(missing).unwrap_err(),
            ParseError::MissingAttribute { .. }
        ));

        let bad_bool = r#"<class name="a.B" abstract="yes"/>"#;
        assert!(matches!(
            parse_descriptor(bad_bool).unwrap_err(),
            ParseError::InvalidAttribute { .. }
        ));

        let bad_type = r#"<interface name="a.B"><method name="m" returns="java.util.List&lt;"/></interface>"#;
        assert!(matches!(
            parse_descriptor(bad_type).unwrap_err(),
            ParseError::TypeExpression { .. }
        ));

        let bad_varargs = r#"<interface name="a.B"><method name="m"><param type="int..."/><param type="int"/></method></interface>"#;
        assert!(parse_descriptor(bad_varargs).is_err());
    }

    #[test]
    fn test_structure_errors() {
        assert!(parse_descriptors("<types/>").is_err());
        let two_roots = r#"<interface name="a.A"/><interface name="a.B"/>"#;
        assert!(matches!(
            parse_descriptors(two_roots).unwrap_err(),
            ParseError::InvalidStructure { .. }
        ));
        let default_in_class = r#"<class name="a.A" abstract="true"><method name="m" default="true"/></class>"#;
        assert!(parse_descriptor(default_in_class).is_err());
        let interface_implements = r#"<interface name="a.A"><implements type="a.B"/></interface>"#;
        assert!(parse_descriptor(interface_implements).is_err());
    }
}
