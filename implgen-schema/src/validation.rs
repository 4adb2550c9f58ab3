//! Descriptor validation.
//!
//! Rejects declarations that the Java language itself would reject, so the
//! resolver only ever links well-formed types.

use std::collections::HashSet;

use implgen_core::{Access, TypeKind, TypeRef};

use crate::error::SchemaError;
use crate::types::TypeDescriptor;

/// Validates a parsed descriptor for correctness.
///
/// # Arguments
/// * `descriptor` - The descriptor to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_descriptor(descriptor: &TypeDescriptor) -> Result<(), SchemaError> {
    validate_type_modifiers(descriptor)?;
    validate_methods(descriptor)?;
    validate_constructors(descriptor)?;
    Ok(())
}

fn validate_type_modifiers(descriptor: &TypeDescriptor) -> Result<(), SchemaError> {
    let name = descriptor.name.as_str();
    match descriptor.kind {
        TypeKind::Interface => {
            if descriptor.is_final {
                return Err(SchemaError::invalid(name, "interfaces cannot be final"));
            }
            if !descriptor.constructors.is_empty() {
                return Err(SchemaError::invalid(name, "interfaces cannot declare constructors"));
            }
            if descriptor.superclass.is_some() {
                return Err(SchemaError::invalid(name, "interfaces cannot have a superclass"));
            }
        }
        TypeKind::AbstractClass => {
            if descriptor.is_final {
                return Err(SchemaError::invalid(name, "a class cannot be both abstract and final"));
            }
        }
        TypeKind::Class => {}
    }
    Ok(())
}

fn validate_methods(descriptor: &TypeDescriptor) -> Result<(), SchemaError> {
    let name = descriptor.name.as_str();
    let scope = implgen_core::ErasureScope::new().with_parameters(&descriptor.type_parameters);
    let mut seen: HashSet<(String, Vec<TypeRef>)> = HashSet::new();

    for method in &descriptor.methods {
        if descriptor.kind == TypeKind::Interface && method.is_final {
            return Err(SchemaError::invalid(
                name,
                format!("interface method '{}' cannot be final", method.name),
            ));
        }
        if method.is_abstract {
            if descriptor.kind == TypeKind::Class {
                return Err(SchemaError::invalid(
                    name,
                    format!("concrete class declares abstract method '{}'", method.name),
                ));
            }
            let conflicting = if method.is_static {
                Some("static")
            } else if method.is_final {
                Some("final")
            } else if method.access == Access::Private {
                Some("private")
            } else {
                None
            };
            if let Some(modifier) = conflicting {
                return Err(SchemaError::invalid(
                    name,
                    format!("abstract method '{}' cannot be {modifier}", method.name),
                ));
            }
        }

        let erased = method.erased_parameters(&scope);
        if !seen.insert((method.name.clone(), erased.clone())) {
            return Err(SchemaError::DuplicateMember {
                type_name: name.to_string(),
                member: render_member(&method.name, &erased),
            });
        }
    }
    Ok(())
}

fn validate_constructors(descriptor: &TypeDescriptor) -> Result<(), SchemaError> {
    let scope = implgen_core::ErasureScope::new().with_parameters(&descriptor.type_parameters);
    let mut seen: HashSet<Vec<TypeRef>> = HashSet::new();
    for constructor in &descriptor.constructors {
        let erased: Vec<TypeRef> = constructor
            .parameter_types
            .iter()
            .map(|t| t.erasure(&scope))
            .collect();
        if !seen.insert(erased.clone()) {
            return Err(SchemaError::DuplicateMember {
                type_name: descriptor.name.to_string(),
                member: render_member(descriptor.name.simple_name(), &erased),
            });
        }
    }
    Ok(())
}

fn render_member(name: &str, params: &[TypeRef]) -> String {
    let params: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("{name}({})", params.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_descriptor;

    fn validate(xml: &str) -> Result<(), SchemaError> {
        validate_descriptor(&parse_descriptor(xml).expect("Failed to parse descriptor"))
    }

    #[test]
    fn test_valid_descriptor() {
        let xml = r#"<class name="a.Base" abstract="true">
    <constructor access="protected"><param type="int"/></constructor>
    <constructor access="protected"><param type="int"/><param type="java.lang.String"/></constructor>
    <method name="run" abstract="true" access="protected"/>
    <method name="size" returns="int"/>
    <method name="size" returns="int"><param type="int"/></method>
</class>"#;
        assert!(validate(xml).is_ok());
    }

    #[test]
    fn test_interface_rules() {
        assert!(validate(r#"<interface name="a.I" final="true"/>"#).is_err());
        assert!(validate(r#"<interface name="a.I"><method name="m" final="true" default="true"/></interface>"#).is_err());
    }

    #[test]
    fn test_abstract_method_modifiers() {
        let concrete = r#"<class name="a.C"><method name="m" abstract="true"/></class>"#;
        assert!(matches!(
            validate(concrete).unwrap_err(),
            SchemaError::InvalidDeclaration { .. }
        ));
        let private = r#"<class name="a.C" abstract="true"><method name="m" abstract="true" access="private"/></class>"#;
        assert!(validate(private).is_err());
        let fin = r#"<class name="a.C" abstract="true"><method name="m" abstract="true" final="true"/></class>"#;
        assert!(validate(fin).is_err());
        let abstract_final = r#"<class name="a.C" abstract="true" final="true"/>"#;
        assert!(validate(abstract_final).is_err());
    }

    #[test]
    fn test_duplicate_members_use_erasure() {
        let xml = r#"<interface name="a.Box">
    <typeParameter name="T"/>
    <method name="put"><param type="T"/></method>
    <method name="put" returns="boolean"><param type="java.lang.Object"/></method>
</interface>"#;
        let err = validate(xml).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateMember { ref member, .. } if member == "put(java.lang.Object)"));

        let ctors = r#"<class name="a.C" abstract="true">
    <constructor><param type="java.util.List&lt;java.lang.String>"/></constructor>
    <constructor><param type="java.util.List&lt;java.lang.Integer>"/></constructor>
</class>"#;
        assert!(matches!(
            validate(ctors).unwrap_err(),
            SchemaError::DuplicateMember { .. }
        ));
    }
}
