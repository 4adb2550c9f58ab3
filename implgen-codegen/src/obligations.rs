//! Obligation collection.
//!
//! Walks the supertype graph of a root type and computes what a concrete
//! subclass has to provide: every method left abstract along the way and,
//! for abstract classes, the superclass constructors to forward.

use std::collections::{HashMap, HashSet};

use implgen_core::{
    Access, ClassRef, ConstructorSignature, ErasureScope, MethodSignature, QualifiedName,
    Substitution, Subtyping, TypeKind, TypeLookup, TypeModel, TypeRef,
};

use crate::error::CodegenError;

const RUNTIME_EXCEPTION: &str = "java.lang.RuntimeException";
const ERROR: &str = "java.lang.Error";

/// A superclass constructor the generated type must forward to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorObligation {
    /// Constructor of the root type.
    pub signature: ConstructorSignature,
}

/// A method the generated type must implement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodObligation {
    /// Representative declaration with supertype arguments substituted.
    pub signature: MethodSignature,
    /// Narrowest return type accepted by every inherited declaration.
    pub resolved_return_type: TypeRef,
    /// Checked exceptions every inherited declaration allows.
    pub resolved_throws: Vec<TypeRef>,
    /// Widest access among the inherited declarations.
    pub access: Access,
    /// Depth of the declaring type below the root.
    pub depth: usize,
}

impl MethodObligation {
    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.signature.name
    }
}

/// Something the generated type must provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Obligation {
    /// Forward a superclass constructor.
    Constructor(ConstructorObligation),
    /// Implement an abstract method.
    Method(MethodObligation),
}

impl Obligation {
    /// Returns the method obligation, if this is one.
    #[must_use]
    pub fn as_method(&self) -> Option<&MethodObligation> {
        match self {
            Self::Method(method) => Some(method),
            Self::Constructor(_) => None,
        }
    }

    /// Returns the constructor obligation, if this is one.
    #[must_use]
    pub fn as_constructor(&self) -> Option<&ConstructorObligation> {
        match self {
            Self::Constructor(constructor) => Some(constructor),
            Self::Method(_) => None,
        }
    }
}

/// Name plus erased parameter types: the identity of an override.
type SignatureKey = (String, Vec<TypeRef>);

/// A type reached during traversal, with its arguments as seen from the root.
struct Node<'r> {
    model: &'r TypeModel,
    subst: Substitution,
    raw: bool,
    depth: usize,
    class_chain: bool,
}

/// One inherited declaration of a signature.
struct Declaration {
    signature: MethodSignature,
    declared_in: QualifiedName,
    depth: usize,
    class_chain: bool,
}

/// Computes the obligations of a root type.
pub struct ObligationCollector<'a> {
    lookup: &'a dyn TypeLookup,
}

impl<'a> ObligationCollector<'a> {
    /// Creates a collector that consults `lookup` for subtype checks.
    #[must_use]
    pub fn new(lookup: &'a dyn TypeLookup) -> Self {
        Self { lookup }
    }

    /// Collects the obligations of `root`.
    ///
    /// Constructors come first in declaration order, followed by methods
    /// ordered by declaring depth, name and erased parameter types.
    ///
    /// # Errors
    /// Returns `CodegenError::NotGeneratable` for roots that cannot be
    /// implemented, `CodegenError::Conflict` for irreconcilable inherited
    /// declarations and `CodegenError::NoAccessibleConstructor` when no
    /// superclass constructor can be invoked.
    pub fn collect(&self, root: &TypeModel) -> Result<Vec<Obligation>, CodegenError> {
        check_root(root)?;

        let mut obligations: Vec<Obligation> = constructor_obligations(root)?
            .into_iter()
            .map(Obligation::Constructor)
            .collect();

        let nodes = traverse(root);
        let ancestors = ancestor_sets(&nodes);
        let groups = group_declarations(&nodes, &root.erasure_scope());

        let mut methods = Vec::new();
        for (key, declarations) in &groups {
            if let Some(method) = self.resolve_signature(root, key, declarations, &ancestors)? {
                let order: Vec<String> = key.1.iter().map(ToString::to_string).collect();
                methods.push(((method.depth, key.0.clone(), order), method));
            }
        }
        methods.sort_by(|a, b| a.0.cmp(&b.0));
        obligations.extend(methods.into_iter().map(|(_, m)| Obligation::Method(m)));
        Ok(obligations)
    }

    fn resolve_signature(
        &self,
        root: &TypeModel,
        key: &SignatureKey,
        declarations: &[Declaration],
        ancestors: &HashMap<QualifiedName, HashSet<QualifiedName>>,
    ) -> Result<Option<MethodObligation>, CodegenError> {
        let closest_class = declarations
            .iter()
            .filter(|d| d.class_chain)
            .min_by_key(|d| d.depth);
        match closest_class {
            Some(decl) if !decl.signature.is_abstract => return Ok(None),
            None if is_object_method(key) => return Ok(None),
            _ => {}
        }

        let interface_decls: Vec<&Declaration> =
            declarations.iter().filter(|d| !d.class_chain).collect();
        let most_specific: Vec<&Declaration> = interface_decls
            .iter()
            .copied()
            .filter(|d| {
                !interface_decls.iter().any(|other| {
                    other.declared_in != d.declared_in
                        && ancestors
                            .get(&other.declared_in)
                            .is_some_and(|set| set.contains(&d.declared_in))
                })
            })
            .collect();

        if closest_class.is_none()
            && most_specific.len() == 1
            && !most_specific[0].signature.is_abstract
        {
            return Ok(None);
        }

        let candidates: Vec<&Declaration> = closest_class.into_iter().chain(most_specific).collect();
        let Some(base) = candidates.first().copied() else {
            return Ok(None);
        };
        check_visibility(root, &candidates)?;

        let method = describe(key);
        let subtyping = Subtyping::new(self.lookup)
            .with_parameters(&root.type_parameters)
            .with_parameters(&base.signature.type_parameters);
        let aligned: Vec<(TypeRef, Vec<TypeRef>)> = candidates
            .iter()
            .map(|c| {
                let (ret, throws) = align(&base.signature, &c.signature);
                (ret, checked_only(&subtyping, throws))
            })
            .collect();

        let resolved_return_type = aligned
            .iter()
            .map(|(ret, _)| ret)
            .find(|ret| {
                aligned
                    .iter()
                    .all(|(other, _)| subtyping.is_subtype(ret, other))
            })
            .cloned()
            .ok_or_else(|| {
                let returns: Vec<String> = aligned.iter().map(|(r, _)| r.to_string()).collect();
                CodegenError::conflict(
                    &method,
                    format!("incompatible return types {}", returns.join(", ")),
                )
            })?;

        for (i, (_, left)) in aligned.iter().enumerate() {
            for (_, right) in aligned.iter().skip(i + 1) {
                if !covers(&subtyping, left, right) && !covers(&subtyping, right, left) {
                    return Err(CodegenError::conflict(
                        &method,
                        format!(
                            "incompatible throws clauses [{}] and [{}]",
                            render_list(left),
                            render_list(right)
                        ),
                    ));
                }
            }
        }
        let resolved_throws = aligned
            .iter()
            .map(|(_, throws)| throws)
            .find(|throws| {
                aligned
                    .iter()
                    .all(|(_, other)| covers(&subtyping, throws, other))
            })
            .cloned()
            .ok_or_else(|| CodegenError::conflict(&method, "no common throws clause"))?;

        let access = candidates
            .iter()
            .map(|c| c.signature.access)
            .max()
            .unwrap_or_default();

        Ok(Some(MethodObligation {
            signature: base.signature.clone(),
            resolved_return_type,
            resolved_throws,
            access,
            depth: base.depth,
        }))
    }
}

fn check_root(root: &TypeModel) -> Result<(), CodegenError> {
    let name = root.qualified_name.as_str();
    if root.kind == TypeKind::Class {
        return Err(CodegenError::not_generatable(name, "it is a concrete class"));
    }
    if root.is_final {
        return Err(CodegenError::not_generatable(name, "it is final"));
    }
    if !root.is_accessible() {
        return Err(CodegenError::not_generatable(name, "it is private"));
    }
    Ok(())
}

/// Breadth-first walk; each type is visited once, at its shallowest depth.
fn traverse(root: &TypeModel) -> Vec<Node<'_>> {
    let mut nodes = vec![Node {
        model: root,
        subst: Substitution::new(),
        raw: false,
        depth: 0,
        class_chain: !root.is_interface(),
    }];
    let mut seen: HashSet<QualifiedName> = HashSet::from([root.qualified_name.clone()]);

    let mut next = 0;
    while next < nodes.len() {
        let model = nodes[next].model;
        let depth = nodes[next].depth;
        let raw = nodes[next].raw;
        let class_chain = nodes[next].class_chain;
        let subst = nodes[next].subst.clone();

        let supertypes = model
            .superclass
            .iter()
            .map(|s| (s, class_chain))
            .chain(model.interfaces.iter().map(|s| (s, false)));
        for (supertype, on_chain) in supertypes {
            let target = supertype.model.as_ref();
            if !seen.insert(target.qualified_name.clone()) {
                continue;
            }
            let child_raw = raw || supertype.is_raw();
            let child_subst = if child_raw {
                target.substitution_for(&ClassRef::new(target.qualified_name.clone()))
            } else {
                supertype
                    .substitution()
                    .into_iter()
                    .map(|(param, arg)| (param, arg.substitute(&subst)))
                    .collect()
            };
            nodes.push(Node {
                model: target,
                subst: child_subst,
                raw: child_raw,
                depth: depth + 1,
                class_chain: on_chain,
            });
        }
        next += 1;
    }
    nodes
}

fn ancestor_sets(nodes: &[Node<'_>]) -> HashMap<QualifiedName, HashSet<QualifiedName>> {
    let mut memo = HashMap::new();
    for node in nodes {
        ancestors_of(node.model, &mut memo);
    }
    memo
}

fn ancestors_of(
    model: &TypeModel,
    memo: &mut HashMap<QualifiedName, HashSet<QualifiedName>>,
) -> HashSet<QualifiedName> {
    if let Some(found) = memo.get(&model.qualified_name) {
        return found.clone();
    }
    let mut set = HashSet::new();
    for supertype in model.supertypes() {
        set.insert(supertype.model.qualified_name.clone());
        set.extend(ancestors_of(&supertype.model, memo));
    }
    memo.insert(model.qualified_name.clone(), set.clone());
    set
}

fn group_declarations(
    nodes: &[Node<'_>],
    scope: &ErasureScope,
) -> Vec<(SignatureKey, Vec<Declaration>)> {
    let mut groups: Vec<(SignatureKey, Vec<Declaration>)> = Vec::new();
    let mut index: HashMap<SignatureKey, usize> = HashMap::new();

    for node in nodes {
        for method in &node.model.methods {
            // Never inherited, never overridden.
            if method.is_static || method.access == Access::Private {
                continue;
            }
            let signature = method.substitute(&node.subst);
            let key = (signature.name.clone(), signature.erased_parameters(scope));
            let declaration = Declaration {
                signature,
                declared_in: node.model.qualified_name.clone(),
                depth: node.depth,
                class_chain: node.class_chain,
            };
            match index.get(&key) {
                Some(&idx) => groups[idx].1.push(declaration),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, vec![declaration]));
                }
            }
        }
    }
    groups
}

/// Public methods of `java.lang.Object` that every class inherits.
fn is_object_method(key: &SignatureKey) -> bool {
    match key.0.as_str() {
        "equals" => key.1.len() == 1 && key.1[0].is_object(),
        "hashCode" | "toString" => key.1.is_empty(),
        _ => false,
    }
}

fn check_visibility(root: &TypeModel, candidates: &[&Declaration]) -> Result<(), CodegenError> {
    let package = root.qualified_name.package();
    for candidate in candidates {
        let signature = &candidate.signature;
        if signature.is_abstract
            && signature.access == Access::Package
            && signature.owner.package() != package
        {
            return Err(CodegenError::not_generatable(
                root.qualified_name.as_str(),
                format!(
                    "package-private abstract method '{}' of '{}' cannot be overridden from package '{}'",
                    signature.name, signature.owner, package
                ),
            ));
        }
    }
    Ok(())
}

/// Renames the method type parameters of `other` to those of `base`.
fn align(base: &MethodSignature, other: &MethodSignature) -> (TypeRef, Vec<TypeRef>) {
    if base.type_parameters.is_empty() || base.type_parameters.len() != other.type_parameters.len()
    {
        return (other.return_type.clone(), other.declared_throws.clone());
    }
    let renaming: Substitution = other
        .type_parameters
        .iter()
        .zip(&base.type_parameters)
        .map(|(from, to)| (from.name.clone(), TypeRef::variable(to.name.clone())))
        .collect();
    (
        other.return_type.substitute(&renaming),
        other
            .declared_throws
            .iter()
            .map(|t| t.substitute(&renaming))
            .collect(),
    )
}

fn constructor_obligations(root: &TypeModel) -> Result<Vec<ConstructorObligation>, CodegenError> {
    if root.kind != TypeKind::AbstractClass {
        return Ok(Vec::new());
    }
    let no_constructor = || CodegenError::NoAccessibleConstructor {
        name: root.qualified_name.to_string(),
    };

    if !root.constructors.is_empty() {
        let forwarded: Vec<ConstructorObligation> = root
            .accessible_constructors()
            .cloned()
            .map(|signature| ConstructorObligation { signature })
            .collect();
        if forwarded.is_empty() {
            return Err(no_constructor());
        }
        return Ok(forwarded);
    }

    // The root's implicit constructor calls `super()`.
    let package = root.qualified_name.package();
    let mut current = root.superclass.as_ref().map(|s| &s.model);
    while let Some(model) = current {
        if !model.constructors.is_empty() {
            let callable = model.constructors.iter().any(|c| {
                let no_args = c.arity() == 0 || (c.arity() == 1 && c.varargs);
                let visible = match c.access {
                    Access::Public | Access::Protected => true,
                    Access::Package => model.qualified_name.package() == package,
                    Access::Private => false,
                };
                no_args && visible
            });
            return if callable {
                Ok(Vec::new())
            } else {
                Err(no_constructor())
            };
        }
        current = model.superclass.as_ref().map(|s| &s.model);
    }
    Ok(Vec::new())
}

/// Drops unchecked exceptions, which never constrain an override.
fn checked_only(subtyping: &Subtyping<'_>, throws: Vec<TypeRef>) -> Vec<TypeRef> {
    let unchecked = [
        TypeRef::class(RUNTIME_EXCEPTION),
        TypeRef::class(ERROR),
    ];
    throws
        .into_iter()
        .filter(|e| !unchecked.iter().any(|u| subtyping.is_subtype(e, u)))
        .collect()
}

/// True if every exception in `narrow` is a subtype of one in `wide`.
fn covers(subtyping: &Subtyping<'_>, narrow: &[TypeRef], wide: &[TypeRef]) -> bool {
    narrow
        .iter()
        .all(|e| wide.iter().any(|w| subtyping.is_subtype(e, w)))
}

fn render_list(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(key: &SignatureKey) -> String {
    format!("{}({})", key.0, render_list(&key.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use implgen_schema::Resolver;

    fn collect_from(resolver: &Resolver, name: &str) -> Result<Vec<Obligation>, CodegenError> {
        let root = resolver
            .resolve(&QualifiedName::new(name))
            .expect("root must resolve");
        ObligationCollector::new(resolver).collect(&root)
    }

    fn collect_xml(xml: &str, name: &str) -> Result<Vec<Obligation>, CodegenError> {
        let resolver = Resolver::from_xml(xml).expect("fixture must parse");
        collect_from(&resolver, name)
    }

    fn collect_stdlib(name: &str) -> Vec<Obligation> {
        let resolver = Resolver::standard_library().unwrap();
        collect_from(&resolver, name).expect("collection must succeed")
    }

    fn methods(obligations: &[Obligation]) -> Vec<String> {
        obligations
            .iter()
            .filter_map(Obligation::as_method)
            .map(|m| {
                let params: Vec<String> = m
                    .signature
                    .parameter_types
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                format!("{}({})", m.name(), params.join(", "))
            })
            .collect()
    }

    fn constructor_arities(obligations: &[Obligation]) -> Vec<usize> {
        obligations
            .iter()
            .filter_map(Obligation::as_constructor)
            .map(|c| c.signature.arity())
            .collect()
    }

    #[test]
    fn test_runnable() {
        let obligations = collect_stdlib("java.lang.Runnable");
        assert_eq!(methods(&obligations), vec!["run()"]);
        let run = obligations[0].as_method().unwrap();
        assert_eq!(run.resolved_return_type, TypeRef::Void);
        assert_eq!(run.access, Access::Public);
    }

    #[test]
    fn test_object_methods_satisfy_interfaces() {
        let obligations = collect_stdlib("java.util.Comparator");
        assert_eq!(methods(&obligations), vec!["compare(T, T)"]);
    }

    #[test]
    fn test_abstract_list_obligations_and_order() {
        let obligations = collect_stdlib("java.util.AbstractList");
        assert_eq!(constructor_arities(&obligations), vec![0]);
        assert!(obligations[0].as_constructor().is_some());
        assert_eq!(methods(&obligations), vec!["get(int)", "size()"]);
        let size = obligations[2].as_method().unwrap();
        assert_eq!(size.depth, 1);
    }

    #[test]
    fn test_class_chain_decides() {
        let obligations = collect_stdlib("java.io.InputStream");
        assert_eq!(methods(&obligations), vec!["read()"]);
        assert_eq!(
            obligations[1].as_method().unwrap().resolved_throws,
            vec![TypeRef::class("java.io.IOException")]
        );

        let obligations = collect_stdlib("java.io.Reader");
        assert_eq!(constructor_arities(&obligations), vec![0, 1]);
        assert_eq!(methods(&obligations), vec!["close()", "read(char[], int, int)"]);
    }

    #[test]
    fn test_abstract_redeclaration_of_object_methods() {
        let obligations = collect_stdlib("java.security.Permission");
        assert_eq!(constructor_arities(&obligations), vec![1]);
        assert_eq!(
            methods(&obligations),
            vec![
                "equals(java.lang.Object)",
                "getActions()",
                "hashCode()",
                "implies(java.security.Permission)"
            ]
        );
    }

    #[test]
    fn test_generic_arguments_are_substituted() {
        let xml = r#"<interface name="g.Parser">
    <extends type="java.util.function.Function&lt;java.lang.String, java.lang.Integer>"/>
</interface>"#;
        let obligations = collect_xml(xml, "g.Parser").unwrap();
        assert_eq!(methods(&obligations), vec!["apply(java.lang.String)"]);
        assert_eq!(
            obligations[0].as_method().unwrap().resolved_return_type,
            TypeRef::class("java.lang.Integer")
        );
    }

    #[test]
    fn test_raw_supertype_uses_erasure() {
        let xml = r#"<interface name="r.RawOrder"><extends type="java.lang.Comparable"/></interface>"#;
        let obligations = collect_xml(xml, "r.RawOrder").unwrap();
        assert_eq!(methods(&obligations), vec!["compareTo(java.lang.Object)"]);
    }

    #[test]
    fn test_diamond_keeps_narrowest_return_type() {
        let xml = r#"<types>
    <interface name="d.Source"><method name="value" returns="java.lang.Number"/></interface>
    <interface name="d.IntSource"><method name="value" returns="java.lang.Integer"/></interface>
    <interface name="d.Both">
        <extends type="d.Source"/>
        <extends type="d.IntSource"/>
    </interface>
</types>"#;
        let obligations = collect_xml(xml, "d.Both").unwrap();
        assert_eq!(obligations.len(), 1);
        assert_eq!(
            obligations[0].as_method().unwrap().resolved_return_type,
            TypeRef::class("java.lang.Integer")
        );
    }

    #[test]
    fn test_diamond_incompatible_return_types_conflict() {
        let xml = r#"<types>
    <interface name="d.Counted"><method name="value" returns="java.lang.Integer"/></interface>
    <interface name="d.Named"><method name="value" returns="java.lang.String"/></interface>
    <interface name="d.Both">
        <extends type="d.Counted"/>
        <extends type="d.Named"/>
    </interface>
</types>"#;
        let err = collect_xml(xml, "d.Both").unwrap_err();
        assert!(matches!(err, CodegenError::Conflict { ref method, .. } if method == "value()"));
    }

    #[test]
    fn test_throws_are_intersected() {
        let xml = r#"<types>
    <interface name="t.Narrow"><method name="open"><throws type="java.io.IOException"/></method></interface>
    <interface name="t.Wide"><method name="open"><throws type="java.lang.Exception"/></method></interface>
    <interface name="t.Silent"><method name="open"/></interface>
    <interface name="t.Both"><extends type="t.Narrow"/><extends type="t.Wide"/></interface>
    <interface name="t.All"><extends type="t.Both"/><extends type="t.Silent"/></interface>
</types>"#;
        let obligations = collect_xml(xml, "t.Both").unwrap();
        assert_eq!(
            obligations[0].as_method().unwrap().resolved_throws,
            vec![TypeRef::class("java.io.IOException")]
        );

        let obligations = collect_xml(xml, "t.All").unwrap();
        assert!(obligations[0].as_method().unwrap().resolved_throws.is_empty());
    }

    #[test]
    fn test_unordered_throws_conflict() {
        let xml = r#"<types>
    <interface name="t.Io"><method name="open"><throws type="java.io.IOException"/></method></interface>
    <interface name="t.Wait"><method name="open"><throws type="java.lang.InterruptedException"/></method></interface>
    <interface name="t.Both"><extends type="t.Io"/><extends type="t.Wait"/></interface>
</types>"#;
        assert!(matches!(
            collect_xml(xml, "t.Both").unwrap_err(),
            CodegenError::Conflict { .. }
        ));
    }

    #[test]
    fn test_unchecked_throws_do_not_conflict() {
        let xml = r#"<types>
    <interface name="u.Guarded"><method name="run"><throws type="java.lang.IllegalStateException"/></method></interface>
    <interface name="u.Io"><method name="run"><throws type="java.io.IOException"/></method></interface>
    <interface name="u.Fatal"><method name="run"><throws type="java.lang.Error"/></method></interface>
    <interface name="u.Mixed">
        <method name="run">
            <throws type="java.lang.UnsupportedOperationException"/>
            <throws type="java.io.IOException"/>
        </method>
    </interface>
    <interface name="u.Both"><extends type="u.Guarded"/><extends type="u.Io"/></interface>
    <interface name="u.All"><extends type="u.Both"/><extends type="u.Fatal"/></interface>
</types>"#;
        for name in ["u.Both", "u.All", "u.Guarded"] {
            let obligations = collect_xml(xml, name).unwrap();
            assert_eq!(methods(&obligations), vec!["run()"], "{name}");
            assert!(obligations[0].as_method().unwrap().resolved_throws.is_empty(), "{name}");
        }

        let obligations = collect_xml(xml, "u.Mixed").unwrap();
        assert_eq!(
            obligations[0].as_method().unwrap().resolved_throws,
            vec![TypeRef::class("java.io.IOException")]
        );
    }

    #[test]
    fn test_substituted_argument_is_not_captured_by_method_type_parameter() {
        let xml = r#"<types>
    <interface name="p.Bar">
        <typeParameter name="E"/>
        <method name="m"><typeParameter name="T"/><param type="E"/><param type="T"/></method>
    </interface>
    <interface name="p.Foo">
        <typeParameter name="T"/>
        <extends type="p.Bar&lt;T>"/>
    </interface>
</types>"#;
        let obligations = collect_xml(xml, "p.Foo").unwrap();
        assert_eq!(methods(&obligations), vec!["m(T, T0)"]);
        let method = obligations[0].as_method().unwrap();
        assert_eq!(method.signature.type_parameters[0].name, "T0");
    }

    #[test]
    fn test_single_default_satisfies_but_two_do_not() {
        let xml = r#"<types>
    <interface name="f.Left"><method name="greet" default="true"/></interface>
    <interface name="f.Right"><method name="greet" default="true"/></interface>
    <interface name="f.OnlyLeft"><extends type="f.Left"/></interface>
    <interface name="f.Both"><extends type="f.Left"/><extends type="f.Right"/></interface>
</types>"#;
        assert!(collect_xml(xml, "f.OnlyLeft").unwrap().is_empty());
        assert_eq!(methods(&collect_xml(xml, "f.Both").unwrap()), vec!["greet()"]);
    }

    #[test]
    fn test_method_type_parameters_align_positionally() {
        let xml = r#"<types>
    <interface name="m.A">
        <method name="wrap" returns="java.util.List&lt;T>"><typeParameter name="T"/><param type="T"/></method>
    </interface>
    <interface name="m.B">
        <method name="wrap" returns="java.util.List&lt;U>"><typeParameter name="U"/><param type="U"/></method>
    </interface>
    <interface name="m.C"><extends type="m.A"/><extends type="m.B"/></interface>
</types>"#;
        let obligations = collect_xml(xml, "m.C").unwrap();
        assert_eq!(obligations.len(), 1);
        assert_eq!(
            obligations[0].as_method().unwrap().resolved_return_type.to_string(),
            "java.util.List<T>"
        );
    }

    #[test]
    fn test_constructor_forwarding() {
        let xml = r#"<class name="c.Base" abstract="true">
    <constructor access="protected"><param type="int"/></constructor>
    <constructor access="public"><param type="int"/><param type="java.lang.String"/></constructor>
    <constructor access="private"><param type="long"/></constructor>
</class>"#;
        let obligations = collect_xml(xml, "c.Base").unwrap();
        assert_eq!(constructor_arities(&obligations), vec![1, 2]);
        let second = obligations[1].as_constructor().unwrap();
        assert_eq!(
            second.signature.parameter_types,
            vec![
                TypeRef::Primitive(implgen_core::PrimitiveType::Int),
                TypeRef::class("java.lang.String")
            ]
        );
    }

    #[test]
    fn test_no_accessible_constructor() {
        let xml = r#"<types>
    <class name="c.Sealed" abstract="true"><constructor access="private"/></class>
    <class name="c.Derived" abstract="true"><extends type="c.Sealed"/></class>
    <class name="p.Hidden" abstract="true"><constructor access="package"/></class>
    <class name="q.Outside" abstract="true"><extends type="p.Hidden"/></class>
    <class name="q.Implicit" abstract="true"/>
</types>"#;
        for name in ["c.Sealed", "c.Derived", "q.Outside"] {
            let err = collect_xml(xml, name).unwrap_err();
            assert!(
                matches!(err, CodegenError::NoAccessibleConstructor { .. }),
                "{name}: {err}"
            );
        }
        assert!(collect_xml(xml, "q.Implicit").unwrap().is_empty());
    }

    #[test]
    fn test_rejected_roots() {
        let xml = r#"<types>
    <class name="a.Concrete"/>
    <interface name="a.Hidden" access="private"/>
    <class name="p.Base" abstract="true">
        <constructor/>
        <method name="hook" abstract="true" access="package"/>
    </class>
    <class name="q.Derived" abstract="true"><extends type="p.Base"/></class>
</types>"#;
        for name in ["a.Concrete", "a.Hidden", "q.Derived"] {
            let err = collect_xml(xml, name).unwrap_err();
            assert!(matches!(err, CodegenError::NotGeneratable { .. }), "{name}: {err}");
        }
        assert_eq!(methods(&collect_xml(xml, "p.Base").unwrap()), vec!["hook()"]);
    }

    #[test]
    fn test_collection_is_deterministic() {
        let first = collect_stdlib("java.util.List");
        let second = collect_stdlib("java.util.List");
        assert_eq!(first, second);
        assert!(methods(&first).contains(&"get(int)".to_string()));
        assert!(!methods(&first).contains(&"sort(java.util.Comparator<? super E>)".to_string()));
        assert!(!methods(&first).iter().any(|m| m.starts_with("equals")));
    }
}
