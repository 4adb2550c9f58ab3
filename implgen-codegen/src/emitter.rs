//! Java source emission.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use implgen_core::{QualifiedName, TypeModel, TypeParameter, TypeRef, is_java_identifier};
use tempfile::NamedTempFile;

use crate::body::Body;
use crate::error::CodegenError;
use crate::obligations::{ConstructorObligation, MethodObligation, Obligation};

/// Suffix appended to the root's simple name.
pub const DEFAULT_TYPE_SUFFIX: &str = "Impl";

/// Extension of generated source files.
pub const DEFAULT_SOURCE_EXTENSION: &str = "java";

const INDENT: &str = "    ";

/// Renders a generated implementation as one Java compilation unit.
#[derive(Debug, Clone)]
pub struct SourceEmitter {
    type_suffix: String,
    source_extension: String,
}

impl Default for SourceEmitter {
    fn default() -> Self {
        Self {
            type_suffix: DEFAULT_TYPE_SUFFIX.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl SourceEmitter {
    /// Creates an emitter with the default suffix and extension.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the suffix of generated type names.
    #[must_use]
    pub fn with_type_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.type_suffix = suffix.into();
        self
    }

    /// Sets the extension of generated files.
    #[must_use]
    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    /// Returns the suffix of generated type names.
    #[must_use]
    pub fn type_suffix(&self) -> &str {
        &self.type_suffix
    }

    /// Returns the extension of generated files.
    #[must_use]
    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    /// Qualified name of the type generated for `root`.
    #[must_use]
    pub fn generated_name(&self, root: &QualifiedName) -> QualifiedName {
        root.sibling(&format!("{}{}", root.simple_name(), self.type_suffix))
    }

    /// File the generated type is written to under `output_dir`.
    #[must_use]
    pub fn target_path(&self, output_dir: &Path, generated: &QualifiedName) -> PathBuf {
        let mut path = output_dir.to_path_buf();
        for segment in generated.package_segments() {
            path.push(segment);
        }
        path.push(format!("{}.{}", generated.simple_name(), self.source_extension));
        path
    }

    /// Emits the implementation of `root`.
    ///
    /// # Arguments
    /// * `root` - Interface or abstract class being implemented
    /// * `obligations` - Members in collector order
    /// * `bodies` - One body per obligation
    /// * `output_dir` - Root of the output source tree
    ///
    /// # Returns
    /// The generated unit; nothing is written.
    ///
    /// # Errors
    /// Returns `CodegenError::Emission` if bodies do not match the
    /// obligations or a generated identifier is invalid.
    pub fn emit(
        &self,
        root: &TypeModel,
        obligations: &[Obligation],
        bodies: &[Body],
        output_dir: &Path,
    ) -> Result<GeneratedUnit, CodegenError> {
        if obligations.len() != bodies.len() {
            return Err(CodegenError::emission(format!(
                "{} obligations but {} bodies",
                obligations.len(),
                bodies.len()
            )));
        }

        let generated = self.generated_name(&root.qualified_name);
        let simple = generated.simple_name();
        check_identifier(simple)?;

        let mut output = String::new();
        let package = generated.package();
        if !package.is_empty() {
            output.push_str(&format!("package {};\n\n", package));
        }
        output.push_str(&format!("// Generated by implgen from {}.\n", root.qualified_name));

        let relationship = if root.is_interface() {
            "implements"
        } else {
            "extends"
        };
        output.push_str(&format!(
            "public class {}{} {} {} {{\n",
            simple,
            render_type_parameters(&root.type_parameters)?,
            relationship,
            root.self_reference()
        ));

        for (index, (obligation, body)) in obligations.iter().zip(bodies).enumerate() {
            if index > 0 {
                output.push('\n');
            }
            match (obligation, body) {
                (Obligation::Constructor(ctor), Body::ForwardToSuper { arity })
                    if *arity == ctor.signature.arity() =>
                {
                    output.push_str(&generate_constructor(simple, ctor)?);
                }
                (Obligation::Method(method), Body::Empty | Body::Return(_)) => {
                    output.push_str(&generate_method(method, body)?);
                }
                _ => {
                    return Err(CodegenError::emission(format!(
                        "body {:?} does not fit obligation #{}",
                        body, index
                    )));
                }
            }
        }
        output.push_str("}\n");

        let target_path = self.target_path(output_dir, &generated);
        Ok(GeneratedUnit {
            generated_type_name: generated,
            source_text: output,
            target_path,
        })
    }
}

fn generate_constructor(simple: &str, ctor: &ConstructorObligation) -> Result<String, CodegenError> {
    let signature = &ctor.signature;
    let mut output = String::new();
    output.push_str(&format!(
        "{}public {}({}){} {{\n",
        INDENT,
        simple,
        render_parameters(&signature.parameter_types, signature.varargs)?,
        render_throws(&signature.declared_throws)
    ));
    output.push_str(&format!(
        "{INDENT}{INDENT}super({});\n",
        argument_names(signature.arity()).join(", ")
    ));
    output.push_str(&format!("{}}}\n", INDENT));
    Ok(output)
}

fn generate_method(method: &MethodObligation, body: &Body) -> Result<String, CodegenError> {
    let signature = &method.signature;
    check_identifier(&signature.name)?;

    let mut output = String::new();
    output.push_str(&format!("{}@Override\n", INDENT));

    let mut head = String::new();
    if let Some(keyword) = method.access.keyword() {
        head.push_str(keyword);
        head.push(' ');
    }
    let type_parameters = render_type_parameters(&signature.type_parameters)?;
    if !type_parameters.is_empty() {
        head.push_str(&type_parameters);
        head.push(' ');
    }
    output.push_str(&format!(
        "{}{}{} {}({}){} {{\n",
        INDENT,
        head,
        method.resolved_return_type,
        signature.name,
        render_parameters(&signature.parameter_types, signature.varargs)?,
        render_throws(&method.resolved_throws)
    ));

    match (body, method.resolved_return_type.is_void()) {
        (Body::Empty, true) => {}
        (Body::Return(value), false) => {
            output.push_str(&format!("{INDENT}{INDENT}return {};\n", value.literal()));
        }
        _ => {
            return Err(CodegenError::emission(format!(
                "body {:?} does not fit return type {} of '{}'",
                body, method.resolved_return_type, signature.name
            )));
        }
    }
    output.push_str(&format!("{}}}\n", INDENT));
    Ok(output)
}

fn check_identifier(name: &str) -> Result<(), CodegenError> {
    if is_java_identifier(name) {
        Ok(())
    } else {
        Err(CodegenError::emission(format!(
            "'{}' is not a valid Java identifier",
            name
        )))
    }
}

fn render_type_parameters(params: &[TypeParameter]) -> Result<String, CodegenError> {
    if params.is_empty() {
        return Ok(String::new());
    }
    for param in params {
        check_identifier(&param.name)?;
    }
    let rendered: Vec<String> = params.iter().map(ToString::to_string).collect();
    Ok(format!("<{}>", rendered.join(", ")))
}

fn argument_names(arity: usize) -> Vec<String> {
    (0..arity).map(|i| format!("arg{i}")).collect()
}

fn render_parameters(types: &[TypeRef], varargs: bool) -> Result<String, CodegenError> {
    let mut rendered = Vec::with_capacity(types.len());
    for (i, ty) in types.iter().enumerate() {
        let is_last = i + 1 == types.len();
        let text = match ty {
            TypeRef::Array(element) if varargs && is_last => format!("{element}..."),
            _ if varargs && is_last => {
                return Err(CodegenError::emission(format!(
                    "variable-arity parameter of type {} is not an array",
                    ty
                )));
            }
            _ => ty.to_string(),
        };
        rendered.push(format!("{} arg{}", text, i));
    }
    Ok(rendered.join(", "))
}

fn render_throws(throws: &[TypeRef]) -> String {
    if throws.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = throws.iter().map(ToString::to_string).collect();
    format!(" throws {}", rendered.join(", "))
}

/// A rendered compilation unit and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Qualified name of the generated type.
    pub generated_type_name: QualifiedName,
    /// Complete Java source.
    pub source_text: String,
    /// Destination file.
    pub target_path: PathBuf,
}

impl GeneratedUnit {
    /// Writes the source to `target_path`, replacing any existing file.
    ///
    /// The text goes to a temporary file in the destination directory first
    /// and is renamed into place, so readers never observe a partial file.
    ///
    /// # Errors
    /// Returns `CodegenError::Write` if a directory or the file cannot be written.
    pub fn write(&self) -> Result<(), CodegenError> {
        let parent = self
            .target_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent).map_err(|e| CodegenError::write(parent, e))?;

        let mut file = NamedTempFile::new_in(parent).map_err(|e| CodegenError::write(parent, e))?;
        file.write_all(self.source_text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| CodegenError::write(&self.target_path, e))?;
        file.persist(&self.target_path)
            .map_err(|e| CodegenError::write(&self.target_path, e.error))?;

        tracing::trace!(
            "Wrote {} bytes to {}",
            self.source_text.len(),
            self.target_path.display()
        );
        Ok(())
    }
}
