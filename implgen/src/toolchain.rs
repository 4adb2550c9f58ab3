//! Compile checks for generated sources.
//!
//! Generation never depends on a Java toolchain. This module exists so that
//! tests and callers can confirm a generated unit builds.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of compiling one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    /// True if the compiler exited successfully.
    pub success: bool,
    /// Compiler output, one line per entry.
    pub diagnostics: Vec<String>,
}

/// Something that can compile a Java source file.
pub trait Compiler {
    /// Compiles `source` with `classpath_extra` appended to the classpath.
    ///
    /// # Errors
    /// Returns an I/O error if the compiler cannot be run at all; a failed
    /// compilation is reported through [`CompileOutcome::success`].
    fn compile(&self, source: &Path, classpath_extra: &[PathBuf]) -> io::Result<CompileOutcome>;
}

/// The `javac` found on the `PATH`, or at an explicit location.
#[derive(Debug, Clone)]
pub struct Javac {
    program: PathBuf,
    major_version: u32,
}

impl Javac {
    /// Probes `javac -version` on the `PATH`.
    ///
    /// Returns `None` if no usable `javac` is installed.
    #[must_use]
    pub fn detect() -> Option<Self> {
        match Self::at("javac") {
            Ok(javac) => Some(javac),
            Err(e) => {
                tracing::debug!("No javac available: {}", e);
                None
            }
        }
    }

    /// Probes the compiler at `program`.
    ///
    /// # Errors
    /// Returns an I/O error if the program cannot be run or its version
    /// output is not recognized.
    pub fn at(program: impl Into<PathBuf>) -> io::Result<Self> {
        let program = program.into();
        let output = Command::new(&program).arg("-version").output()?;
        // JDK 8 prints the version on stderr, later releases on stdout.
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let major_version = Self::parse_version(&text).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unrecognized javac version output: {}", text.trim()),
            )
        })?;
        tracing::debug!("Found javac {} at {}", major_version, program.display());
        Ok(Self {
            program,
            major_version,
        })
    }

    /// Feature release of the compiler, e.g. 8 or 17.
    #[must_use]
    pub fn major_version(&self) -> u32 {
        self.major_version
    }

    /// Extracts the feature release from `javac -version` output.
    ///
    /// `javac 1.8.0_292` is release 8; `javac 17.0.2` is release 17.
    #[must_use]
    pub fn parse_version(output: &str) -> Option<u32> {
        let version = output
            .lines()
            .find_map(|line| line.trim().strip_prefix("javac "))?;
        let mut parts = version
            .trim()
            .split(|c: char| matches!(c, '.' | '_' | '-' | '+'));
        let first: u32 = parts.next()?.parse().ok()?;
        if first == 1 {
            parts.next()?.parse().ok()
        } else {
            Some(first)
        }
    }
}

impl Compiler for Javac {
    fn compile(&self, source: &Path, classpath_extra: &[PathBuf]) -> io::Result<CompileOutcome> {
        let classes = tempfile::tempdir()?;
        let package = package_of(&fs::read_to_string(source)?);

        let mut command = Command::new(&self.program);
        command.arg("-d").arg(classes.path());
        if !classpath_extra.is_empty() {
            command
                .arg("-cp")
                .arg(std::env::join_paths(classpath_extra).map_err(io::Error::other)?);
        }
        // Sources in java.* packages belong to java.base on modular JDKs.
        if self.major_version >= 9 && package.as_deref().is_some_and(|p| p.starts_with("java.")) {
            let root = source_root(source, package.as_deref().unwrap_or_default());
            let mut patch = OsString::from("java.base=");
            patch.push(root.as_os_str());
            command.arg("--patch-module").arg(patch);
        }
        command.arg(source);

        tracing::debug!("Compiling {} with javac {}", source.display(), self.major_version);
        let output = command.output()?;
        let diagnostics = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .map(str::to_string)
            .collect();
        Ok(CompileOutcome {
            success: output.status.success(),
            diagnostics,
        })
    }
}

/// Package named by the first `package` declaration of a compilation unit.
fn package_of(source_text: &str) -> Option<String> {
    source_text.lines().find_map(|line| {
        line.trim()
            .strip_prefix("package ")
            .and_then(|rest| rest.trim().strip_suffix(';'))
            .map(|name| name.trim().to_string())
    })
}

/// Directory that contains the package tree of `source`.
fn source_root(source: &Path, package: &str) -> PathBuf {
    let depth = package.split('.').filter(|s| !s.is_empty()).count();
    let mut root = source.parent().unwrap_or(Path::new(".")).to_path_buf();
    for _ in 0..depth {
        if !root.pop() {
            break;
        }
    }
    root
}
