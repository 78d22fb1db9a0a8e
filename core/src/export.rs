//! Publishing classified results to an external environment.
//!
//! An [`Exporter`] is called once, at the very end of a successful
//! invocation, with the group strings in export order (last-declared group
//! first) and, optionally, the residual string. Every exporter commits all
//! values at once or none of them.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{PipeoptsError, Result};

/// Default name of the group-strings array.
pub const DEFAULT_OPTIONS_VAR: &str = "PIPEOPTS";
/// Default name of the residual scalar.
pub const DEFAULT_RESIDUAL_VAR: &str = "PIPEOPTSARG";

/// Names the results are bound to.
///
/// # Examples
///
/// ```
/// use pipeopts_core::ExportNames;
///
/// let names = ExportNames::default();
/// assert_eq!(names.options_var, "PIPEOPTS");
/// assert_eq!(names.residual_var, "PIPEOPTSARG");
/// assert!(names.check().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNames {
    pub options_var: String,
    pub residual_var: String,
}

impl Default for ExportNames {
    fn default() -> Self {
        Self {
            options_var: DEFAULT_OPTIONS_VAR.to_string(),
            residual_var: DEFAULT_RESIDUAL_VAR.to_string(),
        }
    }
}

impl ExportNames {
    /// Rejects names that cannot be bound as shell variables.
    pub fn check(&self) -> Result<()> {
        for name in [&self.options_var, &self.residual_var] {
            if !is_identifier(name) {
                return Err(PipeoptsError::ExportFailed(format!(
                    "cannot create shell variable {name}"
                )));
            }
        }
        if self.options_var == self.residual_var {
            return Err(PipeoptsError::ExportFailed(format!(
                "options and residual share the name {}",
                self.options_var
            )));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Receives the final values of one invocation.
pub trait Exporter {
    /// Binds `groups` (export order) and, when given, `residual`.
    fn publish(&mut self, groups: &[&str], residual: Option<&str>) -> Result<()>;
}

/// A bound value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Array(Vec<String>),
    Scalar(String),
}

/// In-memory environment, for embedding and tests.
///
/// # Examples
///
/// ```
/// use pipeopts_core::{Binding, Exporter, MemoryExporter};
///
/// let mut env = MemoryExporter::default();
/// env.publish(&["-b", "-a"], Some("rest")).unwrap();
/// assert_eq!(
///     env.get("PIPEOPTS"),
///     Some(&Binding::Array(vec!["-b".into(), "-a".into()]))
/// );
/// assert_eq!(env.get("PIPEOPTSARG"), Some(&Binding::Scalar("rest".into())));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryExporter {
    names: ExportNames,
    bindings: BTreeMap<String, Binding>,
}

impl MemoryExporter {
    pub fn new(names: ExportNames) -> Self {
        Self {
            names,
            bindings: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn bindings(&self) -> &BTreeMap<String, Binding> {
        &self.bindings
    }
}

impl Exporter for MemoryExporter {
    fn publish(&mut self, groups: &[&str], residual: Option<&str>) -> Result<()> {
        self.names.check()?;

        let mut next = self.bindings.clone();
        next.remove(&self.names.options_var);
        next.remove(&self.names.residual_var);
        next.insert(
            self.names.options_var.clone(),
            Binding::Array(groups.iter().map(|g| g.to_string()).collect()),
        );
        if let Some(residual) = residual {
            next.insert(
                self.names.residual_var.clone(),
                Binding::Scalar(residual.to_string()),
            );
        }

        self.bindings = next;
        Ok(())
    }
}

/// Quotes a value for bash: single quotes, embedded quotes as `'\''`.
///
/// # Examples
///
/// ```
/// use pipeopts_core::shell_quote;
///
/// assert_eq!(shell_quote("-a'hello world'"), r"'-a'\''hello world'\'''");
/// assert_eq!(shell_quote(""), "''");
/// ```
pub fn shell_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Writes a bash snippet meant for `eval "$(pipeopts ...)"`.
///
/// The whole snippet is rendered first and written with a single call.
#[derive(Debug)]
pub struct ShellExporter<W: Write> {
    names: ExportNames,
    writer: W,
}

impl<W: Write> ShellExporter<W> {
    pub fn new(names: ExportNames, writer: W) -> Self {
        Self { names, writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(&self, groups: &[&str], residual: Option<&str>) -> String {
        let options = &self.names.options_var;
        let residual_var = &self.names.residual_var;

        let mut script = format!("unset {options} {residual_var}\n");
        let values: Vec<String> = groups.iter().map(|g| shell_quote(g)).collect();
        script.push_str(&format!("{options}=({})\n", values.join(" ")));
        if let Some(residual) = residual {
            script.push_str(&format!("{residual_var}={}\n", shell_quote(residual)));
        }
        script
    }
}

impl<W: Write> Exporter for ShellExporter<W> {
    fn publish(&mut self, groups: &[&str], residual: Option<&str>) -> Result<()> {
        self.names.check()?;
        let script = self.render(groups, residual);
        self.writer
            .write_all(script.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|err| PipeoptsError::ExportFailed(err.to_string()))
    }
}

/// Serialization format for [`StructuredExporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredFormat {
    Json,
    Yaml,
}

/// Writes the bindings as one JSON or YAML document.
#[derive(Debug)]
pub struct StructuredExporter<W: Write> {
    names: ExportNames,
    format: StructuredFormat,
    writer: W,
}

impl<W: Write> StructuredExporter<W> {
    pub fn new(names: ExportNames, format: StructuredFormat, writer: W) -> Self {
        Self {
            names,
            format,
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Exporter for StructuredExporter<W> {
    fn publish(&mut self, groups: &[&str], residual: Option<&str>) -> Result<()> {
        self.names.check()?;

        let mut document = BTreeMap::new();
        document.insert(
            self.names.options_var.as_str(),
            Binding::Array(groups.iter().map(|g| g.to_string()).collect()),
        );
        if let Some(residual) = residual {
            document.insert(
                self.names.residual_var.as_str(),
                Binding::Scalar(residual.to_string()),
            );
        }

        let mut raw = match self.format {
            StructuredFormat::Json => serde_json::to_string_pretty(&document)
                .map_err(|e| PipeoptsError::ExportFailed(format!("JSON serialization failed: {e}")))?,
            StructuredFormat::Yaml => serde_yaml::to_string(&document)
                .map_err(|e| PipeoptsError::ExportFailed(format!("YAML serialization failed: {e}")))?,
        };
        if !raw.ends_with('\n') {
            raw.push('\n');
        }

        self.writer
            .write_all(raw.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|err| PipeoptsError::ExportFailed(err.to_string()))
    }
}
