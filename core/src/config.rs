//! Invocation configuration.
//!
//! Every field has a default, so an empty document is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! limits:
//!   max_definition: 256
//!   max_option_string: 2048
//!   max_groups: 16
//! export:
//!   options_var: PIPEOPTS
//!   residual_var: PIPEOPTSARG
//!   export_residual: true
//! format:
//!   quote_values: true
//!   value_style: attached
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipeoptsError, Result};
use crate::export::{DEFAULT_OPTIONS_VAR, DEFAULT_RESIDUAL_VAR, ExportNames};
use crate::types::{FormatOptions, Limits};

/// Where and whether results are exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub options_var: String,
    pub residual_var: String,
    /// Bind the residual string. When `false`, only the array is exported.
    pub export_residual: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            options_var: DEFAULT_OPTIONS_VAR.to_string(),
            residual_var: DEFAULT_RESIDUAL_VAR.to_string(),
            export_residual: true,
        }
    }
}

impl ExportConfig {
    pub fn names(&self) -> ExportNames {
        ExportNames {
            options_var: self.options_var.clone(),
            residual_var: self.residual_var.clone(),
        }
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use pipeopts_core::{PipeoptsConfig, ValueStyle};
///
/// let config: PipeoptsConfig = serde_yaml::from_str("format: { value_style: separate }").unwrap();
/// assert_eq!(config.format.value_style, ValueStyle::Separate);
/// assert!(config.format.quote_values);
/// assert_eq!(config.limits.max_groups, 16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeoptsConfig {
    pub limits: Limits,
    pub export: ExportConfig,
    pub format: FormatOptions,
}

impl PipeoptsConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Config`](PipeoptsError::Config) if the file cannot be read
    /// or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| {
            PipeoptsError::Config(format!("failed to open '{}': {err}", path.display()))
        })?;
        let config = serde_yaml::from_reader(BufReader::new(file)).map_err(|err| {
            PipeoptsError::Config(format!("failed to parse '{}': {err}", path.display()))
        })?;
        Ok(config)
    }
}
