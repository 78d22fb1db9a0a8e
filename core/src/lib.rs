//! Getopts for process pipelines.
//!
//! A single definition string such as `"vx:|n|o:"` declares the option
//! letters of several pipeline stages, one group per `|`-separated piece.
//! Command-line tokens are scanned getopt-style against all groups at once;
//! each recognized option is re-serialized into the string of the group that
//! declared it, and the tokens following the options are collected into one
//! residual string.
//!
//! - [`Definition`] — splits and measures the definition string.
//! - [`validate_groups`] — rejects empty groups, whitespace and letters
//!   declared by two groups.
//! - [`GetoptScanner`] — the bundled [`OptionScanner`].
//! - [`Classifier`] and [`collect_residual`] — build the per-group strings
//!   and the residual.
//! - [`Exporter`] — publishes the result ([`MemoryExporter`],
//!   [`ShellExporter`], [`StructuredExporter`]).
//!
//! # Example
//!
//! ```
//! use pipeopts_core::*;
//!
//! let args: Vec<String> = ["a:|b:", "-a", "x", "-b", "y", "foo", "bar"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let mut env = MemoryExporter::default();
//! invoke(&args, &PipeoptsConfig::default(), &mut env).unwrap();
//!
//! assert_eq!(
//!     env.get("PIPEOPTS"),
//!     Some(&Binding::Array(vec!["-by".into(), "-ax".into()]))
//! );
//! assert_eq!(env.get("PIPEOPTSARG"), Some(&Binding::Scalar("foo bar".into())));
//! ```

mod classify;
mod config;
mod definition;
mod error;
mod export;
mod scanner;
mod types;
mod validate;

use tracing::debug;

pub use classify::{Classifier, collect_residual};
pub use config::{ExportConfig, PipeoptsConfig};
pub use definition::{Alphabet, Definition, Letter};
pub use error::{EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE, PipeoptsError, Result, ScanError};
pub use export::{
    Binding, DEFAULT_OPTIONS_VAR, DEFAULT_RESIDUAL_VAR, ExportNames, Exporter, MemoryExporter,
    ShellExporter, StructuredExporter, StructuredFormat, shell_quote,
};
pub use scanner::{GetoptScanner, OptionScanner, RecognizedOption};
pub use types::*;
pub use validate::validate_groups;

/// Parses, validates and classifies without exporting.
///
/// # Errors
///
/// Any definition, scan or capacity error. Nothing is returned on failure.
pub fn run(definition: &str, tokens: &[String], config: &PipeoptsConfig) -> Result<ParseResult> {
    let definition = Definition::parse(definition, &config.limits)?;
    validate_groups(definition.groups())?;

    let alphabet = definition.alphabet();
    debug!(optdef = definition.raw(), letters = alphabet.len(), "built option alphabet");

    let mut groups = definition.into_groups();
    let mut scanner = GetoptScanner::new(&alphabet, tokens);

    let classifier = Classifier::new(config.format, &config.limits);
    let option_count = classifier.classify(&alphabet, &mut groups, &mut scanner)?;
    let residual = collect_residual(scanner.remaining(), config.limits.max_option_string)?;

    for (index, group) in groups.iter().enumerate() {
        debug!(group = index, spec = %group.spec, options = %group.options, "group");
    }
    debug!(options = option_count, optarg = %residual, "classified arguments");

    Ok(ParseResult {
        groups,
        residual,
        option_count,
    })
}

/// Runs one full invocation and publishes the result.
///
/// `args[0]` is the definition string, the rest are the tokens to classify.
/// The exporter is only called when everything before it succeeded.
///
/// # Errors
///
/// [`Usage`](PipeoptsError::Usage) when `args` is empty, otherwise any
/// error from [`run`] or from the exporter.
pub fn invoke<E: Exporter + ?Sized>(
    args: &[String],
    config: &PipeoptsConfig,
    exporter: &mut E,
) -> Result<ParseResult> {
    let Some((definition, tokens)) = args.split_first() else {
        return Err(PipeoptsError::Usage);
    };

    let result = run(definition, tokens, config)?;
    let residual = config
        .export
        .export_residual
        .then_some(result.residual.as_str());
    exporter.publish(&result.exported_groups(), residual)?;

    Ok(result)
}
