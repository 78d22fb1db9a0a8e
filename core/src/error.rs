//! Error types for pipeline option classification.
//!
//! Every failure is terminal for the current invocation: nothing is exported
//! once any of these is raised.

use thiserror::Error;

/// Exit status for a successful invocation.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status for an execution failure (any definition, scan, capacity,
/// configuration or export error).
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when the required definition argument is missing.
pub const EXIT_USAGE: i32 = 2;

/// Failure reported by an [`OptionScanner`](crate::OptionScanner) step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Letter is not part of the combined spec.
    #[error("illegal option -- {0}")]
    UnknownOption(char),
    /// Letter requires a value but the token sequence ended.
    #[error("option requires an argument -- {0}")]
    MissingValue(char),
}

/// Errors raised while parsing, validating, classifying or exporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipeoptsError {
    /// No arguments were supplied at all.
    #[error("usage: pipeopts optstring arg1 [, arg2, ... argN]")]
    Usage,

    #[error("option definition has length {length}; exceeds limit of {limit}")]
    DefinitionTooLong { length: usize, limit: usize },

    #[error("option definition has {count} groups; exceeds limit of {limit}")]
    TooManyGroups { count: usize, limit: usize },

    #[error("no option string given")]
    EmptyDefinition,

    #[error("option string in group {group} is empty")]
    EmptyGroupSpec { group: usize },

    #[error("option string contains whitespace: `{spec}'")]
    SpecContainsWhitespace { group: usize, spec: String },

    /// `group` is the index of the later of the two colliding groups.
    #[error("duplicate option `{letter}' in group {group}")]
    DuplicateOption { letter: char, group: usize },

    #[error("{0}")]
    UnrecognizedOrMissingArgument(#[from] ScanError),

    #[error("option string for group {group} has length {length}; exceeds limit of {limit}")]
    OptionStringTooLong {
        group: usize,
        length: usize,
        limit: usize,
    },

    #[error("residual arguments have length {length}; exceeds limit of {limit}")]
    ResidualTooLong { length: usize, limit: usize },

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PipeoptsError {
    /// Process exit status for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeopts_core::{EXIT_FAILURE, EXIT_USAGE, PipeoptsError};
    ///
    /// assert_eq!(PipeoptsError::Usage.exit_code(), EXIT_USAGE);
    /// assert_eq!(PipeoptsError::EmptyDefinition.exit_code(), EXIT_FAILURE);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            PipeoptsError::Usage => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

/// Convenience alias for results with [`PipeoptsError`].
pub type Result<T> = std::result::Result<T, PipeoptsError>;
