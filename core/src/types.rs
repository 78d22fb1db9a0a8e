//! Data model shared by the parser, validator, classifier and exporters.
//!
//! All values here live for a single invocation. Nothing is cached between
//! calls; the only state that survives is whatever an
//! [`Exporter`](crate::Exporter) publishes.

use serde::{Deserialize, Serialize};

/// Character separating groups in a definition string.
pub const GROUP_SEPARATOR: char = '|';

/// Character marking that the preceding option letter takes a value.
pub const VALUE_MARKER: char = ':';

/// Default maximum definition length.
pub const DEFAULT_MAX_DEFINITION: usize = 256;
/// Default maximum length of a group accumulator or the residual string.
pub const DEFAULT_MAX_OPTION_STRING: usize = 2048;
/// Default maximum number of groups.
pub const DEFAULT_MAX_GROUPS: usize = 16;

/// Capacity limits. Each is an inclusive maximum: a length equal to the
/// limit is accepted, one past it is rejected.
///
/// # Examples
///
/// ```
/// use pipeopts_core::Limits;
///
/// let limits = Limits::default();
/// assert_eq!(limits.max_definition, 256);
/// assert_eq!(limits.max_option_string, 2048);
/// assert_eq!(limits.max_groups, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_definition: usize,
    pub max_option_string: usize,
    pub max_groups: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_definition: DEFAULT_MAX_DEFINITION,
            max_option_string: DEFAULT_MAX_OPTION_STRING,
            max_groups: DEFAULT_MAX_GROUPS,
        }
    }
}

/// How an option value is joined to its letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueStyle {
    /// `-ax`, `-a'hello world'`
    #[default]
    Attached,
    /// `-a x`, `-a 'hello world'`
    Separate,
}

/// Re-serialization settings for classified options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Single-quote values containing a space.
    pub quote_values: bool,
    pub value_style: ValueStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            quote_values: true,
            value_style: ValueStyle::Attached,
        }
    }
}

impl FormatOptions {
    /// Formats one classified option as it is appended to an accumulator,
    /// without the leading separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeopts_core::FormatOptions;
    ///
    /// let format = FormatOptions::default();
    /// assert_eq!(format.format_entry('v', None), "-v");
    /// assert_eq!(format.format_entry('o', Some("out.txt")), "-oout.txt");
    /// assert_eq!(format.format_entry('a', Some("hello world")), "-a'hello world'");
    /// ```
    pub fn format_entry(&self, letter: char, value: Option<&str>) -> String {
        let mut entry = String::with_capacity(2 + value.map_or(0, |v| v.len() + 3));
        entry.push('-');
        entry.push(letter);

        if let Some(value) = value {
            if self.value_style == ValueStyle::Separate {
                entry.push(' ');
            }
            if self.quote_values && value.contains(' ') {
                entry.push('\'');
                entry.push_str(value);
                entry.push('\'');
            } else {
                entry.push_str(value);
            }
        }

        entry
    }
}

/// One group of a definition: its option letters and what was classified
/// into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Option letters, each optionally followed by [`VALUE_MARKER`].
    pub spec: String,
    /// Space-joined formatted options. Append-only during classification.
    pub options: String,
}

impl Group {
    /// Creates a group with an empty accumulator.
    pub fn new(spec: &str) -> Self {
        Self {
            spec: spec.to_string(),
            options: String::new(),
        }
    }

    /// Option letters declared by this group, markers excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeopts_core::Group;
    ///
    /// let group = Group::new("ab:c");
    /// assert_eq!(group.letters().collect::<String>(), "abc");
    /// ```
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.spec.chars().filter(|c| *c != VALUE_MARKER)
    }
}

/// Terminal artifact of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Groups in declaration order, with final accumulators.
    pub groups: Vec<Group>,
    /// Unconsumed tokens, space-joined.
    pub residual: String,
    /// Number of options the scanner recognized.
    #[serde(default)]
    pub option_count: usize,
}

impl ParseResult {
    /// Group accumulators in export order (last-declared group first).
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeopts_core::{Group, ParseResult};
    ///
    /// let mut first = Group::new("a");
    /// first.options.push_str("-a");
    /// let result = ParseResult {
    ///     groups: vec![first, Group::new("b")],
    ///     residual: String::new(),
    ///     option_count: 1,
    /// };
    /// assert_eq!(result.exported_groups(), vec!["", "-a"]);
    /// ```
    pub fn exported_groups(&self) -> Vec<&str> {
        self.groups
            .iter()
            .rev()
            .map(|group| group.options.as_str())
            .collect()
    }
}
