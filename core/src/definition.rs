//! Definition string parsing.
//!
//! Splits a raw definition such as `"vx:|n|o:"` on [`GROUP_SEPARATOR`] into
//! ordered [`Group`]s and builds the combined spec the scanner runs against.
//! Lengths are measured in bytes.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{PipeoptsError, Result};
use crate::types::{GROUP_SEPARATOR, Group, Limits, VALUE_MARKER};

/// A parsed, not yet validated, option definition.
///
/// # Examples
///
/// ```
/// use pipeopts_core::{Definition, Limits};
///
/// let definition = Definition::parse("vx:|n|o:", &Limits::default()).unwrap();
/// assert_eq!(definition.groups().len(), 3);
/// assert_eq!(definition.combined_spec(), "vx:no:");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    raw: String,
    groups: Vec<Group>,
    combined_spec: String,
}

impl Definition {
    /// Parses a raw definition string.
    ///
    /// A definition without separators yields a single group. Empty pieces
    /// are kept so that validation can report them by index.
    ///
    /// # Errors
    ///
    /// [`DefinitionTooLong`](PipeoptsError::DefinitionTooLong) if `raw` is
    /// longer than `limits.max_definition`, and
    /// [`TooManyGroups`](PipeoptsError::TooManyGroups) if it splits into more
    /// than `limits.max_groups` groups.
    pub fn parse(raw: &str, limits: &Limits) -> Result<Self> {
        if raw.len() > limits.max_definition {
            return Err(PipeoptsError::DefinitionTooLong {
                length: raw.len(),
                limit: limits.max_definition,
            });
        }

        let groups: Vec<Group> = raw.split(GROUP_SEPARATOR).map(Group::new).collect();
        if groups.len() > limits.max_groups {
            return Err(PipeoptsError::TooManyGroups {
                count: groups.len(),
                limit: limits.max_groups,
            });
        }

        let combined_spec = groups.iter().map(|g| g.spec.as_str()).collect::<String>();

        debug!(optdef = raw, optstr = %combined_spec, groups = groups.len(), "parsed option definition");

        Ok(Self {
            raw: raw.to_string(),
            groups,
            combined_spec,
        })
    }

    /// The definition string as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Concatenation of all group specs, separators removed.
    pub fn combined_spec(&self) -> &str {
        &self.combined_spec
    }

    /// Consumes the definition, returning its groups for classification.
    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }

    /// Builds the scanner alphabet.
    ///
    /// Every letter maps to the first group declaring it. Whether a letter
    /// takes a value is decided on the combined spec, because that is the
    /// string the scanner sees: a marker opening a group binds to the last
    /// letter of the group before it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeopts_core::{Definition, Limits};
    ///
    /// let definition = Definition::parse("ab:|c", &Limits::default()).unwrap();
    /// let alphabet = definition.alphabet();
    /// assert_eq!(alphabet.lookup('b').map(|l| (l.group, l.takes_value)), Some((0, true)));
    /// assert_eq!(alphabet.lookup('c').map(|l| l.group), Some(1));
    /// assert!(alphabet.lookup('z').is_none());
    /// ```
    pub fn alphabet(&self) -> Alphabet {
        let combined: Vec<char> = self.combined_spec.chars().collect();
        let mut letters = HashMap::new();
        let mut pos = 0;

        for (index, group) in self.groups.iter().enumerate() {
            for c in group.spec.chars() {
                pos += 1;
                if c == VALUE_MARKER {
                    continue;
                }
                let takes_value = combined.get(pos) == Some(&VALUE_MARKER);
                letters.entry(c).or_insert(Letter {
                    group: index,
                    takes_value,
                });
            }
        }

        Alphabet { letters }
    }
}

/// Owner and arity of one option letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letter {
    /// Index of the owning group.
    pub group: usize,
    pub takes_value: bool,
}

/// The set of letters a scanner accepts, each resolved to its group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    letters: HashMap<char, Letter>,
}

impl Alphabet {
    pub fn lookup(&self, letter: char) -> Option<Letter> {
        self.letters.get(&letter).copied()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits::default()
    }

    #[test]
    fn test_no_separator_yields_one_group() {
        let definition = Definition::parse("abc", &limits()).unwrap();
        assert_eq!(definition.groups(), &[Group::new("abc")]);
        assert_eq!(definition.combined_spec(), "abc");
        assert_eq!(definition.raw(), "abc");
    }

    #[test]
    fn test_empty_pieces_are_kept() {
        let definition = Definition::parse("a||b", &limits()).unwrap();
        let specs: Vec<&str> = definition.groups().iter().map(|g| g.spec.as_str()).collect();
        assert_eq!(specs, vec!["a", "", "b"]);
        assert_eq!(definition.combined_spec(), "ab");

        let definition = Definition::parse("", &limits()).unwrap();
        assert_eq!(definition.groups(), &[Group::new("")]);
    }

    #[test]
    fn test_definition_length_limit_is_inclusive() {
        let at_limit = "a".repeat(256);
        assert!(Definition::parse(&at_limit, &limits()).is_ok());

        let over = "a".repeat(257);
        assert_eq!(
            Definition::parse(&over, &limits()),
            Err(PipeoptsError::DefinitionTooLong {
                length: 257,
                limit: 256
            })
        );
    }

    #[test]
    fn test_group_count_limit() {
        let sixteen = vec!["a"; 16].join("|");
        assert!(Definition::parse(&sixteen, &limits()).is_ok());

        let seventeen = vec!["a"; 17].join("|");
        assert_eq!(
            Definition::parse(&seventeen, &limits()),
            Err(PipeoptsError::TooManyGroups {
                count: 17,
                limit: 16
            })
        );
    }

    #[test]
    fn test_alphabet_first_group_wins() {
        // Validation rejects this, but the lookup rule must still be explicit.
        let definition = Definition::parse("ab|b:c", &limits()).unwrap();
        let alphabet = definition.alphabet();
        assert_eq!(
            alphabet.lookup('b'),
            Some(Letter {
                group: 0,
                takes_value: false
            })
        );
        assert_eq!(alphabet.lookup('c').map(|l| l.group), Some(1));
        assert_eq!(alphabet.len(), 3);
    }

    #[test]
    fn test_leading_marker_binds_to_previous_group() {
        let definition = Definition::parse("a|:b", &limits()).unwrap();
        let alphabet = definition.alphabet();
        assert_eq!(alphabet.lookup('a').map(|l| l.takes_value), Some(true));
        assert_eq!(alphabet.lookup('b').map(|l| l.takes_value), Some(false));
        assert!(alphabet.lookup(':').is_none());
    }

    #[test]
    fn test_alphabet_excludes_markers() {
        let definition = Definition::parse("a:|:b", &limits()).unwrap();
        let alphabet = definition.alphabet();
        assert_eq!(alphabet.len(), 2);
        assert!(!alphabet.is_empty());
    }
}
