//! Option classification and residual collection.
//!
//! The classifier drives an [`OptionScanner`] to exhaustion, resolves each
//! recognized letter through the [`Alphabet`] and streams it into the
//! accumulator of the group that declared it.
//! Tokens the scanner leaves behind are joined into the residual string.

use tracing::trace;

use crate::definition::Alphabet;
use crate::error::{PipeoptsError, Result, ScanError};
use crate::scanner::OptionScanner;
use crate::types::{FormatOptions, Group, Limits};

/// Routes scanned options into group accumulators.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    format: FormatOptions,
    max_option_string: usize,
}

impl Classifier {
    pub fn new(format: FormatOptions, limits: &Limits) -> Self {
        Self {
            format,
            max_option_string: limits.max_option_string,
        }
    }

    /// Runs the scanner until options are exhausted.
    ///
    /// Each letter goes to the group `alphabet` resolves it to. A letter the
    /// alphabet does not know, or one resolved to a group outside `groups`,
    /// is reported as an unknown option.
    ///
    /// Returns the number of options classified. Any scan or capacity error
    /// aborts immediately; accumulators are then in an unspecified partial
    /// state and must not be exported.
    pub fn classify<S: OptionScanner>(
        &self,
        alphabet: &Alphabet,
        groups: &mut [Group],
        scanner: &mut S,
    ) -> Result<usize> {
        let mut count = 0;

        while let Some(opt) = scanner.next_option()? {
            let index = alphabet
                .lookup(opt.letter)
                .map(|letter| letter.group)
                .ok_or(ScanError::UnknownOption(opt.letter))?;
            let entry = self.format.format_entry(opt.letter, opt.value.as_deref());
            trace!(letter = %opt.letter, group = index, entry = %entry, "classified option");
            self.append(groups, index, opt.letter, &entry)?;
            count += 1;
        }

        Ok(count)
    }

    fn append(&self, groups: &mut [Group], index: usize, letter: char, entry: &str) -> Result<()> {
        let Some(group) = groups.get_mut(index) else {
            return Err(ScanError::UnknownOption(letter).into());
        };
        let separator = usize::from(!group.options.is_empty());
        let length = group.options.len() + separator + entry.len();

        if length > self.max_option_string {
            return Err(PipeoptsError::OptionStringTooLong {
                group: index,
                length,
                limit: self.max_option_string,
            });
        }

        if separator == 1 {
            group.options.push(' ');
        }
        group.options.push_str(entry);
        Ok(())
    }
}

/// Joins unconsumed tokens with single spaces.
///
/// # Examples
///
/// ```
/// use pipeopts_core::collect_residual;
///
/// let tokens = vec!["foo".to_string(), "bar".to_string()];
/// assert_eq!(collect_residual(&tokens, 2048).unwrap(), "foo bar");
/// assert!(collect_residual(&tokens, 6).is_err());
/// ```
pub fn collect_residual(tokens: &[String], limit: usize) -> Result<String> {
    let mut residual = String::new();

    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            residual.push(' ');
        }
        residual.push_str(token);

        if residual.len() > limit {
            let length = tokens.iter().map(String::len).sum::<usize>() + tokens.len() - 1;
            return Err(PipeoptsError::ResidualTooLong { length, limit });
        }
    }

    Ok(residual)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::definition::Definition;
    use crate::scanner::RecognizedOption;
    use crate::types::ValueStyle;

    /// Replays a fixed sequence of scanner results.
    struct ScriptedScanner {
        steps: VecDeque<std::result::Result<RecognizedOption, ScanError>>,
        rest: Vec<String>,
    }

    impl ScriptedScanner {
        fn new(steps: Vec<std::result::Result<RecognizedOption, ScanError>>) -> Self {
            Self {
                steps: steps.into(),
                rest: Vec::new(),
            }
        }
    }

    impl OptionScanner for ScriptedScanner {
        fn next_option(&mut self) -> std::result::Result<Option<RecognizedOption>, ScanError> {
            self.steps.pop_front().transpose()
        }

        fn remaining(&self) -> &[String] {
            &self.rest
        }
    }

    fn opt(letter: char, value: Option<&str>) -> RecognizedOption {
        RecognizedOption {
            letter,
            value: value.map(String::from),
        }
    }

    fn parse(definition: &str) -> (Alphabet, Vec<Group>) {
        let definition = Definition::parse(definition, &Limits::default()).unwrap();
        (definition.alphabet(), definition.into_groups())
    }

    #[test]
    fn test_options_land_in_owning_group_in_order() {
        let (alphabet, mut groups) = parse("ab:|c");
        let mut scanner = ScriptedScanner::new(vec![
            Ok(opt('a', None)),
            Ok(opt('c', None)),
            Ok(opt('b', Some("x"))),
            Ok(opt('a', None)),
        ]);
        let classifier = Classifier::new(FormatOptions::default(), &Limits::default());

        let count = classifier.classify(&alphabet, &mut groups, &mut scanner).unwrap();
        assert_eq!(count, 4);
        assert_eq!(groups[0].options, "-a -bx -a");
        assert_eq!(groups[1].options, "-c");
    }

    #[test]
    fn test_quoting_follows_format_options() {
        let (alphabet, mut quoted) = parse("a:");
        let classifier = Classifier::new(FormatOptions::default(), &Limits::default());
        let mut scanner = ScriptedScanner::new(vec![Ok(opt('a', Some("hello world")))]);
        classifier.classify(&alphabet, &mut quoted, &mut scanner).unwrap();
        assert_eq!(quoted[0].options, "-a'hello world'");

        let (_, mut separate) = parse("a:");
        let classifier = Classifier::new(
            FormatOptions {
                quote_values: false,
                value_style: ValueStyle::Separate,
            },
            &Limits::default(),
        );
        let mut scanner = ScriptedScanner::new(vec![Ok(opt('a', Some("hello world")))]);
        classifier.classify(&alphabet, &mut separate, &mut scanner).unwrap();
        assert_eq!(separate[0].options, "-a hello world");
    }

    #[test]
    fn test_scan_failure_aborts() {
        let (alphabet, mut groups) = parse("a");
        let mut scanner = ScriptedScanner::new(vec![
            Ok(opt('a', None)),
            Err(ScanError::UnknownOption('z')),
            Ok(opt('a', None)),
        ]);
        let classifier = Classifier::new(FormatOptions::default(), &Limits::default());
        assert_eq!(
            classifier.classify(&alphabet, &mut groups, &mut scanner),
            Err(PipeoptsError::UnrecognizedOrMissingArgument(
                ScanError::UnknownOption('z')
            ))
        );
    }

    #[test]
    fn test_accumulator_limit_is_inclusive() {
        let limits = Limits {
            max_option_string: 5,
            ..Limits::default()
        };
        let classifier = Classifier::new(FormatOptions::default(), &limits);

        // "-a -b" is exactly five bytes.
        let (alphabet, mut fits) = parse("ab");
        let mut scanner = ScriptedScanner::new(vec![Ok(opt('a', None)), Ok(opt('b', None))]);
        classifier.classify(&alphabet, &mut fits, &mut scanner).unwrap();
        assert_eq!(fits[0].options, "-a -b");

        let (alphabet, mut over) = parse("x|ab");
        let mut scanner = ScriptedScanner::new(vec![
            Ok(opt('a', None)),
            Ok(opt('b', None)),
            Ok(opt('a', None)),
        ]);
        assert_eq!(
            classifier.classify(&alphabet, &mut over, &mut scanner),
            Err(PipeoptsError::OptionStringTooLong {
                group: 1,
                length: 8,
                limit: 5
            })
        );
    }

    #[test]
    fn test_group_comes_from_alphabet_lookup() {
        let (alphabet, mut groups) = parse("a|b");
        let mut scanner = ScriptedScanner::new(vec![
            Ok(opt('b', None)),
            Ok(opt('a', None)),
            Ok(opt('a', None)),
        ]);
        let classifier = Classifier::new(FormatOptions::default(), &Limits::default());

        assert_eq!(classifier.classify(&alphabet, &mut groups, &mut scanner), Ok(3));
        assert_eq!(groups[0].options, "-a -a");
        assert_eq!(groups[1].options, "-b");
    }

    #[test]
    fn test_letter_without_owner_is_unknown() {
        let (alphabet, mut groups) = parse("a");
        let mut scanner = ScriptedScanner::new(vec![Ok(opt('q', None))]);
        let classifier = Classifier::new(FormatOptions::default(), &Limits::default());

        assert_eq!(
            classifier.classify(&alphabet, &mut groups, &mut scanner),
            Err(PipeoptsError::UnrecognizedOrMissingArgument(
                ScanError::UnknownOption('q')
            ))
        );
        assert_eq!(groups[0].options, "");
    }

    #[test]
    fn test_alphabet_wider_than_groups_is_rejected() {
        let (alphabet, _) = parse("a|b|c");
        let (_, mut groups) = parse("a");
        let mut scanner = ScriptedScanner::new(vec![Ok(opt('a', None)), Ok(opt('c', None))]);
        let classifier = Classifier::new(FormatOptions::default(), &Limits::default());

        assert_eq!(
            classifier.classify(&alphabet, &mut groups, &mut scanner),
            Err(PipeoptsError::UnrecognizedOrMissingArgument(
                ScanError::UnknownOption('c')
            ))
        );
        assert_eq!(groups[0].options, "-a");
    }

    #[test]
    fn test_residual_join() {
        let tokens: Vec<String> = ["foo", "bar", "baz"].iter().map(|s| s.to_string()).collect();
        assert_eq!(collect_residual(&tokens, 2048).unwrap(), "foo bar baz");
        assert_eq!(collect_residual(&[], 2048).unwrap(), "");
        assert_eq!(collect_residual(&tokens, 11).unwrap(), "foo bar baz");
        assert_eq!(
            collect_residual(&tokens, 10),
            Err(PipeoptsError::ResidualTooLong {
                length: 11,
                limit: 10
            })
        );
    }

    #[test]
    fn test_residual_keeps_empty_tokens() {
        let tokens: Vec<String> = ["a", "", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(collect_residual(&tokens, 2048).unwrap(), "a  b");

        let tokens: Vec<String> = ["", "x"].iter().map(|s| s.to_string()).collect();
        assert_eq!(collect_residual(&tokens, 2048).unwrap(), " x");
    }
}
