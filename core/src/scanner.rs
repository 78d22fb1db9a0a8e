//! Single-letter option scanning.
//!
//! [`OptionScanner`] is the seam between classification and the getopt-style
//! primitive that recognizes options. [`GetoptScanner`] is the bundled
//! implementation; it follows POSIX getopt rules:
//!
//! - scanning stops at the first token not starting with `-`, or at a lone `-`
//! - a `--` token is consumed and ends scanning
//! - letters can be clustered (`-vx`)
//! - a value-taking letter uses the rest of its token, or else the next token
//!
//! # Examples
//!
//! ```
//! use pipeopts_core::*;
//!
//! let definition = Definition::parse("vo:", &Limits::default()).unwrap();
//! let alphabet = definition.alphabet();
//! let args: Vec<String> = ["-vofile", "rest"].iter().map(|s| s.to_string()).collect();
//! let mut scanner = GetoptScanner::new(&alphabet, &args);
//!
//! assert_eq!(scanner.next_option().unwrap().map(|o| o.letter), Some('v'));
//! let opt = scanner.next_option().unwrap().unwrap();
//! assert_eq!((opt.letter, opt.value.as_deref()), ('o', Some("file")));
//! assert!(scanner.next_option().unwrap().is_none());
//! assert_eq!(scanner.remaining(), &["rest".to_string()]);
//! ```

use crate::definition::Alphabet;
use crate::error::ScanError;

/// One option recognized by a scanner step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedOption {
    pub letter: char,
    pub value: Option<String>,
}

/// Yields one recognized option per call.
pub trait OptionScanner {
    /// Next option, `Ok(None)` once options are exhausted.
    fn next_option(&mut self) -> Result<Option<RecognizedOption>, ScanError>;

    /// Tokens not consumed as options or option values.
    fn remaining(&self) -> &[String];
}

/// getopt-style scanner over an [`Alphabet`].
#[derive(Debug)]
pub struct GetoptScanner<'a> {
    alphabet: &'a Alphabet,
    args: &'a [String],
    arg_pos: usize,
    /// Byte offset inside `args[arg_pos]`; zero between tokens.
    char_pos: usize,
    done: bool,
}

impl<'a> GetoptScanner<'a> {
    pub fn new(alphabet: &'a Alphabet, args: &'a [String]) -> Self {
        Self {
            alphabet,
            args,
            arg_pos: 0,
            char_pos: 0,
            done: false,
        }
    }

    fn advance_token(&mut self) {
        self.arg_pos += 1;
        self.char_pos = 0;
    }
}

impl OptionScanner for GetoptScanner<'_> {
    fn next_option(&mut self) -> Result<Option<RecognizedOption>, ScanError> {
        if self.done {
            return Ok(None);
        }

        let args = self.args;
        let Some(arg) = args.get(self.arg_pos) else {
            self.done = true;
            return Ok(None);
        };

        if self.char_pos == 0 {
            if arg == "--" {
                self.advance_token();
                self.done = true;
                return Ok(None);
            }
            if !arg.starts_with('-') || arg.len() == 1 {
                self.done = true;
                return Ok(None);
            }
            self.char_pos = 1;
        }

        let Some(letter) = arg[self.char_pos..].chars().next() else {
            self.done = true;
            return Ok(None);
        };
        self.char_pos += letter.len_utf8();
        let at_end = self.char_pos >= arg.len();

        let Some(entry) = self.alphabet.lookup(letter) else {
            return Err(ScanError::UnknownOption(letter));
        };

        if !entry.takes_value {
            if at_end {
                self.advance_token();
            }
            return Ok(Some(RecognizedOption {
                letter,
                value: None,
            }));
        }

        let value = if !at_end {
            let attached = arg[self.char_pos..].to_string();
            self.advance_token();
            attached
        } else {
            let Some(next) = args.get(self.arg_pos + 1) else {
                return Err(ScanError::MissingValue(letter));
            };
            let next = next.clone();
            self.arg_pos += 2;
            self.char_pos = 0;
            next
        };

        Ok(Some(RecognizedOption {
            letter,
            value: Some(value),
        }))
    }

    fn remaining(&self) -> &[String] {
        let start = if self.char_pos > 0 {
            // partly read cluster counts as consumed
            self.arg_pos + 1
        } else {
            self.arg_pos
        };
        &self.args[start.min(self.args.len())..]
    }
}
