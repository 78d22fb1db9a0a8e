//! Definition validation.
//!
//! Runs to completion before any argument token is consumed. Checks are
//! applied in a fixed order and the first failure wins:
//!
//! 1. at least one group exists,
//! 2. each group, by index, is non-empty and free of whitespace,
//! 3. no option letter is declared by two groups.
//!
//! Value markers are not letters and never collide.
//!
//! # Examples
//!
//! ```
//! use pipeopts_core::*;
//!
//! let ok = Definition::parse("a:|:b", &Limits::default()).unwrap();
//! assert!(validate_groups(ok.groups()).is_ok());
//!
//! let dup = Definition::parse("ab|bc", &Limits::default()).unwrap();
//! assert_eq!(
//!     validate_groups(dup.groups()),
//!     Err(PipeoptsError::DuplicateOption { letter: 'b', group: 1 })
//! );
//! ```

use std::collections::HashSet;

use crate::error::{PipeoptsError, Result};
use crate::types::Group;

/// Validates a group sequence.
pub fn validate_groups(groups: &[Group]) -> Result<()> {
    if groups.is_empty() {
        return Err(PipeoptsError::EmptyDefinition);
    }

    for (index, group) in groups.iter().enumerate() {
        if group.spec.is_empty() {
            return Err(PipeoptsError::EmptyGroupSpec { group: index });
        }
        if group.spec.chars().any(char::is_whitespace) {
            return Err(PipeoptsError::SpecContainsWhitespace {
                group: index,
                spec: group.spec.clone(),
            });
        }
    }

    let declared: Vec<HashSet<char>> = groups.iter().map(|g| g.letters().collect()).collect();

    for (i, earlier) in declared.iter().enumerate() {
        for (j, later) in groups.iter().enumerate().skip(i + 1) {
            if let Some(letter) = later.letters().find(|c| earlier.contains(c)) {
                return Err(PipeoptsError::DuplicateOption { letter, group: j });
            }
        }
    }

    Ok(())
}
