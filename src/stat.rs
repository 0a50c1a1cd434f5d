//! Parsing of the one-line change-statistics summary printed by `git diff --stat`.
//!
//! This is the only place raw tool output is pattern-matched; everything past
//! this module works with [`DiffSummary`].

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::types::DiffSummary;

// Every clause must be present. `git` omits the insertions or deletions clause
// when that count is zero, and such lines do not match.
static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(\d+).*file[^\d]+(\d+).*insertion[^\d]+(\d+).*deletion")
        .expect("summary pattern is a valid regex")
});

/// Last non-empty line of a `--stat` report, which carries the totals.
#[must_use]
pub fn summary_line(stat_output: &str) -> Option<&str> {
    stat_output.lines().rev().find(|line| !line.trim().is_empty())
}

/// Parse `"<n> files changed, <n> insertions(+), <n> deletions(-)"`.
///
/// # Errors
///
/// Returns [`Error::ParseFailure`] when no files/insertions/deletions triple
/// is found in the line.
pub fn parse(line: &str) -> Result<DiffSummary> {
    let no_match = || Error::ParseFailure {
        line: line.to_string(),
    };

    let captures = SUMMARY_RE.captures(line).ok_or_else(no_match)?;
    let count = |index: usize| -> Result<u64> {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(no_match)
    };

    Ok(DiffSummary {
        files: count(1)?,
        insertions: count(2)?,
        deletions: count(3)?,
    })
}
