use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

use super::plain::{paint, ADDITIONS, DELETIONS, FILES, RULE_WIDTH, TOTAL};
use super::Report;
use crate::error::Error;
use crate::types::{BranchPair, CumulativeSummary, DiffSummary, Outcome, RepositoryOutcome};

/// Progress output written as each repository finishes.
pub struct ConsoleReporter<W> {
    out: W,
    branches: BranchPair,
    color: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub const fn new(out: W, branches: BranchPair, color: bool) -> Self {
        Self {
            out,
            branches,
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn report_outcome(&mut self, outcome: &RepositoryOutcome) -> io::Result<()> {
        writeln!(
            self.out,
            "Processing repository at: {}",
            outcome.path.display()
        )?;

        match &outcome.outcome {
            Outcome::Done(result) => {
                self.block(&result.repo.name, &result.summary)?;
            }
            Outcome::Skipped(error) => {
                self.skip_reason(&outcome.path, error)?;
                writeln!(
                    self.out,
                    "Failed to process repository at: {}",
                    outcome.path.display()
                )?;
            }
        }
        writeln!(self.out)
    }

    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn report_cumulative(&mut self, total: &CumulativeSummary) -> io::Result<()> {
        writeln!(self.out, "CUMULATIVE SUMMARY:")?;
        self.block("Total", &DiffSummary::from(*total))
    }

    /// Echo a rendered report in full.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn report_contents(&mut self, report: &Report) -> io::Result<()> {
        self.out.write_all(report.contents.as_bytes())?;
        if !report.contents.ends_with('\n') {
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn report_saved(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "Detailed report saved to {}", path.display())
    }

    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn report_write_error(&mut self, error: &Error) -> io::Result<()> {
        writeln!(self.out, "Error while writing report: {error}")
    }

    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn report_nothing_compared(&mut self) -> io::Result<()> {
        writeln!(self.out, "No repositories could be compared.")
    }

    fn skip_reason(&mut self, path: &Path, error: &Error) -> io::Result<()> {
        match error {
            Error::NotARepository { .. } => {
                writeln!(self.out, "Not a git repository: {}", path.display())
            }
            Error::ParseFailure { line } if line.trim().is_empty() => {
                writeln!(self.out, "No changes between branches")
            }
            Error::CommandFailed { stderr, .. } => {
                writeln!(self.out, "Error comparing branches: {stderr}")
            }
            other => writeln!(self.out, "Error comparing branches: {other}"),
        }
    }

    fn block(&mut self, name: &str, summary: &DiffSummary) -> io::Result<()> {
        let c = self.color;
        let BranchPair { base, feature } = &self.branches;
        if c {
            writeln!(
                self.out,
                "{} {} {}",
                format!("Comparing {base}").cyan(),
                "←".yellow(),
                format!("{feature} ({name}):").cyan()
            )?;
        } else {
            writeln!(self.out, "Comparing {base} ← {feature} ({name}):")?;
        }
        writeln!(
            self.out,
            "{} {}",
            paint("Files changed:", FILES, c),
            summary.files
        )?;
        writeln!(
            self.out,
            "{} {}",
            paint("Additions:", ADDITIONS, c),
            summary.insertions
        )?;
        writeln!(
            self.out,
            "{} {}",
            paint("Deletions:", DELETIONS, c),
            summary.deletions
        )?;
        writeln!(
            self.out,
            "{} {}",
            paint("Total changes:", TOTAL, c),
            summary.total_changes()
        )?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))
    }
}
