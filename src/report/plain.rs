use colored::{Color, Colorize};
use std::fmt::{self, Write};

use super::{ReportContext, ReportRenderer};
use crate::error::Result;
use crate::types::{BranchPair, Commit, ComparisonResult, CumulativeSummary};

pub(crate) const RULE_WIDTH: usize = 40;

/// Label colours shared by the text report and the console.
pub(crate) const FILES: Color = Color::Magenta;
pub(crate) const ADDITIONS: Color = Color::Green;
pub(crate) const DELETIONS: Color = Color::Red;
pub(crate) const TOTAL: Color = Color::Blue;

pub(crate) fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

/// Linear text report, optionally with ANSI colour on each count label.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer {
    color: bool,
}

impl PlainRenderer {
    #[must_use]
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    fn counts(
        &self,
        out: &mut impl Write,
        files: u64,
        insertions: u64,
        deletions: u64,
    ) -> fmt::Result {
        let c = self.color;
        writeln!(out, "{} {files}", paint("Files changed:", FILES, c))?;
        writeln!(out, "{} {insertions}", paint("Additions:", ADDITIONS, c))?;
        writeln!(out, "{} {deletions}", paint("Deletions:", DELETIONS, c))?;
        writeln!(
            out,
            "{} {}",
            paint("Total changes:", TOTAL, c),
            insertions + deletions
        )
    }

    fn repository(
        &self,
        out: &mut impl Write,
        branches: &BranchPair,
        result: &ComparisonResult,
    ) -> fmt::Result {
        let summary = &result.summary;
        writeln!(out, "Repository: {}", result.repo.name)?;
        self.counts(out, summary.files, summary.insertions, summary.deletions)?;

        if let Some(log) = &result.commits {
            commits(out, &branches.feature, &branches.base, &log.ahead)?;
            commits(out, &branches.base, &branches.feature, &log.behind)?;
        }

        if !result.changed_files.is_empty() {
            writeln!(out, "Changed files and differences:")?;
            for change in &result.changed_files {
                writeln!(
                    out,
                    "  Status: {} - File: {}",
                    change.status, change.filename
                )?;
                if let Some(diff) = &change.diff {
                    writeln!(out, "  Diff:\n{diff}")?;
                    writeln!(out, "  {}", "-".repeat(20))?;
                }
            }
        }
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))
    }

    fn write_report(
        &self,
        out: &mut impl Write,
        context: &ReportContext,
        timestamp: &str,
        results: &[&ComparisonResult],
        cumulative: Option<&CumulativeSummary>,
    ) -> fmt::Result {
        writeln!(out, "{}", context.title())?;
        writeln!(out, "Generated on: {timestamp}\n")?;

        for result in results {
            self.repository(out, &context.branches, result)?;
        }

        if let Some(total) = cumulative {
            writeln!(out, "\nCUMULATIVE SUMMARY:")?;
            self.counts(out, total.files, total.insertions, total.deletions)?;
        }
        Ok(())
    }
}

fn commits(
    out: &mut impl Write,
    from: &str,
    missing_from: &str,
    commits: &[Commit],
) -> fmt::Result {
    writeln!(out, "Commits in '{from}' that are not in '{missing_from}':")?;
    if commits.is_empty() {
        return writeln!(out, "  None");
    }
    for commit in commits {
        writeln!(out, "  {} {}", commit.hash, commit.subject)?;
    }
    Ok(())
}

impl ReportRenderer for PlainRenderer {
    fn render(
        &self,
        context: &ReportContext,
        results: &[&ComparisonResult],
        cumulative: Option<&CumulativeSummary>,
    ) -> Result<String> {
        let timestamp = context.timestamp()?;
        let mut out = String::new();
        self.write_report(&mut out, context, &timestamp, results, cumulative)?;
        Ok(out)
    }
}
