use std::borrow::Cow;
use std::fmt::{self, Write};

use super::{ReportContext, ReportRenderer};
use crate::error::Result;
use crate::types::{BranchPair, Commit, ComparisonResult, CumulativeSummary};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; }\
.header { color: #1E90FF; }\
.files { color: #9932CC; }\
.add { color: green; }\
.del { color: red; }\
.total { color: #4169E1; }\
.diff { background-color: #f4f4f4; padding: 5px; white-space: pre-wrap; }\
.section { margin-bottom: 20px; border-bottom: 1px solid #ccc; padding-bottom: 10px; }";

/// Self-contained HTML document with inline styling.
#[derive(Debug, Clone, Copy)]
pub struct HtmlRenderer {
    escape: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HtmlRenderer {
    /// With `escape` off, names and diff text are embedded verbatim.
    #[must_use]
    pub const fn new(escape: bool) -> Self {
        Self { escape }
    }

    fn text<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if self.escape {
            escape_html(raw)
        } else {
            Cow::Borrowed(raw)
        }
    }
}

fn escape_html(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(
        raw.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;"),
    )
}

fn counts(
    out: &mut impl Write,
    files: u64,
    insertions: u64,
    deletions: u64,
) -> fmt::Result {
    write!(out, "<p class='files'>Files changed: {files}</p>")?;
    write!(out, "<p class='add'>Additions: {insertions}</p>")?;
    write!(out, "<p class='del'>Deletions: {deletions}</p>")?;
    write!(
        out,
        "<p class='total'>Total changes: {}</p>",
        insertions + deletions
    )
}

impl HtmlRenderer {
    fn commits(
        &self,
        out: &mut impl Write,
        from: &str,
        missing_from: &str,
        commits: &[Commit],
    ) -> fmt::Result {
        write!(
            out,
            "<h3>Commits in '{}' that are not in '{}':</h3>",
            self.text(from),
            self.text(missing_from)
        )?;
        if commits.is_empty() {
            return write!(out, "<p>None</p>");
        }
        write!(out, "<ul class='commits'>")?;
        for commit in commits {
            write!(
                out,
                "<li><code>{}</code> {}</li>",
                self.text(&commit.hash),
                self.text(&commit.subject)
            )?;
        }
        write!(out, "</ul>")
    }

    fn repository(
        &self,
        out: &mut impl Write,
        branches: &BranchPair,
        result: &ComparisonResult,
    ) -> fmt::Result {
        let summary = &result.summary;
        write!(out, "<div class='section'>")?;
        write!(out, "<h2>Repository: {}</h2>", self.text(&result.repo.name))?;
        counts(out, summary.files, summary.insertions, summary.deletions)?;

        if let Some(log) = &result.commits {
            self.commits(out, &branches.feature, &branches.base, &log.ahead)?;
            self.commits(out, &branches.base, &branches.feature, &log.behind)?;
        }

        if !result.changed_files.is_empty() {
            write!(out, "<h3>Changed files and differences:</h3>")?;
            for change in &result.changed_files {
                write!(
                    out,
                    "<div class='diff'><strong>Status:</strong> {} - <strong>File:</strong> {}<br/>",
                    self.text(change.status.code()),
                    self.text(&change.filename)
                )?;
                if let Some(diff) = &change.diff {
                    write!(out, "<pre>{}</pre>", self.text(diff))?;
                }
                write!(out, "</div>")?;
            }
        }
        write!(out, "</div>")
    }

    fn write_report(
        &self,
        out: &mut impl Write,
        context: &ReportContext,
        timestamp: &str,
        results: &[&ComparisonResult],
        cumulative: Option<&CumulativeSummary>,
    ) -> fmt::Result {
        write!(
            out,
            "<html><head><meta charset='UTF-8'><title>Branch Comparison Report</title>"
        )?;
        write!(out, "<style>{STYLE}</style></head><body>")?;
        write!(out, "<h1 class='header'>{}</h1>", self.text(&context.title()))?;
        write!(out, "<p>Generated on: {timestamp}</p>")?;

        for result in results {
            self.repository(out, &context.branches, result)?;
        }

        if let Some(total) = cumulative {
            write!(out, "<h2>CUMULATIVE SUMMARY:</h2>")?;
            counts(out, total.files, total.insertions, total.deletions)?;
        }

        write!(out, "</body></html>")
    }
}

impl ReportRenderer for HtmlRenderer {
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
