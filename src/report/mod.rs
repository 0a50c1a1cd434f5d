//! Rendering of comparison results into a finished report, plus the
//! incremental console output shown while repositories are processed.

use std::fs;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::types::{BranchPair, ComparisonResult, CumulativeSummary};

mod console;
mod html;
mod json;
mod plain;

pub use console::ConsoleReporter;
pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use plain::PlainRenderer;

/// Mutually exclusive report variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl ReportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

/// Everything a report needs besides the results themselves.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub branches: BranchPair,
    pub generated_at: OffsetDateTime,
}

impl ReportContext {
    /// Stamp the report with the current local time (UTC if the local offset
    /// cannot be determined).
    #[must_use]
    pub fn now(branches: BranchPair) -> Self {
        let generated_at =
            OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self {
            branches,
            generated_at,
        }
    }

    #[must_use]
    pub const fn at(branches: BranchPair, generated_at: OffsetDateTime) -> Self {
        Self {
            branches,
            generated_at,
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!(
            "Branch Comparison Report ({} ← {})",
            self.branches.base, self.branches.feature
        )
    }

    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be formatted.
    pub fn timestamp(&self) -> Result<String> {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        Ok(self.generated_at.format(&format)?)
    }
}

/// One rendering strategy for the shared report structure.
pub trait ReportRenderer {
    /// # Errors
    ///
    /// Returns an error if the report cannot be produced.
    fn render(
        &self,
        context: &ReportContext,
        results: &[&ComparisonResult],
        cumulative: Option<&CumulativeSummary>,
    ) -> Result<String>;
}

/// A rendered report, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub format: ReportFormat,
    pub contents: String,
}

impl Report {
    /// `<report_base>.<ext>`
    #[must_use]
    pub fn file_name(&self, report_base: &Path) -> PathBuf {
        let mut name = report_base.as_os_str().to_os_string();
        name.push(".");
        name.push(self.format.extension());
        PathBuf::from(name)
    }

    /// Write the report next to `report_base` and return the written path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportWrite`] if the file cannot be written.
    #[instrument(skip(self), fields(format = ?self.format, report_base = %report_base.display()))]
    pub fn write(&self, report_base: &Path) -> Result<PathBuf> {
        let path = self.file_name(report_base);

        if let Some(parent_dir) = path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                debug!(parent_dir = %parent_dir.display(), "Creating parent directory");
                fs::create_dir_all(parent_dir).map_err(|source| Error::ReportWrite {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        fs::write(&path, &self.contents).map_err(|source| Error::ReportWrite {
            path: path.clone(),
            source,
        })?;

        debug!(size = self.contents.len(), "Report written");
        Ok(path)
    }
}

/// Options that pick and tune the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: ReportFormat,
    /// Embed terminal colour codes in the text variant.
    pub color: bool,
    /// Escape diff text and names in the HTML variant.
    pub escape_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            color: false,
            escape_html: true,
        }
    }
}

impl RenderOptions {
    #[must_use]
    pub fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self.format {
            ReportFormat::Text => Box::new(PlainRenderer::new(self.color)),
            ReportFormat::Html => Box::new(HtmlRenderer::new(self.escape_html)),
            ReportFormat::Json => Box::new(JsonRenderer),
        }
    }
}

/// Render `results` with the renderer selected by `options`.
///
/// # Errors
///
/// Returns an error if the selected renderer fails.
pub fn render(
    options: &RenderOptions,
    context: &ReportContext,
    results: &[&ComparisonResult],
    cumulative: Option<&CumulativeSummary>,
) -> Result<Report> {
    let contents = options.renderer().render(context, results, cumulative)?;
    Ok(Report {
        format: options.format,
        contents,
    })
}
