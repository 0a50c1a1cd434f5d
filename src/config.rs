use std::path::PathBuf;

use crate::report::{RenderOptions, ReportFormat};
use crate::types::{BranchPair, DetailLevel};

pub const DEFAULT_REPORT_BASE: &str = "branch_diff_report";

/// When to emit ANSI colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ColorMode {
    /// Colour the console when the `colored` crate detects support.
    #[default]
    Auto,
    /// Colour the console and embed codes in the text report.
    Always,
    Never,
}

impl ColorMode {
    /// Apply the mode to the process-wide `colored` switch.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }

    #[must_use]
    pub const fn console(self) -> bool {
        !matches!(self, Self::Never)
    }

    #[must_use]
    pub const fn report(self) -> bool {
        matches!(self, Self::Always)
    }
}

/// Immutable settings for one run over a batch of repositories.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub branches: BranchPair,
    pub detail: DetailLevel,
    pub format: ReportFormat,
    pub report_base: PathBuf,
    pub color: ColorMode,
    pub jobs: usize,
    pub escape_html: bool,
    /// List the commits unique to each branch.
    pub commits: bool,
    /// Skip writing the report file.
    pub console_only: bool,
    /// Echo the rendered report to the console as well as writing it.
    pub print_report: bool,
}

impl CompareConfig {
    #[must_use]
    pub fn new(branches: BranchPair) -> Self {
        Self {
            branches,
            detail: DetailLevel::default(),
            format: ReportFormat::default(),
            report_base: PathBuf::from(DEFAULT_REPORT_BASE),
            color: ColorMode::default(),
            jobs: 1,
            escape_html: true,
            commits: false,
            console_only: false,
            print_report: false,
        }
    }

    #[must_use]
    pub const fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.format,
            color: self.color.report(),
            escape_html: self.escape_html,
        }
    }
}
