pub use config::{ColorMode, CompareConfig, DEFAULT_REPORT_BASE};
pub use engine::{Batch, ComparisonEngine};
pub use error::{Error, Result};
pub use git::{CommandOutput, CommandRunner, GitCli};
pub use types::{
    BranchPair, Commit, CommitLog, ComparisonResult, CumulativeSummary, DetailLevel, DiffSummary,
    FileChange, FileStatus, Outcome, RepositoryHandle, RepositoryOutcome,
};

pub mod aggregate;
pub mod collector;
pub mod commits;
mod config;
mod engine;
mod error;
mod git;
pub mod report;
pub mod resolver;
pub mod stat;
mod types;

/// Creates a [`ComparisonEngine`] for the given configuration, backed by the
/// local `git` executable.
///
/// The branches are looked up as remote-tracking references
/// (`origin/<base>` and `origin/<feature>`), which must already be fetched.
#[must_use]
pub fn new(config: &CompareConfig) -> ComparisonEngine {
    ComparisonEngine::new(config.branches.clone(), config.detail).with_commits(config.commits)
}

/// Renders the successful results of `batch` and the cumulative summary, if
/// any, as the report variant selected by `config`.
///
/// # Errors
///
/// Returns an error if the report cannot be rendered.
pub fn render_report(
    config: &CompareConfig,
    context: &report::ReportContext,
    batch: &Batch,
) -> Result<report::Report> {
    let results: Vec<_> = batch.results().collect();
    let cumulative = batch.cumulative();
    report::render(
        &config.render_options(),
        context,
        &results,
        cumulative.as_ref(),
    )
}
