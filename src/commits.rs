use std::path::Path;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::git::CommandRunner;
use crate::types::{BranchPair, Commit, CommitLog};

/// Abbreviated hash and subject, tab separated. Subjects never span lines.
const LOG_FORMAT: &str = "--format=%h%x09%s";

/// Commits reachable from the right side of `range` but not the left, newest
/// first.
///
/// # Errors
///
/// Returns an error when the log command exits non-zero.
#[instrument(skip(runner), fields(repo_path = %repo_path.display()))]
pub fn list_commits(
    runner: &impl CommandRunner,
    repo_path: &Path,
    range: &str,
) -> Result<Vec<Commit>> {
    let output = runner.run_git_command(&["log", LOG_FORMAT, range], repo_path)?;

    let commits: Vec<_> = output.lines().filter_map(parse_commit).collect();
    debug!(count = commits.len(), "Commits listed");
    Ok(commits)
}

/// Commits unique to each side of the comparison.
///
/// # Errors
///
/// Returns an error when either log command fails.
pub fn collect(
    runner: &impl CommandRunner,
    branches: &BranchPair,
    repo_path: &Path,
) -> Result<CommitLog> {
    Ok(CommitLog {
        ahead: list_commits(runner, repo_path, &branches.range())?,
        behind: list_commits(runner, repo_path, &branches.reverse_range())?,
    })
}

fn parse_commit(line: &str) -> Option<Commit> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }
    let (hash, subject) = line.split_once('\t').unwrap_or((line, ""));
    Some(Commit {
        hash: hash.to_string(),
        subject: subject.to_string(),
    })
}
