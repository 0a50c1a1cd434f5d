use std::path::Path;
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::git::CommandRunner;
use crate::types::{BranchPair, DetailLevel, FileChange, FileStatus};

/// Status and path of every file that differs between the two branches, in
/// the order the tool reports them.
///
/// # Errors
///
/// Returns an error when the listing command exits non-zero.
#[instrument(skip(runner), fields(repo_path = %repo_path.display(), range = %branches.range()))]
pub fn list_changes(
    runner: &impl CommandRunner,
    branches: &BranchPair,
    repo_path: &Path,
) -> Result<Vec<(FileStatus, String)>> {
    let range = branches.range();
    let output = runner.run_git_command(&["diff", "--name-status", "-z", &range], repo_path)?;

    let changes = parse_name_status(&output);
    debug!(count = changes.len(), "Changed files listed");
    Ok(changes)
}

/// Diff text of a single file between the two branches.
///
/// # Errors
///
/// Returns an error when the diff command exits non-zero.
#[instrument(skip(runner), fields(repo_path = %repo_path.display()))]
pub fn fetch_diff(
    runner: &impl CommandRunner,
    branches: &BranchPair,
    repo_path: &Path,
    filename: &str,
) -> Result<String> {
    let range = branches.range();
    runner.run_git_command(&["diff", &range, "--", filename], repo_path)
}

/// Build the per-file detail requested by `detail`.
///
/// A failed per-file diff is recorded as empty text rather than failing the
/// whole listing.
///
/// # Errors
///
/// Returns an error when the listing itself fails.
pub fn collect(
    runner: &impl CommandRunner,
    branches: &BranchPair,
    repo_path: &Path,
    detail: DetailLevel,
) -> Result<Vec<FileChange>> {
    if !detail.lists_files() {
        return Ok(Vec::new());
    }

    let changes = list_changes(runner, branches, repo_path)?;
    let files = changes
        .into_iter()
        .map(|(status, filename)| {
            let diff = detail.fetches_diffs().then(|| {
                fetch_diff(runner, branches, repo_path, &filename).unwrap_or_else(|e| {
                    warn!(file = %filename, error = %e, "Diff unavailable, recording empty text");
                    String::new()
                })
            });
            FileChange {
                status,
                filename,
                diff,
            }
        })
        .collect();
    Ok(files)
}

// NUL-separated `-z` records: `M\0path\0`, or `R087\0old\0new\0` for renames
// and copies. Paths arrive verbatim, without C-style quoting.
fn parse_name_status(output: &str) -> Vec<(FileStatus, String)> {
    let mut fields = output.split('\0').filter(|field| !field.is_empty());
    let mut changes = Vec::new();

    while let Some(code) = fields.next() {
        let code = code.trim();
        let status = FileStatus::from_code(code);
        let path = if matches!(status, FileStatus::Renamed | FileStatus::Copied) {
            fields.next();
            fields.next()
        } else {
            fields.next()
        };
        match path {
            Some(path) => changes.push((status, path.to_string())),
            None => break,
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::git::testing::FakeRunner;

    const RANGE: &str = "origin/main..origin/feature";
    const LISTING: &[&str] = &["diff", "--name-status", "-z", RANGE];

    fn branches() -> BranchPair {
        BranchPair::new("main", "feature")
    }

    #[test]
    fn listing_preserves_tool_order() {
        let runner = FakeRunner::default().respond(
            "/repo",
            LISTING,
            "M\0zeta.rs\0A\0alpha/new file.txt\0D\0gone.md\0R087\0old.rs\0new.rs\0",
        );

        let changes = list_changes(&runner, &branches(), Path::new("/repo")).unwrap();
        assert_eq!(
            changes,
            vec![
                (FileStatus::Modified, "zeta.rs".to_string()),
                (FileStatus::Added, "alpha/new file.txt".to_string()),
                (FileStatus::Deleted, "gone.md".to_string()),
                (FileStatus::Renamed, "new.rs".to_string()),
            ]
        );
    }

    #[test]
    fn listing_keeps_non_ascii_and_tab_paths_verbatim() {
        let runner = FakeRunner::default()
            .respond(
                "/repo",
                LISTING,
                "A\0café.txt\0C100\0src/a.rs\0src/über\tb.rs\0",
            )
            .respond("/repo", &["diff", RANGE, "--", "café.txt"], "+bonjour");

        let files = collect(&runner, &branches(), Path::new("/repo"), DetailLevel::Diffs).unwrap();
        let listing: Vec<_> = files
            .iter()
            .map(|f| (f.status.clone(), f.filename.as_str()))
            .collect();
        assert_eq!(
            listing,
            vec![
                (FileStatus::Added, "café.txt"),
                (FileStatus::Copied, "src/über\tb.rs"),
            ]
        );
        assert_eq!(files[0].diff.as_deref(), Some("+bonjour"));
    }

    #[test]
    fn truncated_rename_record_is_dropped() {
        let changes = parse_name_status("M\0kept.rs\0R100\0only-old.rs\0");
        assert_eq!(changes, vec![(FileStatus::Modified, "kept.rs".to_string())]);
    }

    #[test]
    fn empty_listing_is_not_an_error() {
        let runner = FakeRunner::default().respond("/repo", LISTING, "");
        let changes = list_changes(&runner, &branches(), Path::new("/repo")).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn failing_listing_propagates() {
        let runner = FakeRunner::default().fail(
            "/repo",
            LISTING,
            128,
            "fatal: bad revision",
        );
        let err = list_changes(&runner, &branches(), Path::new("/repo")).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { exit_code: 128, .. }));
    }

    #[test]
    fn failed_diff_degrades_to_empty_text() {
        let runner = FakeRunner::default()
            .respond("/repo", LISTING, "M\0a.rs\0M\0b.rs\0")
            .respond("/repo", &["diff", RANGE, "--", "a.rs"], "-old\n+new")
            .fail("/repo", &["diff", RANGE, "--", "b.rs"], 1, "error");

        let files = collect(&runner, &branches(), Path::new("/repo"), DetailLevel::Diffs).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].diff.as_deref(), Some("-old\n+new"));
        assert_eq!(files[1].diff.as_deref(), Some(""));
    }

    #[test]
    fn files_level_skips_diff_commands() {
        let runner = FakeRunner::default().respond("/repo", LISTING, "A\0new.rs\0");

        let files = collect(&runner, &branches(), Path::new("/repo"), DetailLevel::Files).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].diff, None);
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn summary_level_runs_nothing() {
        let runner = FakeRunner::default();
        let files =
            collect(&runner, &branches(), Path::new("/repo"), DetailLevel::Summary).unwrap();
        assert!(files.is_empty());
        assert!(runner.calls.lock().unwrap().is_empty());
    }
}
