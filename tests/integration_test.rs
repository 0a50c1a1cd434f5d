use branch_compare::report::{ReportContext, ReportFormat};
use branch_compare::{
    self, resolver, BranchPair, CompareConfig, ComparisonEngine, DetailLevel, DiffSummary, Error,
    FileStatus, GitCli, Outcome,
};
use std::fs;
use std::path::Path;
use std::process::Command;
use tree_fs::{Tree, TreeBuilder};

fn git(root: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run git {args:?}: {e}"));
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// A repository whose `feature-branch` modifies, adds and deletes one file
/// each relative to `main`, with both branches published as `origin/*`.
fn setup_test_repo() -> Tree {
    let tree = TreeBuilder::default()
        .add_file("file1.txt", "original content")
        .add_file("dir1/file2.txt", "file 2 content")
        .create()
        .expect("Failed to create test repo tree");
    let root = tree.root.as_path();

    git(root, &["init"]);
    git(root, &["config", "user.name", "Test User"]);
    git(root, &["config", "user.email", "test@example.com"]);
    git(root, &["config", "commit.gpgsign", "false"]);
    git(root, &["add", "."]);
    git(root, &["commit", "-m", "Initial commit"]);
    git(root, &["branch", "-M", "main"]);
    git(root, &["checkout", "-b", "feature-branch"]);

    // Modify existing file
    fs::write(root.join("file1.txt"), "modified content").expect("Failed to modify file1.txt");

    // Add new file
    fs::create_dir_all(root.join("dir2")).expect("Failed to create dir2");
    fs::write(root.join("dir2/file3.txt"), "new file content")
        .expect("Failed to create file3.txt");

    // Delete a file
    fs::remove_file(root.join("dir1/file2.txt")).expect("Failed to delete file2.txt");

    git(root, &["add", "--all"]);
    git(root, &["commit", "-m", "Update files"]);

    // Stand in for a fetch from a real remote
    git(root, &["update-ref", "refs/remotes/origin/main", "main"]);
    git(
        root,
        &["update-ref", "refs/remotes/origin/feature-branch", "feature-branch"],
    );

    tree
}

fn repo_name(tree: &Tree) -> String {
    tree.root
        .file_name()
        .expect("temp dir has a name")
        .to_string_lossy()
        .into_owned()
}

fn branches() -> BranchPair {
    BranchPair::new("main", "feature-branch")
}

#[test]
fn test_compare_feature_branch_with_diffs() {
    let repo = setup_test_repo();
    let engine = ComparisonEngine::new(branches(), DetailLevel::Diffs);

    let outcome = engine.compare_repository(&repo.root);
    let result = outcome.result().expect("comparison should succeed");

    assert_eq!(result.repo.name, repo_name(&repo));
    assert_eq!(
        result.summary,
        DiffSummary {
            files: 3,
            insertions: 2,
            deletions: 2
        }
    );

    let listing: Vec<_> = result
        .changed_files
        .iter()
        .map(|c| (c.status.clone(), c.filename.as_str()))
        .collect();
    assert_eq!(
        listing,
        vec![
            (FileStatus::Deleted, "dir1/file2.txt"),
            (FileStatus::Added, "dir2/file3.txt"),
            (FileStatus::Modified, "file1.txt"),
        ]
    );

    let diff = result.changed_files[2]
        .diff
        .as_deref()
        .expect("diff text requested");
    assert!(diff.contains("-original content"));
    assert!(diff.contains("+modified content"));
}

#[test]
fn test_non_ascii_file_name_keeps_its_diff() {
    let repo = setup_test_repo();
    let root = repo.root.as_path();
    fs::write(root.join("café.txt"), "bonjour\n").expect("Failed to create café.txt");
    git(root, &["add", "café.txt"]);
    git(root, &["commit", "-m", "Add café"]);
    git(
        root,
        &["update-ref", "refs/remotes/origin/feature-branch", "feature-branch"],
    );

    let engine = ComparisonEngine::new(branches(), DetailLevel::Diffs);
    let outcome = engine.compare_repository(&repo.root);
    let result = outcome.result().expect("comparison should succeed");

    assert_eq!(result.summary.files, 4);
    let change = result
        .changed_files
        .iter()
        .find(|c| c.filename == "café.txt")
        .expect("non-ASCII path listed verbatim");
    assert_eq!(change.status, FileStatus::Added);
    assert!(change
        .diff
        .as_deref()
        .is_some_and(|diff| diff.contains("+bonjour")));
}

#[test]
fn test_commit_listing_in_both_directions() {
    let repo = setup_test_repo();
    let root = repo.root.as_path();
    git(root, &["checkout", "main"]);
    fs::write(root.join("hotfix.txt"), "patched\n").expect("Failed to create hotfix.txt");
    git(root, &["add", "hotfix.txt"]);
    git(root, &["commit", "-m", "Hotfix on main"]);
    git(root, &["update-ref", "refs/remotes/origin/main", "main"]);

    let mut config = CompareConfig::new(branches());
    config.detail = DetailLevel::Summary;
    config.commits = true;

    let outcome = branch_compare::new(&config).compare_repository(&repo.root);
    let log = outcome
        .result()
        .and_then(|r| r.commits.clone())
        .expect("commit listing requested");

    let ahead: Vec<_> = log.ahead.iter().map(|c| c.subject.as_str()).collect();
    let behind: Vec<_> = log.behind.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(ahead, ["Update files"]);
    assert_eq!(behind, ["Hotfix on main"]);
    assert!(log.ahead[0].hash.len() >= 7);
}

#[test]
fn test_summary_detail_skips_file_listing() {
    let repo = setup_test_repo();
    let engine = ComparisonEngine::new(branches(), DetailLevel::Summary);

    let outcome = engine.compare_repository(&repo.root);
    let result = outcome.result().expect("comparison should succeed");

    assert_eq!(result.summary.total_changes(), 4);
    assert!(result.changed_files.is_empty());
}

#[test]
fn test_batch_skips_non_repository() {
    let first = setup_test_repo();
    let plain_dir = TreeBuilder::default()
        .add_file("notes.txt", "not tracked")
        .create()
        .expect("Failed to create plain directory");
    let second = setup_test_repo();

    let engine = ComparisonEngine::new(branches(), DetailLevel::Files);
    let mut order = Vec::new();
    let batch = engine.compare_all([&first.root, &plain_dir.root, &second.root], |o| {
        order.push(o.path.clone());
    });

    assert_eq!(
        order,
        vec![
            first.root.clone(),
            plain_dir.root.clone(),
            second.root.clone()
        ]
    );
    assert!(matches!(
        batch.outcomes()[1].outcome,
        Outcome::Skipped(Error::NotARepository { .. })
    ));
    assert_eq!(batch.compared_count(), 2);

    let cumulative = batch.cumulative().expect("two repositories succeeded");
    assert_eq!(cumulative.files, 6);
    assert_eq!(cumulative.insertions, 4);
    assert_eq!(cumulative.deletions, 4);
}

#[test]
fn test_missing_remote_branch_is_skipped() {
    let repo = setup_test_repo();
    let engine = ComparisonEngine::new(
        BranchPair::new("main", "does-not-exist"),
        DetailLevel::Diffs,
    );

    let outcome = engine.compare_repository(&repo.root);
    assert!(matches!(
        outcome.outcome,
        Outcome::Skipped(Error::CommandFailed { .. })
    ));
}

#[test]
fn test_resolve_from_subdirectory() {
    let repo = setup_test_repo();
    let handle = resolver::resolve(&GitCli::new(), &repo.root.join("dir2"))
        .expect("subdirectory is inside the repository");
    assert_eq!(handle.name, repo_name(&repo));
}

#[test]
fn test_write_text_and_html_reports() {
    let repo = setup_test_repo();
    let output_tree = TreeBuilder::default()
        .create()
        .expect("Failed to create output tree");

    let mut config = CompareConfig::new(branches());
    config.report_base = output_tree.root.join("branch_diff_report");

    let engine = branch_compare::new(&config);
    let batch = engine.compare_all([&repo.root], |_| {});
    let context = ReportContext::now(config.branches.clone());

    let text_path = branch_compare::render_report(&config, &context, &batch)
        .and_then(|report| report.write(&config.report_base))
        .expect("Failed to write text report");
    assert_eq!(text_path, output_tree.root.join("branch_diff_report.txt"));

    let text = fs::read_to_string(&text_path).expect("Failed to read text report");
    assert!(text.starts_with("Branch Comparison Report (main ← feature-branch)\n"));
    assert!(text.contains(&format!("Repository: {}\n", repo_name(&repo))));
    assert!(text.contains("  Status: M - File: file1.txt\n"));
    assert!(!text.contains("CUMULATIVE SUMMARY"));

    config.format = ReportFormat::Html;
    let html_path = branch_compare::render_report(&config, &context, &batch)
        .and_then(|report| report.write(&config.report_base))
        .expect("Failed to write html report");
    assert_eq!(html_path, output_tree.root.join("branch_diff_report.html"));

    let html = fs::read_to_string(&html_path).expect("Failed to read html report");
    assert!(html.contains("<p class='files'>Files changed: 3</p>"));
    assert!(html.contains("+modified content"));
}
