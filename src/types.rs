use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::Error;

/// Remote namespace the branches are expected to be fetched under.
pub const REMOTE: &str = "origin";

/// The two branches being compared, threaded through every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPair {
    pub base: String,
    pub feature: String,
}

impl BranchPair {
    #[must_use]
    pub fn new(base: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            feature: feature.into(),
        }
    }

    /// `origin/<base>..origin/<feature>`
    #[must_use]
    pub fn range(&self) -> String {
        format!("{REMOTE}/{}..{REMOTE}/{}", self.base, self.feature)
    }

    /// `origin/<feature>..origin/<base>`: what the base has that the feature lacks.
    #[must_use]
    pub fn reverse_range(&self) -> String {
        format!("{REMOTE}/{}..{REMOTE}/{}", self.feature, self.base)
    }
}

/// How much per-file detail to collect for each repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DetailLevel {
    /// Counts only.
    Summary,
    /// Counts plus the status/filename listing.
    Files,
    /// Counts, listing and per-file diff text.
    #[default]
    Diffs,
}

impl DetailLevel {
    #[must_use]
    pub const fn lists_files(self) -> bool {
        matches!(self, Self::Files | Self::Diffs)
    }

    #[must_use]
    pub const fn fetches_diffs(self) -> bool {
        matches!(self, Self::Diffs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    pub path: PathBuf,
    pub name: String,
}

impl Serialize for RepositoryHandle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RepositoryHandle", 2)?;
        state.serialize_field("path", &self.path.to_string_lossy())?;
        state.serialize_field("name", &self.name)?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiffSummary {
    pub files: u64,
    pub insertions: u64,
    pub deletions: u64,
}

impl DiffSummary {
    #[must_use]
    pub const fn total_changes(&self) -> u64 {
        self.insertions + self.deletions
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Unmerged,
    Unknown(String),
}

impl FileStatus {
    /// Map a name-status code (`M`, `A`, `R087`, ...) to a status.
    ///
    /// Rename and copy scores are dropped.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('A') => Self::Added,
            Some('M') => Self::Modified,
            Some('D') => Self::Deleted,
            Some('R') => Self::Renamed,
            Some('C') => Self::Copied,
            Some('T') => Self::TypeChanged,
            Some('U') => Self::Unmerged,
            _ => Self::Unknown(code.to_string()),
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Added => "A",
            Self::Modified => "M",
            Self::Deleted => "D",
            Self::Renamed => "R",
            Self::Copied => "C",
            Self::TypeChanged => "T",
            Self::Unmerged => "U",
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub status: FileStatus,
    pub filename: String,
    /// `None` when diff text was not requested.
    pub diff: Option<String>,
}

/// One commit as `git log --format=%h%x09%s` prints it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub hash: String,
    pub subject: String,
}

/// Commits reachable from one branch but not the other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CommitLog {
    /// In the feature branch, not in the base.
    pub ahead: Vec<Commit>,
    /// In the base branch, not in the feature.
    pub behind: Vec<Commit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub repo: RepositoryHandle,
    pub summary: DiffSummary,
    pub changed_files: Vec<FileChange>,
    /// `None` when commit listing was not requested or could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commits: Option<CommitLog>,
}

/// Element-wise sum of every successful summary in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CumulativeSummary {
    pub files: u64,
    pub insertions: u64,
    pub deletions: u64,
}

impl From<CumulativeSummary> for DiffSummary {
    fn from(total: CumulativeSummary) -> Self {
        Self {
            files: total.files,
            insertions: total.insertions,
            deletions: total.deletions,
        }
    }
}

/// Terminal state of one repository comparison.
#[derive(Debug)]
pub enum Outcome {
    Done(ComparisonResult),
    Skipped(Error),
}

/// An outcome tagged with the path it was requested for.
#[derive(Debug)]
pub struct RepositoryOutcome {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl RepositoryOutcome {
    #[must_use]
    pub const fn result(&self) -> Option<&ComparisonResult> {
        match &self.outcome {
            Outcome::Done(result) => Some(result),
            Outcome::Skipped(_) => None,
        }
    }
}
