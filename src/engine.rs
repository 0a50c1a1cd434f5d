#[cfg(any(feature = "cli", test))]
use futures::{stream, FutureExt, StreamExt};
use std::path::Path;
#[cfg(any(feature = "cli", test))]
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, instrument, warn};

use crate::aggregate::aggregate;
use crate::collector;
use crate::commits;
use crate::error::{Error, Result};
use crate::git::{CommandRunner, GitCli};
use crate::resolver;
use crate::stat;
use crate::types::{
    BranchPair, ComparisonResult, CumulativeSummary, DetailLevel, DiffSummary, Outcome,
    RepositoryOutcome,
};

/// Compares two branches in one repository at a time
pub struct ComparisonEngine<G = GitCli> {
    git: G,
    branches: BranchPair,
    detail: DetailLevel,
    commits: bool,
}

impl ComparisonEngine<GitCli> {
    /// Create an engine backed by the local `git` executable
    #[must_use]
    pub fn new(branches: BranchPair, detail: DetailLevel) -> Self {
        Self::with_runner(GitCli::new(), branches, detail)
    }
}

impl<G: CommandRunner> ComparisonEngine<G> {
    #[must_use]
    pub const fn with_runner(git: G, branches: BranchPair, detail: DetailLevel) -> Self {
        Self {
            git,
            branches,
            detail,
            commits: false,
        }
    }

    /// Also list the commits unique to each branch.
    #[must_use]
    pub fn with_commits(mut self, commits: bool) -> Self {
        self.commits = commits;
        self
    }

    #[must_use]
    pub const fn branches(&self) -> &BranchPair {
        &self.branches
    }

    #[must_use]
    pub const fn detail(&self) -> DetailLevel {
        self.detail
    }

    /// Compare the branches in the repository containing `path`.
    ///
    /// Never fails: any problem is recorded as [`Outcome::Skipped`].
    #[instrument(skip(self), fields(path = %path.display(), range = %self.branches.range()))]
    pub fn compare_repository(&self, path: &Path) -> RepositoryOutcome {
        let outcome = match self.try_compare(path) {
            Ok(result) => {
                debug!(repo = %result.repo.name, summary = ?result.summary, "Comparison done");
                Outcome::Done(result)
            }
            Err(e) => {
                debug!(error = %e, "Repository skipped");
                Outcome::Skipped(e)
            }
        };
        RepositoryOutcome {
            path: path.to_path_buf(),
            outcome,
        }
    }

    /// Compare every path in order, handing each outcome to `on_outcome` as
    /// soon as it is known.
    pub fn compare_all<I, P>(&self, paths: I, mut on_outcome: impl FnMut(&RepositoryOutcome)) -> Batch
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut batch = Batch::default();
        for path in paths {
            let outcome = self.compare_repository(path.as_ref());
            on_outcome(&outcome);
            batch.push(outcome);
        }
        batch
    }

    fn try_compare(&self, path: &Path) -> Result<ComparisonResult> {
        let repo = resolver::resolve(&self.git, path)?;
        let summary = self.diff_stat(path)?;

        let changed_files = collector::collect(&self.git, &self.branches, path, self.detail)
            .unwrap_or_else(|e| {
                warn!(repo = %repo.name, error = %e, "File listing failed, continuing without it");
                Vec::new()
            });

        let commits = if self.commits {
            commits::collect(&self.git, &self.branches, path)
                .inspect_err(|e| {
                    warn!(repo = %repo.name, error = %e, "Commit listing failed, continuing without it");
                })
                .ok()
        } else {
            None
        };

        Ok(ComparisonResult {
            repo,
            summary,
            changed_files,
            commits,
        })
    }

    fn diff_stat(&self, path: &Path) -> Result<DiffSummary> {
        let range = self.branches.range();
        let args = ["--no-pager", "diff", "--stat", range.as_str()];
        let output = self.git.execute(&args, path)?;

        if !output.is_clean() {
            return Err(Error::CommandFailed {
                args: args.join(" "),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        stat::parse(stat::summary_line(&output.stdout).unwrap_or_default())
    }
}

#[cfg(any(feature = "cli", test))]
impl<G: CommandRunner + Send + Sync + 'static> ComparisonEngine<G> {
    /// Compare up to `jobs` repositories at once on the blocking thread pool.
    ///
    /// Outcomes reach `on_outcome` and the batch in input order, whatever
    /// order the comparisons finish in.
    pub async fn compare_concurrently(
        self: Arc<Self>,
        paths: Vec<PathBuf>,
        jobs: usize,
        mut on_outcome: impl FnMut(&RepositoryOutcome),
    ) -> Batch {
        let mut outcomes = stream::iter(paths)
            .map(|path| {
                let engine = Arc::clone(&self);
                let task_path = path.clone();
                tokio::task::spawn_blocking(move || engine.compare_repository(&task_path)).map(
                    move |joined| {
                        joined.unwrap_or_else(|e| RepositoryOutcome {
                            path,
                            outcome: Outcome::Skipped(Error::IoError(std::io::Error::other(e))),
                        })
                    },
                )
            })
            .buffered(jobs.max(1));

        let mut batch = Batch::default();
        while let Some(outcome) = outcomes.next().await {
            on_outcome(&outcome);
            batch.push(outcome);
        }
        batch
    }
}

/// Ordered outcomes of one run over a list of repositories.
#[derive(Debug, Default)]
pub struct Batch {
    outcomes: Vec<RepositoryOutcome>,
}

impl Batch {
    pub fn push(&mut self, outcome: RepositoryOutcome) {
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub fn outcomes(&self) -> &[RepositoryOutcome] {
        &self.outcomes
    }

    /// Successful comparisons, in input order.
    pub fn results(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.outcomes.iter().filter_map(RepositoryOutcome::result)
    }

    #[must_use]
    pub fn cumulative(&self) -> Option<CumulativeSummary> {
        aggregate(self.results())
    }

    #[must_use]
    pub fn compared_count(&self) -> usize {
        self.results().count()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.compared_count()
    }
}
