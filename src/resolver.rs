use std::path::Path;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::git::CommandRunner;
use crate::types::RepositoryHandle;

/// Resolve `path` to the repository it belongs to.
///
/// The handle's name is the basename of the repository's top-level directory.
///
/// # Errors
///
/// Returns [`Error::NotARepository`] when the top-level lookup exits non-zero,
/// writes to stderr, or the tool cannot be run at all.
#[instrument(skip(runner), fields(path = %path.display()))]
pub fn resolve(runner: &impl CommandRunner, path: &Path) -> Result<RepositoryHandle> {
    let not_a_repository = || Error::NotARepository {
        path: path.to_path_buf(),
    };

    let output = runner
        .execute(&["rev-parse", "--show-toplevel"], path)
        .map_err(|e| {
            debug!(error = %e, "Top-level lookup could not run");
            not_a_repository()
        })?;

    if !output.is_clean() || output.stdout.is_empty() {
        debug!(exit_code = output.exit_code, stderr = %output.stderr, "Not a repository");
        return Err(not_a_repository());
    }

    let name = Path::new(&output.stdout)
        .file_name()
        .map_or_else(|| output.stdout.clone(), |n| n.to_string_lossy().into_owned());

    debug!(name = %name, "Repository resolved");
    Ok(RepositoryHandle {
        path: path.to_path_buf(),
        name,
    })
}
