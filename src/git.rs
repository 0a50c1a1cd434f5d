use std::path::Path;
use std::process::Command;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Captured result of one external command invocation.
///
/// Both streams are decoded lossily and trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Zero exit code and nothing on standard error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.success() && self.stderr.is_empty()
    }
}

/// Process boundary for every version-control query the crate makes.
pub trait CommandRunner {
    /// Run the version-control tool with `args` inside `working_dir`.
    ///
    /// A non-zero exit code is not an error: it is reported through
    /// [`CommandOutput::exit_code`] together with the captured stderr.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process could not be started at all.
    fn execute(&self, args: &[&str], working_dir: &Path) -> Result<CommandOutput>;

    /// Run a command and return its stdout, failing on a non-zero exit code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] when the command exits non-zero.
    fn run_git_command(&self, args: &[&str], working_dir: &Path) -> Result<String> {
        let output = self.execute(args, working_dir)?;
        if !output.success() {
            return Err(Error::CommandFailed {
                args: args.join(" "),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }
}

/// Implementation of [`CommandRunner`] using the local Git CLI
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a different executable in place of `git`.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CommandRunner for GitCli {
    #[instrument(skip(self), fields(program = %self.program, working_dir = %working_dir.display()))]
    fn execute(&self, args: &[&str], working_dir: &Path) -> Result<CommandOutput> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| Error::CommandSpawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        // Killed by a signal: no exit code to report.
        let exit_code = output.status.code().unwrap_or(-1);
        let result = CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };

        debug!(
            exit_code,
            stdout_length = result.stdout.len(),
            stderr_length = result.stderr.len(),
            "Command completed"
        );
        Ok(result)
    }
}
