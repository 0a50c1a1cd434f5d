use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to run `{program}`: {message}")]
    CommandSpawn { program: String, message: String },

    #[error("Git command failed ({args}, exit code {exit_code}): {stderr}")]
    CommandFailed {
        args: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Not a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    #[error("Could not parse change summary: {line:?}")]
    ParseFailure { line: String },

    #[error("Failed to write {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to format report timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("Failed to render report: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
