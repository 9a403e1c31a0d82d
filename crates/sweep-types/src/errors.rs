use thiserror::Error;

/// Errors raised while reading the parameter and cluster config tables
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Duplicate key '{key}' in {path}")]
    DuplicateKey { path: String, key: String },

    #[error("Missing required variable '{name}' in {path}")]
    MissingVariable { path: String, name: String },

    #[error("Malformed table {path} at line {line}: {message}")]
    Malformed {
        path: String,
        line: u64,
        message: String,
    },
}

/// Errors surfaced by a job submission backend
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Cannot submit an empty command")]
    EmptyCommand,

    #[error("Failed to launch {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} exited with status {status}")]
    Rejected { program: String, status: String },
}

/// Result alias for table loading
pub type LoadResult<T> = Result<T, LoadError>;

/// Result alias for job submission
pub type SubmitResult<T> = Result<T, SubmitError>;
