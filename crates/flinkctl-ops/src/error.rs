//! Error types for the orchestration engine.

use std::path::PathBuf;

use flinkctl_api::ApiError;

/// Result type alias using [`OpsError`].
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors produced by deployment operations.
///
/// Remote and filesystem causes are kept intact inside a context wrapper, so
/// the top-level caller can print one actionable message.
#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    /// A required spec field was left empty. Detected before any network or
    /// filesystem call.
    #[error("unspecified argument '{0}'")]
    UnspecifiedArgument(&'static str),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// The jobs overview could not be fetched.
    #[error("retrieving jobs failed: {source}")]
    RetrieveJobs {
        /// Underlying API error.
        source: ApiError,
    },

    /// No running instance matched the job name base and fallback was off.
    #[error("no instance running for job name base \"{name_base}\". Aborting update")]
    NoInstanceRunning {
        /// The job name base that matched nothing.
        name_base: String,
    },

    /// More than one running instance matched the job name base.
    #[error("job name with base \"{name_base}\" has {count} instances running. Aborting update")]
    AmbiguousJobName {
        /// The ambiguous job name base.
        name_base: String,
        /// Number of running instances that matched.
        count: usize,
    },

    /// Savepoint creation could not be triggered.
    #[error("failed to create savepoint for job \"{job_id}\" due to: {source}")]
    SavepointTrigger {
        /// Job the savepoint was requested for.
        job_id: String,
        /// Underlying API error.
        source: ApiError,
    },

    /// Savepoint creation did not complete within the elapsed budget.
    #[error("failed to create savepoint for job \"{job_id}\" within {budget_secs} seconds")]
    SavepointTimeout {
        /// Job the savepoint was requested for.
        job_id: String,
        /// The elapsed-time budget that was exhausted, in seconds.
        budget_secs: u64,
    },

    /// The old job instance could not be cancelled during an update.
    #[error("job \"{job_id}\" failed to cancel due to: {source}")]
    Cancel {
        /// Job that refused to cancel.
        job_id: String,
        /// Underlying API error.
        source: ApiError,
    },

    /// A job could not be terminated.
    #[error("job \"{job_id}\" failed to terminate due to: {source}")]
    Terminate {
        /// Job that refused to terminate.
        job_id: String,
        /// Underlying API error.
        source: ApiError,
    },

    /// The latest savepoint could not be resolved.
    #[error("retrieving the latest savepoint failed: {source}")]
    LatestSavepoint {
        /// Underlying locator error.
        source: LocateError,
    },

    /// A remote artifact could not be fetched.
    #[error("failed to download remote artifact \"{url}\": {source}")]
    Download {
        /// URL of the artifact.
        url: String,
        /// Underlying download error.
        source: DownloadError,
    },

    /// An API error surfaced verbatim (upload and run steps of a deploy).
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors from the savepoint locator.
///
/// "No snapshot ever taken" and "misconfigured path" are distinct so the
/// operator can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// The directory exists but holds no savepoints.
    #[error("No savepoints present in directory: {dir}")]
    Empty {
        /// The directory that was searched.
        dir: String,
    },

    /// The directory could not be listed at all.
    #[error("failed to list savepoint directory {dir}: {source}")]
    List {
        /// The directory that was searched.
        dir: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from the remote artifact download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The artifact server answered with something other than 200.
    #[error("retrieving remote artifact returned unexpected response code: {0}")]
    UnexpectedStatus(u16),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The staging file could not be written.
    #[error("failed to write staging file {}: {source}", path.display())]
    Io {
        /// Staging path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
