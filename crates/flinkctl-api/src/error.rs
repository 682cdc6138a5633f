//! Error types for the Flink REST API client.

use std::path::PathBuf;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur when talking to the job manager.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The API answered with a status code the endpoint does not expect.
    ///
    /// The raw body is carried along so the operator sees what the cluster
    /// actually said.
    #[error("unexpected response status {status} with body: {body}")]
    UnexpectedStatus {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The API answered with the expected status but an unparseable body.
    #[error("unable to parse API response as valid JSON: {body}")]
    InvalidResponse {
        /// Raw response body.
        body: String,
    },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A local artifact could not be read for upload.
    #[error("failed to read artifact {}: {source}", path.display())]
    Artifact {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
