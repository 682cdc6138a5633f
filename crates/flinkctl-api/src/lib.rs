//! Apache Flink REST API client.
//!
//! This crate provides the wire-level types for the Flink job manager's
//! control-plane HTTP API, the [`JobManagerApi`] capability trait consumed by
//! the orchestration layer, and two implementations:
//!
//! - [`RestClient`]: the production client over reqwest
//! - [`mock::MockJobManager`]: a scriptable in-memory double that records the
//!   calls made against it, used by the operation tests
//!
//! The covered endpoints are the ones a deployment needs: listing jobs,
//! triggering and monitoring savepoints, terminating jobs, and uploading and
//! running job JARs.

#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod types;

pub use api::JobManagerApi;
pub use client::RestClient;
pub use config::ClusterConfig;
pub use error::{ApiError, ApiResult};
pub use types::{JarRun, Job, SavepointStatus, TerminationMode, UploadedJar};
