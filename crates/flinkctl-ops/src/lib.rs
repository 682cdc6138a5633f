//! Deployment and update orchestration for Apache Flink jobs.
//!
//! This crate contains the decision logic of the deployer: given a job
//! manager (behind the [`flinkctl_api::JobManagerApi`] trait) and a savepoint
//! filesystem (behind [`fs::Filesystem`]), it deploys new jobs and updates
//! running ones with a stop-with-savepoint-then-restart sequence.
//!
//! # Update lifecycle
//!
//! ```text
//! validate ──▶ list jobs ──▶ match on running instances
//!                               │
//!                0 ─────────────┼───────────── N > 1
//!                │              1                  │
//!          fallback deploy      │               abort
//!          (when enabled)       ▼
//!                        savepoint ──▶ cancel ──▶ locate savepoint ──▶ deploy
//! ```
//!
//! Cancellation strictly follows savepoint confirmation, so a failed update
//! never leaves the old job gone without a usable resume path. The ordering
//! of the destructive steps is additionally witnessed at compile time by
//! [`state::UpdateFlow`].
//!
//! Exactly one operation runs per process invocation; the cluster is the
//! sole source of truth and no job state is cached across calls.

#![forbid(unsafe_code)]

pub mod backoff;
pub mod config;
pub mod error;
pub mod fs;
pub mod locator;
pub mod operator;
pub mod state;
pub mod types;

mod artifact;
mod savepoint;

pub use config::{ArtifactConfig, DeployerConfig, SavepointConfig};
pub use error::{DownloadError, LocateError, OpsError, OpsResult};
pub use operator::{filter_running_jobs_by_name, JobOperator};
pub use types::{ArtifactSource, DeploySpec, TerminateSpec, UpdateSpec};
