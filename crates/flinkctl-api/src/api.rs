//! Capability trait for the job manager control plane.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::types::{JarRun, Job, SavepointStatus, TerminationMode, UploadedJar};

/// The control-plane operations the deployer needs from a job manager.
///
/// The production implementation is [`crate::RestClient`];
/// [`crate::mock::MockJobManager`] provides a scriptable double for tests.
#[async_trait]
pub trait JobManagerApi: Send + Sync {
    /// Retrieve all jobs known to the cluster, in the order it reports them.
    async fn retrieve_jobs(&self) -> ApiResult<Vec<Job>>;

    /// Trigger savepoint creation for a job.
    ///
    /// Returns the request id to poll with [`Self::monitor_savepoint`]. The
    /// job keeps running; cancellation is a separate step.
    async fn create_savepoint(&self, job_id: &str, target_directory: &str) -> ApiResult<String>;

    /// Check the status of a savepoint creation request.
    async fn monitor_savepoint(&self, job_id: &str, request_id: &str)
        -> ApiResult<SavepointStatus>;

    /// Ask the cluster to stop a job.
    ///
    /// When `mode` is `None` the cluster's default termination mode applies.
    async fn terminate(&self, job_id: &str, mode: Option<TerminationMode>) -> ApiResult<()>;

    /// Upload a local JAR to the cluster.
    async fn upload_jar(&self, path: &Path) -> ApiResult<UploadedJar>;

    /// Start a previously uploaded JAR.
    async fn run_jar(&self, run: &JarRun) -> ApiResult<()>;
}
