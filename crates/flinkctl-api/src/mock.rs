//! Scriptable in-memory job manager for tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use async_trait::async_trait;

use crate::api::JobManagerApi;
use crate::error::{ApiError, ApiResult};
use crate::types::{JarRun, Job, SavepointStatus, TerminationMode, UploadedJar};

/// A call recorded by [`MockJobManager`], in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// Jobs overview was requested.
    RetrieveJobs,
    /// Savepoint creation was triggered.
    CreateSavepoint {
        /// Target job.
        job_id: String,
        /// Requested savepoint directory.
        target_directory: String,
    },
    /// Savepoint status was polled.
    MonitorSavepoint {
        /// Target job.
        job_id: String,
        /// Creation request being polled.
        request_id: String,
    },
    /// Job termination was requested.
    Terminate {
        /// Target job.
        job_id: String,
        /// Requested termination mode.
        mode: Option<TerminationMode>,
    },
    /// A JAR was uploaded.
    UploadJar {
        /// Local path handed to the upload.
        path: PathBuf,
    },
    /// An uploaded JAR was started.
    RunJar {
        /// JAR identifier.
        jar_id: String,
        /// Savepoint path the job was asked to resume from.
        savepoint_path: Option<String>,
    },
}

/// A failure scripted for one endpoint, reported as an unexpected status.
#[derive(Debug, Clone)]
struct ScriptedFailure {
    status: u16,
    body: String,
}

impl ScriptedFailure {
    fn to_error(&self) -> ApiError {
        ApiError::UnexpectedStatus {
            status: self.status,
            body: self.body.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    jobs: Vec<Job>,
    retrieve_jobs_failure: Option<ScriptedFailure>,
    create_savepoint_failure: Option<ScriptedFailure>,
    terminate_failure: Option<ScriptedFailure>,
    upload_failure: Option<ScriptedFailure>,
    run_failure: Option<ScriptedFailure>,
    /// Statuses returned by successive monitor polls. The last entry repeats
    /// forever; an empty queue answers `Completed`.
    savepoint_statuses: VecDeque<SavepointStatus>,
    /// Number of initial monitor polls that fail before statuses are served.
    monitor_failures: u32,
    uploaded_filename: Option<String>,
    calls: Vec<ApiCall>,
}

/// In-memory [`JobManagerApi`] double.
///
/// Behaviour is scripted up front; every call is recorded so tests can assert
/// on exact call ordering. By default the mock reports no jobs, accepts every
/// savepoint immediately, and lets uploads and runs succeed.
#[derive(Debug, Default)]
pub struct MockJobManager {
    state: RwLock<MockState>,
}

impl MockJobManager {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose overview reports the given jobs.
    #[must_use]
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        let mock = Self::new();
        mock.state().jobs = jobs;
        mock
    }

    fn state(&self) -> RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the jobs reported by the overview endpoint.
    pub fn set_jobs(&self, jobs: Vec<Job>) {
        self.state().jobs = jobs;
    }

    /// Script a failure for the jobs overview endpoint.
    pub fn fail_retrieve_jobs(&self, status: u16, body: &str) {
        self.state().retrieve_jobs_failure = Some(ScriptedFailure {
            status,
            body: body.to_owned(),
        });
    }

    /// Script a failure for savepoint creation.
    pub fn fail_create_savepoint(&self, status: u16, body: &str) {
        self.state().create_savepoint_failure = Some(ScriptedFailure {
            status,
            body: body.to_owned(),
        });
    }

    /// Script a failure for termination.
    pub fn fail_terminate(&self, status: u16, body: &str) {
        self.state().terminate_failure = Some(ScriptedFailure {
            status,
            body: body.to_owned(),
        });
    }

    /// Script a failure for JAR upload.
    pub fn fail_upload(&self, status: u16, body: &str) {
        self.state().upload_failure = Some(ScriptedFailure {
            status,
            body: body.to_owned(),
        });
    }

    /// Script a failure for starting a JAR.
    pub fn fail_run(&self, status: u16, body: &str) {
        self.state().run_failure = Some(ScriptedFailure {
            status,
            body: body.to_owned(),
        });
    }

    /// Script the statuses returned by successive monitor polls.
    ///
    /// The last status repeats forever, so `[InProgress]` models a savepoint
    /// that never completes.
    pub fn script_savepoint_statuses(&self, statuses: Vec<SavepointStatus>) {
        self.state().savepoint_statuses = statuses.into();
    }

    /// Make the first `count` monitor polls fail with a 503 before any
    /// scripted statuses are served.
    pub fn fail_monitor_polls(&self, count: u32) {
        self.state().monitor_failures = count;
    }

    /// Override the server-side filename reported by the upload endpoint.
    pub fn set_uploaded_filename(&self, filename: &str) {
        self.state().uploaded_filename = Some(filename.to_owned());
    }

    /// All calls made against this mock, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }
}

#[async_trait]
impl JobManagerApi for MockJobManager {
    async fn retrieve_jobs(&self) -> ApiResult<Vec<Job>> {
        let mut state = self.state();
        state.calls.push(ApiCall::RetrieveJobs);

        if let Some(failure) = &state.retrieve_jobs_failure {
            return Err(failure.to_error());
        }
        Ok(state.jobs.clone())
    }

    async fn create_savepoint(&self, job_id: &str, target_directory: &str) -> ApiResult<String> {
        let mut state = self.state();
        state.calls.push(ApiCall::CreateSavepoint {
            job_id: job_id.to_owned(),
            target_directory: target_directory.to_owned(),
        });

        if let Some(failure) = &state.create_savepoint_failure {
            return Err(failure.to_error());
        }
        Ok(format!("savepoint-request-{job_id}"))
    }

    async fn monitor_savepoint(
        &self,
        job_id: &str,
        request_id: &str,
    ) -> ApiResult<SavepointStatus> {
        let mut state = self.state();
        state.calls.push(ApiCall::MonitorSavepoint {
            job_id: job_id.to_owned(),
            request_id: request_id.to_owned(),
        });

        if state.monitor_failures > 0 {
            state.monitor_failures -= 1;
            return Err(ApiError::UnexpectedStatus {
                status: 503,
                body: "service unavailable".to_owned(),
            });
        }

        match state.savepoint_statuses.len() {
            0 => Ok(SavepointStatus::Completed),
            1 => Ok(state.savepoint_statuses[0].clone()),
            _ => Ok(state
                .savepoint_statuses
                .pop_front()
                .unwrap_or(SavepointStatus::Completed)),
        }
    }

    async fn terminate(&self, job_id: &str, mode: Option<TerminationMode>) -> ApiResult<()> {
        let mut state = self.state();
        state.calls.push(ApiCall::Terminate {
            job_id: job_id.to_owned(),
            mode,
        });

        if let Some(failure) = &state.terminate_failure {
            return Err(failure.to_error());
        }
        Ok(())
    }

    async fn upload_jar(&self, path: &Path) -> ApiResult<UploadedJar> {
        let mut state = self.state();
        state.calls.push(ApiCall::UploadJar {
            path: path.to_path_buf(),
        });

        if let Some(failure) = &state.upload_failure {
            return Err(failure.to_error());
        }

        let filename = state
            .uploaded_filename
            .clone()
            .unwrap_or_else(|| format!("/data/uploads/{}", path.to_string_lossy()));
        Ok(UploadedJar {
            filename,
            status: "success".to_owned(),
        })
    }

    async fn run_jar(&self, run: &JarRun) -> ApiResult<()> {
        let mut state = self.state();
        state.calls.push(ApiCall::RunJar {
            jar_id: run.jar_id.clone(),
            savepoint_path: run.savepoint_path.clone(),
        });

        if let Some(failure) = &state.run_failure {
            return Err(failure.to_error());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_job(id: &str, name: &str) -> Job {
        Job {
            id: id.to_owned(),
            name: name.to_owned(),
            status: "RUNNING".to_owned(),
            start_time: None,
        }
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let mock = MockJobManager::with_jobs(vec![running_job("j1", "WordCount")]);

        mock.retrieve_jobs().await.unwrap();
        let request_id = mock.create_savepoint("j1", "/data/savepoints").await.unwrap();
        mock.monitor_savepoint("j1", &request_id).await.unwrap();
        mock.terminate("j1", Some(TerminationMode::Cancel)).await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                ApiCall::RetrieveJobs,
                ApiCall::CreateSavepoint {
                    job_id: "j1".to_owned(),
                    target_directory: "/data/savepoints".to_owned(),
                },
                ApiCall::MonitorSavepoint {
                    job_id: "j1".to_owned(),
                    request_id: "savepoint-request-j1".to_owned(),
                },
                ApiCall::Terminate {
                    job_id: "j1".to_owned(),
                    mode: Some(TerminationMode::Cancel),
                },
            ]
        );
    }

    #[tokio::test]
    async fn last_scripted_status_repeats() {
        let mock = MockJobManager::new();
        mock.script_savepoint_statuses(vec![SavepointStatus::InProgress]);

        for _ in 0..3 {
            let status = mock.monitor_savepoint("j1", "r1").await.unwrap();
            assert_eq!(status, SavepointStatus::InProgress);
        }
    }

    #[tokio::test]
    async fn scripted_statuses_drain_to_completion() {
        let mock = MockJobManager::new();
        mock.script_savepoint_statuses(vec![
            SavepointStatus::InProgress,
            SavepointStatus::InProgress,
            SavepointStatus::Completed,
        ]);

        assert_eq!(
            mock.monitor_savepoint("j1", "r1").await.unwrap(),
            SavepointStatus::InProgress
        );
        assert_eq!(
            mock.monitor_savepoint("j1", "r1").await.unwrap(),
            SavepointStatus::InProgress
        );
        assert_eq!(
            mock.monitor_savepoint("j1", "r1").await.unwrap(),
            SavepointStatus::Completed
        );
    }

    #[tokio::test]
    async fn scripted_failures_surface() {
        let mock = MockJobManager::new();
        mock.fail_terminate(404, "job not found");

        let error = mock.terminate("gone", None).await.unwrap_err();
        match error {
            ApiError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "job not found");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }
}
