//! Deployment operations against a single job manager.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use flinkctl_api::{JarRun, Job, JobManagerApi, TerminationMode};
use tracing::info;

use crate::artifact;
use crate::config::DeployerConfig;
use crate::error::{OpsError, OpsResult};
use crate::fs::Filesystem;
use crate::locator;
use crate::savepoint;
use crate::state::UpdateFlow;
use crate::types::{ArtifactSource, DeploySpec, TerminateSpec, UpdateSpec};

/// Keep only running jobs whose name starts with `name_base`.
///
/// The input order is preserved; the overview already carries unique ids, so
/// no dedup is needed.
#[must_use]
pub fn filter_running_jobs_by_name(jobs: &[Job], name_base: &str) -> Vec<Job> {
    jobs.iter()
        .filter(|job| job.is_running() && job.name.starts_with(name_base))
        .cloned()
        .collect()
}

/// The jar id is the filename component after the last path separator of the
/// upload response.
fn extract_jar_id(filename: &str) -> &str {
    filename.rsplit('/').next().unwrap_or(filename)
}

/// Executes deployment operations against one job manager.
///
/// All remote and filesystem access goes through the injected collaborators,
/// so the orchestration logic runs unchanged against in-memory doubles in
/// tests. The cluster is the sole source of truth: no job state is cached
/// across calls.
pub struct JobOperator {
    api: Arc<dyn JobManagerApi>,
    filesystem: Arc<dyn Filesystem>,
    config: DeployerConfig,
}

impl JobOperator {
    /// Create a new operator.
    pub fn new(
        api: Arc<dyn JobManagerApi>,
        filesystem: Arc<dyn Filesystem>,
        config: DeployerConfig,
    ) -> Self {
        Self {
            api,
            filesystem,
            config,
        }
    }

    /// All jobs currently known to the cluster, in the order it reports them.
    pub async fn list_jobs(&self) -> OpsResult<Vec<Job>> {
        self.api
            .retrieve_jobs()
            .await
            .map_err(|source| OpsError::RetrieveJobs { source })
    }

    /// Resolve the newest savepoint under `dir`.
    pub async fn latest_savepoint(&self, dir: &str) -> OpsResult<String> {
        locator::latest_savepoint(self.filesystem.as_ref(), dir)
            .await
            .map_err(|source| OpsError::LatestSavepoint { source })
    }

    /// Deploy a job: stage the artifact, upload it, run it.
    ///
    /// Failures surface the underlying error unchanged; deploy performs no
    /// retries of its own.
    pub async fn deploy(&self, spec: DeploySpec) -> OpsResult<()> {
        info!("starting deploy");

        if let Some(path) = &spec.resume_from {
            info!(savepoint = %path, "resuming from savepoint");
        }
        if spec.allow_non_restored_state {
            info!("allowing non-restored state");
        }

        let local_path = self.stage_artifact(&spec.artifact).await?;

        info!(artifact = %local_path.display(), "uploading JAR");
        let uploaded = self.api.upload_jar(&local_path).await?;
        let jar_id = extract_jar_id(&uploaded.filename);

        info!(jar_id, "running job");
        self.api
            .run_jar(&JarRun {
                jar_id: jar_id.to_owned(),
                entry_class: spec.entry_class,
                program_args: spec.program_args,
                parallelism: spec.parallelism,
                savepoint_path: spec.resume_from,
                allow_non_restored_state: spec.allow_non_restored_state,
            })
            .await?;

        Ok(())
    }

    /// Update a running job: snapshot it, cancel it, redeploy from the
    /// snapshot.
    ///
    /// Exactly one running instance must match `job_name_base`; zero matches
    /// fall back to a fresh deploy only when the spec asks for it, and
    /// several matches abort rather than guess. Deliberately not idempotent:
    /// updating an already-updated job snapshots and bounces it again.
    pub async fn update(&self, spec: UpdateSpec) -> OpsResult<()> {
        if spec.job_name_base.is_empty() {
            return Err(OpsError::UnspecifiedArgument("job_name_base"));
        }
        if spec.savepoint_dir.is_empty() {
            return Err(OpsError::UnspecifiedArgument("savepoint_dir"));
        }

        info!(
            job_name_base = %spec.job_name_base,
            savepoint_dir = %spec.savepoint_dir,
            "starting job update"
        );

        let jobs = self
            .api
            .retrieve_jobs()
            .await
            .map_err(|source| OpsError::RetrieveJobs { source })?;
        let running = filter_running_jobs_by_name(&jobs, &spec.job_name_base);

        let resume_from = match running.as_slice() {
            [] if !spec.fallback_to_deploy => {
                return Err(OpsError::NoInstanceRunning {
                    name_base: spec.job_name_base.clone(),
                });
            }
            [] => {
                info!(
                    job_name_base = %spec.job_name_base,
                    "no instance running, falling back to deploy"
                );
                None
            }
            [job] => self.snapshot_and_replace(job.clone(), &spec).await?,
            many => {
                return Err(OpsError::AmbiguousJobName {
                    name_base: spec.job_name_base.clone(),
                    count: many.len(),
                });
            }
        };

        let deploy = spec.to_deploy(resume_from);
        self.deploy(deploy).await
    }

    /// Terminate a job by id.
    pub async fn terminate(&self, spec: TerminateSpec) -> OpsResult<()> {
        if spec.job_id.is_empty() {
            return Err(OpsError::UnspecifiedArgument("job_id"));
        }

        info!(job_id = %spec.job_id, mode = ?spec.mode, "terminating job");

        self.api
            .terminate(&spec.job_id, spec.mode)
            .await
            .map_err(|source| OpsError::Terminate {
                job_id: spec.job_id.clone(),
                source,
            })
    }

    /// Snapshot the matched instance, cancel it, and locate the resume path.
    ///
    /// The returned path is the savepoint the new version resumes from.
    /// Cancellation happens strictly after the snapshot is confirmed durable,
    /// witnessed by the [`UpdateFlow`] phases.
    async fn snapshot_and_replace(
        &self,
        job: Job,
        spec: &UpdateSpec,
    ) -> OpsResult<Option<String>> {
        info!(job_id = %job.id, job_name = %job.name, "found exactly one running instance");

        let flow = UpdateFlow::matched(job);
        let job_id = flow.job().id.clone();

        let request_id =
            savepoint::trigger_savepoint(self.api.as_ref(), &job_id, &spec.savepoint_dir).await?;
        let budget = Duration::from_secs(self.config.savepoints.creation_timeout_secs);
        savepoint::await_savepoint(self.api.as_ref(), &job_id, &request_id, budget).await?;
        let flow = flow.snapshot_confirmed();

        info!(job_id = %job_id, "cancelling old job instance");
        self.api
            .terminate(&job_id, Some(TerminationMode::Cancel))
            .await
            .map_err(|source| OpsError::Cancel {
                job_id: job_id.clone(),
                source,
            })?;
        let flow = flow.cancelled();

        let savepoint_path = locator::latest_savepoint(self.filesystem.as_ref(), &spec.savepoint_dir)
            .await
            .map_err(|source| OpsError::LatestSavepoint { source })?;
        let flow = flow.resolved(savepoint_path);

        Ok(flow.into_resume_path())
    }

    async fn stage_artifact(&self, source: &ArtifactSource) -> OpsResult<PathBuf> {
        match source {
            ArtifactSource::Local(path) => Ok(path.clone()),
            ArtifactSource::Remote { url, api_token } => {
                let target = self.config.artifacts.staging_path.clone();
                info!(url, target = %target.display(), "downloading remote artifact");
                artifact::download(url, api_token.as_deref(), &target)
                    .await
                    .map_err(|source| OpsError::Download {
                        url: url.clone(),
                        source,
                    })?;
                Ok(target)
            }
        }
    }
}

impl std::fmt::Debug for JobOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobOperator").finish_non_exhaustive()
    }
}
