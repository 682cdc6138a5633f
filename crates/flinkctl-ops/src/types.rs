//! Operation specifications.
//!
//! These are caller-constructed value objects: built once per invocation and
//! never mutated by the operations that consume them. The update operation
//! derives a fresh [`DeploySpec`] instead of touching the caller's
//! [`UpdateSpec`].

use std::path::PathBuf;

use flinkctl_api::TerminationMode;

/// Where the job artifact comes from.
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// A JAR already on the local filesystem.
    Local(PathBuf),
    /// A JAR fetched over HTTP and staged locally before upload.
    Remote {
        /// URL of the JAR.
        url: String,
        /// Token sent as a `PRIVATE-TOKEN` header for registries that
        /// require it.
        api_token: Option<String>,
    },
}

/// Parameters for deploying a job.
#[derive(Debug, Clone)]
pub struct DeploySpec {
    /// The job artifact.
    pub artifact: ArtifactSource,
    /// Fully qualified entry class, when the JAR manifest does not name one.
    pub entry_class: Option<String>,
    /// Job parallelism.
    pub parallelism: u32,
    /// Program arguments, in order.
    pub program_args: Vec<String>,
    /// Savepoint path to resume from; `None` starts fresh.
    pub resume_from: Option<String>,
    /// Allow starting even if some savepoint state cannot be mapped onto the
    /// new job graph.
    pub allow_non_restored_state: bool,
}

/// Parameters for updating a running job in place.
///
/// `job_name_base` and `savepoint_dir` are both required and non-empty;
/// anything else is a configuration error caught before any network call.
#[derive(Debug, Clone)]
pub struct UpdateSpec {
    /// Name prefix identifying the logical job.
    pub job_name_base: String,
    /// Directory savepoints are written to and resolved from.
    pub savepoint_dir: String,
    /// Deploy fresh when no running instance matches.
    pub fallback_to_deploy: bool,
    /// The new job artifact.
    pub artifact: ArtifactSource,
    /// Fully qualified entry class, when the JAR manifest does not name one.
    pub entry_class: Option<String>,
    /// Job parallelism.
    pub parallelism: u32,
    /// Program arguments, in order.
    pub program_args: Vec<String>,
    /// Allow starting even if some savepoint state cannot be mapped onto the
    /// new job graph.
    pub allow_non_restored_state: bool,
}

impl UpdateSpec {
    /// Build the deploy spec for the new job version.
    ///
    /// The resume path is owned by the update operation; the caller's spec
    /// is left untouched.
    #[must_use]
    pub fn to_deploy(&self, resume_from: Option<String>) -> DeploySpec {
        DeploySpec {
            artifact: self.artifact.clone(),
            entry_class: self.entry_class.clone(),
            parallelism: self.parallelism,
            program_args: self.program_args.clone(),
            resume_from,
            allow_non_restored_state: self.allow_non_restored_state,
        }
    }
}

/// Parameters for terminating a job.
#[derive(Debug, Clone)]
pub struct TerminateSpec {
    /// Identifier of the job to stop.
    pub job_id: String,
    /// Termination mode; the cluster default applies when unset.
    pub mode: Option<TerminationMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_spec_derives_deploy_spec() {
        let spec = UpdateSpec {
            job_name_base: "WordCount".to_owned(),
            savepoint_dir: "/data/flink".to_owned(),
            fallback_to_deploy: false,
            artifact: ArtifactSource::Local(PathBuf::from("job.jar")),
            entry_class: Some("org.example.WordCount".to_owned()),
            parallelism: 4,
            program_args: vec!["--input".to_owned(), "a".to_owned()],
            allow_non_restored_state: true,
        };

        let deploy = spec.to_deploy(Some("/data/flink/savepoint-1".to_owned()));

        assert_eq!(deploy.parallelism, 4);
        assert_eq!(deploy.entry_class.as_deref(), Some("org.example.WordCount"));
        assert_eq!(deploy.program_args, spec.program_args);
        assert_eq!(deploy.resume_from.as_deref(), Some("/data/flink/savepoint-1"));
        assert!(deploy.allow_non_restored_state);
        // The caller's spec keeps its own fields.
        assert_eq!(spec.savepoint_dir, "/data/flink");
    }
}
