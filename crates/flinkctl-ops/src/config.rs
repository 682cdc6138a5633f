//! Configuration for the deployer.

use std::path::PathBuf;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use flinkctl_api::ClusterConfig;
use serde::Deserialize;

use crate::error::{OpsError, OpsResult};

/// Top-level configuration for deployment operations.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeployerConfig {
    /// Job manager connection settings.
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Savepoint handling settings.
    #[serde(default)]
    pub savepoints: SavepointConfig,

    /// Artifact staging settings.
    #[serde(default)]
    pub artifacts: ArtifactConfig,
}

impl DeployerConfig {
    /// Load configuration from the default sources.
    ///
    /// Configuration is loaded in the following order (later sources override
    /// earlier):
    /// 1. Default values
    /// 2. `flinkctl.toml` in the current directory (if present)
    /// 3. Environment variables with `FLINKCTL_` prefix
    ///    (e.g. `FLINKCTL_CLUSTER__BASE_URL`)
    pub fn load() -> OpsResult<Self> {
        Figment::new()
            .merge(Toml::file("flinkctl.toml"))
            .merge(Env::prefixed("FLINKCTL_").split("__"))
            .extract()
            .map_err(|e| OpsError::Config(e.to_string()))
    }

    /// Load configuration from a specific TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> OpsResult<Self> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("FLINKCTL_").split("__"))
            .extract()
            .map_err(|e| OpsError::Config(e.to_string()))
    }
}

/// Savepoint handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SavepointConfig {
    /// Elapsed-time budget for a savepoint to complete, in whole seconds.
    ///
    /// Converted once at the start of each update; it is not re-read
    /// mid-poll.
    #[serde(default = "default_creation_timeout_secs")]
    pub creation_timeout_secs: u64,
}

const fn default_creation_timeout_secs() -> u64 {
    60
}

impl Default for SavepointConfig {
    fn default() -> Self {
        Self {
            creation_timeout_secs: default_creation_timeout_secs(),
        }
    }
}

/// Artifact staging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Local path remote JARs are downloaded to before upload.
    #[serde(default = "default_staging_path")]
    pub staging_path: PathBuf,
}

fn default_staging_path() -> PathBuf {
    PathBuf::from("/tmp/job.jar")
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            staging_path: default_staging_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DeployerConfig::default();
        assert_eq!(config.cluster.base_url, "http://localhost:8081");
        assert_eq!(config.savepoints.creation_timeout_secs, 60);
        assert_eq!(config.artifacts.staging_path, PathBuf::from("/tmp/job.jar"));
    }

    #[test]
    fn config_from_toml() {
        let toml = r#"
            [cluster]
            base_url = "http://jobmanager:8081"
            basic_auth_username = "flink"
            timeout_secs = 30

            [savepoints]
            creation_timeout_secs = 120

            [artifacts]
            staging_path = "/var/tmp/staged.jar"
        "#;

        let config: DeployerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.cluster.base_url, "http://jobmanager:8081");
        assert_eq!(config.cluster.timeout_secs, 30);
        assert_eq!(config.savepoints.creation_timeout_secs, 120);
        assert_eq!(
            config.artifacts.staging_path,
            PathBuf::from("/var/tmp/staged.jar")
        );
    }
}
