//! Subcommand implementations.

pub mod deploy;
pub mod list;
pub mod terminate;
pub mod update;

use std::sync::Arc;

use anyhow::Context;
use flinkctl_api::RestClient;
use flinkctl_ops::fs::OsFilesystem;
use flinkctl_ops::{ArtifactSource, DeployerConfig, JobOperator};

/// Build the operator from configuration.
pub(crate) fn operator() -> anyhow::Result<JobOperator> {
    let config = DeployerConfig::load().context("loading configuration")?;
    let client = RestClient::new(&config.cluster).context("creating API client")?;

    Ok(JobOperator::new(
        Arc::new(client),
        Arc::new(OsFilesystem),
        config,
    ))
}

/// Resolve the artifact flags into a source.
///
/// clap already enforces the mutual exclusivity; this is the final check
/// before the core is invoked.
pub(crate) fn artifact_source(
    file_name: Option<std::path::PathBuf>,
    remote_file_name: Option<String>,
    api_token: Option<String>,
) -> anyhow::Result<ArtifactSource> {
    match (file_name, remote_file_name) {
        (Some(path), None) => Ok(ArtifactSource::Local(path)),
        (None, Some(url)) => Ok(ArtifactSource::Remote { url, api_token }),
        (Some(_), Some(_)) => anyhow::bail!(
            "both flags 'file-name' and 'remote-file-name' specified, only one allowed"
        ),
        (None, None) => {
            anyhow::bail!("both flags 'file-name' and 'remote-file-name' unspecified")
        }
    }
}
