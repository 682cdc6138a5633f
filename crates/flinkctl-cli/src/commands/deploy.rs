//! Implementation of the `flinkctl deploy` command.

use std::path::PathBuf;

use clap::Args;
use flinkctl_ops::DeploySpec;

/// Arguments for the deploy command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Path of a local job JAR file
    #[arg(
        long = "file-name",
        conflicts_with = "remote_file_name",
        required_unless_present = "remote_file_name"
    )]
    pub file_name: Option<PathBuf>,

    /// URL of a remote job JAR file to download before upload
    #[arg(long = "remote-file-name")]
    pub remote_file_name: Option<String>,

    /// API token for the remote artifact location
    #[arg(long = "api-token", requires = "remote_file_name")]
    pub api_token: Option<String>,

    /// Entry class name that contains the main method
    #[arg(long = "entry-class")]
    pub entry_class: Option<String>,

    /// Parallelism count
    #[arg(long, default_value_t = 1)]
    pub parallelism: u32,

    /// Program argument; repeat the flag to pass several
    #[arg(long = "program-args")]
    pub program_args: Vec<String>,

    /// Directory to resolve the latest savepoint from
    #[arg(long = "savepoint-dir", conflicts_with = "savepoint_path")]
    pub savepoint_dir: Option<String>,

    /// Exact savepoint path to restore from
    #[arg(long = "savepoint-path")]
    pub savepoint_path: Option<String>,

    /// Allow the job to run if the state cannot be restored
    #[arg(long = "allow-non-restored-state")]
    pub allow_non_restored_state: bool,
}

pub async fn run(args: DeployArgs) -> anyhow::Result<()> {
    let operator = super::operator()?;

    // A savepoint directory is resolved to a concrete path up front, so the
    // deploy operation only ever sees a resolved path or none.
    let resume_from = match (args.savepoint_path, args.savepoint_dir) {
        (Some(path), _) => Some(path),
        (None, Some(dir)) => Some(operator.latest_savepoint(&dir).await?),
        (None, None) => None,
    };

    let spec = DeploySpec {
        artifact: super::artifact_source(args.file_name, args.remote_file_name, args.api_token)?,
        entry_class: args.entry_class,
        parallelism: args.parallelism,
        program_args: args.program_args,
        resume_from,
        allow_non_restored_state: args.allow_non_restored_state,
    };

    operator.deploy(spec).await?;
    println!("Job started successfully");

    Ok(())
}
