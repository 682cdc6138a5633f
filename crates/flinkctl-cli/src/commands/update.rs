//! Implementation of the `flinkctl update` command.

use std::path::PathBuf;

use clap::Args;
use flinkctl_ops::UpdateSpec;

/// Arguments for the update command.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Base name of the job to update
    #[arg(long = "job-name-base")]
    pub job_name_base: String,

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

    /// Directory the savepoint is written to and resolved from
    #[arg(long = "savepoint-dir")]
    pub savepoint_dir: String,

    /// Allow the job to run if the state cannot be restored
    #[arg(long = "allow-non-restored-state")]
    pub allow_non_restored_state: bool,

    /// Deploy the job fresh if no running instance is found
    #[arg(long = "fallback-to-deploy")]
    pub fallback_to_deploy: bool,
}

pub async fn run(args: UpdateArgs) -> anyhow::Result<()> {
    let operator = super::operator()?;

    let spec = UpdateSpec {
        job_name_base: args.job_name_base,
        savepoint_dir: args.savepoint_dir,
        fallback_to_deploy: args.fallback_to_deploy,
        artifact: super::artifact_source(args.file_name, args.remote_file_name, args.api_token)?,
        entry_class: args.entry_class,
        parallelism: args.parallelism,
        program_args: args.program_args,
        allow_non_restored_state: args.allow_non_restored_state,
    };

    operator.update(spec).await?;
    println!("Job successfully updated");

    Ok(())
}
