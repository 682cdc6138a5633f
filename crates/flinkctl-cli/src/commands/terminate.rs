//! Implementation of the `flinkctl terminate` command.

use clap::Args;
use flinkctl_api::TerminationMode;
use flinkctl_ops::TerminateSpec;

/// Arguments for the terminate command.
#[derive(Args, Debug)]
pub struct TerminateArgs {
    /// Identifier of the job to terminate
    #[arg(long = "job-id")]
    pub job_id: String,

    /// Termination mode, 'cancel' or 'stop' (cluster default when omitted)
    #[arg(long)]
    pub mode: Option<TerminationMode>,
}

pub async fn run(args: TerminateArgs) -> anyhow::Result<()> {
    let operator = super::operator()?;

    operator
        .terminate(TerminateSpec {
            job_id: args.job_id,
            mode: args.mode,
        })
        .await?;
    println!("Job successfully terminated");

    Ok(())
}
