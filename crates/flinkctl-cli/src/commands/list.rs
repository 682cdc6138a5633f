//! Implementation of the `flinkctl list` command.

use anyhow::Context;

pub async fn run() -> anyhow::Result<()> {
    let operator = super::operator()?;
    let jobs = operator.list_jobs().await.context("failed to list jobs")?;

    if jobs.is_empty() {
        println!("No jobs found");
        return Ok(());
    }

    for job in jobs {
        match job.started_at() {
            Some(started) => println!(
                "{} ({}) {} since {}",
                job.name,
                job.id,
                job.status,
                started.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => println!("{} ({}) {}", job.name, job.id, job.status),
        }
    }

    Ok(())
}
