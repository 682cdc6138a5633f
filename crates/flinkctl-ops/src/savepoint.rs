//! Savepoint coordination: trigger creation, then poll until durable.

use std::time::Duration;

use flinkctl_api::{JobManagerApi, SavepointStatus};
use tracing::{debug, info, warn};

use crate::backoff::ExponentialBackoff;
use crate::error::{OpsError, OpsResult};

/// Trigger savepoint creation for a running job.
///
/// Failure here is terminal: a rejected trigger means the request itself is
/// wrong or the cluster is unreachable, and there is nothing to poll.
pub(crate) async fn trigger_savepoint(
    api: &dyn JobManagerApi,
    job_id: &str,
    target_dir: &str,
) -> OpsResult<String> {
    info!(job_id, target_dir, "creating savepoint");

    api.create_savepoint(job_id, target_dir)
        .await
        .map_err(|source| OpsError::SavepointTrigger {
            job_id: job_id.to_owned(),
            source,
        })
}

/// Poll a savepoint creation request until it completes.
///
/// `IN_PROGRESS`, unknown statuses and poll errors are all retryable within
/// the elapsed budget; only budget exhaustion fails the wait. The budget is
/// converted once at entry and never extended mid-poll.
pub(crate) async fn await_savepoint(
    api: &dyn JobManagerApi,
    job_id: &str,
    request_id: &str,
    budget: Duration,
) -> OpsResult<()> {
    let mut backoff = ExponentialBackoff::new(budget);

    loop {
        debug!(job_id, request_id, "checking status of savepoint creation");

        match api.monitor_savepoint(job_id, request_id).await {
            Ok(SavepointStatus::Completed) => {
                info!(job_id, request_id, "savepoint completed");
                return Ok(());
            }
            Ok(SavepointStatus::InProgress) => {
                debug!(job_id, request_id, "savepoint creation still pending");
            }
            Ok(SavepointStatus::Unknown(status)) => {
                warn!(job_id, request_id, %status, "savepoint creation reported an unknown status");
            }
            Err(error) => {
                warn!(job_id, request_id, error = %error, "savepoint status poll failed, will retry");
            }
        }

        let Some(delay) = backoff.next_interval() else {
            return Err(OpsError::SavepointTimeout {
                job_id: job_id.to_owned(),
                budget_secs: budget.as_secs(),
            });
        };
        tokio::time::sleep(delay).await;
    }
}
