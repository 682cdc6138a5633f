//! Wire types for the job manager REST API.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A job as reported by the job manager's overview endpoint.
///
/// This is a point-in-time snapshot owned by the cluster; the deployer only
/// ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier assigned by the cluster.
    #[serde(rename = "jid")]
    pub id: String,
    /// Job name as submitted.
    pub name: String,
    /// Cluster-reported state (e.g. `RUNNING`, `FINISHED`, `CANCELED`).
    ///
    /// Kept as the raw string so states introduced by newer cluster versions
    /// still list correctly.
    #[serde(rename = "state")]
    pub status: String,
    /// Job start time in epoch milliseconds, when reported.
    #[serde(rename = "start-time", default)]
    pub start_time: Option<i64>,
}

impl Job {
    /// Returns true if the cluster reports the job as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == "RUNNING"
    }

    /// Job start time as a UTC timestamp, when reported and valid.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }
}

/// Status of an in-flight savepoint creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavepointStatus {
    /// The savepoint is durable.
    Completed,
    /// The cluster is still writing the savepoint.
    InProgress,
    /// A status string this client does not know about.
    Unknown(String),
}

impl SavepointStatus {
    /// Parse the `status.id` field of the monitoring endpoint.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "COMPLETED" => Self::Completed,
            "IN_PROGRESS" => Self::InProgress,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl fmt::Display for SavepointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "COMPLETED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}

/// How a job is asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationMode {
    /// Cancel the job without draining.
    Cancel,
    /// Stop the job gracefully.
    Stop,
}

impl TerminationMode {
    /// Get the mode as the API's query-parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for TerminationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TerminationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel" => Ok(Self::Cancel),
            "stop" => Ok(Self::Stop),
            _ => Err(format!(
                "unknown termination mode: {s} (only 'cancel' and 'stop' are supported)"
            )),
        }
    }
}

/// Response of the JAR upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedJar {
    /// Server-side path of the stored JAR.
    pub filename: String,
    /// Upload status as reported by the cluster.
    pub status: String,
}

/// Parameters for running an uploaded JAR.
#[derive(Debug, Clone)]
pub struct JarRun {
    /// Identifier of the uploaded JAR (filename component of the upload
    /// response).
    pub jar_id: String,
    /// Fully qualified entry class, when the JAR manifest does not name one.
    pub entry_class: Option<String>,
    /// Program arguments, joined with spaces on the wire.
    pub program_args: Vec<String>,
    /// Job parallelism.
    pub parallelism: u32,
    /// Savepoint path to resume from; `None` starts fresh.
    pub savepoint_path: Option<String>,
    /// Allow starting even if some savepoint state cannot be mapped onto the
    /// new job graph.
    pub allow_non_restored_state: bool,
}
