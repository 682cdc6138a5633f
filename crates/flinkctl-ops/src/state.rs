//! Typestate witness for the single-instance update path.
//!
//! The destructive steps of an update are ordered in the type system: the
//! old job can only be cancelled after its savepoint is confirmed durable,
//! and a resume path only exists after cancellation. Skipping a step is a
//! compile-time error, not a runtime one.
//!
//! ```text
//! Matched ──▶ Snapshotted ──▶ Cancelled ──▶ Resolved
//! ```

use std::marker::PhantomData;

use flinkctl_api::Job;

/// Marker trait for update phases.
pub trait UpdatePhase: private::Sealed + Send + Sync {
    /// Phase name for logging and error reporting.
    fn name() -> &'static str;
}

mod private {
    pub trait Sealed {}
}

/// Exactly one running instance was matched.
#[derive(Debug, Clone, Copy)]
pub struct Matched;

/// The instance's savepoint is confirmed durable.
#[derive(Debug, Clone, Copy)]
pub struct Snapshotted;

/// The old instance was cancelled.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

/// The resume savepoint was located.
#[derive(Debug, Clone, Copy)]
pub struct Resolved;

impl private::Sealed for Matched {}
impl private::Sealed for Snapshotted {}
impl private::Sealed for Cancelled {}
impl private::Sealed for Resolved {}

impl UpdatePhase for Matched {
    fn name() -> &'static str {
        "matched"
    }
}

impl UpdatePhase for Snapshotted {
    fn name() -> &'static str {
        "snapshotted"
    }
}

impl UpdatePhase for Cancelled {
    fn name() -> &'static str {
        "cancelled"
    }
}

impl UpdatePhase for Resolved {
    fn name() -> &'static str {
        "resolved"
    }
}

/// The in-flight update of one matched job.
#[derive(Debug)]
pub struct UpdateFlow<S: UpdatePhase> {
    job: Job,
    resume_from: Option<String>,
    _phase: PhantomData<S>,
}

impl<S: UpdatePhase> UpdateFlow<S> {
    /// The job being updated.
    #[must_use]
    pub const fn job(&self) -> &Job {
        &self.job
    }

    /// Current phase name.
    #[must_use]
    pub fn phase_name(&self) -> &'static str {
        S::name()
    }

    fn transition<T: UpdatePhase>(self) -> UpdateFlow<T> {
        UpdateFlow {
            job: self.job,
            resume_from: self.resume_from,
            _phase: PhantomData,
        }
    }
}

impl UpdateFlow<Matched> {
    /// Start an update flow for the single matched instance.
    #[must_use]
    pub const fn matched(job: Job) -> Self {
        Self {
            job,
            resume_from: None,
            _phase: PhantomData,
        }
    }

    /// Witness that the savepoint completed within its budget.
    #[must_use]
    pub fn snapshot_confirmed(self) -> UpdateFlow<Snapshotted> {
        self.transition()
    }
}

impl UpdateFlow<Snapshotted> {
    /// Witness that the old instance was cancelled.
    #[must_use]
    pub fn cancelled(self) -> UpdateFlow<Cancelled> {
        self.transition()
    }
}

impl UpdateFlow<Cancelled> {
    /// Record the located savepoint as the resume path.
    #[must_use]
    pub fn resolved(mut self, savepoint_path: String) -> UpdateFlow<Resolved> {
        self.resume_from = Some(savepoint_path);
        self.transition()
    }
}

impl UpdateFlow<Resolved> {
    /// The resume path for the new job version. Always set once resolved.
    #[must_use]
    pub fn into_resume_path(self) -> Option<String> {
        self.resume_from
    }
}
