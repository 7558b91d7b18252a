use super::{JOB_NAME, JobRecord, JobSource, QueuedJob};
use crate::error::Result;
use crate::orchestrator::Orchestrator;

/// Summary of one [`JobRunner::run_pending`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Jobs with an unknown name or malformed parameters, dropped unrun.
    pub skipped: usize,
}

impl RunSummary {
    pub const fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

/// Drains a [`JobSource`] through an [`Orchestrator`].
pub struct JobRunner<'a> {
    orchestrator: &'a Orchestrator,
}

impl<'a> JobRunner<'a> {
    pub const fn new(orchestrator: &'a Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Runs jobs until the source is empty or `limit` jobs were taken.
    pub async fn run_pending(
        &self,
        source: &dyn JobSource,
        limit: Option<usize>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        while limit.is_none_or(|limit| summary.total() < limit) {
            let Some(job) = source.pop()? else {
                break;
            };

            match self.run_one(&job).await {
                Some(true) => summary.succeeded += 1,
                Some(false) => summary.failed += 1,
                None => summary.skipped += 1,
            }

            // Failed jobs are dropped too; the next request enqueues afresh.
            if let Err(e) = source.complete(&job) {
                tracing::warn!(job_name = %job.name, error = %e, "Failed to complete job");
            }
        }

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "Job run finished"
        );
        Ok(summary)
    }

    /// `None` when the job was not runnable.
    async fn run_one(&self, job: &QueuedJob) -> Option<bool> {
        if job.name != JOB_NAME {
            tracing::warn!(job_name = %job.name, "Dropping job with unknown name");
            return None;
        }

        match JobRecord::from_params(&job.params) {
            Ok(record) => Some(self.orchestrator.run_job(&record).await),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed translation job");
                None
            }
        }
    }
}
