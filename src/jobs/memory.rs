use parking_lot::Mutex;
use std::collections::VecDeque;

use super::{JobParams, JobQueue, JobSource, QueuedJob};
use crate::error::Result;

/// In-process FIFO job queue.
#[derive(Debug, Default)]
pub struct MemoryJobQueue {
    jobs: Mutex<VecDeque<QueuedJob>>,
}

impl MemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}

impl JobQueue for MemoryJobQueue {
    fn push(&self, job_name: &str, params: JobParams) -> Result<()> {
        self.jobs.lock().push_back(QueuedJob {
            id: None,
            name: job_name.to_string(),
            params,
        });
        Ok(())
    }
}

impl JobSource for MemoryJobQueue {
    fn pop(&self) -> Result<Option<QueuedJob>> {
        Ok(self.jobs.lock().pop_front())
    }
}
