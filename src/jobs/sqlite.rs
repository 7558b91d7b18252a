use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

use super::{JobParams, JobQueue, JobSource, QueuedJob};
use crate::cache::sqlite::connect;
use crate::error::{Error, Result};

/// How long a popped job stays hidden before another runner may take it.
pub const DEFAULT_LEASE: Duration = Duration::from_secs(600);

/// Durable job queue stored next to the cache entries.
///
/// Jobs are leased rather than deleted on [`JobSource::pop`]; a runner that
/// dies mid-job leaves the row to be picked up again once the lease expires.
#[derive(Debug, Clone)]
pub struct SqliteJobQueue {
    db_path: PathBuf,
    lease: Duration,
}

impl SqliteJobQueue {
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let queue = Self {
            db_path: db_path.into(),
            lease: DEFAULT_LEASE,
        };
        queue.init_db()?;
        Ok(queue)
    }

    #[must_use]
    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    fn init_db(&self) -> Result<()> {
        let conn = connect(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                job_name TEXT NOT NULL,
                params TEXT NOT NULL,
                enqueued_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                claimed_at INTEGER
            )",
            [],
        )?;

        Ok(())
    }

    /// Number of jobs not yet completed, leased ones included.
    pub fn len(&self) -> Result<usize> {
        let conn = connect(&self.db_path)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl JobQueue for SqliteJobQueue {
    fn push(&self, job_name: &str, params: JobParams) -> Result<()> {
        let params = serde_json::to_string(&params).map_err(|e| Error::Job(e.to_string()))?;
        let conn = connect(&self.db_path)?;

        conn.execute(
            "INSERT INTO jobs (job_name, params) VALUES (?1, ?2)",
            [job_name, params.as_str()],
        )?;

        Ok(())
    }
}

impl JobSource for SqliteJobQueue {
    /// Leases the oldest available job. The claim is a single statement, so
    /// two runners never lease the same row at once.
    fn pop(&self) -> Result<Option<QueuedJob>> {
        let conn = connect(&self.db_path)?;
        let lease = i64::try_from(self.lease.as_secs()).unwrap_or(i64::MAX);

        let row: Option<(i64, String, String)> = conn
            .query_row(
                "UPDATE jobs SET claimed_at = CAST(strftime('%s', 'now') AS INTEGER)
                 WHERE id = (
                     SELECT id FROM jobs
                     WHERE claimed_at IS NULL
                        OR claimed_at <= CAST(strftime('%s', 'now') AS INTEGER) - ?1
                     ORDER BY id LIMIT 1
                 )
                 RETURNING id, job_name, params",
                [lease],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        Ok(row.map(|(id, name, params)| {
            let params = serde_json::from_str(&params).unwrap_or_else(|e| {
                tracing::warn!(job_id = id, error = %e, "Job parameters are not valid JSON");
                JobParams::new()
            });
            QueuedJob {
                id: Some(id),
                name,
                params,
            }
        }))
    }

    fn complete(&self, job: &QueuedJob) -> Result<()> {
        let Some(id) = job.id else {
            return Ok(());
        };

        let conn = connect(&self.db_path)?;
        conn.execute("DELETE FROM jobs WHERE id = ?1", [id])?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn create_test_queue(temp_dir: &TempDir) -> SqliteJobQueue {
        SqliteJobQueue::open(temp_dir.path().join("subtranslate.db")).unwrap()
    }

    #[test]
    fn test_push_and_pop_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let queue = create_test_queue(&temp_dir);

        let mut params = JobParams::new();
        params.insert("cachekey".into(), Value::from("2-9-DE"));
        queue.push("MachineTranslationJob", params.clone()).unwrap();
        queue.push("Other", JobParams::new()).unwrap();
        assert_eq!(queue.len().unwrap(), 2);

        let first = queue.pop().unwrap().unwrap();
        assert_eq!(first.name, "MachineTranslationJob");
        assert_eq!(first.params, params);
        queue.complete(&first).unwrap();

        let second = queue.pop().unwrap().unwrap();
        assert_eq!(second.name, "Other");
        queue.complete(&second).unwrap();

        assert!(queue.pop().unwrap().is_none());
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_jobs_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        create_test_queue(&temp_dir)
            .push("MachineTranslationJob", JobParams::new())
            .unwrap();

        let reopened = create_test_queue(&temp_dir);
        assert_eq!(reopened.len().unwrap(), 1);
    }

    #[test]
    fn test_leased_job_is_hidden_until_completed() {
        let temp_dir = TempDir::new().unwrap();
        let queue = create_test_queue(&temp_dir);
        queue.push("MachineTranslationJob", JobParams::new()).unwrap();

        let job = queue.pop().unwrap().unwrap();
        assert!(queue.pop().unwrap().is_none());
        assert_eq!(queue.len().unwrap(), 1);

        queue.complete(&job).unwrap();
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_uncompleted_job_is_handed_out_after_lease() {
        let temp_dir = TempDir::new().unwrap();
        create_test_queue(&temp_dir)
            .push("MachineTranslationJob", JobParams::new())
            .unwrap();

        // A runner takes the job and dies without completing it.
        let abandoned = create_test_queue(&temp_dir).pop().unwrap().unwrap();

        let next_runner = create_test_queue(&temp_dir).with_lease(Duration::ZERO);
        let retried = next_runner.pop().unwrap().unwrap();
        assert_eq!(retried.id, abandoned.id);
        assert_eq!(retried.name, "MachineTranslationJob");

        next_runner.complete(&retried).unwrap();
        assert!(next_runner.pop().unwrap().is_none());
    }

    #[test]
    fn test_unreadable_params_pop_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let queue = create_test_queue(&temp_dir);
        connect(&temp_dir.path().join("subtranslate.db"))
            .unwrap()
            .execute(
                "INSERT INTO jobs (job_name, params) VALUES ('MachineTranslationJob', '{not json')",
                [],
            )
            .unwrap();
        queue.push("Other", JobParams::new()).unwrap();

        let broken = queue.pop().unwrap().unwrap();
        assert_eq!(broken.name, "MachineTranslationJob");
        assert!(broken.params.is_empty());
        queue.complete(&broken).unwrap();

        assert_eq!(queue.pop().unwrap().unwrap().name, "Other");
    }
}
