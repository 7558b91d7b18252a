//! Background translation jobs.
//!
//! A [`JobRecord`] is the self-contained payload handed to a [`JobQueue`].
//! It carries already-rendered HTML so the job never re-parses wiki markup.

mod memory;
mod runner;
mod sqlite;

use serde_json::{Map, Value};

use crate::cache::CacheKey;
use crate::error::{Error, Result};

pub use memory::MemoryJobQueue;
pub use runner::{JobRunner, RunSummary};
pub use sqlite::SqliteJobQueue;

/// Name under which translation jobs are enqueued.
pub const JOB_NAME: &str = "MachineTranslationJob";

/// Plain, serializable job parameters.
pub type JobParams = Map<String, Value>;

/// Accepts jobs for later execution.
pub trait JobQueue: Send + Sync {
    fn push(&self, job_name: &str, params: JobParams) -> Result<()>;
}

/// A job taken off a queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedJob {
    /// Row id of a leased job; `None` when popping already removed it.
    pub id: Option<i64>,
    pub name: String,
    pub params: JobParams,
}

/// Hands out queued jobs, oldest first.
///
/// A source may lease jobs instead of removing them: a popped job is hidden
/// until [`JobSource::complete`] deletes it or the lease runs out, after which
/// it is handed out again.
pub trait JobSource: Send + Sync {
    fn pop(&self) -> Result<Option<QueuedJob>>;

    /// Marks a popped job as done so it is never handed out again.
    fn complete(&self, _job: &QueuedJob) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub cache_key: CacheKey,
    pub content: String,
    pub source_lang: String,
    pub target_lang: String,
    pub title_text: String,
}

impl JobRecord {
    pub fn to_params(&self) -> JobParams {
        let mut params = Map::new();
        params.insert("cachekey".into(), Value::from(self.cache_key.as_str()));
        params.insert("content".into(), Value::from(self.content.as_str()));
        params.insert("source".into(), Value::from(self.source_lang.as_str()));
        params.insert("target".into(), Value::from(self.target_lang.as_str()));
        params.insert("titletext".into(), Value::from(self.title_text.as_str()));
        params
    }

    pub fn from_params(params: &JobParams) -> Result<Self> {
        let field = |name: &str| -> Result<String> {
            params
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::Job(format!("missing string parameter '{name}'")))
        };

        Ok(Self {
            cache_key: CacheKey::from_raw(field("cachekey")?),
            content: field("content")?,
            source_lang: field("source")?,
            target_lang: field("target")?,
            title_text: field("titletext")?,
        })
    }
}
