//! `subtranslate jobs`: drains or inspects the durable job queue.

use anyhow::{Context, Result};

use crate::cli::{Args, JobsCommand};
use crate::cache::{CachePolicy, SqliteCache};
use crate::config::ConfigManager;
use crate::jobs::{JobRunner, SqliteJobQueue};
use crate::ui::{Spinner, Style};

use super::{build_orchestrator, load_settings};

pub async fn run_jobs(args: &Args, command: &JobsCommand) -> Result<()> {
    match command {
        JobsCommand::Run { limit } => run_pending(args, *limit).await,
        JobsCommand::Count => print_count(),
    }
}

async fn run_pending(args: &Args, limit: Option<usize>) -> Result<()> {
    let settings = load_settings(args)?;
    let (orchestrator, queue) = build_orchestrator(&settings)?;

    let summary = {
        let _spinner = Spinner::new("Running translation jobs...");
        JobRunner::new(&orchestrator)
            .run_pending(queue.as_ref(), limit)
            .await
            .context("Failed to read job queue")?
    };

    if matches!(settings.cache_policy, CachePolicy::Ttl(_)) {
        let purged = SqliteCache::open(&settings.database_path)?.purge_expired()?;
        tracing::info!(purged, "Purged expired cache entries");
    }

    println!(
        "{} {} succeeded, {} failed, {} skipped",
        Style::success("Done:"),
        summary.succeeded,
        summary.failed,
        summary.skipped
    );
    Ok(())
}

/// Needs only the database location, so no service must be configured.
fn print_count() -> Result<()> {
    let config_file = ConfigManager::new().load_or_default()?;
    let queue = SqliteJobQueue::open(config_file.database_path())?;
    println!("{}", queue.len()?);
    Ok(())
}
