//! Subcommand implementations.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::cache::{CacheStore, SqliteCache};
use crate::config::{ConfigManager, ResolveOptions, Settings, resolve_config};
use crate::jobs::SqliteJobQueue;
use crate::orchestrator::Orchestrator;

use super::Args;

pub mod config;
pub mod jobs;
pub mod languages;
pub mod view;

/// Loads the config file and applies the global CLI overrides.
pub fn load_settings(args: &Args) -> Result<Settings> {
    let config_file = ConfigManager::new().load_or_default()?;
    let options = ResolveOptions {
        service: args.service.clone(),
        url: args.url.clone(),
        no_cache: args.no_cache,
    };
    resolve_config(&options, &config_file)
}

/// Opens the cache described by `settings`.
pub fn open_cache(settings: &Settings) -> Result<CacheStore> {
    if matches!(settings.cache_policy, crate::cache::CachePolicy::Disabled) {
        return Ok(CacheStore::disabled());
    }

    let backend = SqliteCache::open(&settings.database_path).with_context(|| {
        format!(
            "Failed to open cache database: {}",
            settings.database_path.display()
        )
    })?;
    Ok(CacheStore::new(Arc::new(backend), settings.cache_policy))
}

pub fn open_queue(settings: &Settings) -> Result<Arc<SqliteJobQueue>> {
    let queue = SqliteJobQueue::open(&settings.database_path).with_context(|| {
        format!(
            "Failed to open job queue: {}",
            settings.database_path.display()
        )
    })?;
    Ok(Arc::new(queue))
}

/// Everything a render or job run needs, wired from `settings`.
pub fn build_orchestrator(settings: &Settings) -> Result<(Orchestrator, Arc<SqliteJobQueue>)> {
    let cache = open_cache(settings)?;
    let queue = open_queue(settings)?;
    let orchestrator = Orchestrator::from_settings(settings, cache, queue.clone())
        .context("Failed to initialize translation service")?;
    Ok((orchestrator, queue))
}
