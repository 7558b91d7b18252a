//! # subtranslate
//!
//! Machine translation for wiki language subpages. A request for
//! `Page/de` is served from the translation cache, translated inline, or
//! handed to a background job while a placeholder is shown.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate rendered HTML of page 2, revision 9, into German
//! subtranslate view --page-id 2 --revision-id 9 --to de --title "Main Page" page.html
//!
//! # Drain queued translation jobs
//! subtranslate jobs run
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `~/.config/subtranslate/config.toml`:
//!
//! ```toml
//! [service]
//! type = "libretranslate"
//! url = "http://localhost:5000"
//!
//! [translate]
//! use_job_queue = true
//!
//! [cache]
//! ttl = 86400
//! ```

/// Translation cache: keys, policy, and storage backends.
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and resolution.
pub mod config;

/// Library error type.
pub mod error;

/// Input reading from files and stdin.
pub mod input;

/// Background translation jobs and queues.
pub mod jobs;

/// Diagnostic logging setup.
pub mod logging;

/// Request-time translation orchestration.
pub mod orchestrator;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Translation providers and the language catalog.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;

pub use error::{Error, Result};
