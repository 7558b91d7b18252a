//! Library error type.
//!
//! Only hard failures live here. A provider answering with a non-200 status,
//! oversized input, or an aborted chunk sequence is a soft failure and is
//! reported as `None` by [`TranslationClient`](crate::translation::TranslationClient).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The configured translation service type is unknown or unset.
    #[error("Unsupported machine translation service configured: '{0}'")]
    UnsupportedService(String),

    /// The configured service needs an option that was not provided.
    #[error("Service '{service}' requires the '{option}' option")]
    MissingServiceOption {
        service: &'static str,
        option: &'static str,
    },

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cache backend error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("Invalid job parameters: {0}")]
    Job(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for errors an operator must fix in the configuration.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedService(_) | Self::MissingServiceOption { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
