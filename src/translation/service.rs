//! Translation service selection and connection settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Public Google Cloud Translation v2 endpoint.
pub const GOOGLE_TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The closed set of supported translation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    DeepL,
    Google,
    LibreTranslate,
    Lingva,
}

/// Options a service may require in its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOption {
    Url,
    ApiKey,
}

impl ServiceOption {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::ApiKey => "api_key",
        }
    }
}

impl ServiceKind {
    pub const ALL: [Self; 4] = [Self::DeepL, Self::Google, Self::LibreTranslate, Self::Lingva];

    /// Configuration identifier (`type = "..."`).
    pub const fn id(self) -> &'static str {
        match self {
            Self::DeepL => "deepl",
            Self::Google => "google",
            Self::LibreTranslate => "libretranslate",
            Self::Lingva => "lingva",
        }
    }

    /// Human-readable provider name used in logs.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DeepL => "DeepL",
            Self::Google => "Google Translate",
            Self::LibreTranslate => "LibreTranslate",
            Self::Lingva => "Lingva",
        }
    }

    pub const fn required_options(self) -> &'static [ServiceOption] {
        match self {
            Self::DeepL => &[ServiceOption::Url, ServiceOption::ApiKey],
            Self::Google => &[ServiceOption::ApiKey],
            Self::LibreTranslate | Self::Lingva => &[ServiceOption::Url],
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ServiceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| Error::UnsupportedService(s.to_string()))
    }
}

/// Connection settings for the single active provider.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub kind: ServiceKind,
    /// Base URL without a trailing slash.
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub http_proxy: Option<String>,
}

impl ServiceConfig {
    /// Validates the options required by `kind` and builds the settings.
    ///
    /// Google falls back to its public endpoint when no URL is given.
    pub fn new(kind: ServiceKind, url: Option<String>, api_key: Option<String>) -> Result<Self> {
        let url = url.filter(|u| !u.trim().is_empty());
        let api_key = api_key.filter(|k| !k.trim().is_empty());

        for option in kind.required_options() {
            let present = match option {
                ServiceOption::Url => url.is_some(),
                ServiceOption::ApiKey => api_key.is_some(),
            };
            if !present {
                return Err(Error::MissingServiceOption {
                    service: kind.id(),
                    option: option.name(),
                });
            }
        }

        let url = url.unwrap_or_else(|| GOOGLE_TRANSLATE_URL.to_string());

        Ok(Self {
            kind,
            url: url.trim_end_matches('/').to_string(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
            http_proxy: None,
        })
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.http_proxy = proxy.filter(|p| !p.is_empty());
        self
    }

    /// Joins an endpoint suffix onto the base URL.
    pub fn endpoint(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.url)
    }
}
