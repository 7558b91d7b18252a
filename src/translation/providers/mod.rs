//! One adapter per supported translation service.
//!
//! The active adapter is chosen once from [`ServiceConfig`] and every call
//! dispatches through [`Provider`]. Adapters return `None` on any failure so
//! that callers never cache or render a broken result.

mod deepl;
mod google;
mod libretranslate;
mod lingva;

use reqwest::Client;

use super::request::TranslationRequest;
use super::service::{ServiceConfig, ServiceKind};

pub use deepl::DeepL;
pub use google::Google;
pub use libretranslate::LibreTranslate;
pub use lingva::{LINGVA_MAX_CHUNK_CHARS, Lingva};

#[derive(Debug, Clone)]
pub enum Provider {
    DeepL(DeepL),
    Google(Google),
    LibreTranslate(LibreTranslate),
    Lingva(Lingva),
}

impl Provider {
    pub fn from_config(config: &ServiceConfig) -> Self {
        let api_key = config.api_key.clone();
        match config.kind {
            ServiceKind::DeepL => Self::DeepL(DeepL {
                endpoint: config.endpoint("/v2/translate"),
                api_key: api_key.unwrap_or_default(),
            }),
            ServiceKind::Google => Self::Google(Google {
                endpoint: config.url.clone(),
                api_key: api_key.unwrap_or_default(),
            }),
            ServiceKind::LibreTranslate => Self::LibreTranslate(LibreTranslate {
                endpoint: config.endpoint("/translate"),
                api_key,
            }),
            ServiceKind::Lingva => Self::Lingva(Lingva {
                endpoint: config.endpoint("/api/graphql"),
                max_chunk_chars: LINGVA_MAX_CHUNK_CHARS,
            }),
        }
    }

    pub const fn kind(&self) -> ServiceKind {
        match self {
            Self::DeepL(_) => ServiceKind::DeepL,
            Self::Google(_) => ServiceKind::Google,
            Self::LibreTranslate(_) => ServiceKind::LibreTranslate,
            Self::Lingva(_) => ServiceKind::Lingva,
        }
    }

    pub async fn translate(&self, http: &Client, request: &TranslationRequest) -> Option<String> {
        match self {
            Self::DeepL(p) => p.translate(http, request).await,
            Self::Google(p) => p.translate(http, request).await,
            Self::LibreTranslate(p) => p.translate(http, request).await,
            Self::Lingva(p) => p.translate(http, request).await,
        }
    }
}
