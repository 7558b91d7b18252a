use reqwest::Client;

use super::http::build_client;
use super::providers::Provider;
use super::request::TranslationRequest;
use super::service::{ServiceConfig, ServiceKind};
use crate::error::Result;

/// Hard cap on the size of text sent to any provider (128 KiB).
pub const MAX_TEXT_BYTES: usize = 131_072;

/// Sends translation requests to the configured provider.
///
/// The client holds no per-request state. A `None` result is the failure
/// signal and must never be cached.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    http: Client,
    provider: Provider,
}

impl TranslationClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            http: build_client(config)?,
            provider: Provider::from_config(config),
        })
    }

    pub const fn service(&self) -> ServiceKind {
        self.provider.kind()
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Option<String> {
        if request.text.is_empty() || request.target_lang.trim().is_empty() {
            return None;
        }

        if request.text.len() > MAX_TEXT_BYTES {
            tracing::error!(
                length = request.text.len(),
                kind = %request.kind,
                "Text too large to translate"
            );
            return None;
        }

        let target_lang = request.target_lang.to_lowercase();
        let request = TranslationRequest {
            target_lang,
            ..request.clone()
        };

        tracing::debug!(
            provider = self.service().display_name(),
            kind = %request.kind,
            target = %request.target_lang,
            length = request.text.len(),
            "Calling translation provider"
        );

        self.provider
            .translate(&self.http, &request)
            .await
            .filter(|text| !text.is_empty())
    }
}
