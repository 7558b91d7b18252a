//! Supported-language catalog of the active provider.
//!
//! The list is fetched once per [`LanguageCatalog`] instance and kept for its
//! lifetime. Raw HTTP responses additionally go through the [`CacheStore`]
//! under their URL, so the cache TTL governs how often a fresh process
//! refetches. A failed fetch memoizes an empty list for the instance so the
//! provider is not asked again on every lookup; its body is not cached.

use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tokio::sync::OnceCell;

use super::http::{build_client, send};
use super::service::{ServiceConfig, ServiceKind};
use crate::cache::CacheStore;
use crate::error::Result;

/// Language code to display name, codes lower-cased.
pub type LanguageMap = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
struct DeepLLanguage {
    language: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct GoogleLanguages {
    data: GoogleData,
}

#[derive(Debug, Deserialize)]
struct GoogleData {
    #[serde(default)]
    languages: Vec<GoogleLanguage>,
}

#[derive(Debug, Deserialize)]
struct GoogleLanguage {
    language: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CodeNameLanguage {
    code: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LingvaLanguages {
    languages: Vec<CodeNameLanguage>,
}

#[derive(Debug)]
pub struct LanguageCatalog {
    http: Client,
    service: ServiceConfig,
    cache: CacheStore,
    languages: OnceCell<LanguageMap>,
}

impl LanguageCatalog {
    pub fn new(service: &ServiceConfig, cache: CacheStore) -> Result<Self> {
        Ok(Self {
            http: build_client(service)?,
            service: service.clone(),
            cache,
            languages: OnceCell::new(),
        })
    }

    /// Forgets the memoized list so the next call refetches.
    pub fn reset(&mut self) {
        self.languages.take();
    }

    pub async fn supported_languages(&self) -> &LanguageMap {
        self.languages
            .get_or_init(|| async {
                self.fetch_supported_languages()
                    .await
                    .unwrap_or_default()
            })
            .await
    }

    pub async fn is_language_supported(&self, code: &str) -> bool {
        self.supported_languages()
            .await
            .contains_key(&code.to_lowercase())
    }

    pub async fn language_name(&self, code: &str) -> Option<String> {
        self.supported_languages()
            .await
            .get(&code.to_lowercase())
            .cloned()
    }

    /// Provider code to local (wiki) code aliases.
    pub fn language_code_map(&self) -> BTreeMap<&'static str, &'static str> {
        match self.service.kind {
            ServiceKind::LibreTranslate => BTreeMap::from([("zt", "zh-hant")]),
            ServiceKind::DeepL | ServiceKind::Google | ServiceKind::Lingva => BTreeMap::new(),
        }
    }

    /// Maps a local language code to the code the provider expects.
    pub fn provider_code(&self, local: &str) -> String {
        self.language_code_map()
            .into_iter()
            .find(|(_, alias)| alias.eq_ignore_ascii_case(local))
            .map_or_else(|| local.to_string(), |(code, _)| code.to_string())
    }

    /// Maps a provider language code to the local code.
    pub fn local_code(&self, provider: &str) -> String {
        let provider = provider.to_lowercase();
        self.language_code_map()
            .get(provider.as_str())
            .map_or(provider, |alias| (*alias).to_string())
    }

    async fn fetch_supported_languages(&self) -> std::result::Result<LanguageMap, ()> {
        let languages: LanguageMap = match self.service.kind {
            ServiceKind::DeepL => {
                let url = self.service.endpoint("/v2/languages");
                let request = self
                    .http
                    .get(&url)
                    .query(&[("type", "source")])
                    .header(
                        reqwest::header::AUTHORIZATION,
                        format!(
                            "DeepL-Auth-Key {}",
                            self.service.api_key.as_deref().unwrap_or_default()
                        ),
                    );
                let body = self.fetch(&url, request).await?;
                parse_json::<Vec<DeepLLanguage>>(&body)?
                    .into_iter()
                    .map(|l| (l.language.to_lowercase(), l.name))
                    .collect()
            }
            ServiceKind::Google => {
                let url = self.service.endpoint("/languages");
                let request = self.http.get(&url).query(&[
                    ("key", self.service.api_key.as_deref().unwrap_or_default()),
                    ("target", "en"),
                ]);
                let body = self.fetch(&url, request).await?;
                parse_json::<GoogleLanguages>(&body)?
                    .data
                    .languages
                    .into_iter()
                    .map(|l| {
                        let code = l.language.to_lowercase();
                        let name = l.name.unwrap_or_else(|| code.clone());
                        (code, name)
                    })
                    .collect()
            }
            ServiceKind::LibreTranslate => {
                let url = self.service.endpoint("/languages");
                let body = self.fetch(&url, self.http.get(&url)).await?;
                parse_json::<Vec<CodeNameLanguage>>(&body)?
                    .into_iter()
                    .map(|l| (self.local_code(&l.code), l.name))
                    .collect()
            }
            ServiceKind::Lingva => {
                let url = self.service.endpoint("/api/v1/languages/target");
                let body = self.fetch(&url, self.http.get(&url)).await?;
                parse_json::<LingvaLanguages>(&body)?
                    .languages
                    .into_iter()
                    .map(|l| (l.code.to_lowercase(), l.name))
                    .collect()
            }
        };

        tracing::debug!(
            provider = self.service.kind.display_name(),
            count = languages.len(),
            "Loaded supported languages"
        );
        Ok(languages)
    }

    /// Returns the response body for `url`, from the cache when possible.
    async fn fetch(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<String, ()> {
        if let Some(cached) = self.cache.get(url) {
            return Ok(cached);
        }

        let Some(body) = send(request, self.service.kind.display_name()).await else {
            tracing::error!(url, "Request for supported languages failed");
            return Err(());
        };

        self.cache.store(url, &body);
        Ok(body)
    }
}

fn parse_json<T: for<'de> Deserialize<'de>>(body: &str) -> std::result::Result<T, ()> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Malformed language list response");
    })
}
