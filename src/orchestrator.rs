//! Request-time translation orchestration.
//!
//! Per cache key a translation is either absent, being processed by a
//! background job (a progress marker exists), or cached. [`Orchestrator::render`]
//! serves the request path and [`Orchestrator::run_job`] is the job path.
//!
//! The progress marker is a deduplication hint, not a lock: two requests that
//! both observe "no marker" will both enqueue. Jobs are idempotent, so the
//! only cost is a duplicate provider call.

use std::sync::Arc;

use crate::cache::{CacheKey, CacheStore};
use crate::config::Settings;
use crate::error::Result;
use crate::jobs::{JOB_NAME, JobQueue, JobRecord};
use crate::translation::{LanguageCatalog, TranslationClient, TranslationRequest};

/// Value stored under the progress marker key.
pub const PROGRESS_MARKER: &str = "processing";

/// Message shown while a background job is outstanding.
pub const PROCESSING_MESSAGE: &str = "This page is being translated. Please check back shortly.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Defer translation to the job queue instead of translating inline.
    pub use_job_queue: bool,
    pub translate_title: bool,
    pub suppress_language_caption: bool,
    pub robot_policy: Option<String>,
}

impl RenderOptions {
    const fn wants_title(&self) -> bool {
        self.translate_title && !self.suppress_language_caption
    }
}

/// Everything known about the base page at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_id: u64,
    pub revision_id: u64,
    pub source_lang: String,
    pub target_lang: String,
    /// Base page content, already rendered to HTML.
    pub rendered_content: String,
    /// Untranslated title of the base page.
    pub title_text: String,
}

impl PageRequest {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.page_id, self.revision_id, &self.target_lang)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub html: String,
    pub display_title: Option<String>,
    pub robot_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Translated(PageView),
    /// A job is outstanding; `html` holds a placeholder notice.
    Processing(PageView),
    /// Nothing to show; the host renders its default content.
    Untranslated,
}

impl RenderOutcome {
    pub const fn view(&self) -> Option<&PageView> {
        match self {
            Self::Translated(view) | Self::Processing(view) => Some(view),
            Self::Untranslated => None,
        }
    }
}

/// Deletes the progress marker when dropped, whatever way the job ends.
struct ProgressGuard<'a> {
    cache: &'a CacheStore,
    key: String,
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.cache.delete(&self.key);
    }
}

pub struct Orchestrator {
    client: TranslationClient,
    catalog: LanguageCatalog,
    cache: CacheStore,
    jobs: Arc<dyn JobQueue>,
    options: RenderOptions,
}

impl Orchestrator {
    pub fn new(
        client: TranslationClient,
        catalog: LanguageCatalog,
        cache: CacheStore,
        jobs: Arc<dyn JobQueue>,
        options: RenderOptions,
    ) -> Self {
        if options.use_job_queue && !cache.is_enabled() {
            tracing::warn!(
                "Job queue is enabled but caching is disabled; every request will enqueue a job"
            );
        }

        Self {
            client,
            catalog,
            cache,
            jobs,
            options,
        }
    }

    /// Builds the provider client and language catalog from resolved settings.
    pub fn from_settings(
        settings: &Settings,
        cache: CacheStore,
        jobs: Arc<dyn JobQueue>,
    ) -> Result<Self> {
        let client = TranslationClient::new(&settings.service)?;
        let catalog = LanguageCatalog::new(&settings.service, cache.clone())?;
        Ok(Self::new(
            client,
            catalog,
            cache,
            jobs,
            settings.render.clone(),
        ))
    }

    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub const fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    /// Serves one page request.
    pub async fn render(&self, page: &PageRequest) -> RenderOutcome {
        let key = page.cache_key();
        let wants_title = self.options.wants_title();

        let mut translated_title = None;
        if wants_title {
            translated_title = self.cache.get(&key.title());
            if translated_title.is_none() && !self.options.use_job_queue {
                let request = TranslationRequest::title(
                    page.title_text.clone(),
                    &page.source_lang,
                    &page.target_lang,
                );
                translated_title = self.translate_and_store(request, &key.title()).await;
            }
        }

        let display_title = self.display_title(page, translated_title.as_deref()).await;
        let view = |html: String| PageView {
            html,
            display_title: display_title.clone(),
            robot_policy: self.options.robot_policy.clone(),
        };

        if let Some(html) = self.cache.get(key.as_str()) {
            tracing::debug!(cache_key = %key, "Serving cached translation");
            if wants_title && self.options.use_job_queue && translated_title.is_none() {
                self.enqueue(&key, page);
            }
            return RenderOutcome::Translated(view(html));
        }

        if self.options.use_job_queue {
            self.enqueue(&key, page);
            return RenderOutcome::Processing(view(processing_notice()));
        }

        let request = TranslationRequest::body(
            page.rendered_content.clone(),
            &page.source_lang,
            &page.target_lang,
        );
        match self.translate_and_store(request, key.as_str()).await {
            Some(html) => RenderOutcome::Translated(view(html)),
            None => RenderOutcome::Untranslated,
        }
    }

    /// Executes one background job. The progress marker is always cleared.
    ///
    /// Returns `true` when the body translation is cached afterwards.
    pub async fn run_job(&self, job: &JobRecord) -> bool {
        let _marker = ProgressGuard {
            cache: &self.cache,
            key: job.cache_key.progress(),
        };

        if self.cache.get(job.cache_key.as_str()).is_none() {
            let request =
                TranslationRequest::body(job.content.clone(), &job.source_lang, &job.target_lang);
            if self
                .translate_and_store(request, job.cache_key.as_str())
                .await
                .is_none()
            {
                tracing::warn!(cache_key = %job.cache_key, "Translation job failed");
                return false;
            }
        }

        if self.options.wants_title() {
            let title_key = job.cache_key.title();
            if self.cache.get(&title_key).is_none() {
                let request = TranslationRequest::title(
                    job.title_text.clone(),
                    &job.source_lang,
                    &job.target_lang,
                );
                self.translate_and_store(request, &title_key).await;
            }
        }

        tracing::info!(cache_key = %job.cache_key, "Translation job completed");
        true
    }

    fn enqueue(&self, key: &CacheKey, page: &PageRequest) {
        let progress_key = key.progress();
        if self.cache.get(&progress_key).is_some() {
            tracing::debug!(cache_key = %key, "Translation already in progress");
            return;
        }

        let job = JobRecord {
            cache_key: key.clone(),
            content: page.rendered_content.clone(),
            source_lang: page.source_lang.clone(),
            target_lang: page.target_lang.clone(),
            title_text: page.title_text.clone(),
        };

        if let Err(e) = self.jobs.push(JOB_NAME, job.to_params()) {
            tracing::error!(cache_key = %key, error = %e, "Failed to enqueue translation job");
            return;
        }

        self.cache.store(&progress_key, PROGRESS_MARKER);
        tracing::info!(cache_key = %key, "Enqueued translation job");
    }

    async fn translate_and_store(
        &self,
        mut request: TranslationRequest,
        cache_key: &str,
    ) -> Option<String> {
        request.target_lang = self.catalog.provider_code(&request.target_lang);
        if request.source().is_some() {
            request.source_lang = self.catalog.provider_code(&request.source_lang);
        }

        let translated = self.client.translate(&request).await?;
        self.cache.store(cache_key, &translated);
        Some(translated)
    }

    async fn display_title(&self, page: &PageRequest, translated: Option<&str>) -> Option<String> {
        if self.options.suppress_language_caption {
            return None;
        }

        let caption = self
            .catalog
            .language_name(&page.target_lang)
            .await
            .map_or_else(|| page.target_lang.to_uppercase(), |name| capitalize(&name));

        Some(format!(
            "{}<span class=\"target-language\"> ({})</span>",
            translated.unwrap_or(&page.title_text),
            escape_html(&caption)
        ))
    }
}

fn processing_notice() -> String {
    format!(
        "<div class=\"mw-message-box mw-message-box-notice\">{}</div>",
        escape_html(PROCESSING_MESSAGE)
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("deutsch"), "Deutsch");
        assert_eq!(capitalize("épée"), "Épée");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_processing_notice_is_a_message_box() {
        let notice = processing_notice();
        assert!(notice.starts_with("<div class=\"mw-message-box"));
        assert!(notice.contains(PROCESSING_MESSAGE));
    }

    #[test]
    fn test_page_request_cache_key() {
        let page = PageRequest {
            page_id: 2,
            revision_id: 9,
            source_lang: "en".to_string(),
            target_lang: "de".to_string(),
            rendered_content: String::new(),
            title_text: String::new(),
        };
        assert_eq!(page.cache_key().as_str(), "2-9-DE");
    }

    #[test]
    fn test_wants_title_requires_caption() {
        let options = RenderOptions {
            translate_title: true,
            suppress_language_caption: true,
            ..RenderOptions::default()
        };
        assert!(!options.wants_title());
    }
}
