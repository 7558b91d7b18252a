mod chunking;
mod client;
mod http;
mod language;
mod providers;
mod request;
mod service;

pub use chunking::{split_into_chunks, split_sentences_html_safe};
pub use client::{MAX_TEXT_BYTES, TranslationClient};
pub use http::USER_AGENT;
pub use language::{LanguageCatalog, LanguageMap};
pub use providers::LINGVA_MAX_CHUNK_CHARS;
pub use request::{ContentKind, TranslationRequest};
pub use service::{DEFAULT_TIMEOUT, GOOGLE_TRANSLATE_URL, ServiceConfig, ServiceKind, ServiceOption};
