use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::translation::chunking::split_into_chunks;
use crate::translation::http;
use crate::translation::request::TranslationRequest;

const PROVIDER: &str = "Lingva";

/// Lingva rejects queries above roughly this many characters.
pub const LINGVA_MAX_CHUNK_CHARS: usize = 6000;

#[derive(Debug, Clone)]
pub struct Lingva {
    pub(crate) endpoint: String,
    pub(crate) max_chunk_chars: usize,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Data>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Data {
    translation: TranslationData,
}

#[derive(Debug, Deserialize)]
struct TranslationData {
    target: Target,
}

#[derive(Debug, Deserialize)]
struct Target {
    text: String,
}

/// Escapes text for a GraphQL block string literal.
///
/// Block strings only interpret `\"""`, so a lone backslash passes through.
fn block_string(text: &str) -> String {
    text.replace("\"\"\"", "\\\"\"\"")
}

fn build_query(source: &str, target: &str, chunk: &str) -> String {
    format!(
        "{{ translation(source: \"{source}\", target: \"{target}\", query: \"\"\"{}\"\"\") {{ target {{ text }} }} }}",
        block_string(chunk)
    )
}

impl Lingva {
    /// Translates chunk by chunk, in order.
    ///
    /// Any failed chunk aborts the whole translation: a half-translated page
    /// is never returned.
    pub(super) async fn translate(
        &self,
        http: &Client,
        request: &TranslationRequest,
    ) -> Option<String> {
        let source = request.source().unwrap_or("auto");
        let chunks = split_into_chunks(&request.text, self.max_chunk_chars);
        tracing::debug!(provider = PROVIDER, chunks = chunks.len(), "Translating in chunks");

        let mut translated = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let query = build_query(source, &request.target_lang, chunk);
            let builder = http.post(&self.endpoint).json(&json!({ "query": query }));

            let Some(body) = http::send(builder, PROVIDER).await else {
                tracing::error!(provider = PROVIDER, chunk = index, "Aborting chunked translation");
                return None;
            };

            translated.push(parse_chunk(&body)?);
        }

        Some(translated.join(" "))
    }
}

fn parse_chunk(body: &str) -> Option<String> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .inspect_err(|e| tracing::error!(provider = PROVIDER, error = %e, "Malformed response"))
        .ok()?;

    if !response.errors.is_empty() {
        tracing::error!(
            provider = PROVIDER,
            errors = %serde_json::Value::Array(response.errors),
            "Request to Lingva had errors"
        );
        return None;
    }

    response.data.map(|d| d.translation.target.text)
}
