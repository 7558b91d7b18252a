use reqwest::Client;
use serde::Deserialize;

use crate::translation::http;
use crate::translation::request::TranslationRequest;

const PROVIDER: &str = "Google Translate";

#[derive(Debug, Clone)]
pub struct Google {
    pub(crate) endpoint: String,
    pub(crate) api_key: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: Data,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl Google {
    pub(super) async fn translate(
        &self,
        http: &Client,
        request: &TranslationRequest,
    ) -> Option<String> {
        let mut form = vec![("q", request.text.as_str())];
        if let Some(source) = request.source() {
            form.push(("source", source));
        }
        form.push(("target", request.target_lang.as_str()));
        form.push(("format", "html"));
        form.push(("key", self.api_key.as_str()));

        let body = http::send(http.post(&self.endpoint).form(&form), PROVIDER).await?;
        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Option<String> {
    let response: TranslateResponse = serde_json::from_str(body)
        .inspect_err(|e| tracing::error!(provider = PROVIDER, error = %e, "Malformed response"))
        .ok()?;
    response
        .data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
}
