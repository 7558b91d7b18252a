use reqwest::Client;
use serde::Deserialize;

use crate::translation::http;
use crate::translation::request::TranslationRequest;

const PROVIDER: &str = "LibreTranslate";

#[derive(Debug, Clone)]
pub struct LibreTranslate {
    pub(crate) endpoint: String,
    pub(crate) api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: Option<String>,
}

impl LibreTranslate {
    fn form<'a>(&'a self, request: &'a TranslationRequest) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![
            ("q", request.text.as_str()),
            ("source", request.source().unwrap_or("auto")),
            ("target", request.target_lang.as_str()),
            ("format", "html"),
        ];
        if let Some(key) = self.api_key.as_deref() {
            form.push(("api_key", key));
        }
        form
    }

    pub(super) async fn translate(
        &self,
        http: &Client,
        request: &TranslationRequest,
    ) -> Option<String> {
        let builder = http.post(&self.endpoint).form(&self.form(request));
        let body = http::send(builder, PROVIDER).await?;

        let response: TranslateResponse = serde_json::from_str(&body)
            .inspect_err(|e| tracing::error!(provider = PROVIDER, error = %e, "Malformed response"))
            .ok()?;
        response.translated_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(api_key: Option<&str>) -> LibreTranslate {
        LibreTranslate {
            endpoint: "http://localhost:5000/translate".to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    #[test]
    fn test_form_defaults_source_to_auto() {
        let request = TranslationRequest::body("Hello", "", "fr");
        let p = provider(None);
        let form = p.form(&request);

        assert!(form.contains(&("source", "auto")));
        assert!(form.contains(&("target", "fr")));
        assert!(form.contains(&("format", "html")));
        assert!(form.iter().all(|(k, _)| *k != "api_key"));
    }

    #[test]
    fn test_form_includes_api_key_when_configured() {
        let request = TranslationRequest::body("Hello", "en", "fr");
        let p = provider(Some("secret"));
        let form = p.form(&request);

        assert!(form.contains(&("api_key", "secret")));
        assert!(form.contains(&("source", "en")));
    }
}
