use reqwest::Client;
use serde::Deserialize;

use crate::translation::http;
use crate::translation::request::TranslationRequest;

const PROVIDER: &str = "DeepL";

#[derive(Debug, Clone)]
pub struct DeepL {
    pub(crate) endpoint: String,
    pub(crate) api_key: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

impl DeepL {
    fn form(request: &TranslationRequest) -> Vec<(&'static str, String)> {
        let mut form = Vec::with_capacity(4);
        if let Some(source) = request.source() {
            form.push(("source_lang", source.to_uppercase()));
        }
        form.push(("target_lang", request.target_lang.to_uppercase()));
        form.push(("tag_handling", "html".to_string()));
        form.push(("text", request.text.clone()));
        form
    }

    pub(super) async fn translate(
        &self,
        http: &Client,
        request: &TranslationRequest,
    ) -> Option<String> {
        let builder = http
            .post(&self.endpoint)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("DeepL-Auth-Key {}", self.api_key),
            )
            .form(&Self::form(request));

        let body = http::send(builder, PROVIDER).await?;
        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Option<String> {
    let response: TranslateResponse = serde_json::from_str(body)
        .inspect_err(|e| tracing::error!(provider = PROVIDER, error = %e, "Malformed response"))
        .ok()?;
    response.translations.into_iter().next().map(|t| t.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_uppercases_languages() {
        let request = TranslationRequest::body("<p>Hi</p>", "en", "de");
        let form = DeepL::form(&request);

        assert!(form.contains(&("source_lang", "EN".to_string())));
        assert!(form.contains(&("target_lang", "DE".to_string())));
        assert!(form.contains(&("tag_handling", "html".to_string())));
    }

    #[test]
    fn test_form_omits_detected_source() {
        let request = TranslationRequest::body("Hi", "auto", "ja");
        let form = DeepL::form(&request);
        assert!(form.iter().all(|(k, _)| *k != "source_lang"));
    }

    #[test]
    fn test_parse_response_takes_first_translation() {
        let body = r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"}]}"#;
        assert_eq!(parse_response(body), Some("Hallo".to_string()));
        assert_eq!(parse_response(r#"{"translations":[]}"#), None);
        assert_eq!(parse_response("not json"), None);
    }
}
