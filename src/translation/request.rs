use std::fmt;

/// What a piece of text is, used to label log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Body,
    Title,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => f.write_str("body"),
            Self::Title => f.write_str("title"),
        }
    }
}

/// A provider-agnostic translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    /// Source language code; empty means "let the provider detect it".
    pub source_lang: String,
    pub target_lang: String,
    pub kind: ContentKind,
}

impl TranslationRequest {
    pub fn body(text: impl Into<String>, source_lang: &str, target_lang: &str) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            kind: ContentKind::Body,
        }
    }

    pub fn title(text: impl Into<String>, source_lang: &str, target_lang: &str) -> Self {
        Self {
            kind: ContentKind::Title,
            ..Self::body(text, source_lang, target_lang)
        }
    }

    /// Source language, or `None` when detection is requested.
    pub fn source(&self) -> Option<&str> {
        let source = self.source_lang.trim();
        (!source.is_empty() && !source.eq_ignore_ascii_case("auto")).then_some(source)
    }
}
