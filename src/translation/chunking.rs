//! HTML-aware sentence chunking for size-limited providers.
//!
//! Text is split into literal and markup segments so that tags are never cut
//! in half. Literal segments are broken at Unicode sentence boundaries; tags
//! are glued onto whatever sentence is being accumulated. Sentences are then
//! packed greedily into chunks joined by single spaces.

use regex::Regex;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

#[allow(clippy::unwrap_used)]
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Markup(&'a str),
}

/// Splits `text` into alternating literal and markup segments.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut parts = Vec::new();
    let mut last = 0;

    for tag in TAG.find_iter(text) {
        parts.push(Segment::Literal(&text[last..tag.start()]));
        parts.push(Segment::Markup(tag.as_str()));
        last = tag.end();
    }
    parts.push(Segment::Literal(&text[last..]));

    parts
}

/// Splits text into trimmed sentences, keeping markup attached.
pub fn split_sentences_html_safe(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for segment in segments(text) {
        match segment {
            Segment::Markup(tag) => current.push_str(tag),
            Segment::Literal(literal) => {
                for sentence in literal.split_sentence_bounds() {
                    current.push_str(sentence.trim());
                    if !current.is_empty() {
                        sentences.push(std::mem::take(&mut current));
                    }
                }
            }
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Packs the sentences of `text` into chunks of at most `max_chars` characters.
///
/// Order is preserved and no chunk is empty. A sentence longer than the limit
/// is broken at whitespace outside tags; a single tag longer than the limit
/// becomes a chunk of its own.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences_html_safe(text) {
        for piece in fit_to_limit(sentence, max_chars) {
            let piece_len = piece.chars().count();

            if !current.is_empty() && current_len + 1 + piece_len > max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Breaks an oversized sentence into pieces that each fit `max_chars`.
///
/// Breaks fall on whitespace or tag boundaries. Within a piece, tokens are
/// rejoined with a space only where the source had whitespace, so
/// `<b>word</b>` stays intact.
fn fit_to_limit(sentence: String, max_chars: usize) -> Vec<String> {
    if sentence.chars().count() <= max_chars {
        return vec![sentence];
    }

    // (token, preceded by whitespace)
    let mut tokens: Vec<(String, bool)> = Vec::new();
    let mut gap = false;
    for segment in segments(&sentence) {
        match segment {
            Segment::Markup(tag) => {
                tokens.push((tag.to_string(), gap));
                gap = false;
            }
            Segment::Literal(literal) => {
                let mut rest = literal;
                loop {
                    let trimmed = rest.trim_start();
                    gap |= trimmed.len() != rest.len();
                    if trimmed.is_empty() {
                        break;
                    }
                    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
                    for (i, part) in split_word(&trimmed[..end], max_chars)
                        .into_iter()
                        .enumerate()
                    {
                        tokens.push((part, gap && i == 0));
                    }
                    gap = false;
                    rest = &trimmed[end..];
                }
            }
        }
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for (token, spaced) in tokens {
        let token_len = token.chars().count();
        let separator = usize::from(spaced && !current.is_empty());
        if !current.is_empty() && current_len + separator + token_len > max_chars {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        } else if separator == 1 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(&token);
        current_len += token_len;
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

fn split_word(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .map(|c| c.iter().collect())
        .collect()
}
