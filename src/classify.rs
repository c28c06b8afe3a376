//! Caller-supplied collaborator services.
//!
//! The table interpreter needs a script classifier, a tag-word decoder and
//! a language-specific trailing-morpheme parser; all three belong to the
//! surrounding extractor. [`HeuristicServices`] is a small built-in
//! implementation good enough for tests and simple callers.

use crate::tags::{self, Tag, TagSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The text reads as a list of grammatical tag words.
    Tags,
    /// Latin-script rendering of a non-Latin form.
    Romanization,
    /// Running English text.
    English,
    /// Anything else, notably non-Latin script forms.
    Other,
}

pub trait Services {
    /// Heuristically label a free-form string.
    fn classify_desc(&self, text: &str) -> Classification;

    /// Parse a comma/semicolon list of tag words into alternative tag
    /// sets plus topical leftovers.
    fn decode_tags(&self, text: &str) -> (Vec<TagSet>, Vec<String>);

    /// Language-specific trailing-morpheme extraction for non-finite verb
    /// forms. The default keeps the form untouched.
    fn parse_head_final_tags(&self, _lang: &str, form: &str) -> (String, Vec<Tag>) {
        (form.to_string(), Vec::new())
    }

    /// Sink for soft data diagnostics (unrecognised headers and the like).
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }
}

/// Small stand-in for a full description classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicServices;

// Function words that mark running English rather than a romanisation.
const ENGLISH_WORDS: &[&str] = &[
    "the", "a", "an", "of", "to", "and", "or", "with", "for", "in", "on", "by", "from", "not",
    "used", "only", "also", "see", "form", "forms", "is", "are",
];

fn is_latin(ch: char) -> bool {
    // Basic Latin plus the Latin-1 / Extended-A / Extended-B diacritics.
    ch.is_alphabetic() && (ch as u32) <= 0x024F
}

impl Services for HeuristicServices {
    fn classify_desc(&self, text: &str) -> Classification {
        let words: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty())
            .collect();
        if !words.is_empty() && words.iter().all(|w| tags::is_valid_tag(w)) {
            return Classification::Tags;
        }
        let mut has_latin = false;
        for ch in text.chars() {
            if ch.is_alphabetic() {
                if is_latin(ch) {
                    has_latin = true;
                } else {
                    return Classification::Other;
                }
            }
        }
        if !has_latin {
            return Classification::Other;
        }
        let all_english = words
            .iter()
            .all(|w| ENGLISH_WORDS.contains(&w.to_ascii_lowercase().trim_matches('.').trim()));
        if all_english {
            Classification::English
        } else {
            Classification::Romanization
        }
    }

    fn decode_tags(&self, text: &str) -> (Vec<TagSet>, Vec<String>) {
        let mut alternatives = Vec::new();
        let mut topics = Vec::new();
        for part in text.split([',', ';']) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if part.split_whitespace().all(tags::is_valid_tag) {
                alternatives.push(TagSet::from_expr(part));
            } else {
                topics.push(part.to_string());
            }
        }
        (alternatives, topics)
    }
}
