//! Header label map and evaluator.
//!
//! The map takes normalised header texts to tag-set expressions: a plain
//! space-separated string, a list of alternative strings, or a conditional
//! node branching on the table's language and on the tags already bound
//! for the cell. A second map matches on the leading tokens of a header.
//! Both are data files under `assets/`, validated against the tag
//! catalogue when first loaded.

use std::sync::LazyLock;

use serde::Deserialize;

use crate::Map;
use crate::tags::{TagSet, is_valid_tag};

/// Marker tag: reset the header-span stack.
pub const RESET_MARKER: &str = "!";
/// Marker tag: the entire column below this header is headers.
pub const COLUMN_HEADER_MARKER: &str = "*";

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Plain(String),
    Alts(Vec<String>),
    Cond(Box<Conditional>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Conditional {
    /// Language name or list of names the `then` branch applies to.
    #[serde(default)]
    pub lang: Option<LangSpec>,
    /// Space-separated tags, all required; `any: ` prefix makes it
    /// disjunctive.
    #[serde(default, rename = "if")]
    pub when: Option<String>,
    #[serde(default)]
    pub then: Option<HeaderValue>,
    #[serde(default, rename = "else")]
    pub otherwise: Option<HeaderValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LangSpec {
    One(String),
    Any(Vec<String>),
}

impl LangSpec {
    fn matches(&self, lang: &str) -> bool {
        match self {
            LangSpec::One(l) => l == lang,
            LangSpec::Any(list) => list.iter().any(|l| l == lang),
        }
    }
}

static HEADER_MAP: LazyLock<Map<String, HeaderValue>> = LazyLock::new(|| {
    let map: Map<String, HeaderValue> =
        serde_json::from_str(include_str!("../../assets/header_map.json"))
            .expect("header map: malformed JSON");
    for (key, value) in &map {
        validate_value(key, value);
    }
    map
});

static HEADER_START_MAP: LazyLock<Map<String, HeaderValue>> = LazyLock::new(|| {
    let map: Map<String, HeaderValue> =
        serde_json::from_str(include_str!("../../assets/header_start_map.json"))
            .expect("header start map: malformed JSON");
    for (key, value) in &map {
        validate_value(key, value);
    }
    map
});

fn validate_value(key: &str, value: &HeaderValue) {
    match value {
        HeaderValue::Plain(expr) => validate_expr(key, expr),
        HeaderValue::Alts(list) => {
            for expr in list {
                validate_expr(key, expr);
            }
        }
        HeaderValue::Cond(cond) => {
            if let Some(expr) = &cond.when {
                let expr = expr.strip_prefix("any: ").unwrap_or(expr);
                validate_expr(key, expr);
            }
            if let Some(then) = &cond.then {
                validate_value(key, then);
            }
            if let Some(otherwise) = &cond.otherwise {
                validate_value(key, otherwise);
            }
        }
    }
}

fn validate_expr(key: &str, expr: &str) {
    for tag in expr.split_whitespace() {
        assert!(
            is_valid_tag(tag) || tag == RESET_MARKER || tag == COLUMN_HEADER_MARKER,
            "header map entry {key:?}: unknown tag {tag:?}"
        );
    }
}

/// Whether `text` is an exact key of the header label map.
pub fn is_header_label(text: &str) -> bool {
    HEADER_MAP.contains_key(text)
}

/// The value of an exact plain entry; conditional and alternative entries
/// are not title material.
pub fn plain_label_value(text: &str) -> Option<&'static str> {
    let map: &'static Map<String, HeaderValue> = &HEADER_MAP;
    match map.get(text) {
        Some(HeaderValue::Plain(expr)) => Some(expr.as_str()),
        _ => None,
    }
}

/// Longest start-map entry whose key is a whole-token prefix of `text`.
pub fn match_start(text: &str) -> Option<&'static HeaderValue> {
    let map: &'static Map<String, HeaderValue> = &HEADER_START_MAP;
    let mut best: Option<(&String, &HeaderValue)> = None;
    for (key, value) in map {
        if let Some(rest) = text.strip_prefix(key.as_str())
            && (rest.is_empty() || rest.starts_with(|c: char| !c.is_alphanumeric()))
            && best.is_none_or(|(b, _)| key.len() > b.len())
        {
            best = Some((key, value));
        }
    }
    best.map(|(_, value)| value)
}

pub fn has_start_match(text: &str) -> bool {
    match_start(text).is_some()
}

/// Expand one header-cell text into its alternative tag sets.
///
/// `tags0` is the union of the row, column and global tags already bound
/// for the cell; conditional map entries may depend on it and on the
/// language. Returns an empty list for unrecognised headers. The reset
/// (`!`) and whole-column (`*`) markers pass through for the driver to
/// act on.
pub fn expand_header(lang: &str, word: &str, text: &str, tags0: &TagSet, silent: bool) -> Vec<TagSet> {
    let map: &'static Map<String, HeaderValue> = &HEADER_MAP;
    let mut v: &HeaderValue = match map.get(text) {
        Some(v) => v,
        None => match match_start(text) {
            Some(v) => v,
            None => return Vec::new(), // Unrecognised header
        },
    };

    // Interpret the value until a string or list leaf; each step strictly
    // reduces the conditional chain, so this terminates.
    let empty = HeaderValue::Plain(String::new());
    loop {
        match v {
            HeaderValue::Plain(expr) => return vec![TagSet::from_expr(expr)],
            HeaderValue::Alts(list) => return list.iter().map(|s| TagSet::from_expr(s)).collect(),
            HeaderValue::Cond(cond) => {
                let mut truth = true;
                let mut conditioned = false;
                if let Some(langs) = &cond.lang {
                    conditioned = true;
                    truth = langs.matches(lang);
                }
                if truth && let Some(expr) = &cond.when {
                    conditioned = true;
                    truth = match expr.strip_prefix("any: ") {
                        Some(rest) => rest.split_whitespace().any(|t| tags0.contains(t)),
                        None => expr.split_whitespace().all(|t| tags0.contains(t)),
                    };
                }
                if !conditioned && !silent {
                    tracing::debug!("header map: conditional without condition: {text:?}");
                }
                if truth {
                    v = cond.then.as_ref().unwrap_or(&empty);
                } else {
                    match &cond.otherwise {
                        Some(otherwise) => v = otherwise,
                        None => {
                            if !silent {
                                tracing::debug!(
                                    "header map: if without else evaluated false: \
                                     {word}/{lang} {text:?} tags0={tags0:?}"
                                );
                            }
                            v = &empty;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(lang: &str, text: &str, tags0: &str) -> Vec<TagSet> {
        expand_header(lang, "w", text, &TagSet::from_expr(tags0), false)
    }

    #[test]
    fn plain_entry() {
        assert_eq!(
            expand("German", "Präsens", ""),
            vec![TagSet::from_expr("present indicative")]
        );
    }

    #[test]
    fn unrecognised_is_empty() {
        assert!(expand("German", "no such header", "").is_empty());
    }

    #[test]
    fn conditional_on_accumulated_tags() {
        assert_eq!(
            expand("German", "Singular", "imperative"),
            vec![TagSet::from_expr("imperative second-person singular")]
        );
        assert_eq!(
            expand("German", "Singular", "present"),
            vec![TagSet::from_expr("singular")]
        );
    }

    #[test]
    fn conditional_on_language() {
        assert_eq!(
            expand("German", "Futur I", ""),
            vec![TagSet::from_expr("future multiword-construction")]
        );
        assert_eq!(expand("Dutch", "Futur I", ""), vec![TagSet::from_expr("future")]);
    }

    #[test]
    fn missing_else_yields_empty() {
        assert_eq!(expand("Russian", "short form", ""), vec![TagSet::empty()]);
        assert_eq!(
            expand("Russian", "short form", "adjective"),
            vec![TagSet::from_expr("short-form")]
        );
    }

    #[test]
    fn alternatives_entry() {
        let alts = expand("German", "masculine/feminine", "");
        assert_eq!(
            alts,
            vec![TagSet::from_expr("masculine"), TagSet::from_expr("feminine")]
        );
    }

    #[test]
    fn start_map_matches_longest_token_prefix() {
        // "second-person" wins over "second" style prefixes and requires a
        // token boundary.
        assert_eq!(
            expand("Spanish", "second person informal", ""),
            vec![TagSet::from_expr("second-person")]
        );
        assert!(expand("Spanish", "secondhand", "").is_empty());
    }

    #[test]
    fn reset_marker_passes_through() {
        let alts = expand("German", "Compound tenses", "");
        assert!(alts.iter().any(|ts| ts.contains(RESET_MARKER)));
    }

    #[test]
    fn whole_column_marker_passes_through() {
        let alts = expand("Latin", "Case", "");
        assert!(alts.iter().any(|ts| ts.contains(COLUMN_HEADER_MARKER)));
    }
}
