//! Header-cell cleaning: decoration stripping, footnote markers and note
//! definitions.

use std::sync::LazyLock;

use regex::Regex;

use crate::headers;
use crate::tags::Tag;

/// Ranges of characters whose Unicode names begin `SUPERSCRIPT ` or
/// `MODIFIER LETTER SMALL `, precomputed from the character database.
const SUPERSCRIPT_RANGES: &[(char, char)] = &[
    ('\u{00B2}', '\u{00B3}'),
    ('\u{00B9}', '\u{00B9}'),
    ('\u{02B0}', '\u{02B8}'),
    ('\u{02E0}', '\u{02E4}'),
    ('\u{1D43}', '\u{1D61}'),
    ('\u{1D9C}', '\u{1DBF}'),
    ('\u{2070}', '\u{2071}'),
    ('\u{2074}', '\u{207F}'),
    ('\u{AB5C}', '\u{AB5F}'),
];

pub fn is_superscript(ch: char) -> bool {
    SUPERSCRIPT_RANGES
        .iter()
        .any(|&(lo, hi)| lo <= ch && ch <= hi)
}

/// A cleaned row/column header.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanedHeader {
    /// Empty when the cell turned out not to be a header at all.
    pub text: String,
    /// Reference markers (footnote symbols, `*`, superscript digits).
    pub refs: Vec<String>,
    /// Footnote definitions: (marker, body).
    pub defs: Vec<(String, String)>,
    /// Tags carried by the decorations themselves (rare, formal, ...).
    pub tags: Vec<Tag>,
}

impl CleanedHeader {
    fn note_definition(marker: char, body: &str) -> Self {
        Self {
            defs: vec![(marker.to_string(), body.trim().to_string())],
            ..Self::default()
        }
    }
}

// Sentences and cross-references that sometimes end up in header cells.
static NON_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(There are |\*|see |Use |use the |Only used |The forms in |",
        r"these are also written |The genitive can be |",
        r"Genitive forms are rare or non-existant|Accusative Note: |",
        r"Classifier Note: |Noun: Assamese nouns are |the active conjugation|",
        r"the instrumenal singular|Note:|\^* Note:|Notes:)",
    ))
    .unwrap()
});

static PAREN_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,/]?\s+\([^)]*\)\s*$").unwrap());

static FOOTNOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^(.|\([^)]*\))$").unwrap());

/// Clean a row/column header for later interpretation.
///
/// With `skip_paren`, a trailing parenthesised annotation is removed
/// unless the whole text is a known header label.
pub fn clean_header(col: &str, skip_paren: bool) -> CleanedHeader {
    let mut tags: Vec<Tag> = Vec::new();
    let mut refs: Vec<String> = Vec::new();
    let mut col = col.to_string();

    for decor in ['➤', ',', '•'] {
        if let Some(stripped) = col.trim_end().strip_suffix(decor) {
            col = stripped.trim_end().to_string();
        }
    }
    if skip_paren && !headers::is_header_label(&col) {
        col = PAREN_SUFFIX_RE.replace(&col, "").into_owned();
    }
    col = col.trim().to_string();

    if NON_HEADER_RE.is_match(&col) {
        return CleanedHeader::default();
    }

    // Trailing ^X / ^(...) footnote annotations.
    while let Some(m) = FOOTNOTE_RE.find(&col) {
        let start = m.start();
        let raw = &m.as_str()[1..];
        // A lone "(" can match the any-char alternative; only a proper
        // "(...)" pair loses its parentheses.
        let marker = if raw.starts_with('(') && raw.ends_with(')') && raw.len() > 1 {
            raw[1..raw.len() - 1].to_string()
        } else {
            raw.to_string()
        };
        if marker == "rare" {
            tags.push("rare".into());
        } else if marker == "vos" {
            tags.push("formal".into());
        } else if marker == "tú" {
            tags.push("informal".into());
        } else {
            refs.push(marker);
        }
        col.truncate(start);
    }
    if let Some(stripped) = col.strip_suffix("ʳᵃʳᵉ") {
        tags.push("rare".into());
        col = stripped.trim_end().to_string();
    }
    if let Some(stripped) = col.strip_suffix("ᵛᵒˢ") {
        tags.push("formal".into());
        col = stripped.trim_end().to_string();
    }

    // Leading superscripts are references, unless they introduce a
    // footnote definition.
    while let Some(first) = col.chars().next().filter(|&c| is_superscript(c)) {
        let rest = &col[first.len_utf8()..];
        if let Some(next) = rest.chars().next()
            && matches!(next, '⁾' | ' ' | ':')
        {
            return CleanedHeader::note_definition(first, &rest[next.len_utf8()..]);
        }
        refs.push(first.to_string());
        col = rest.to_string();
    }
    while let Some(last) = col.chars().last().filter(|&c| is_superscript(c) || c == '†') {
        // Numbers and H/L/N are useful information
        refs.push(last.to_string());
        col.truncate(col.len() - last.len_utf8());
    }

    // Note definitions of the form "1) ...", "2: ...". Digits here may
    // come from any script, not just ASCII.
    let mut chars = col.chars();
    if let (Some(first), Some(second)) = (chars.next(), chars.next())
        && col.chars().count() > 2
        && first.is_numeric()
        && matches!(second, ')' | ' ' | ':')
    {
        let body = &col[first.len_utf8() + second.len_utf8()..];
        return CleanedHeader::note_definition(first, body);
    }

    col = col.trim().to_string();
    if let Some(stripped) = col.strip_suffix('*') {
        col = stripped.trim_end().to_string();
        refs.push("*".into());
    }
    if let Some(stripped) = col.strip_suffix("(*)") {
        col = stripped.trim_end().to_string();
        refs.push("*".into());
    }

    CleanedHeader {
        text: col.trim().to_string(),
        refs,
        defs: Vec::new(),
        tags,
    }
}
