//! Data-cell text splitting and romanisation pairing.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::{Classification, Services};
use crate::clean::is_superscript;

/// Split `text` at any of `separators`, honouring balanced parentheses.
/// Pieces are trimmed; empty pieces are dropped.
pub fn split_at_separators(text: &str, separators: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut piece_start = 0;
    let mut i = 0;
    'scan: while i < text.len() {
        let ch = text[i..].chars().next().unwrap();
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                for sep in separators {
                    if text[i..].starts_with(sep) {
                        out.push(&text[piece_start..i]);
                        i += sep.len();
                        piece_start = i;
                        continue 'scan;
                    }
                }
            }
            _ => {}
        }
        i += ch.len_utf8();
    }
    out.push(&text[piece_start..]);
    out.iter()
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

static CARET_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^.*$").unwrap());

fn without_references(alt: &str) -> String {
    let plain: String = alt.chars().filter(|&c| !is_superscript(c)).collect();
    CARET_SUFFIX_RE.replace(&plain, "").into_owned()
}

/// Split one data cell into `(form, romanisation)` alternatives.
///
/// Cells beginning with a superscript are footnote-only and stay whole.
/// When the alternative list halves cleanly into native-script forms
/// followed by romanisations (e.g. Russian tables that repeat the row in
/// Latin script), the halves are paired elementwise.
pub fn split_cell<S: Services + ?Sized>(services: &S, col: &str) -> Vec<(String, String)> {
    if col.chars().next().is_some_and(is_superscript) {
        return vec![(col.to_string(), String::new())];
    }
    let mut separators: Vec<&str> = vec![";", "•", "\n", " or "];
    if !col.contains(" + ") {
        separators.push(",");
        if !col.ends_with('/') {
            separators.push("/");
        }
    }
    let alts = split_at_separators(col, &separators);

    let n = alts.len();
    if n >= 2 && n % 2 == 0 {
        let half = n / 2;
        let native = alts[..half].iter().all(|alt| {
            services.classify_desc(&without_references(alt)) == Classification::Other
        });
        let roman = alts[half..].iter().all(|alt| {
            matches!(
                services.classify_desc(&without_references(alt)),
                Classification::Romanization | Classification::English
            )
        });
        if native && roman {
            return alts[..half]
                .iter()
                .cloned()
                .zip(alts[half..].iter().cloned())
                .collect();
        }
    }
    alts.into_iter().map(|alt| (alt, String::new())).collect()
}
