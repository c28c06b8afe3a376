//! Plain data types exchanged with the caller.

use serde::{Deserialize, Serialize};

use crate::tags::Tag;

/// One cell of an inflection table grid.
///
/// Callers pre-expand row and column spans so that every physical grid
/// position references its owning cell (see [`crate::grid::expand_grid`]);
/// repeated positions must share the same allocation, since the driver
/// detects rowspan repeats by identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    pub is_header: bool,
    pub start: usize,
    pub colspan: usize,
    pub rowspan: usize,
}

impl Cell {
    pub fn new(text: &str, is_header: bool, start: usize, colspan: usize, rowspan: usize) -> Self {
        assert!(colspan >= 1);
        assert!(rowspan >= 1);
        let text = text.trim().to_string();
        Self {
            is_header: is_header && !text.is_empty(),
            text,
            start,
            colspan,
            rowspan,
        }
    }

    pub fn header(text: &str) -> Self {
        Self::new(text, true, 0, 1, 1)
    }

    pub fn data(text: &str) -> Self {
        Self::new(text, false, 0, 1, 1)
    }

    pub fn spanning(mut self, colspan: usize, rowspan: usize) -> Self {
        assert!(colspan >= 1);
        assert!(rowspan >= 1);
        self.colspan = colspan;
        self.rowspan = rowspan;
        self
    }
}

/// One extracted word form with its canonical tag set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRecord {
    pub form: String,
    /// Sorted lexicographically; every tag is in the catalogue.
    pub tags: Vec<Tag>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa: Option<String>,
}

/// Immutable per-table context: the entry the table belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    /// Language name, e.g. "German" (not an ISO code).
    pub lang: &'a str,
    pub pos: &'a str,
    /// The headword the table inflects.
    pub word: &'a str,
    /// Label of the originating section, recorded on every record.
    pub source: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_trims_and_demotes_empty_headers() {
        let cell = Cell::new("  Singular ", true, 0, 1, 1);
        assert_eq!(cell.text, "Singular");
        assert!(cell.is_header);

        let empty = Cell::new("   ", true, 0, 1, 1);
        assert_eq!(empty.text, "");
        assert!(!empty.is_header);
    }

    #[test]
    fn form_record_roundtrips_without_empty_optionals() {
        let dt = FormRecord {
            form: "gehe".into(),
            tags: vec!["first-person".into(), "singular".into()],
            source: "conjugation".into(),
            roman: None,
            ipa: None,
        };
        let json = serde_json::to_string(&dt).unwrap();
        assert!(!json.contains("roman"));
        let back: FormRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dt);
    }
}
