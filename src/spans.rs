//! Header spans and column-tag composition.
//!
//! While a table is traversed, every interpreted header cell leaves a
//! span on an append-ordered stack. Column tags for a data cell are
//! composed by walking that stack from the bottom row upwards, merging
//! tag sets until a stop rule fires.

use crate::Set;
use crate::tags::{TagSets, categories_of, merge_tagsets, tag_category, unconstrained};

/// Saved information about one header cell's coverage.
#[derive(Debug, Clone)]
pub struct HdrSpan {
    pub start: usize,
    pub colspan: usize,
    /// Row number where this header occurred.
    pub rownum: usize,
    /// Alternative interpretations of the header.
    pub tagsets: TagSets,
    /// At least one data cell consumed this span.
    pub used: bool,
    /// Original header text, for diagnostics.
    pub text: String,
}

impl HdrSpan {
    pub fn new(start: usize, colspan: usize, rownum: usize, tagsets: TagSets, text: &str) -> Self {
        assert!(colspan >= 1);
        Self {
            start,
            colspan,
            rownum,
            tagsets,
            used: false,
            text: text.to_string(),
        }
    }

    fn end(&self) -> usize {
        self.start + self.colspan
    }
}

fn limited_categories(span: &HdrSpan) -> bool {
    span.tagsets
        .iter()
        .flat_map(|ts| ts.iter())
        .all(|t| matches!(tag_category(t), Some("number" | "gender" | "case")))
}

/// Compute the column tags for the window `[start, start+colspan)` from
/// the current header spans. Returns at least `{()}` ("no constraint").
///
/// `celltext` is only used for diagnostics.
pub fn compute_coltags(
    hdrspans: &mut [HdrSpan],
    start: usize,
    colspan: usize,
    mark_used: bool,
    celltext: &str,
) -> TagSets {
    assert!(colspan >= 1);
    let end = start + colspan;
    let mut used_keys: Set<(usize, usize)> = Set::default();
    let mut coltags: Option<TagSets> = None;

    // Headers lower in the table (closer to the cell) first.
    for idx in (0..hdrspans.len()).rev() {
        let (h_start, h_end, h_rownum) = {
            let h = &hdrspans[idx];
            (h.start, h.end(), h.rownum)
        };
        let mut tagsets = hdrspans[idx].tagsets.clone();

        if h_start > start || h_end < end {
            // The span does not cover the window exactly. Cells sometimes
            // cover two out of three genders, or several genders for one
            // plural form; decide whether this span constrains anything.
            let contained = h_start >= start && h_end <= end;
            let has_sibling = hdrspans.iter().enumerate().any(|(i, x)| {
                i != idx && x.rownum == h_rownum && x.start >= start && x.end() <= end
            });
            let row_is_limited = hdrspans.iter().all(|x| {
                x.rownum != h_rownum
                    || x.start < h_start
                    || x.end() > h_end
                    || limited_categories(x)
            });
            if contained && has_sibling && row_is_limited {
                let in_cats: Set<&'static str> = hdrspans
                    .iter()
                    .filter(|x| x.rownum == h_rownum && x.start >= start && x.end() <= end)
                    .flat_map(|x| x.tagsets.iter())
                    .flat_map(|ts| ts.iter())
                    .filter_map(tag_category)
                    .collect();
                if in_cats
                    .iter()
                    .all(|c| matches!(*c, "gender" | "number" | "person" | "case"))
                {
                    // Masculine, feminine, neuter and plural often share a
                    // row, so number and gender count as one axis here.
                    if in_cats.contains("number") || in_cats.contains("gender") {
                        let mut in_cats = in_cats;
                        in_cats.insert("number");
                        in_cats.insert("gender");
                        let out_cats: Set<&'static str> = hdrspans
                            .iter()
                            .filter(|x| {
                                x.rownum == h_rownum && (x.start < start || x.end() > end)
                            })
                            .flat_map(|x| x.tagsets.iter())
                            .flat_map(|ts| ts.iter())
                            .filter_map(tag_category)
                            .collect();
                        if out_cats.intersection(&in_cats).next().is_none() {
                            // All choices valid in the language are
                            // possible: no constraint from this row.
                            tagsets = unconstrained();
                        }
                    }
                }
            } else {
                tracing::trace!(
                    "coltags {celltext:?}: ignoring span {:?} at row {h_rownum}",
                    hdrspans[idx].text
                );
                continue;
            }
        }

        let key = (h_start, hdrspans[idx].colspan);
        if used_keys.contains(&key) {
            continue;
        }
        used_keys.insert(key);
        if mark_used {
            hdrspans[idx].used = true;
        }

        match coltags.take() {
            None => coltags = Some(tagsets),
            Some(cur) => {
                let new_cats = categories_of(&tagsets);
                let cur_cats = categories_of(&cur);
                if new_cats.contains("detail") {
                    let merged = if cur.iter().all(|ts| ts.is_empty()) {
                        merge_tagsets(&cur, &tagsets)
                    } else {
                        cur
                    };
                    coltags = Some(merged);
                    break;
                } else if new_cats.contains("non-finite")
                    && ["mood", "tense", "non-finite", "person", "number"]
                        .iter()
                        .any(|c| cur_cats.contains(c))
                {
                    coltags = Some(cur);
                    break;
                } else if new_cats.contains("mood") && cur_cats.contains("mood") {
                    coltags = Some(cur);
                    break;
                } else if cur_cats.contains("number") && new_cats.contains("number") {
                    coltags = Some(cur);
                    break;
                } else if cur_cats.contains("number") && new_cats.contains("gender") {
                    coltags = Some(cur);
                    break;
                } else {
                    coltags = Some(merge_tagsets(&cur, &tagsets));
                }
            }
        }
    }

    coltags.unwrap_or_else(unconstrained)
}
