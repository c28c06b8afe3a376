//! The table driver.
//!
//! A single pass over the grid: header cells update the span stack and
//! the row tags, data cells are split into alternatives and emitted as
//! form records with the composed tag set. [`FormSink`] merges the
//! records of successive tables of one entry, deduplicating.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::classify::{Classification, Services};
use crate::clean::{clean_header, is_superscript};
use crate::headers::{self, COLUMN_HEADER_MARKER, RESET_MARKER};
use crate::lang::{self, GERMANIC_ARTICLE_LANGS};
use crate::models::{Cell, FormRecord, TableContext};
use crate::spans::{HdrSpan, compute_coltags};
use crate::split::split_cell;
use crate::tags::{Tag, TagSet, TagSets, no_inherit, tag_category, unconstrained};
use crate::title::parse_title;
use crate::{Map, Set};

/// Column texts that are interpreted as an empty column.
const IGNORED_COLVALUES: &[&str] = &[
    "-", "־", "᠆", "‐", "‑", "‒", "–", "—", "―", "−", "⸺", "⸻", "﹘", "﹣", "－", "/", "?",
];

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DATA_WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r]+").unwrap());
static PAREN_ANY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());
static COMMA_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,+\s+").unwrap());
static SKIP_DATA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(# |\(see )").unwrap());
static IPA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/[^/]*/").unwrap());
static LEADING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*,\s*").unwrap());
static TRAILING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*$").unwrap());
static COMMA_COLLAPSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*(,\s*)+").unwrap());
static MAIN_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^Main:").unwrap());
static INLINE_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\(([^)]*)\)").unwrap());
static NOTE_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(Note:|Notes:)").unwrap());

const PERSON_TAGS: [&str; 3] = ["first-person", "second-person", "third-person"];

/// A row whose non-empty cells are all the same header is a sub-title.
fn subtitle_text(row: &[Rc<Cell>]) -> Option<String> {
    let mut common: Option<&Rc<Cell>> = None;
    for cell in row {
        if cell.text.is_empty() {
            continue;
        }
        match common {
            None => common = Some(cell),
            Some(c) if c.is_header == cell.is_header && c.text == cell.text => {}
            _ => return None,
        }
    }
    let cell = common?;
    if !cell.is_header {
        return None;
    }
    if cell.text.chars().next().is_some_and(is_superscript) {
        return None;
    }
    // A resolvable header label spanning the row is a header, not a title.
    if headers::is_header_label(&cell.text) || headers::has_start_match(&cell.text) {
        return None;
    }
    Some(cell.text.clone())
}

/// Parse one inflection table into form records.
///
/// `rows` is the pre-expanded physical grid ([`crate::grid::expand_grid`]);
/// `titles` are the table's surrounding title lines. Returns `None` when
/// the table shape is not recognisable (no header cells or no data cells
/// at all).
pub fn parse_simple_table<S: Services>(
    services: &S,
    ctx: &TableContext,
    rows: &[Vec<Rc<Cell>>],
    titles: &[String],
) -> Option<Vec<FormRecord>> {
    let mut ret: Vec<FormRecord> = Vec::new();
    let mut hdrspans: Vec<HdrSpan> = Vec::new();
    let mut col_has_text: Vec<bool> = Vec::new();
    let mut cols_headered: Vec<bool> = Vec::new();
    let mut rownum = 0usize;
    let mut global_tags: Vec<Tag> = Vec::new();
    let mut word_tags: Vec<Tag> = Vec::new();
    let mut saw_header = false;
    let mut saw_data = false;

    for title in titles {
        let (more_global, more_word, extra_forms) = parse_title(title, ctx.source);
        global_tags.extend(more_global);
        word_tags.extend(more_word);
        ret.extend(extra_forms);
    }

    // Rows already seen per cell, keyed by allocation identity, so that
    // rowspan repeats are recognised.
    let mut cell_rowcnt: Map<usize, usize> = Map::default();

    for row in rows {
        if row.is_empty() {
            continue; // Skip empty rows without incrementing rownum
        }
        if let Some(subtitle) = subtitle_text(row) {
            if !NOTE_TITLE_RE.is_match(&subtitle) {
                let (more_global, more_word, extra_forms) = parse_title(&subtitle, ctx.source);
                global_tags.extend(more_global);
                word_tags.extend(more_word);
                ret.extend(extra_forms);
            }
            continue; // Skip title rows without incrementing rownum
        }

        let mut rowtags: TagSets = unconstrained();
        let mut have_text = false;
        let mut samecell_cnt = 0usize;
        let mut col0_hdrspan: Option<usize> = None;
        let mut col0_followed_by_nonempty = false;

        for (j, cell) in row.iter().enumerate() {
            let colspan = cell.colspan;
            if samecell_cnt == 0 {
                // First column of a (possibly multi-column) cell
                samecell_cnt = colspan - 1;
            } else {
                samecell_cnt -= 1;
                continue;
            }
            let rowcnt = cell_rowcnt.entry(Rc::as_ptr(cell) as usize).or_insert(0);
            let first_row_of_cell = *rowcnt == 0;
            *rowcnt += 1;

            let col = cell.text.clone();
            if col.is_empty() {
                continue;
            }

            let treat_as_header =
                cell.is_header || cols_headered.get(j).copied().unwrap_or(false);

            if treat_as_header {
                let col = WS_RE.replace_all(&col, " ").into_owned();
                let cleaned = clean_header(&col, true);
                if cleaned.text.is_empty() {
                    continue;
                }
                let hdr_tags = cleaned.tags;
                let mut text = cleaned.text;
                if !headers::is_header_label(&text) {
                    // Retry with parentheticals removed, then with comma
                    // runs collapsed.
                    let text1 = PAREN_ANY_RE.replace_all(&text, "").into_owned();
                    let text2 = WS_RE
                        .replace_all(&COMMA_RUN_RE.replace_all(&text, " "), " ")
                        .into_owned();
                    if headers::is_header_label(&text1) {
                        text = text1;
                    } else if headers::is_header_label(&text2) {
                        text = text2;
                    } else if !headers::has_start_match(&text) {
                        if !IGNORED_COLVALUES.contains(&text.as_str()) {
                            services
                                .debug(&format!("inflection table: unhandled header: {col:?}"));
                            while col_has_text.len() <= j {
                                col_has_text.push(false);
                            }
                            col_has_text[j] = true;
                            saw_header = true;
                            // Keep downstream cell attribution alive.
                            ret.push(FormRecord {
                                form: "error-unrecognized-form".into(),
                                tags: vec!["error-unrecognized-form".into()],
                                source: ctx.source.to_string(),
                                roman: None,
                                ipa: None,
                            });
                        }
                        continue;
                    }
                }
                saw_header = true;
                // Mark that the column has text (we are not at top)
                while col_has_text.len() <= j {
                    col_has_text.push(false);
                }
                col_has_text[j] = true;

                let probe =
                    headers::expand_header(ctx.lang, ctx.word, &text, &TagSet::empty(), true);
                if probe.iter().any(|ts| ts.contains(RESET_MARKER)) {
                    // Reset column headers (only on first row of cell)
                    if first_row_of_cell {
                        hdrspans.clear();
                    }
                    continue;
                }
                if probe.iter().any(|ts| ts.contains(COLUMN_HEADER_MARKER)) {
                    // The whole column consists of headers ("Case").
                    while cols_headered.len() < j + colspan {
                        cols_headered.push(false);
                    }
                    for headered in cols_headered.iter_mut().take(j + colspan).skip(j) {
                        *headered = true;
                    }
                    continue;
                }

                if have_text {
                    // A new header after data cells resets row-tag
                    // accumulation.
                    rowtags = unconstrained();
                }

                let mut new_rowtags = TagSets::default();
                let mut new_coltags = TagSets::default();
                let mut all_hdr_tags = TagSets::default();
                let computed = compute_coltags(&mut hdrspans, j, colspan, false, &col);
                for rt0 in &rowtags {
                    for ct0 in &computed {
                        let tags0 = TagSet::new(
                            rt0.iter()
                                .chain(ct0.iter())
                                .chain(global_tags.iter().map(String::as_str)),
                        );
                        let alt_tags =
                            headers::expand_header(ctx.lang, ctx.word, &text, &tags0, false);
                        for tt in &alt_tags {
                            all_hdr_tags.insert(tt.clone());
                            new_coltags.insert(tt.clone());
                            new_rowtags.insert(TagSet::new(
                                tt.iter()
                                    .chain(rt0.iter())
                                    .chain(hdr_tags.iter().map(String::as_str)),
                            ));
                        }
                    }
                }
                rowtags = new_rowtags;
                let new_coltags: TagSets = new_coltags
                    .into_iter()
                    .filter(|ts| !ts.iter().any(no_inherit))
                    .collect();
                if new_coltags.iter().any(|ts| !ts.is_empty()) {
                    hdrspans.push(HdrSpan::new(j, colspan, rownum, new_coltags, &col));
                    if j == 0 {
                        debug_assert!(col0_hdrspan.is_none());
                        col0_hdrspan = Some(hdrspans.len() - 1);
                    } else if let Some(c0) = col0_hdrspan
                        && all_hdr_tags.iter().any(|ts| !ts.is_empty())
                    {
                        // Headers above left-side label columns expand to
                        // person/gender/number only; anything else means
                        // the column-0 header really was followed.
                        let hdr_limited = all_hdr_tags.iter().flat_map(|ts| ts.iter()).all(|t| {
                            matches!(tag_category(t), Some("person" | "gender" | "number"))
                        });
                        let col0_limited =
                            hdrspans[c0].tagsets.iter().flat_map(|ts| ts.iter()).all(|t| {
                                matches!(
                                    tag_category(t),
                                    Some(
                                        "number"
                                            | "mood"
                                            | "aspect"
                                            | "tense"
                                            | "voice"
                                            | "non-finite"
                                            | "case"
                                            | "possession"
                                    )
                                )
                            });
                        if !(hdr_limited && col0_limited) {
                            col0_followed_by_nonempty = true;
                        }
                    }
                }
                continue;
            }

            // It is a normal data cell
            if IGNORED_COLVALUES.contains(&col.as_str()) {
                continue;
            }
            if SKIP_DATA_RE.is_match(&col) {
                continue;
            }
            if j == 0 && !col_has_text.first().copied().unwrap_or(false) {
                continue; // Skip text at top left, as in Icelandic, Faroese
            }
            col0_followed_by_nonempty = true;
            have_text = true;
            saw_data = true;
            while col_has_text.len() <= j {
                col_has_text.push(false);
            }
            col_has_text[j] = true;

            let combined_coltags = compute_coltags(&mut hdrspans, j, colspan, true, &col);
            let col = DATA_WS_RE.replace_all(&col, " ").into_owned();

            for (raw_form, raw_roman) in split_cell(services, &col) {
                let mut extra_tags: Vec<Tag> = Vec::new();
                let cleaned = clean_header(raw_form.trim(), false);
                let mut form = cleaned.text;
                extra_tags.extend(cleaned.tags);
                let mut roman = raw_roman;
                if !roman.is_empty() {
                    let cleaned_roman = clean_header(&roman, false);
                    roman = cleaned_roman.text;
                    extra_tags.extend(cleaned_roman.tags);
                }

                let mut ipas: Vec<String> = Vec::new();
                if form.contains('/') {
                    for m in IPA_RE.find_iter(&form) {
                        ipas.push(m.as_str().to_string());
                    }
                    form = IPA_RE.replace_all(&form, "").into_owned();
                }
                form = LEADING_COMMA_RE.replace(&form, "").into_owned();
                form = TRAILING_COMMA_RE.replace(&form, "").into_owned();
                form = COMMA_COLLAPSE_RE.replace_all(&form, ", ").into_owned();
                form = MAIN_PREFIX_RE.replace(&form, "").into_owned();
                form = WS_RE.replace_all(&form, " ").trim().to_string();
                if let Some(stripped) = form.strip_prefix('*') {
                    form = stripped.to_string();
                }

                // Parentheses may carry tags anywhere, or a romanisation
                // anywhere but the beginning.
                let paren_match = INLINE_PAREN_RE.captures(&form).map(|caps| {
                    let whole = caps.get(0).unwrap();
                    (whole.start(), whole.end(), caps[1].to_string())
                });
                if let Some((paren_start, paren_end, paren)) = paren_match {
                    if services.classify_desc(&paren) == Classification::Tags {
                        let (tagsets1, topics1) = services.decode_tags(&paren);
                        if topics1.is_empty() {
                            for ts in &tagsets1 {
                                extra_tags.extend(ts.iter().map(Tag::from));
                            }
                            form = format!("{} {}", &form[..paren_start], &form[paren_end..])
                                .trim()
                                .to_string();
                        }
                    } else if paren_start > 0
                        && roman.is_empty()
                        && services.classify_desc(&form[..paren_start]) == Classification::Other
                        && matches!(
                            services.classify_desc(&paren),
                            Classification::Romanization | Classification::English
                        )
                    {
                        roman = paren;
                        form = format!("{} {}", &form[..paren_start], &form[paren_end..])
                            .trim()
                            .to_string();
                    }
                }

                // Placeholder cells are not forms
                if matches!(form.as_str(), "" | "not used" | "not applicable" | "unchanged") {
                    continue;
                }

                for rt in &rowtags {
                    for ct in &combined_coltags {
                        let mut tags: Set<Tag> = Set::default();
                        tags.extend(global_tags.iter().cloned());
                        tags.extend(extra_tags.iter().cloned());
                        tags.extend(rt.iter().map(Tag::from));
                        // Merge tags from the column; moods coming from
                        // rows take precedence (imperative rows).
                        let row_moods = tags
                            .iter()
                            .any(|t| tag_category(t) == Some("mood"));
                        for t in ct.iter() {
                            if tag_category(t) == Some("mood") && row_moods {
                                continue;
                            }
                            tags.insert(t.to_string());
                        }

                        // Tags encoded in the form text itself; this may
                        // also adjust the form.
                        let (adjusted, lang_tags) =
                            lang::lang_specific_tags(ctx.lang, ctx.pos, &form);
                        form = adjusted;
                        tags.extend(lang_tags);

                        // Non-finite verb forms may carry a gender/class
                        // suffix.
                        if ctx.pos == "verb"
                            && tags.iter().any(|t| tag_category(t) == Some("non-finite"))
                        {
                            let (adjusted, head_tags) =
                                services.parse_head_final_tags(ctx.lang, &form);
                            form = adjusted;
                            tags.extend(head_tags);
                        }

                        // Russian tables distinguish animacy in places
                        // where only masculine actually varies.
                        if ctx.lang == "Russian" {
                            for animacy in ["animate", "inanimate"] {
                                for gender in ["neuter", "feminine"] {
                                    if tags.contains(animacy)
                                        && tags.contains(gender)
                                        && !tags.contains("masculine")
                                        && !tags.contains("plural")
                                    {
                                        tags.shift_remove(animacy);
                                    }
                                }
                            }
                            if (tags.contains("animate") || tags.contains("inanimate"))
                                && tags.contains("masculine")
                                && tags.contains("plural")
                            {
                                tracing::debug!(
                                    "russian animacy kept with masculine plural: {form:?}"
                                );
                            }
                        }

                        if tags.contains("personal")
                            && !tags.contains("pronoun")
                            && PERSON_TAGS.iter().any(|t| tags.contains(*t))
                        {
                            tags.shift_remove("personal");
                        }
                        if tags.contains("impersonal") {
                            for t in PERSON_TAGS.iter().chain(&["singular", "plural"]) {
                                tags.shift_remove(*t);
                            }
                        }
                        if ctx.pos == "verb" && tags.contains("positive") {
                            tags.shift_remove("negative");
                            tags.shift_remove("positive");
                        }
                        tags.shift_remove("dummy-mood");
                        lang::apply_tag_mappings(ctx.lang, ctx.pos, &mut tags);

                        let mut tags: Vec<Tag> = tags.into_iter().collect();
                        tags.sort();
                        ret.push(FormRecord {
                            form: form.clone(),
                            tags,
                            source: ctx.source.to_string(),
                            roman: (!roman.is_empty()).then(|| roman.clone()),
                            ipa: (!ipas.is_empty()).then(|| ipas.join(", ")),
                        });
                    }
                }
            }
        }
        // End of row
        if let Some(idx) = col0_hdrspan
            && !col0_followed_by_nonempty
        {
            // A column-0 header followed only by headers that yield no
            // tags widens to the entire row.
            hdrspans[idx].colspan = row.len();
        }
        rownum += 1;
    }

    if !saw_header || !saw_data {
        return None;
    }

    // Germanic noun tables inflect together with their articles; drop the
    // article rows and the redundant noun tag.
    if ret.iter().any(|dt| dt.tags.iter().any(|t| t == "noun"))
        && GERMANIC_ARTICLE_LANGS.contains(&ctx.lang)
    {
        ret = ret
            .into_iter()
            .filter_map(|mut dt| {
                if dt.tags.iter().any(|t| t == "noun") {
                    dt.tags.retain(|t| t != "noun");
                } else if dt.tags.iter().any(|t| t == "definite" || t == "indefinite") {
                    return None; // Skip the articles
                }
                Some(dt)
            })
            .collect();
    }

    if !word_tags.is_empty() {
        word_tags.sort();
        word_tags.dedup();
        ret.push(FormRecord {
            form: word_tags.join(" "),
            tags: vec!["word-tags".into()],
            source: format!("{} title", ctx.source),
            roman: None,
            ipa: None,
        });
    }

    Some(ret)
}

/// Accumulates the records of successive tables of one entry, suppressing
/// structural duplicates.
#[derive(Debug, Default)]
pub struct FormSink {
    forms: Vec<FormRecord>,
    seen: Set<FormRecord>,
}

impl FormSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one table and merge its records. Returns `false` when the
    /// table shape was not recognised; the caller may fall through to a
    /// different strategy.
    pub fn add_table<S: Services>(
        &mut self,
        services: &S,
        ctx: &TableContext,
        rows: &[Vec<Rc<Cell>>],
        titles: &[String],
    ) -> bool {
        match parse_simple_table(services, ctx, rows, titles) {
            Some(records) => {
                self.extend(records);
                true
            }
            None => false,
        }
    }

    /// Merge records. A record that only adds `dated` to one already
    /// present is dropped too; modern and pre-reform tables partially
    /// duplicate each other.
    pub fn extend(&mut self, records: Vec<FormRecord>) {
        for dt in records {
            if self.seen.contains(&dt) {
                continue;
            }
            if dt.tags.iter().any(|t| t == "dated") {
                let mut undated = dt.clone();
                undated.tags.retain(|t| t != "dated");
                if !undated.tags.is_empty() && self.seen.contains(&undated) {
                    continue;
                }
            }
            self.seen.insert(dt.clone());
            self.forms.push(dt);
        }
    }

    pub fn forms(&self) -> &[FormRecord] {
        &self.forms
    }

    pub fn into_forms(self) -> Vec<FormRecord> {
        self.forms
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeuristicServices;
    use crate::grid::expand_grid;

    fn ctx<'a>(lang: &'a str, pos: &'a str, word: &'a str) -> TableContext<'a> {
        TableContext {
            lang,
            pos,
            word,
            source: "conjugation",
        }
    }

    fn parse(
        ctx: &TableContext,
        rows: Vec<Vec<Cell>>,
        titles: &[&str],
    ) -> Option<Vec<FormRecord>> {
        let grid = expand_grid(rows);
        let titles: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
        parse_simple_table(&HeuristicServices, ctx, &grid, &titles)
    }

    #[test]
    fn headerless_table_is_unparsed() {
        let rows = vec![vec![Cell::data("gehe"), Cell::data("gehst")]];
        assert!(parse(&ctx("German", "verb", "gehen"), rows, &[]).is_none());
    }

    #[test]
    fn dataless_table_is_unparsed() {
        let rows = vec![vec![Cell::header("singular"), Cell::header("plural")]];
        assert!(parse(&ctx("German", "verb", "gehen"), rows, &[]).is_none());
    }

    #[test]
    fn unrecognised_header_emits_sentinel() {
        let rows = vec![
            vec![Cell::header("utterly mysterious label"), Cell::header("singular")],
            vec![Cell::header("present"), Cell::data("gehe")],
        ];
        let forms = parse(&ctx("German", "verb", "gehen"), rows, &[]).unwrap();
        assert!(forms.iter().any(|dt| dt.form == "error-unrecognized-form"
            && dt.tags == ["error-unrecognized-form"]));
    }

    #[test]
    fn ignored_column_values_are_skipped() {
        let rows = vec![
            vec![Cell::header("—"), Cell::header("singular")],
            vec![Cell::header("present"), Cell::data("-")],
        ];
        // The only data cell is an ignored placeholder.
        assert!(parse(&ctx("German", "verb", "gehen"), rows, &[]).is_none());
    }

    #[test]
    fn sub_title_row_contributes_global_tags() {
        let rows = vec![
            vec![
                Cell::header("negative forms").spanning(2, 1),
            ],
            vec![Cell::header("singular"), Cell::header("plural")],
            vec![Cell::data("en mene"), Cell::data("emme mene")],
        ];
        let forms = parse(&ctx("Finnish", "verb", "mennä"), rows, &[]).unwrap();
        assert!(forms.iter().all(|dt| dt.tags.contains(&"negative".to_string())));
    }

    #[test]
    fn word_tags_record_is_appended() {
        let rows = vec![
            vec![Cell::header("singular")],
            vec![Cell::data("Haus")],
        ];
        let forms = parse(
            &ctx("German", "noun", "Haus"),
            rows,
            &["Declension of Haus (strong, neuter)"],
        )
        .unwrap();
        let word_tags: Vec<_> = forms
            .iter()
            .filter(|dt| dt.tags == ["word-tags"])
            .collect();
        assert_eq!(word_tags.len(), 1);
        assert_eq!(word_tags[0].form, "neuter strong");
        assert_eq!(word_tags[0].source, "conjugation title");
    }

    #[test]
    fn sink_deduplicates_dated_variants() {
        let mut sink = FormSink::new();
        sink.extend(vec![FormRecord {
            form: "X".into(),
            tags: vec!["plural".into()],
            source: "declension".into(),
            roman: None,
            ipa: None,
        }]);
        sink.extend(vec![
            FormRecord {
                form: "X".into(),
                tags: vec!["dated".into(), "plural".into()],
                source: "declension".into(),
                roman: None,
                ipa: None,
            },
            FormRecord {
                form: "Y".into(),
                tags: vec!["dated".into(), "plural".into()],
                source: "declension".into(),
                roman: None,
                ipa: None,
            },
        ]);
        let forms: Vec<_> = sink.forms().iter().map(|dt| dt.form.as_str()).collect();
        assert_eq!(forms, ["X", "Y"]);
    }

    #[test]
    fn sink_drops_structural_duplicates() {
        let dt = FormRecord {
            form: "X".into(),
            tags: vec!["plural".into()],
            source: "declension".into(),
            roman: None,
            ipa: None,
        };
        let mut sink = FormSink::new();
        sink.extend(vec![dt.clone()]);
        sink.extend(vec![dt]);
        assert_eq!(sink.len(), 1);
    }
}
