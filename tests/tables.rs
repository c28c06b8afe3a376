use std::rc::Rc;

use wifl::grid::expand_grid;
use wifl::tags::is_valid_tag;
use wifl::{Cell, FormRecord, FormSink, HeuristicServices, TableContext, parse_simple_table};

fn h(text: &str) -> Cell {
    Cell::header(text)
}

fn hs(text: &str, colspan: usize) -> Cell {
    Cell::header(text).spanning(colspan, 1)
}

fn d(text: &str) -> Cell {
    Cell::data(text)
}

fn ds(text: &str, colspan: usize) -> Cell {
    Cell::data(text).spanning(colspan, 1)
}

fn parse(ctx: &TableContext, rows: Vec<Vec<Cell>>, titles: &[&str]) -> Vec<FormRecord> {
    let grid = expand_grid(rows);
    let titles: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
    parse_simple_table(&HeuristicServices, ctx, &grid, &titles).expect("table should parse")
}

fn german_verb<'a>(word: &'a str) -> TableContext<'a> {
    TableContext {
        lang: "German",
        pos: "verb",
        word,
        source: "conjugation",
    }
}

/// Universal record properties: catalogued tags, sorted tag lists, clean
/// forms.
fn assert_properties(forms: &[FormRecord]) {
    for record in forms {
        assert!(!record.form.is_empty(), "empty form");
        assert_eq!(record.form, record.form.trim(), "untrimmed form: {:?}", record.form);
        assert!(
            !record.form.starts_with(',') && !record.form.ends_with(','),
            "comma-wrapped form: {:?}",
            record.form
        );
        for tag in &record.tags {
            assert!(is_valid_tag(tag), "unknown tag {tag:?} on {:?}", record.form);
        }
        let mut sorted = record.tags.clone();
        sorted.sort();
        assert_eq!(record.tags, sorted, "unsorted tags on {:?}", record.form);
    }
}

fn tags_of<'a>(forms: &'a [FormRecord], form: &str) -> Vec<&'a [String]> {
    forms
        .iter()
        .filter(|dt| dt.form == form)
        .map(|dt| dt.tags.as_slice())
        .collect()
}

#[test]
fn german_verb_row_with_pronoun_prefix() {
    let rows = vec![
        vec![h("—"), h("Singular"), h("Plural")],
        vec![h("Präsens"), d("ich gehe"), d("wir gehen")],
    ];
    let forms = parse(&german_verb("gehen"), rows, &[]);
    assert_properties(&forms);

    assert_eq!(
        tags_of(&forms, "gehe"),
        vec![&["first-person", "indicative", "present", "singular"][..]]
    );
    assert_eq!(
        tags_of(&forms, "gehen"),
        vec![&["first-person", "indicative", "plural", "present"][..]]
    );
}

#[test]
fn reset_marker_clears_column_headers() {
    let rows = vec![
        vec![h("Singular"), h("Plural")],
        vec![d("geha"), d("gehb")],
        vec![hs("Compound tenses", 2)],
        vec![d("gehc"), d("gehd")],
    ];
    let forms = parse(&german_verb("gehen"), rows, &[]);
    assert_properties(&forms);

    assert_eq!(tags_of(&forms, "geha"), vec![&["singular"][..]]);
    assert_eq!(tags_of(&forms, "gehb"), vec![&["plural"][..]]);
    // After the reset no column constraints remain.
    let no_tags: &[String] = &[];
    assert_eq!(tags_of(&forms, "gehc"), vec![no_tags]);
    assert_eq!(tags_of(&forms, "gehd"), vec![no_tags]);
}

#[test]
fn reset_marker_is_idempotent() {
    let once = vec![
        vec![h("Singular"), h("Plural")],
        vec![d("geha"), d("gehb")],
        vec![hs("Compound tenses", 2)],
        vec![d("gehc"), d("gehd")],
    ];
    let twice = vec![
        vec![h("Singular"), h("Plural")],
        vec![d("geha"), d("gehb")],
        vec![hs("Compound tenses", 2)],
        vec![hs("Compound forms", 2)],
        vec![d("gehc"), d("gehd")],
    ];
    let ctx = german_verb("gehen");
    assert_eq!(parse(&ctx, once, &[]), parse(&ctx, twice, &[]));
}

#[test]
fn romanisation_pairing() {
    let ctx = TableContext {
        lang: "Russian",
        pos: "noun",
        word: "стол",
        source: "declension",
    };
    let rows = vec![
        vec![h("singular")],
        vec![d("стол, стола, стол, stola, stola, stola")],
    ];
    let forms = parse(&ctx, rows, &[]);
    assert_properties(&forms);

    // Three (native, roman) pairs, not six singletons.
    assert_eq!(forms.len(), 3);
    for record in &forms {
        assert_eq!(record.roman.as_deref(), Some("stola"));
        assert_eq!(record.tags, ["singular"]);
    }
    assert_eq!(forms[0].form, "стол");
    assert_eq!(forms[1].form, "стола");
}

#[test]
fn dedup_suppresses_dated_variant_across_tables() {
    let ctx = TableContext {
        lang: "Russian",
        pos: "noun",
        word: "X",
        source: "declension",
    };
    let modern = expand_grid(vec![vec![h("plural")], vec![d("X")]]);
    let datedtbl = expand_grid(vec![vec![h("plural")], vec![d("X")]]);

    let mut sink = FormSink::new();
    assert!(sink.add_table(&HeuristicServices, &ctx, &modern, &[]));
    assert!(sink.add_table(
        &HeuristicServices,
        &ctx,
        &datedtbl,
        &["Pre-reform declension".to_string()],
    ));

    let with_x: Vec<_> = sink.forms().iter().filter(|dt| dt.form == "X").collect();
    assert_eq!(with_x.len(), 1);
    assert_eq!(with_x[0].tags, ["plural"]);
}

#[test]
fn split_gender_columns_leave_gender_unconstrained() {
    // "Case" marks column 0 as all-headers; the case names arrive as data
    // cells. A form spanning the masculine and feminine columns gets no
    // gender tag.
    let ctx = TableContext {
        lang: "Czech",
        pos: "adjective",
        word: "mladý",
        source: "declension",
    };
    let rows = vec![
        vec![h("Case"), h("Masculine"), h("Feminine")],
        vec![d("Nominative"), ds("mladí", 2)],
    ];
    let forms = parse(&ctx, rows, &[]);
    assert_properties(&forms);
    assert_eq!(tags_of(&forms, "mladí"), vec![&["nominative"][..]]);
}

#[test]
fn title_extras_and_word_tags() {
    let rows = vec![vec![h("Singular")], vec![d("gehe")]];
    let forms = parse(
        &german_verb("gehen"),
        rows,
        &["2nd-stem class, auxiliary sein"],
    );
    assert_properties(&forms);

    assert_eq!(tags_of(&forms, "2nd-stem"), vec![&["class"][..]]);
    let word_tags: Vec<_> = forms
        .iter()
        .filter(|dt| dt.tags == ["word-tags"])
        .collect();
    assert_eq!(word_tags.len(), 1);
    assert_eq!(word_tags[0].form, "auxiliary");
    assert_eq!(word_tags[0].source, "conjugation title");
}

#[test]
fn rowspan_headers_cover_following_rows() {
    // "Indicative" spans two rows; both data rows carry the mood.
    let rows = vec![
        vec![h("—"), h("Singular"), h("Plural")],
        vec![
            Cell::header("Indicative").spanning(1, 2),
            d("gehe"),
            d("gehen"),
        ],
        vec![d("ging"), d("gingen")],
    ];
    // The second data row has an empty first position filled by the
    // rowspan cell; its cells shift right by one.
    let grid = expand_grid(rows);
    assert!(Rc::ptr_eq(&grid[1][0], &grid[2][0]));

    let forms =
        parse_simple_table(&HeuristicServices, &german_verb("gehen"), &grid, &[]).unwrap();
    assert_properties(&forms);
    for form in ["gehe", "gehen", "ging", "gingen"] {
        let tags = tags_of(&forms, form);
        assert_eq!(tags.len(), 1, "{form}");
        assert!(tags[0].contains(&"indicative".to_string()), "{form}: {tags:?}");
    }
}

#[test]
fn impersonal_forms_carry_no_person() {
    let ctx = TableContext {
        lang: "Portuguese",
        pos: "verb",
        word: "viajar",
        source: "conjugation",
    };
    let rows = vec![
        vec![h("—"), h("Singular")],
        vec![h("impersonal"), d("viajar")],
    ];
    let forms = parse(&ctx, rows, &[]);
    assert_properties(&forms);
    let tags = tags_of(&forms, "viajar");
    assert_eq!(tags.len(), 1);
    assert!(tags[0].contains(&"impersonal".to_string()));
    assert!(!tags[0].iter().any(|t| t.ends_with("-person") || t == "singular"));
}

#[test]
fn verb_positive_tag_is_dropped() {
    let rows = vec![
        vec![h("—"), h("Singular")],
        vec![h("Positive"), d("gehe")],
    ];
    let forms = parse(&german_verb("gehen"), rows, &[]);
    assert_properties(&forms);
    let tags = tags_of(&forms, "gehe");
    assert!(!tags[0].contains(&"positive".to_string()));
}

#[test]
fn structurally_duplicate_records_are_suppressed() {
    // The same form with the same tags twice in one table.
    let ctx = german_verb("gehen");
    let grid = expand_grid(vec![
        vec![h("Singular"), h("Singular")],
        vec![d("gehe"), d("gehe")],
    ]);
    let mut sink = FormSink::new();
    assert!(sink.add_table(&HeuristicServices, &ctx, &grid, &[]));
    assert_eq!(sink.forms().iter().filter(|dt| dt.form == "gehe").count(), 1);
}
