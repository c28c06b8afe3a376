//! Inflection-table title parsing.
//!
//! Titles carry global tags ("negative possessive forms of ..."), tags
//! describing the lemma as a whole ("weak", "3rd declension"), and the
//! occasional extra form such as a class descriptor.

use std::sync::LazyLock;

use regex::Regex;

use crate::headers;
use crate::models::FormRecord;
use crate::tags::Tag;

// Words in the title that add tags to every entry of the table.
const TITLE_GLOBAL: &[(&str, &str)] = &[
    ("possessive", "possessive"),
    ("negative", "negative"),
    ("future", "future"),
    ("pf", "perfective"),
    ("impf", "imperfective"),
    ("comparative", "comparative"),
    ("superlative", "superlative"),
    ("combined forms", "combined-form"),
    ("mutation", "mutation"),
    ("definite article", "definite"),
    ("indefinite article", "indefinite"),
    ("pre-reform", "dated"),
    ("personal pronouns", "personal pronoun"),
    ("composed forms of", "multiword-construction"),
    ("subordinate-clause forms of", "subordinate-clause"),
    ("western lombard", "Western-Lombard"),
    ("eastern lombard", "Eastern-Lombard"),
];

// Words in the title that describe the word itself rather than the forms.
const TITLE_WORD: &[(&str, &str)] = &[
    ("strong", "strong"),
    ("weak", "weak"),
    ("countable", "countable"),
    ("uncountable", "uncountable"),
    ("inanimate", "inanimate"),
    ("animate", "animate"),
    ("transitive", "transitive"),
    ("intransitive", "intransitive"),
    ("ditransitive", "ditransitive"),
    ("ambitransitive", "ambitransitive"),
    ("auxiliary", "auxiliary"),
    ("proper noun", "proper-noun"),
    ("no plural", "no-plural"),
    ("imperfective", "imperfective"),
    ("perfective", "perfective"),
    ("no supine stem", "no-supine"),
    ("no perfect stem", "no-perfect"),
    ("deponent", "deponent"),
    ("no short forms", "no-short-form"),
    ("iō-variant", "iō-variant"),
    ("1st declension", "declension-1"),
    ("2nd declension", "declension-2"),
    ("3rd declension", "declension-3"),
    ("4th declension", "declension-4"),
    ("5th declension", "declension-5"),
    ("first declension", "declension-1"),
    ("second declension", "declension-2"),
    ("third declension", "declension-3"),
    ("fourth declension", "declension-4"),
    ("fifth declension", "declension-5"),
    ("1st conjugation", "conjugation-1"),
    ("2nd conjugation", "conjugation-2"),
    ("3rd conjugation", "conjugation-3"),
    ("4th conjugation", "conjugation-4"),
    ("5th conjugation", "conjugation-5"),
    ("6th conjugation", "conjugation-6"),
    ("7th conjugation", "conjugation-7"),
    ("first conjugation", "conjugation-1"),
    ("second conjugation", "conjugation-2"),
    ("third conjugation", "conjugation-3"),
    ("fourth conjugation", "conjugation-4"),
    ("fifth conjugation", "conjugation-5"),
    ("sixth conjugation", "conjugation-6"),
    ("seventh conjugation", "conjugation-7"),
];

// Parenthesised title elements converted to word tags as-is.
const TITLE_ELEMENTS: &[(&str, &str)] = &[
    ("weak", "weak"),
    ("strong", "strong"),
    ("masculine", "masculine"),
    ("feminine", "feminine"),
    ("neuter", "neuter"),
    ("singular", "singular"),
    ("plural", "plural"),
];

// Parenthesised element starts; the rest of the element becomes an extra
// form tagged with the mapped tags.
const TITLE_ELEMSTART: &[(&str, &str)] = &[
    ("auxiliary", "auxiliary"),
    ("Kotus type", "class"),
    ("class", "class"),
    ("short class", "class"),
    ("type", "class"),
    ("strong class", "class"),
    ("weak class", "class"),
    ("accent paradigm", "accent-paradigm"),
];

fn whole_word_re(keys: &[(&str, &str)]) -> Regex {
    let alternation = keys
        .iter()
        .map(|(k, _)| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)(^|\b)({alternation})($|\b)")).unwrap()
}

static TITLE_GLOBAL_RE: LazyLock<Regex> = LazyLock::new(|| whole_word_re(TITLE_GLOBAL));
static TITLE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| whole_word_re(TITLE_WORD));

static CLASS_DESCRIPTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\w+-type|accent-\w+|\w+-stem|[^ ]+ gradation)\b").unwrap());

static PAREN_PART_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

static ELEMSTART_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Longer keys first so "strong class" wins over "class" etc.
    let mut keys: Vec<&str> = TITLE_ELEMSTART.iter().map(|(k, _)| *k).collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"^({alternation}) ")).unwrap()
});

static MARKUP_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<[^>]*>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static PORTUGUESE_VERB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(Portuguese) (-.* verb) ").unwrap());

fn lookup<'a>(table: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    table
        .iter()
        .find_map(|(k, v)| (k.eq_ignore_ascii_case(key) || *k == key).then_some(*v))
}

fn extra_form(form: &str, tags: &[&str], source: &str) -> FormRecord {
    FormRecord {
        form: form.trim().to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        source: format!("{source} title"),
        roman: None,
        ipa: None,
    }
}

/// Parse one inflection-table title line.
///
/// Returns `(global_tags, word_tags, extra_forms)`: tags to be added to
/// every entry, tags describing the word as a whole, and additional forms
/// (class descriptors and the like).
pub fn parse_title(title: &str, source: &str) -> (Vec<Tag>, Vec<Tag>, Vec<FormRecord>) {
    let title = html_escape::decode_html_entities(title);
    let title = MARKUP_TAG_RE.replace_all(&title, "");
    let title = WS_RE.replace_all(title.trim(), " ").into_owned();

    let mut global_tags: Vec<Tag> = Vec::new();
    let mut word_tags: Vec<Tag> = Vec::new();
    let mut extra_forms: Vec<FormRecord> = Vec::new();

    // The whole title may be a plain header label ("Indicative").
    for candidate in [title.clone(), title.to_lowercase()] {
        if let Some(expr) = headers::plain_label_value(&candidate) {
            let tags = expr.split_whitespace().map(Into::into).collect();
            return (tags, Vec::new(), Vec::new());
        }
    }

    for m in TITLE_GLOBAL_RE.find_iter(&title) {
        if let Some(expr) = lookup(TITLE_GLOBAL, &m.as_str().to_lowercase()) {
            global_tags.extend(expr.split_whitespace().map(Tag::from));
        }
    }
    for m in TITLE_WORD_RE.find_iter(&title) {
        if let Some(expr) = lookup(TITLE_WORD, &m.as_str().to_lowercase()) {
            word_tags.extend(expr.split_whitespace().map(Tag::from));
        }
    }

    // Class descriptors such as "2nd-stem", "accent-1", "e-type".
    if let Some(m) = CLASS_DESCRIPTOR_RE.captures(&title) {
        extra_forms.push(extra_form(&m[1], &["class"], source));
    }

    for m in PAREN_PART_RE.captures_iter(&title) {
        for elem in m[1].split(',') {
            let elem = elem.trim();
            if let Some(expr) = lookup(TITLE_ELEMENTS, elem) {
                word_tags.extend(expr.split_whitespace().map(Tag::from));
            } else if let Some(start) = ELEMSTART_RE.captures(elem) {
                let tags_expr = lookup(TITLE_ELEMSTART, &start[1]).unwrap();
                let tags: Vec<&str> = tags_expr.split_whitespace().collect();
                extra_forms.push(extra_form(&elem[start[0].len()..], &tags, source));
            }
        }
    }

    // Titles without parentheses still carry interpretable parts.
    if !title.contains('(') {
        if let Some(m) = PORTUGUESE_VERB_RE.captures(&title) {
            extra_forms.push(extra_form(&m[2], &["class"], source));
        }
        for elem in title.split(',') {
            let elem = elem.trim();
            if let Some(expr) = lookup(TITLE_ELEMENTS, elem) {
                word_tags.extend(expr.split_whitespace().map(Tag::from));
            } else if elem.ends_with("-stem") {
                extra_forms.push(extra_form(elem, &["class"], source));
            }
        }
    }

    (global_tags, word_tags, extra_forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::is_valid_tag;

    #[test]
    fn table_values_are_catalogued() {
        for (key, expr) in TITLE_GLOBAL
            .iter()
            .chain(TITLE_WORD)
            .chain(TITLE_ELEMENTS)
            .chain(TITLE_ELEMSTART)
        {
            for tag in expr.split_whitespace() {
                assert!(is_valid_tag(tag), "{key}: unknown tag {tag}");
            }
        }
    }

    #[test]
    fn plain_header_label_title() {
        let (global, word, extras) = parse_title("Indicative", "conjugation");
        assert_eq!(global, ["indicative"]);
        assert!(word.is_empty());
        assert!(extras.is_empty());
    }

    #[test]
    fn global_and_word_scans() {
        let (global, word, _) = parse_title("Pre-reform declension of лошадь (inanimate)", "declension");
        assert_eq!(global, ["dated"]);
        assert_eq!(word, ["inanimate"]);
    }

    #[test]
    fn stem_class_without_parens() {
        let (_, word, extras) = parse_title("2nd-stem class, auxiliary sein", "conjugation");
        assert!(word.contains(&"auxiliary".to_string()));
        assert_eq!(extras.len(), 1);
        assert_eq!(extras[0].form, "2nd-stem");
        assert_eq!(extras[0].tags, ["class"]);
        assert_eq!(extras[0].source, "conjugation title");
    }

    #[test]
    fn parenthesised_elements() {
        let (_, _, extras) =
            parse_title("Conjugation of tulla (Kotus type 67/tulla, no gradation)", "conjugation");
        // "no gradation" hits the class-descriptor scan, "67/tulla" the
        // element-start table.
        assert_eq!(extras.len(), 2);
        assert_eq!(extras[0].form, "no gradation");
        assert_eq!(extras[1].form, "67/tulla");
        assert_eq!(extras[1].tags, ["class"]);
    }

    #[test]
    fn parenthesised_gender_element() {
        let (_, word, _) = parse_title("Declension of Hund (masculine, strong)", "declension");
        assert!(word.contains(&"masculine".to_string()));
        assert!(word.contains(&"strong".to_string()));
    }

    #[test]
    fn portuguese_verb_class() {
        let (_, _, extras) = parse_title("Portuguese -ar verb conjugation", "conjugation");
        assert_eq!(extras.len(), 1);
        assert_eq!(extras[0].form, "-ar verb");
        assert_eq!(extras[0].tags, ["class"]);
    }

    #[test]
    fn markup_is_stripped() {
        let (global, _, _) = parse_title("<b>negative</b>&nbsp;forms", "conjugation");
        assert_eq!(global, ["negative"]);
    }
}
