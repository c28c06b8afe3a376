//! Language-specific post-processing of extracted forms.
//!
//! Some tables encode grammatical information in the form text itself;
//! German verb rows carry the pronoun ("ich gehe") instead of person and
//! number headers. Pattern tables per (language, part of speech) excise
//! those fragments and return the tags they imply.

use std::sync::LazyLock;

use regex::Regex;

use crate::Map;
use crate::tags::{Tag, is_valid_tag};

// Pattern → tags tables per (languages, parts of speech). A leading `^`
// anchors the pattern at the start of the form; the matched substring is
// removed from the form.
const LANG_SPECIFIC_DATA: &[(&[&str], &[&str], &[(&str, &str)])] = &[(
    &["German"],
    &["verb"],
    &[
        ("^ich ", "first-person singular"),
        ("^du ", "second-person singular"),
        ("^er ", "third-person singular"),
        ("^wir ", "first-person plural"),
        ("^ihr ", "second-person plural"),
        ("^sie ", "third-person plural"),
        ("^dass ich ", "first-person singular subordinate-clause"),
        ("^dass du ", "second-person singular subordinate-clause"),
        ("^dass er ", "third-person singular subordinate-clause"),
        ("^dass wir ", "first-person plural subordinate-clause"),
        ("^dass ihr ", "second-person plural subordinate-clause"),
        ("^dass sie ", "third-person plural subordinate-clause"),
        (" (du)", "second-person singular"),
        (" (ihr)", "second-person plural"),
    ],
)];

// Tag rewrites per (languages, parts of speech), applied to fixed point:
// when the source set is present it is replaced by the destination set.
const LANG_TAG_MAPPINGS: &[(&[&str], &[&str], &[(&[&str], &[&str])])] = &[(
    &["Armenian"],
    &["noun"],
    &[
        (&["possessive", "singular"], &["possessive", "possessive-single"]),
        (&["possessive", "plural"], &["possessive", "possessive-many"]),
    ],
)];

/// Languages whose noun tables carry article rows that are dropped in
/// post-processing.
pub const GERMANIC_ARTICLE_LANGS: &[&str] = &[
    "Alemannic German",
    "Cimbrian",
    "German",
    "German Low German",
    "Hunsrik",
    "Luxembourish",
    "Pennsylvania German",
];

struct LangRules {
    regex: Regex,
    tags_by_pattern: Map<&'static str, &'static str>,
}

static RULES: LazyLock<Vec<((&'static str, &'static str), LangRules)>> = LazyLock::new(|| {
    let mut grouped: Map<(&'static str, &'static str), Vec<(&'static str, &'static str)>> =
        Map::default();
    for (langs, poses, rules) in LANG_SPECIFIC_DATA {
        for (pattern, tags) in *rules {
            for tag in tags.split_whitespace() {
                assert!(is_valid_tag(tag), "lang rule {pattern:?}: unknown tag {tag:?}");
            }
        }
        for &lang in *langs {
            for &pos in *poses {
                grouped.entry((lang, pos)).or_default().extend_from_slice(rules);
            }
        }
    }
    for (_, _, rules) in LANG_TAG_MAPPINGS {
        for (src, dst) in *rules {
            for tag in src.iter().chain(*dst) {
                assert!(is_valid_tag(tag), "tag mapping: unknown tag {tag:?}");
            }
        }
    }

    grouped
        .into_iter()
        .map(|(key, rules)| {
            let starts: Vec<String> = rules
                .iter()
                .filter_map(|(p, _)| p.strip_prefix('^'))
                .map(regex::escape)
                .collect();
            let others: Vec<String> = rules
                .iter()
                .filter(|(p, _)| !p.starts_with('^'))
                .map(|(p, _)| regex::escape(p))
                .collect();
            let mut parts = Vec::new();
            if !starts.is_empty() {
                parts.push(format!("^({})", starts.join("|")));
            }
            if !others.is_empty() {
                parts.push(format!("({})", others.join("|")));
            }
            let regex = Regex::new(&parts.join("|")).unwrap();

            let mut tags_by_pattern = Map::default();
            for (pattern, tags) in rules {
                let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
                let prev = tags_by_pattern.insert(pattern, tags);
                assert!(prev.is_none(), "duplicate lang rule pattern {pattern:?}");
            }
            (key, LangRules { regex, tags_by_pattern })
        })
        .collect()
});

/// Extract tags carried by the form text itself, excising the matched
/// fragment. Returns the adjusted form and the implied tags.
pub fn lang_specific_tags(lang: &str, pos: &str, form: &str) -> (String, Vec<Tag>) {
    let rules = RULES
        .iter()
        .find(|((l, p), _)| *l == lang && *p == pos)
        .map(|(_, rules)| rules);
    let Some(rules) = rules else {
        return (form.to_string(), Vec::new());
    };
    let Some(m) = rules.regex.find(form) else {
        return (form.to_string(), Vec::new());
    };
    let tags = rules.tags_by_pattern[m.as_str()];
    let form = format!("{}{}", &form[..m.start()], &form[m.end()..]);
    (form, tags.split_whitespace().map(Into::into).collect())
}

/// Apply the per-(language, pos) tag rewrite table until fixed point.
pub fn apply_tag_mappings(lang: &str, pos: &str, tags: &mut crate::Set<Tag>) {
    loop {
        let mut changed = false;
        for (langs, poses, rules) in LANG_TAG_MAPPINGS {
            if !langs.contains(&lang) || !poses.contains(&pos) {
                continue;
            }
            for (src, dst) in *rules {
                if src.iter().all(|t| tags.contains(*t)) {
                    let mut altered = false;
                    for t in *src {
                        altered |= tags.shift_remove(*t);
                    }
                    for t in *dst {
                        altered |= tags.insert((*t).to_string());
                    }
                    changed |= altered;
                }
            }
        }
        if !changed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_lang_specific(lang: &str, pos: &str, form: &str, expected_form: &str, expected_tags: &[&str]) {
        let (form, tags) = lang_specific_tags(lang, pos, form);
        assert_eq!(form, expected_form);
        assert_eq!(tags, expected_tags);
    }

    #[test]
    fn german_pronoun_prefixes() {
        make_test_lang_specific("German", "verb", "ich gehe", "gehe", &["first-person", "singular"]);
        make_test_lang_specific("German", "verb", "wir gehen", "gehen", &["first-person", "plural"]);
        make_test_lang_specific(
            "German",
            "verb",
            "dass du gehest",
            "gehest",
            &["second-person", "singular", "subordinate-clause"],
        );
    }

    #[test]
    fn german_floating_pronoun() {
        make_test_lang_specific("German", "verb", "geh (du)", "geh", &["second-person", "singular"]);
    }

    #[test]
    fn no_rules_for_other_languages() {
        make_test_lang_specific("Finnish", "verb", "ich gehe", "ich gehe", &[]);
        make_test_lang_specific("German", "noun", "ich gehe", "ich gehe", &[]);
    }

    #[test]
    fn armenian_possessive_remap() {
        let mut tags: crate::Set<Tag> =
            ["possessive", "singular", "nominative"].iter().map(|t| t.to_string()).collect();
        apply_tag_mappings("Armenian", "noun", &mut tags);
        assert!(tags.contains("possessive-single"));
        assert!(!tags.contains("singular"));
        assert!(tags.contains("nominative"));

        // Other languages are untouched.
        let mut tags: crate::Set<Tag> =
            ["possessive", "singular"].iter().map(|t| t.to_string()).collect();
        apply_tag_mappings("German", "noun", &mut tags);
        assert!(tags.contains("singular"));
    }
}
