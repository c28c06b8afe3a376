//! Static tag catalogue.
//!
//! Every tag the extractor may emit, grouped by grammatical category.
//! Categories drive the column-tag composer's precedence and stop rules,
//! so a tag missing here is a programmer error, not a data condition.

pub const TAG_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "person",
        &["first-person", "second-person", "third-person", "impersonal"],
    ),
    (
        "number",
        &["singular", "plural", "dual", "collective", "paucal"],
    ),
    (
        "gender",
        &[
            "masculine",
            "feminine",
            "neuter",
            "common",
            "virile",
            "nonvirile",
        ],
    ),
    (
        "case",
        &[
            "nominative",
            "genitive",
            "dative",
            "accusative",
            "instrumental",
            "locative",
            "prepositional",
            "vocative",
            "partitive",
            "essive",
            "translative",
            "inessive",
            "elative",
            "illative",
            "adessive",
            "ablative",
            "allative",
            "abessive",
            "comitative",
            "instructive",
            "ergative",
            "absolutive",
            "oblique",
            "direct",
        ],
    ),
    (
        "mood",
        &[
            "indicative",
            "subjunctive",
            "conditional",
            "imperative",
            "optative",
            "jussive",
            "potential",
            "quotative",
            "dummy-mood",
        ],
    ),
    // Finer distinctions below the mood axis (Konjunktiv I vs II).
    ("mood-variant", &["subjunctive-i", "subjunctive-ii"]),
    (
        "tense",
        &[
            "present",
            "past",
            "preterite",
            "imperfect",
            "perfect",
            "pluperfect",
            "future",
            "future-perfect",
            "aorist",
        ],
    ),
    (
        "voice",
        &["active", "passive", "middle", "mediopassive", "reflexive"],
    ),
    (
        "aspect",
        &[
            "perfective",
            "imperfective",
            "progressive",
            "habitual",
            "iterative",
            "frequentative",
        ],
    ),
    (
        "non-finite",
        &[
            "infinitive",
            "infinitive-i",
            "infinitive-i-long",
            "infinitive-ii",
            "infinitive-iii",
            "infinitive-iv",
            "infinitive-v",
            "participle",
            "gerund",
            "gerundive",
            "supine",
            "converb",
            "connegative",
            "verbal-noun",
        ],
    ),
    ("polarity", &["positive", "negative"]),
    ("animacy", &["animate", "inanimate"]),
    (
        "possession",
        &["possessive", "possessive-single", "possessive-many"],
    ),
    ("definiteness", &["definite", "indefinite"]),
    ("degree", &["comparative", "superlative"]),
    ("clause", &["subordinate-clause"]),
    (
        "detail",
        &[
            "rare",
            "formal",
            "informal",
            "dated",
            "archaic",
            "obsolete",
            "colloquial",
            "literary",
            "poetic",
            "emphatic",
            "standard",
            "nonstandard",
            "dialectal",
        ],
    ),
    (
        "class",
        &[
            "class",
            "accent-paradigm",
            "declension-1",
            "declension-2",
            "declension-3",
            "declension-4",
            "declension-5",
            "conjugation-1",
            "conjugation-2",
            "conjugation-3",
            "conjugation-4",
            "conjugation-5",
            "conjugation-6",
            "conjugation-7",
            "strong",
            "weak",
            "mixed",
            "deponent",
            "iō-variant",
            "no-supine",
            "no-perfect",
            "no-short-form",
            "no-plural",
            "short-form",
        ],
    ),
    ("dialect", &["Western-Lombard", "Eastern-Lombard"]),
    (
        "misc",
        &[
            "noun",
            "adjective",
            "pronoun",
            "article",
            "personal",
            "auxiliary",
            "transitive",
            "intransitive",
            "ditransitive",
            "ambitransitive",
            "countable",
            "uncountable",
            "proper-noun",
            "multiword-construction",
            "combined-form",
            "mutation",
            "word-tags",
            "adverbial",
            "interrogative",
            "demonstrative",
            "relative",
            "reciprocal",
        ],
    ),
    ("error", &["error-unrecognized-form"]),
];

/// Tags that are never inherited from enclosing headers.
pub const NO_INHERIT_TAGS: &[&str] = &[
    "infinitive-i",
    "infinitive-i-long",
    "infinitive-ii",
    "infinitive-iii",
    "infinitive-iv",
    "infinitive-v",
];
