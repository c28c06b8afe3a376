pub mod catalogue;

use std::sync::LazyLock;

use crate::{Map, Set};
use catalogue::{NO_INHERIT_TAGS, TAG_CATEGORIES};

pub type Tag = String;

static TAG_TO_CATEGORY: LazyLock<Map<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = Map::default();
    for (category, tags) in TAG_CATEGORIES {
        for tag in *tags {
            let prev = map.insert(*tag, *category);
            assert!(prev.is_none(), "tag {tag} listed in two categories");
        }
    }
    for tag in NO_INHERIT_TAGS {
        assert!(
            map.contains_key(tag),
            "no-inherit tag {tag} not in catalogue"
        );
    }
    map
});

/// Category of a catalogued tag. `None` for markers and unknown words.
pub fn tag_category(tag: &str) -> Option<&'static str> {
    TAG_TO_CATEGORY.get(tag).copied()
}

pub fn is_valid_tag(tag: &str) -> bool {
    TAG_TO_CATEGORY.contains_key(tag)
}

/// Tags that must not be inherited from enclosing headers.
pub fn no_inherit(tag: &str) -> bool {
    NO_INHERIT_TAGS.contains(&tag)
}

/// One interpretation of a header or cell: a canonical sorted tag tuple.
///
/// Kept sorted and deduplicated so it can serve as a map key and compare
/// structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    pub fn new<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        let mut v: Vec<Tag> = tags.into_iter().map(Into::into).collect();
        v.sort();
        v.dedup();
        Self(v)
    }

    /// Parse a space-separated tag expression ("first-person singular").
    pub fn from_expr(expr: &str) -> Self {
        Self::new(expr.split_whitespace())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.0
    }

    pub fn union(&self, other: &TagSet) -> TagSet {
        TagSet::new(self.iter().chain(other.iter()))
    }

    /// Categories represented in this tag set (markers excluded).
    pub fn categories(&self) -> Set<&'static str> {
        self.iter().filter_map(tag_category).collect()
    }
}

/// Alternative interpretations, insertion-ordered for determinism.
pub type TagSets = Set<TagSet>;

pub fn tagsets_of(iter: impl IntoIterator<Item = TagSet>) -> TagSets {
    iter.into_iter().collect()
}

/// The single empty alternative: "no constraint".
pub fn unconstrained() -> TagSets {
    tagsets_of([TagSet::empty()])
}

/// Union of the categories across all alternatives.
pub fn categories_of(tagsets: &TagSets) -> Set<&'static str> {
    tagsets.iter().flat_map(|ts| ts.categories()).collect()
}

/// Merge two alternative lists: cross-product unions, then alternatives
/// that differ within a single category collapse into one set carrying
/// both values. Alternatives differing across categories stay separate.
pub fn merge_tagsets(a: &TagSets, b: &TagSets) -> TagSets {
    let mut merged: Vec<TagSet> = Vec::new();
    for t1 in a {
        for t2 in b {
            let u = t1.union(t2);
            if !merged.contains(&u) {
                merged.push(u);
            }
        }
    }
    loop {
        let mut found = None;
        'scan: for i in 0..merged.len() {
            for j in i + 1..merged.len() {
                if single_diff_category(&merged[i], &merged[j]).is_some() {
                    found = Some((i, j));
                    break 'scan;
                }
            }
        }
        match found {
            Some((i, j)) => {
                let u = merged[i].union(&merged[j]);
                merged.swap_remove(j);
                merged[i] = u;
            }
            None => break,
        }
    }
    merged.into_iter().collect()
}

/// If `a` and `b` differ, and every differing tag belongs to one single
/// category, return that category.
fn single_diff_category(a: &TagSet, b: &TagSet) -> Option<&'static str> {
    let mut cat = None;
    let mut any = false;
    let diff = a
        .iter()
        .filter(|t| !b.contains(t))
        .chain(b.iter().filter(|t| !a.contains(t)));
    for t in diff {
        any = true;
        match (cat, tag_category(t)) {
            (_, None) => return None,
            (None, c) => cat = c,
            (Some(c0), Some(c)) if c0 == c => {}
            _ => return None,
        }
    }
    if any { cat } else { None }
}
