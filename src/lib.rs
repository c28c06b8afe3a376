//! Core of an inflection-table extractor.
//!
//! The input is the two-dimensional cell structure of a wiki-style
//! inflection table (already rendered to plain text and expanded into a
//! grid of cells with row/column spans) together with its title lines.
//! The output is a de-duplicated list of [`models::FormRecord`]s, each a
//! concrete word form annotated with a canonical set of grammatical tags.
//!
//! Wiki markup parsing, section extraction and persistence live with the
//! caller; the seams are [`classify::Services`] and the plain-data types
//! in [`models`].

pub mod classify;
pub mod clean;
pub mod grid;
pub mod headers;
pub mod lang;
pub mod models;
pub mod spans;
pub mod split;
pub mod table;
pub mod tags;
pub mod title;

use fxhash::FxBuildHasher;
use indexmap::{IndexMap, IndexSet};

pub type Map<K, V> = IndexMap<K, V, FxBuildHasher>; // Preserve insertion order
pub type Set<K> = IndexSet<K, FxBuildHasher>;

pub use classify::{Classification, HeuristicServices, Services};
pub use models::{Cell, FormRecord, TableContext};
pub use table::{FormSink, parse_simple_table};
