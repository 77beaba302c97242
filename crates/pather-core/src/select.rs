//! Include/exclude selection over sequences of keyed items.
//!
//! A [`Filter`] holds two compiled pattern sets. An item is selected when
//! every include pattern finds a match somewhere in its normalized key and no
//! exclude pattern does. Matching is search-anywhere: `ac` matches `\tacd`,
//! anchors must be written explicitly.
//!
//! ## Usage
//!
//! ```
//! use pather_core::select::Filter;
//!
//! let items = ["acbcd", "ácdr", "bc", "\tacd", "c"];
//! let filter = Filter::new(["ac", "cd"], ["b"]).unwrap();
//!
//! let values: Vec<_> = filter.values(items).collect();
//! assert_eq!(values, ["ácdr", "\tacd"]);
//!
//! let indices: Vec<_> = filter.indices(items).collect();
//! assert_eq!(indices, [1, 3]);
//! ```

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs::DirEntry;
use std::iter::Enumerate;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};
use crate::normalize::{FoldMarks, Normalizer};

// ============================================================================
// Keys
// ============================================================================

/// Anything that exposes a string key for pattern matching.
pub trait HasKey {
    /// The text patterns are matched against, before normalization.
    fn key(&self) -> Cow<'_, str>;
}

impl HasKey for str {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl HasKey for String {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl HasKey for Cow<'_, str> {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_ref())
    }
}

impl HasKey for OsStr {
    fn key(&self) -> Cow<'_, str> {
        self.to_string_lossy()
    }
}

/// Paths key on their leaf name; a path without one (`/`, `..`) keys as `""`.
impl HasKey for Path {
    fn key(&self) -> Cow<'_, str> {
        self.file_name().map(OsStr::to_string_lossy).unwrap_or_default()
    }
}

impl HasKey for PathBuf {
    fn key(&self) -> Cow<'_, str> {
        self.as_path().key()
    }
}

/// Components key on their own text, so the root marker keys as `/`.
impl HasKey for Component<'_> {
    fn key(&self) -> Cow<'_, str> {
        self.as_os_str().to_string_lossy()
    }
}

impl HasKey for DirEntry {
    fn key(&self) -> Cow<'_, str> {
        Cow::Owned(self.file_name().to_string_lossy().into_owned())
    }
}

impl<T: HasKey + ?Sized> HasKey for &T {
    fn key(&self) -> Cow<'_, str> {
        (**self).key()
    }
}

// ============================================================================
// Pattern Sets
// ============================================================================

/// Compiled regex patterns, remembered alongside the text they came from.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    sources: Vec<String>,
    regexes: Vec<Regex>,
}

impl PatternSet {
    /// Normalize and compile each pattern.
    ///
    /// The first pattern the regex engine rejects aborts compilation with
    /// [`PathError::InvalidPattern`].
    pub fn compile<I, S, N>(patterns: I, normalizer: &N) -> PathResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        N: Normalizer + ?Sized,
    {
        let mut set = PatternSet::default();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(&normalizer.normalize(pattern)).map_err(|source| {
                PathError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }
            })?;
            set.sources.push(pattern.to_string());
            set.regexes.push(regex);
        }
        Ok(set)
    }

    /// The patterns as the caller wrote them.
    pub fn patterns(&self) -> &[String] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }

    /// True when every pattern matches somewhere in `text`. Vacuously true
    /// for an empty set.
    pub fn matches_all(&self, text: &str) -> bool {
        self.regexes.iter().all(|regex| regex.is_match(text))
    }

    /// True when at least one pattern matches somewhere in `text`. Always
    /// false for an empty set.
    pub fn matches_any(&self, text: &str) -> bool {
        self.regexes.iter().any(|regex| regex.is_match(text))
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Include/exclude filter with a normalizer applied to patterns and keys.
#[derive(Debug, Clone)]
pub struct Filter<N = FoldMarks> {
    include: PatternSet,
    exclude: PatternSet,
    normalizer: N,
}

impl Filter<FoldMarks> {
    /// Build a filter that folds diacritics before matching.
    ///
    /// An empty `exclude` excludes nothing.
    pub fn new<I, IS, E, ES>(include: I, exclude: E) -> PathResult<Self>
    where
        I: IntoIterator<Item = IS>,
        IS: AsRef<str>,
        E: IntoIterator<Item = ES>,
        ES: AsRef<str>,
    {
        Filter::with_normalizer(include, exclude, FoldMarks)
    }

    /// Build a filter with include patterns only.
    pub fn include<I, S>(include: I) -> PathResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Filter::new(include, std::iter::empty::<&str>())
    }
}

impl<N: Normalizer> Filter<N> {
    /// Build a filter with an explicit normalizer.
    pub fn with_normalizer<I, IS, E, ES>(include: I, exclude: E, normalizer: N) -> PathResult<Self>
    where
        I: IntoIterator<Item = IS>,
        IS: AsRef<str>,
        E: IntoIterator<Item = ES>,
        ES: AsRef<str>,
    {
        let include = PatternSet::compile(include, &normalizer)?;
        let exclude = PatternSet::compile(exclude, &normalizer)?;
        Ok(Filter {
            include,
            exclude,
            normalizer,
        })
    }

    pub fn include_patterns(&self) -> &[String] {
        self.include.patterns()
    }

    pub fn exclude_patterns(&self) -> &[String] {
        self.exclude.patterns()
    }

    /// Decide a single item.
    ///
    /// Include patterns are checked first; exclude patterns are consulted only
    /// for items that passed, and stop at the first hit.
    pub fn matches<T: HasKey + ?Sized>(&self, item: &T) -> bool {
        let key = item.key();
        let key = self.normalizer.normalize(&key);
        let selected = self.include.matches_all(&key) && !self.exclude.matches_any(&key);
        tracing::trace!(
            "{} key {:?}",
            if selected { "selected" } else { "rejected" },
            key
        );
        selected
    }

    /// Lazily yield the items that pass, unchanged.
    pub fn values<I>(&self, items: I) -> Values<'_, I::IntoIter, N>
    where
        I: IntoIterator,
        I::Item: HasKey,
    {
        Values {
            items: items.into_iter(),
            filter: self,
        }
    }

    /// Lazily yield the zero-based positions of the items that pass.
    pub fn indices<I>(&self, items: I) -> Indices<'_, I::IntoIter, N>
    where
        I: IntoIterator,
        I::Item: HasKey,
    {
        Indices {
            items: items.into_iter().enumerate(),
            filter: self,
        }
    }

    /// Lazily yield matches in the representation picked by `mode`.
    pub fn select<I>(&self, items: I, mode: Mode) -> Select<'_, I::IntoIter, N>
    where
        I: IntoIterator,
        I::Item: HasKey,
    {
        Select {
            items: items.into_iter().enumerate(),
            filter: self,
            mode,
        }
    }
}

// ============================================================================
// Match Representation
// ============================================================================

/// Which representation a selection yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Yield the matching items.
    #[default]
    Values,
    /// Yield the positions of the matching items.
    Indices,
}

/// One selected item, either as itself or as its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match<T> {
    Value(T),
    Index(usize),
}

impl<T> Match<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Match::Value(value) => Some(value),
            Match::Index(_) => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Match::Value(_) => None,
            Match::Index(index) => Some(*index),
        }
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// Iterator returned by [`Filter::values`].
#[derive(Debug)]
pub struct Values<'f, I, N> {
    items: I,
    filter: &'f Filter<N>,
}

impl<I, N> Iterator for Values<'_, I, N>
where
    I: Iterator,
    I::Item: HasKey,
    N: Normalizer,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.items.find(|item| filter.matches(item))
    }
}

/// Iterator returned by [`Filter::indices`].
#[derive(Debug)]
pub struct Indices<'f, I, N> {
    items: Enumerate<I>,
    filter: &'f Filter<N>,
}

impl<I, N> Iterator for Indices<'_, I, N>
where
    I: Iterator,
    I::Item: HasKey,
    N: Normalizer,
{
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let filter = self.filter;
        self.items
            .find(|(_, item)| filter.matches(item))
            .map(|(index, _)| index)
    }
}

/// Iterator returned by [`Filter::select`].
#[derive(Debug)]
pub struct Select<'f, I, N> {
    items: Enumerate<I>,
    filter: &'f Filter<N>,
    mode: Mode,
}

impl<I, N> Iterator for Select<'_, I, N>
where
    I: Iterator,
    I::Item: HasKey,
    N: Normalizer,
{
    type Item = Match<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        let (index, item) = self.items.find(|(_, item)| filter.matches(item))?;
        Some(match self.mode {
            Mode::Values => Match::Value(item),
            Mode::Indices => Match::Index(index),
        })
    }
}

/// One-shot form: compile the patterns and return a lazy selection that owns
/// its filter.
///
/// Pass an empty `exclude` to exclude nothing.
pub fn select<T, I, IS, E, ES>(
    items: T,
    mode: Mode,
    include: I,
    exclude: E,
) -> PathResult<impl Iterator<Item = Match<T::Item>>>
where
    T: IntoIterator,
    T::Item: HasKey,
    I: IntoIterator<Item = IS>,
    IS: AsRef<str>,
    E: IntoIterator<Item = ES>,
    ES: AsRef<str>,
{
    let filter = Filter::new(include, exclude)?;
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(move |(index, item)| {
            if !filter.matches(&item) {
                return None;
            }
            Some(match mode {
                Mode::Values => Match::Value(item),
                Mode::Indices => Match::Index(index),
            })
        }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Verbatim;

    const ITEMS: [&str; 5] = ["acbcd", "ácdr", "bc", "\tacd", "c"];

    mod values {
        use super::*;

        #[test]
        fn empty_items_are_exhausted() {
            let filter = Filter::include(Vec::<String>::new()).unwrap();
            let mut values = filter.values(Vec::<&str>::new());
            assert_eq!(values.next(), None);
        }

        #[test]
        fn include_and_exclude() {
            let filter = Filter::new(["ac", "cd"], ["b"]).unwrap();
            let mut values = filter.values(ITEMS);
            assert_eq!(values.next(), Some("ácdr"));
            assert_eq!(values.next(), Some("\tacd"));
            assert_eq!(values.next(), None);
        }

        #[test]
        fn omitted_exclude_excludes_nothing() {
            let filter = Filter::include(["ac", "cd"]).unwrap();
            let values: Vec<_> = filter.values(ITEMS).collect();
            assert_eq!(values, ["acbcd", "ácdr", "\tacd"]);
        }

        #[test]
        fn unmatched_include_is_exhausted() {
            let filter = Filter::new(["37", "cd"], ["b"]).unwrap();
            assert_eq!(filter.values(ITEMS).next(), None);
        }

        #[test]
        fn empty_include_matches_everything() {
            let filter = Filter::include(Vec::<String>::new()).unwrap();
            assert_eq!(filter.values(ITEMS).count(), ITEMS.len());
        }

        #[test]
        fn yields_original_not_normalized_item() {
            let filter = Filter::include(["^acdr$"]).unwrap();
            let values: Vec<_> = filter.values(ITEMS).collect();
            assert_eq!(values, ["ácdr"]);
        }

        #[test]
        fn owned_strings_are_yielded_unchanged() {
            let items: Vec<String> = ITEMS.iter().map(|s| s.to_string()).collect();
            let filter = Filter::new(["ac", "cd"], ["b"]).unwrap();
            let values: Vec<String> = filter.values(items).collect();
            assert_eq!(values, vec!["ácdr".to_string(), "\tacd".to_string()]);
        }
    }

    mod indices {
        use super::*;

        #[test]
        fn empty_items_are_exhausted() {
            let filter = Filter::include(Vec::<String>::new()).unwrap();
            assert_eq!(filter.indices(Vec::<&str>::new()).next(), None);
        }

        #[test]
        fn include_and_exclude() {
            let filter = Filter::new(["ac", "cd"], ["b"]).unwrap();
            let mut indices = filter.indices(ITEMS);
            assert_eq!(indices.next(), Some(1));
            assert_eq!(indices.next(), Some(3));
            assert_eq!(indices.next(), None);
        }

        #[test]
        fn omitted_exclude_excludes_nothing() {
            let filter = Filter::include(["ac", "cd"]).unwrap();
            let indices: Vec<_> = filter.indices(ITEMS).collect();
            assert_eq!(indices, [0, 1, 3]);
        }

        #[test]
        fn unmatched_include_is_exhausted() {
            let filter = Filter::new(["37", "cd"], ["b"]).unwrap();
            assert_eq!(filter.indices(ITEMS).next(), None);
        }

        #[test]
        fn positions_agree_with_values() {
            let filter = Filter::new(["c"], ["^b", "r$"]).unwrap();
            let values: Vec<_> = filter.values(ITEMS).collect();
            let by_index: Vec<_> = filter.indices(ITEMS).map(|i| ITEMS[i]).collect();
            assert_eq!(values, by_index);
        }
    }

    mod select_mode {
        use super::*;

        #[test]
        fn values_mode_wraps_items() {
            let filter = Filter::new(["ac", "cd"], ["b"]).unwrap();
            let matches: Vec<_> = filter.select(ITEMS, Mode::Values).collect();
            assert_eq!(matches, [Match::Value("ácdr"), Match::Value("\tacd")]);
        }

        #[test]
        fn indices_mode_wraps_positions() {
            let filter = Filter::new(["ac", "cd"], ["b"]).unwrap();
            let matches: Vec<_> = filter.select(ITEMS, Mode::Indices).collect();
            assert_eq!(matches, [Match::Index(1), Match::Index(3)]);
        }

        #[test]
        fn free_function_owns_its_filter() {
            let matches: Vec<_> = select(ITEMS, Mode::Indices, ["ac", "cd"], ["b"])
                .unwrap()
                .filter_map(|m| m.index())
                .collect();
            assert_eq!(matches, [1, 3]);
        }

        #[test]
        fn free_function_with_empty_exclude() {
            let matches: Vec<_> = select(ITEMS, Mode::Values, ["ac", "cd"], Vec::<String>::new())
                .unwrap()
                .filter_map(Match::value)
                .collect();
            assert_eq!(matches, ["acbcd", "ácdr", "\tacd"]);
        }

        #[test]
        fn free_function_rejects_bad_pattern() {
            let result = select(ITEMS, Mode::Values, ["(ac"], Vec::<String>::new());
            assert!(matches!(result, Err(PathError::InvalidPattern { .. })));
        }
    }

    mod laziness {
        use super::*;

        #[test]
        fn infinite_input_is_pulled_on_demand() {
            let filter = Filter::include(["7$"]).unwrap();
            let items = (0u64..).map(|n| n.to_string());
            let first: Vec<_> = filter.values(items).take(3).collect();
            assert_eq!(first, ["7", "17", "27"]);
        }

        #[test]
        fn infinite_input_indices() {
            let filter = Filter::new(["^1"], ["0"]).unwrap();
            let items = (0u64..).map(|n| n.to_string());
            let first: Vec<_> = filter.indices(items).take(3).collect();
            assert_eq!(first, [1, 11, 12]);
        }

        #[test]
        fn repeated_selection_is_identical() {
            let filter = Filter::new(["ac", "cd"], ["b"]).unwrap();
            let first: Vec<_> = filter.values(ITEMS).collect();
            let second: Vec<_> = filter.values(ITEMS).collect();
            assert_eq!(first, second);
        }
    }

    mod patterns {
        use super::*;

        #[test]
        fn invalid_include_pattern_is_reported() {
            let err = Filter::include(["[unclosed"]).unwrap_err();
            match err {
                PathError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "[unclosed"),
                other => panic!("expected InvalidPattern, got {:?}", other),
            }
        }

        #[test]
        fn invalid_exclude_pattern_is_reported() {
            let err = Filter::new(["ok"], ["a{2,1}"]).unwrap_err();
            assert!(matches!(err, PathError::InvalidPattern { pattern, .. } if pattern == "a{2,1}"));
        }

        #[test]
        fn patterns_are_normalized_too() {
            let filter = Filter::include(["ác"]).unwrap();
            assert!(filter.matches("acbcd"));
            assert!(filter.matches("ácdr"));
        }

        #[test]
        fn search_is_unanchored() {
            let filter = Filter::include(["cd"]).unwrap();
            assert!(filter.matches("xxcdxx"));
        }

        #[test]
        fn explicit_anchors_are_honored() {
            let filter = Filter::include(["^ac"]).unwrap();
            assert!(filter.matches("acbcd"));
            assert!(!filter.matches("\tacd"));
        }

        #[test]
        fn any_exclude_pattern_rejects() {
            let filter = Filter::new(["c"], ["x", "b", "y"]).unwrap();
            assert!(!filter.matches("bc"));
            assert!(filter.matches("c"));
        }

        #[test]
        fn remembers_pattern_text() {
            let filter = Filter::new(["ác"], ["b"]).unwrap();
            assert_eq!(filter.include_patterns(), ["ác"]);
            assert_eq!(filter.exclude_patterns(), ["b"]);
        }

        #[test]
        fn verbatim_does_not_fold() {
            let filter = Filter::with_normalizer(["ac", "cd"], ["b"], Verbatim).unwrap();
            let values: Vec<_> = filter.values(ITEMS).collect();
            assert_eq!(values, ["\tacd"]);
        }

        #[test]
        fn pattern_set_bounds() {
            let empty = PatternSet::compile(Vec::<String>::new(), &FoldMarks).unwrap();
            assert!(empty.is_empty());
            assert!(empty.matches_all("anything"));
            assert!(!empty.matches_any("anything"));

            let set = PatternSet::compile(["a", "b"], &FoldMarks).unwrap();
            assert_eq!(set.len(), 2);
            assert!(set.matches_any("a"));
            assert!(!set.matches_all("a"));
        }
    }

    mod keys {
        use super::*;

        #[test]
        fn path_keys_on_leaf_name() {
            assert_eq!(Path::new("/srv/app/Cargo.toml").key(), "Cargo.toml");
            assert_eq!(PathBuf::from("relative/dir").key(), "dir");
        }

        #[test]
        fn path_without_leaf_keys_empty() {
            assert_eq!(Path::new("/").key(), "");
        }

        #[test]
        fn components_key_on_their_text() {
            let keys: Vec<_> = Path::new("/srv/app")
                .components()
                .map(|c| c.key().into_owned())
                .collect();
            assert_eq!(keys[1..], ["srv", "app"]);
            assert_eq!(keys.len(), 3);
        }

        #[test]
        fn paths_filter_on_name_not_parents() {
            let paths = [
                PathBuf::from("/project/src"),
                PathBuf::from("/src/project"),
            ];
            let filter = Filter::include(["project"]).unwrap();
            let values: Vec<_> = filter.values(&paths).collect();
            assert_eq!(values, [&paths[1]]);
        }
    }
}
