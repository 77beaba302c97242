//! Text normalization applied to patterns and keys before matching.
//!
//! Both sides of every comparison go through the same [`Normalizer`], so a
//! pattern written as `cafe` finds a directory named `café` when diacritic
//! folding is enabled.

use std::borrow::Cow;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Deterministic text transformation applied before regex matching.
pub trait Normalizer {
    /// Normalize `text`, borrowing when nothing changes.
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Compatibility decomposition (NFKD) followed by removal of combining marks.
///
/// `á` becomes `a`, `ﬁ` becomes `fi`. Case is preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldMarks;

impl Normalizer for FoldMarks {
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        // ASCII is already NFKD and carries no marks.
        if text.is_ascii() {
            return Cow::Borrowed(text);
        }
        Cow::Owned(text.nfkd().filter(|c| !is_combining_mark(*c)).collect())
    }
}

/// Identity normalizer: text is matched exactly as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbatim;

impl Normalizer for Verbatim {
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

impl<N: Normalizer + ?Sized> Normalizer for &N {
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        (**self).normalize(text)
    }
}
