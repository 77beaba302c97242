//! Ancestor and child lookup on top of [`Filter`].
//!
//! Both resolvers canonicalize their input first, so patterns always see the
//! real, symlink-free names. Neither recovers from anything: filesystem errors
//! come back as [`PathError::Io`], and an exhausted scan is
//! [`PathError::NoMatch`] carrying the resolved source path and both pattern
//! lists.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PathError, PathResult};
use crate::normalize::Normalizer;
use crate::select::Filter;

/// Return the nearest-to-root ancestor of `path` whose name passes the
/// patterns.
///
/// Segments are scanned from the root marker down to the leaf, and the path
/// built from the root through the first matching segment is returned. The
/// leaf itself is a candidate.
pub fn find_ancestor<I, IS, E, ES>(
    path: impl AsRef<Path>,
    include: I,
    exclude: E,
) -> PathResult<PathBuf>
where
    I: IntoIterator<Item = IS>,
    IS: AsRef<str>,
    E: IntoIterator<Item = ES>,
    ES: AsRef<str>,
{
    let filter = Filter::new(include, exclude)?;
    find_ancestor_with(path, &filter)
}

/// [`find_ancestor`] with a prebuilt filter.
pub fn find_ancestor_with<N: Normalizer>(
    path: impl AsRef<Path>,
    filter: &Filter<N>,
) -> PathResult<PathBuf> {
    let source = fs::canonicalize(path.as_ref())?;
    debug!("searching ancestors of {}", source.display());

    let index = filter
        .indices(source.components())
        .next()
        .ok_or_else(|| no_match(&source, filter))?;

    let ancestor: PathBuf = source.components().take(index + 1).collect();
    debug!("ancestor at segment {}: {}", index, ancestor.display());
    Ok(ancestor)
}

/// Return the first direct child of `path` whose name passes the patterns,
/// canonicalized.
///
/// Entries are taken in the order the directory listing produces them; no
/// sorting happens, so "first" is platform-defined when several match.
pub fn find_child<I, IS, E, ES>(
    path: impl AsRef<Path>,
    include: I,
    exclude: E,
) -> PathResult<PathBuf>
where
    I: IntoIterator<Item = IS>,
    IS: AsRef<str>,
    E: IntoIterator<Item = ES>,
    ES: AsRef<str>,
{
    let filter = Filter::new(include, exclude)?;
    find_child_with(path, &filter)
}

/// [`find_child`] with a prebuilt filter.
pub fn find_child_with<N: Normalizer>(
    path: impl AsRef<Path>,
    filter: &Filter<N>,
) -> PathResult<PathBuf> {
    let source = fs::canonicalize(path.as_ref())?;
    debug!("searching children of {}", source.display());

    // A failed entry ends the scan; the error wins over any later match.
    let mut failure = None;
    let entries = fs::read_dir(&source)?
        .map_while(|entry| entry.map_err(|err| failure = Some(err)).ok());
    let found = filter.values(entries).next();
    if let Some(err) = failure {
        return Err(err.into());
    }

    let entry = found.ok_or_else(|| no_match(&source, filter))?;
    let child = fs::canonicalize(entry.path())?;
    debug!("child found: {}", child.display());
    Ok(child)
}

/// The current user's home directory.
pub fn home_dir() -> PathResult<PathBuf> {
    dirs::home_dir().ok_or(PathError::HomeNotFound)
}

fn no_match<N: Normalizer>(source: &Path, filter: &Filter<N>) -> PathError {
    debug!("no match under {}", source.display());
    PathError::no_match(
        source,
        filter.include_patterns().iter().cloned(),
        filter.exclude_patterns().iter().cloned(),
    )
}

// ============================================================================
// Tests
// ============================================================================
