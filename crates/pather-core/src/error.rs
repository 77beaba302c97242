//! Error types and error code constants for pather.
//!
//! `PathError` is the single error type produced by the selector and the
//! resolvers. Filesystem and regex failures are carried through untouched;
//! the only condition pather raises itself is [`PathError::NoMatch`].
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (malformed include/exclude pattern)
//! - `3`: No match (selector exhausted without a result)
//! - `4`: Filesystem errors (missing path, permission denied, no home directory)

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable numeric codes used as CLI exit codes and in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// A pattern was rejected by the regex engine.
    InvalidArguments = 2,
    /// No candidate satisfied the include/exclude patterns.
    NoMatch = 3,
    /// The filesystem refused or could not answer.
    FilesystemError = 4,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Errors raised while selecting or resolving paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// The selector ran out of candidates.
    ///
    /// `path` is the resolved source, so the message shows what was actually
    /// scanned rather than what the caller typed.
    #[error(
        "no path found under '{}' matching include {include:?} and avoiding exclude {exclude:?}",
        .path.display()
    )]
    NoMatch {
        path: PathBuf,
        include: Vec<String>,
        exclude: Vec<String>,
    },

    /// An include or exclude pattern is not a valid regex.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Filesystem failure from canonicalization or directory listing.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The platform did not report a home directory.
    #[error("home directory could not be determined")]
    HomeNotFound,
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&PathError> for OutputErrorCode {
    fn from(err: &PathError) -> Self {
        match err {
            PathError::NoMatch { .. } => OutputErrorCode::NoMatch,
            PathError::InvalidPattern { .. } => OutputErrorCode::InvalidArguments,
            PathError::Io(_) => OutputErrorCode::FilesystemError,
            PathError::HomeNotFound => OutputErrorCode::FilesystemError,
        }
    }
}

impl From<PathError> for OutputErrorCode {
    fn from(err: PathError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl PathError {
    /// Create a no-match error from the diagnostic triple.
    pub fn no_match<I, E>(path: impl Into<PathBuf>, include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        PathError::NoMatch {
            path: path.into(),
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the error only means "nothing matched".
    ///
    /// Callers for whom a match is optional can turn this case into `None`.
    pub fn is_no_match(&self) -> bool {
        matches!(self, PathError::NoMatch { .. })
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

/// Result alias used throughout pather.
pub type PathResult<T> = Result<T, PathError>;

// ============================================================================
// Tests
// ============================================================================
