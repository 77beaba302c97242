//! JSON output types and serialization for CLI responses.
//!
//! Every response starts with `status` and carries `schema_version`, so
//! scripts can branch on the first field and detect format changes.

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, PathError};
use crate::select::{Match, Mode};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Response Structs
// ============================================================================

/// Which resolver produced a [`ResolveResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Ancestor,
    Child,
}

/// Response for the `ancestor` and `child` commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub operation: Operation,
    /// Where the search started, as given.
    pub source: String,
    /// The resolved result.
    pub path: String,
}

impl ResolveResponse {
    pub fn new(operation: Operation, source: &Path, path: &Path) -> Self {
        ResolveResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            operation,
            source: source.to_string_lossy().into_owned(),
            path: path.to_string_lossy().into_owned(),
        }
    }
}

/// One entry of a [`SelectResponse`]: the item text or its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectedEntry {
    Index(usize),
    Value(String),
}

impl From<Match<String>> for SelectedEntry {
    fn from(found: Match<String>) -> Self {
        match found {
            Match::Value(value) => SelectedEntry::Value(value),
            Match::Index(index) => SelectedEntry::Index(index),
        }
    }
}

/// Response for the `select` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub mode: Mode,
    /// Matches in input order.
    pub matches: Vec<SelectedEntry>,
}

impl SelectResponse {
    pub fn new(mode: Mode, matches: impl IntoIterator<Item = Match<String>>) -> Self {
        SelectResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            mode,
            matches: matches.into_iter().map(SelectedEntry::from).collect(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code (see [`OutputErrorCode`]).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a PathError.
    pub fn from_error(err: &PathError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let details = match err {
            PathError::NoMatch {
                path,
                include,
                exclude,
            } => Some(serde_json::json!({
                "path": path.to_string_lossy(),
                "include": include,
                "exclude": exclude,
            })),
            PathError::InvalidPattern { pattern, .. } => {
                Some(serde_json::json!({ "pattern": pattern }))
            }
            PathError::Io(io_err) => {
                Some(serde_json::json!({ "kind": io_err.kind().to_string() }))
            }
            PathError::HomeNotFound => None,
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &PathError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty JSON followed by a newline.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
