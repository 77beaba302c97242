//! CLI command implementations.
//!
//! The binary parses arguments and picks a normalizer; everything after that
//! lives here so it can be driven from tests with an in-memory writer.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::info;

use pather_core::error::PathResult;
use pather_core::normalize::Normalizer;
use pather_core::output::{emit_response, Operation, ResolveResponse, SelectResponse};
use pather_core::resolve::{find_ancestor_with, find_child_with, home_dir};
use pather_core::select::{Filter, Match, Mode};

/// Output format for every command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One result per line.
    #[default]
    Text,
    /// JSON response object.
    Json,
}

/// Pick where a resolver starts: the home directory, an explicit path, or `.`.
pub fn resolve_start(from: Option<&Path>, home: bool) -> PathResult<PathBuf> {
    if home {
        return home_dir();
    }
    Ok(from.map_or_else(|| PathBuf::from("."), Path::to_path_buf))
}

/// Run the ancestor or child resolver and write the result.
pub fn run_resolve<N: Normalizer>(
    operation: Operation,
    source: &Path,
    filter: &Filter<N>,
    format: Format,
    out: &mut impl Write,
) -> PathResult<()> {
    let path = match operation {
        Operation::Ancestor => find_ancestor_with(source, filter)?,
        Operation::Child => find_child_with(source, filter)?,
    };
    info!("{:?} of {} is {}", operation, source.display(), path.display());

    match format {
        Format::Text => writeln!(out, "{}", path.display())?,
        Format::Json => emit_response(&ResolveResponse::new(operation, source, &path), out)?,
    }
    Ok(())
}

/// Run the selector over `items` and write every match.
///
/// Text output is streamed as matches are found.
pub fn run_select<N, I>(
    items: I,
    mode: Mode,
    filter: &Filter<N>,
    format: Format,
    out: &mut impl Write,
) -> PathResult<()>
where
    N: Normalizer,
    I: IntoIterator<Item = String>,
{
    let matches = filter.select(items, mode);
    match format {
        Format::Text => {
            for found in matches {
                match found {
                    Match::Value(value) => writeln!(out, "{}", value)?,
                    Match::Index(index) => writeln!(out, "{}", index)?,
                }
            }
        }
        Format::Json => emit_response(&SelectResponse::new(mode, matches), out)?,
    }
    Ok(())
}

/// [`run_select`] over the lines of `reader`.
///
/// A read error stops the scan and is returned after what was already
/// written.
pub fn run_select_lines<N: Normalizer>(
    reader: impl BufRead,
    mode: Mode,
    filter: &Filter<N>,
    format: Format,
    out: &mut impl Write,
) -> PathResult<()> {
    let mut failure = None;
    let lines = reader
        .lines()
        .map_while(|line| line.map_err(|err| failure = Some(err)).ok());
    run_select(lines, mode, filter, format, out)?;
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
