//! Binary entry point for the pather CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Nearest enclosing directory whose name contains "project"
//! pather ancestor --include project
//!
//! # First entry of the current directory matching "project" but not "toml"
//! pather child -i project -e toml
//!
//! # Filter arbitrary lines, printing their positions
//! ls | pather select --indices -i '\.rs$'
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pather::cli::{resolve_start, run_resolve, run_select, run_select_lines, Format};
use pather::error::{OutputErrorCode, PathResult};
use pather::normalize::{FoldMarks, Normalizer, Verbatim};
use pather::output::{emit_response, ErrorResponse, Operation};
use pather::select::{Filter, Mode};

// ============================================================================
// CLI Structure
// ============================================================================

/// Find ancestor or child paths whose names match regex patterns.
///
/// Names and patterns are compared after folding diacritics, so `cafe`
/// finds `café`. Every include pattern must match; any exclude pattern
/// rejects.
#[derive(Parser, Debug)]
#[command(name = "pather", version, about = "Find paths by name patterns")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Args, Debug)]
struct GlobalArgs {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: Format,

    /// Match names exactly as written, without folding diacritics.
    #[arg(long, global = true)]
    verbatim: bool,

    /// Log level for tracing output (overridden by RUST_LOG).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Log line format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Include/exclude patterns.
#[derive(Args, Debug)]
struct PatternArgs {
    /// Regex that must match the name (repeatable, all must match).
    #[arg(short = 'i', long = "include", value_name = "PATTERN")]
    include: Vec<String>,

    /// Regex that rejects the name (repeatable, any rejects).
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,
}

impl PatternArgs {
    fn filter<N: Normalizer>(&self, normalizer: N) -> PathResult<Filter<N>> {
        Filter::with_normalizer(&self.include, &self.exclude, normalizer)
    }
}

/// Where a resolver starts.
#[derive(Args, Debug)]
struct StartArgs {
    /// Starting path (default: current directory).
    #[arg(long, conflicts_with = "home")]
    from: Option<PathBuf>,

    /// Start from the home directory.
    #[arg(long)]
    home: bool,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the nearest-to-root ancestor whose name matches.
    Ancestor {
        #[command(flatten)]
        start: StartArgs,
        #[command(flatten)]
        patterns: PatternArgs,
    },
    /// Print the first direct child whose name matches.
    Child {
        #[command(flatten)]
        start: StartArgs,
        #[command(flatten)]
        patterns: PatternArgs,
    },
    /// Filter ITEMS (or stdin lines) and print the matches.
    Select {
        /// Print zero-based positions instead of the items.
        #[arg(long)]
        indices: bool,
        #[command(flatten)]
        patterns: PatternArgs,
        /// Items to filter; read from stdin when omitted.
        items: Vec<String>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_format);

    let format = cli.global.format;
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            match format {
                Format::Json => {
                    let _ = emit_response(&ErrorResponse::from_error(&err), &mut io::stdout());
                    let _ = io::stdout().flush();
                }
                Format::Text => eprintln!("error: {}", err),
            }
            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command with the normalizer picked by `--verbatim`.
fn execute(cli: Cli) -> PathResult<()> {
    if cli.global.verbatim {
        execute_with(cli.command, cli.global.format, Verbatim)
    } else {
        execute_with(cli.command, cli.global.format, FoldMarks)
    }
}

fn execute_with<N: Normalizer>(command: Command, format: Format, normalizer: N) -> PathResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Ancestor { start, patterns } => {
            let filter = patterns.filter(normalizer)?;
            let source = resolve_start(start.from.as_deref(), start.home)?;
            run_resolve(Operation::Ancestor, &source, &filter, format, &mut out)?;
        }
        Command::Child { start, patterns } => {
            let filter = patterns.filter(normalizer)?;
            let source = resolve_start(start.from.as_deref(), start.home)?;
            run_resolve(Operation::Child, &source, &filter, format, &mut out)?;
        }
        Command::Select {
            indices,
            patterns,
            items,
        } => {
            let filter = patterns.filter(normalizer)?;
            let mode = if indices { Mode::Indices } else { Mode::Values };
            if items.is_empty() {
                run_select_lines(io::stdin().lock(), mode, &filter, format, &mut out)?;
            } else {
                run_select(items, mode, &filter, format, &mut out)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
