//! hornet - Horn-clause query engine
//!
//! Command-line interface: load knowledge files, then answer queries given
//! with `--query` or run stdin as a session script.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use hornet::config::{HornetConfig, LogLevel, OutputFormat};
use hornet::{ConjunctionMode, Engine, EngineConfig, Session};

#[derive(Parser)]
#[command(name = "hornet")]
#[command(version)]
#[command(about = "Horn-clause engine with SLD resolution and derivation traces", long_about = None)]
struct Cli {
    /// Knowledge files, one fact or rule per line
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Query to answer after loading (repeatable)
    #[arg(short = 'e', long = "query", value_name = "QUERY")]
    queries: Vec<String>,

    /// Print derivation traces after results
    #[arg(long)]
    trace: bool,

    /// Maximum goal depth (0 for unlimited)
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Check rule bodies goal by goal under the head bindings only
    #[arg(long)]
    single_pass: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Configuration file (defaults to the standard search path)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print a default configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `Results:` lines or `No solution found.`
    Text,
    /// Serialized resolution
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        print!("{}", HornetConfig::default_config_content());
        return Ok(());
    }

    let config = load_config(&cli)?;
    init_tracing(config.general.log_level);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::new(Engine::with_config(EngineConfig::from(&config)))
        .with_format(config.general.format)
        .with_trace(config.resolution.trace);

    for path in &cli.inputs {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        if !session.ingest(&content, &mut out)? {
            out.flush().context("Failed to write to stdout")?;
            anyhow::bail!("Failed to load knowledge from {}", path.display());
        }
    }

    let (summary, interactive) = if cli.queries.is_empty() {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        let mut session = session.interactive(interactive);
        (session.run(stdin.lock(), &mut out)?, interactive)
    } else {
        for query in &cli.queries {
            session.query(query, &mut out)?;
        }
        out.flush().context("Failed to write to stdout")?;
        (session.summary(), false)
    };

    tracing::info!(
        statements = summary.statements,
        queries = summary.queries,
        solutions = summary.solutions,
        errors = summary.errors,
        "session finished"
    );
    // A typo at an interactive prompt is not a failed run
    if summary.errors > 0 && !interactive {
        std::process::exit(1);
    }
    Ok(())
}

/// Configuration file, then environment, then flags
fn load_config(cli: &Cli) -> Result<HornetConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = HornetConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            config.apply_env_overrides()?;
            config
        }
        None => HornetConfig::load().context("Failed to load configuration")?,
    };

    if let Some(format) = cli.format {
        config.general.format = format.into();
    }
    if let Some(max_depth) = cli.max_depth {
        config.resolution.max_depth = max_depth;
    }
    if cli.single_pass {
        config.resolution.conjunction = ConjunctionMode::SinglePass;
    }
    if cli.trace {
        config.resolution.trace = true;
    }
    if cli.verbose {
        config.general.log_level = LogLevel::Verbose;
    } else if cli.quiet {
        config.general.log_level = LogLevel::Quiet;
    }

    Ok(config)
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
