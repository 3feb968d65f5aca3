use anyhow::{Context as _, Result};
use chrono::Duration;
use clap::{Parser, Subcommand};
use dsh_history::{Encoding, HistoryConfig, KeywordHistory};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Inspect and maintain the command history file", long_about = None)]
struct Cli {
    /// History file (overrides DSH_HISTORY_DIR / DSH_HISTORY_FILE)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Maximum number of entries kept; negative values use the default
    #[arg(short, long, global = true, allow_negative_numbers = true)]
    size: Option<i64>,

    /// Character encoding of the history file
    #[arg(long, global = true)]
    charset: Option<Encoding>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print entries, newest first
    List {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Record a command as the newest entry
    Add {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Drop entries older than the age threshold
    Prune {
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Remove every entry
    Clear,
    /// Print the history file path
    Path,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dsh-hist: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<HistoryConfig> {
    let mut config = HistoryConfig::from_env().context("failed to read history settings")?;
    if let Some(file) = &cli.file {
        config = config.with_path(shellexpand::tilde(&file.to_string_lossy()).into_owned());
    }
    if let Some(size) = cli.size {
        config = config.with_signed_capacity(size);
    }
    if let Some(encoding) = cli.charset {
        config = config.with_encoding(encoding);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = build_config(&cli)?;
    if let Command::Prune { days: Some(days) } = cli.command {
        config = config.with_remaining(Duration::days(i64::from(days)));
    }
    debug!("using history file {}", config.path().display());

    let history = KeywordHistory::new(config);
    match cli.command {
        Command::Path => {
            println!("{}", history.store().path().display());
        }
        Command::List { limit } => {
            if !history.is_valid() {
                return Ok(());
            }
            history
                .store()
                .load()
                .with_context(|| format!("failed to load {}", history.store().path().display()))?;
            let keywords = history.keywords();
            let limit = limit.unwrap_or(keywords.len());
            for keyword in keywords.iter().take(limit) {
                println!("{keyword}");
            }
        }
        Command::Add { words } => {
            history.initialize()?;
            history.store().load()?;
            history.update_keywords(&words.join(" "))?;
        }
        Command::Prune { .. } => {
            history.initialize()?;
            let pruned = history.load_keywords()?;
            println!("pruned {pruned} entries");
        }
        Command::Clear => {
            history.clear_keywords()?;
        }
    }
    Ok(())
}
