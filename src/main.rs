use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use structured_financing_rs::{AppError, AppState, Session, SessionConfig};

/// Syndicated deals, credit facilities and repayments from the console
#[derive(Parser)]
#[command(
    name = "sfin",
    version,
    about = "Syndicated deals, credit facilities and repayments from the console",
    long_about = "Create deals between a borrower and a pool of lenders, draw facilities \
                  under them, record repayments and follow outstanding balance and \
                  accrued interest. Without a subcommand an interactive session starts."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON file with the seed data (defaults to the built-in seed)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start with no parties, deals or facilities
    #[arg(long, global = true, conflicts_with = "config")]
    no_seed: bool,

    /// Log filter written to stderr, overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu on stdin/stdout
    Session,
    /// Print every deal and a portfolio per facility, then exit
    Report {
        #[arg(long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = match (&cli.config, cli.no_seed) {
        (Some(path), _) => SessionConfig::load(path)?,
        (None, true) => SessionConfig::empty(),
        (None, false) => SessionConfig::default(),
    };
    let state = AppState::from_config(&config)?;

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Session::new(state, stdin.lock(), stdout.lock()).run()?;
        }
        Commands::Report { output } => {
            let report = state.report()?;
            match output {
                OutputFormat::Json => println!("{}", report.to_json_pretty()?),
                OutputFormat::Text => print!("{}", report),
            }
        }
    }
    Ok(())
}
