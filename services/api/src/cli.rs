use crate::quote::{run_quote, run_ranges, QuoteArgs, RangesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pricing_engine::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pricing-engine",
    about = "Serve and query tiered insurance premiums from rate tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a single applicant against the rate tables
    Quote(QuoteArgs),
    /// Print the normalized rate tables as JSON
    Ranges(RangesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding the rate table JSON files
    #[arg(long)]
    pub(crate) config_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Ranges(args) => run_ranges(args),
    }
}
