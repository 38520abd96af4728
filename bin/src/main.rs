//! polydash CLI - Market dashboard over rate-limited daily aggregates.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod display;

use config::FetchArgs;
use display::{Format, Mode};

#[derive(Parser)]
#[command(name = "polydash")]
#[command(about = "Market dashboard over rate-limited daily aggregates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch tickers and show cards, market overview and chart summary
    Dashboard {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Chart mode
        #[arg(short, long, value_enum, default_value = "indexed")]
        mode: Mode,

        /// Print the whole dashboard as JSON
        #[arg(long)]
        json: bool,

        /// Write JSON output to a file instead of stdout
        #[arg(short, long, requires = "json")]
        output: Option<PathBuf>,
    },

    /// Export the aligned chart series
    Chart {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Chart mode
        #[arg(short, long, value_enum, default_value = "raw")]
        mode: Mode,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Export card metrics instead of the chart series
        #[arg(long)]
        cards: bool,

        /// Output file path. Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show best and worst movers, mean move and breadth
    Stats {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tickers in the universe
    List {
        /// Search pattern (symbol or name)
        #[arg(short, long)]
        search: Option<String>,

        /// Show only tickers fetched by default
        #[arg(long)]
        enabled: bool,
    },

    /// Show ticker details
    Info {
        /// Ticker symbol
        ticker: String,
    },

    /// Inspect or clear cached snapshots
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Actions for the snapshot cache.
#[derive(Subcommand)]
enum CacheAction {
    /// List cached snapshots
    Status,

    /// Delete all cached snapshots
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so env-backed flags see its values
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    config::init_logging(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Dashboard {
            fetch,
            mode,
            json,
            output,
        } => commands::dashboard::dashboard(&fetch, mode, json, output, cli.quiet).await,
        Commands::Chart {
            fetch,
            mode,
            format,
            cards,
            output,
        } => commands::chart::chart(&fetch, mode, format, cards, output, cli.quiet).await,
        Commands::Stats { fetch, json } => commands::stats::stats(&fetch, json, cli.quiet).await,
        Commands::List { search, enabled } => {
            commands::list::list_tickers(search.as_deref(), enabled)
        }
        Commands::Info { ticker } => commands::info::show_info(&ticker),
        Commands::Cache { action } => match action {
            CacheAction::Status => commands::cache::status(),
            CacheAction::Clear { yes } => commands::cache::clear(yes),
        },
    }
}
