//! Command-line configuration and logging setup.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Args;
use polydash_lib::prelude::*;
use polydash_lib::{API_KEY_ENV, ConfigError, DEFAULT_MAX_AGE, DEFAULT_REQUEST_DELAY};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SETUP_HINT: &str = "\
To configure an API key:
  1. Create a free account at https://polygon.io and copy your key
  2. Add `POLYDASH_API_KEY=<your key>` to a .env file in the working directory,
     or export it in your shell
  3. Re-run the command";

/// Flags shared by every command that fetches data.
#[derive(Args, Debug, Clone)]
pub(crate) struct FetchArgs {
    /// Comma-separated ticker symbols. Defaults to the enabled universe
    #[arg(short, long, env = "POLYDASH_TICKERS")]
    pub(crate) tickers: Option<String>,

    /// Fetch every ticker in the universe, enabled or not. Overrides --tickers
    #[arg(long)]
    pub(crate) all: bool,

    /// Window start date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) from: Option<String>,

    /// Window end date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) to: Option<String>,

    /// Delay between successful requests in milliseconds
    #[arg(long, env = "POLYDASH_DELAY_MS", default_value_t = DEFAULT_REQUEST_DELAY.as_millis() as u64)]
    pub(crate) delay_ms: u64,

    /// Upstream base URL
    #[arg(long, env = "POLYDASH_BASE_URL")]
    pub(crate) base_url: Option<String>,

    /// Upstream API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub(crate) api_key: Option<String>,

    /// Ignore cached snapshots and fetch again
    #[arg(long)]
    pub(crate) refresh: bool,

    /// Neither read nor write the snapshot cache
    #[arg(long)]
    pub(crate) no_cache: bool,

    /// Maximum age of a reusable snapshot in seconds
    #[arg(long, default_value_t = DEFAULT_MAX_AGE.as_secs())]
    pub(crate) max_age_secs: u64,
}

/// Fully resolved settings for one fetch.
#[derive(Debug, Clone)]
pub(crate) struct DashboardConfig {
    pub(crate) client: ClientConfig,
    pub(crate) orchestrator: OrchestratorConfig,
    pub(crate) tickers: Vec<Ticker>,
    pub(crate) window: DateWindow,
    pub(crate) use_cache: bool,
    pub(crate) refresh: bool,
    pub(crate) max_age: Duration,
}

impl DashboardConfig {
    /// Resolves flags and environment into a validated configuration.
    pub(crate) fn from_args(args: &FetchArgs) -> Result<Self> {
        let tickers = resolve_tickers(args)?;
        let window = resolve_window(args.from.as_deref(), args.to.as_deref())?;

        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                let err = ConfigError::MissingApiKey { var: API_KEY_ENV };
                anyhow!("{err}\n\n{SETUP_HINT}")
            })?;

        let mut client = ClientConfig::new(api_key).with_window(window);
        if let Some(base_url) = &args.base_url {
            client = client.with_base_url(base_url.as_str());
        }
        client.validate()?;

        Ok(Self {
            client,
            orchestrator: OrchestratorConfig {
                delay: Duration::from_millis(args.delay_ms),
            },
            tickers,
            window,
            use_cache: !args.no_cache,
            refresh: args.refresh,
            max_age: Duration::from_secs(args.max_age_secs),
        })
    }
}

fn resolve_tickers(args: &FetchArgs) -> Result<Vec<Ticker>> {
    let universe = Universe::global();
    let tickers = match (args.all, &args.tickers) {
        (true, _) => universe.all_tickers(),
        (false, Some(list)) => Ticker::parse_list(list).context("Invalid ticker list")?,
        (false, None) => universe.enabled_tickers(),
    };

    if tickers.is_empty() {
        return Err(ConfigError::NoTickers.into());
    }
    Ok(tickers)
}

fn resolve_window(from: Option<&str>, to: Option<&str>) -> Result<DateWindow> {
    let end = match to {
        Some(s) => parse_date(s)?,
        None => polydash_lib::reference_end_date(),
    };

    let window = match from {
        Some(s) => DateWindow::new(parse_date(s)?, end)?,
        None => DateWindow::trailing_days(end, polydash_lib::DEFAULT_WINDOW_DAYS),
    };
    Ok(window)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flag. Logs go to stderr.
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .init();
}
