//! Info command implementation.

use anyhow::{Context, Result};
use polydash_lib::prelude::*;
use polydash_lib::{API_KEY_ENV, BASE_URL, aggregates_url, redact_api_key};

/// Show details for a ticker, including the request it would issue.
pub(crate) fn show_info(symbol: &str) -> Result<()> {
    let universe = Universe::global();
    let info = universe
        .get(symbol)
        .with_context(|| format!("Unknown ticker: {symbol}"))?;

    let config = ClientConfig::new("").with_window(DateWindow::reference());
    let url = aggregates_url(
        BASE_URL,
        info.ticker(),
        config.multiplier,
        config.timespan,
        &config.window,
        "",
    );

    println!("Ticker:    {}", info.ticker());
    println!("Name:      {}", info.name());
    println!("Color:     {}", info.color());
    println!("Enabled:   {}", if info.is_enabled() { "yes" } else { "no" });
    println!(
        "Window:    {} to {} ({} days)",
        config.window.start,
        config.window.end,
        config.window.total_days()
    );
    println!("Request:   {}", redact_api_key(&url));
    println!("API key:   read from {API_KEY_ENV}");

    Ok(())
}
