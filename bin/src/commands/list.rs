//! List command implementation.
//!
//! This module handles listing the ticker universe with optional filtering.

use anyhow::Result;
use polydash_lib::prelude::*;

/// List tickers in the universe, optionally filtered by a search pattern.
pub(crate) fn list_tickers(search: Option<&str>, enabled_only: bool) -> Result<()> {
    let universe = Universe::global();

    let tickers: Vec<_> = match search {
        Some(pattern) => universe.search(pattern),
        None => universe.all().collect(),
    }
    .into_iter()
    .filter(|info| !enabled_only || info.is_enabled())
    .collect();

    if tickers.is_empty() {
        println!("No tickers found.");
        return Ok(());
    }

    println!("{:<8} {:<28} {:<10} {:<8}", "TICKER", "NAME", "COLOR", "ENABLED");
    println!("{}", "-".repeat(56));

    for info in &tickers {
        println!(
            "{:<8} {:<28} {:<10} {:<8}",
            info.ticker().as_str(),
            info.name(),
            info.color(),
            if info.is_enabled() { "yes" } else { "no" }
        );
    }

    println!("\nTotal: {} tickers", tickers.len());
    Ok(())
}
