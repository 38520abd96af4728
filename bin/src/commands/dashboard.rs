//! Dashboard command implementation.
//!
//! Fetches the configured tickers and renders the card grid, the market
//! overview and a summary of the chart series.

use super::fetch::load_results;
use crate::config::{DashboardConfig, FetchArgs};
use crate::display::{
    Mode, describe_window, open_output, overview_unavailable, print_cards, print_chart_summary,
    print_failed, print_overview, write_dashboard_json,
};
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

/// Fetch data and render the dashboard.
pub(crate) async fn dashboard(
    args: &FetchArgs,
    mode: Mode,
    json: bool,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let config = DashboardConfig::from_args(args)?;
    let fetched = load_results(&config, quiet).await?;
    let dashboard = fetched.dashboard(&config, mode.into());

    if json {
        let mut writer = open_output(output.as_deref())?;
        write_dashboard_json(&dashboard, &mut writer)?;
        writer.flush()?;
        return Ok(());
    }

    println!("Dashboard: {}", describe_window(&dashboard));
    if fetched.from_cache {
        println!("(cached)");
    }
    if fetched.cancelled {
        println!("(partial: fetch was cancelled)");
    }
    println!();

    print_cards(&dashboard);
    println!();

    match (&dashboard.stats, dashboard.stats_error) {
        (Some(stats), _) => print_overview(stats),
        (None, Some(error)) => println!("{}", overview_unavailable(error)),
        (None, None) => {}
    }
    println!();

    print_chart_summary(&dashboard);
    print_failed(&dashboard.failed);
    Ok(())
}
