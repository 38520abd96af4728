//! Chart command implementation.
//!
//! Exports the aligned chart series, or the card metrics, in CSV or JSON.

use super::fetch::load_results;
use crate::config::{DashboardConfig, FetchArgs};
use crate::display::{Format, Mode, open_output, write_cards, write_chart};
use anyhow::Result;
use polydash_lib::prelude::*;
use std::io::Write;
use std::path::PathBuf;

/// Fetch data and write the chart series.
pub(crate) async fn chart(
    args: &FetchArgs,
    mode: Mode,
    format: Format,
    cards: bool,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let config = DashboardConfig::from_args(args)?;
    let fetched = load_results(&config, quiet).await?;
    let dashboard = fetched.dashboard(&config, mode.into());

    let mut writer = open_output(output.as_deref())?;
    if cards {
        write_cards(format, &dashboard.cards, &mut writer)?;
    } else {
        write_chart(format, &dashboard.tickers, &dashboard.chart, &mut writer)?;
    }
    writer.flush()?;

    if let (Some(path), false) = (&output, quiet) {
        let (rows, kind) = if cards {
            (dashboard.cards.len(), "card")
        } else {
            (dashboard.chart.len(), "chart")
        };
        let extension = OutputFormat::from(format).extension();
        eprintln!("Wrote {rows} {kind} rows to {} ({extension})", path.display());
    }
    Ok(())
}
