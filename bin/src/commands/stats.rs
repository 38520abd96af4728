//! Stats command implementation.

use super::fetch::load_results;
use crate::config::{DashboardConfig, FetchArgs};
use crate::display::{print_failed, print_overview, write_stats_json};
use anyhow::{Result, bail};
use polydash_lib::prelude::*;
use polydash_lib::AnalyticsError;
use std::io::{self, Write};

/// Fetch data and print cross-ticker statistics.
pub(crate) async fn stats(args: &FetchArgs, json: bool, quiet: bool) -> Result<()> {
    let config = DashboardConfig::from_args(args)?;
    let fetched = load_results(&config, quiet).await?;

    let stats = match compute_stats(fetched.results.iter().map(|r| &r.summary)) {
        Ok(stats) => stats,
        Err(AnalyticsError::EmptyInput) => return Err(PolydashError::NoData.into()),
        Err(e @ AnalyticsError::NoMeasurableChange) => bail!("{e}"),
    };

    if json {
        let mut stdout = io::stdout();
        write_stats_json(&stats, &mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    print_overview(&stats);
    print_failed(&fetched.failed);
    Ok(())
}
