//! Shared fetch pipeline.
//!
//! Every data command goes through [`load_results`]: a fresh cached snapshot
//! is reused when available, otherwise tickers are fetched one at a time with
//! the configured delay between successes.

use crate::config::DashboardConfig;
use crate::display::format_duration;
use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use polydash_lib::prelude::*;
use polydash_lib::FetchEvent;
use std::time::Duration;
use tracing::{info, warn};

/// Results of one fetch, live or cached.
#[derive(Debug)]
pub(crate) struct Fetched {
    pub(crate) results: Vec<TickerResult>,
    pub(crate) failed: Vec<Ticker>,
    pub(crate) from_cache: bool,
    pub(crate) cancelled: bool,
}

impl Fetched {
    /// Builds the dashboard view over these results.
    pub(crate) fn dashboard(&self, config: &DashboardConfig, mode: ChartMode) -> Dashboard {
        Dashboard::build(config.window, &self.results, mode).with_failed(self.failed.clone())
    }
}

/// Loads results for the configured tickers.
///
/// Fails with [`PolydashError::NoData`] when no ticker produced data.
pub(crate) async fn load_results(config: &DashboardConfig, quiet: bool) -> Result<Fetched> {
    let cache = open_cache(config);
    let source = config.client.base_url.as_str();

    if let Some(cache) = cache.as_ref().filter(|_| !config.refresh) {
        match cache.load_fresh(
            source,
            &config.tickers,
            &config.window,
            config.max_age,
            Utc::now(),
        ) {
            Ok(Some(snapshot)) if !snapshot.results.is_empty() => {
                info!(key = %snapshot.key, saved_at = %snapshot.saved_at, "Using cached snapshot");
                if !quiet {
                    eprintln!(
                        "Using cached data from {} (--refresh to fetch again)",
                        snapshot.saved_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
                return Ok(Fetched {
                    results: snapshot.results,
                    failed: snapshot.failed,
                    from_cache: true,
                    cancelled: false,
                });
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable snapshot"),
        }
    }

    let fetched = fetch_live(config, quiet).await?;

    if let Some(cache) = cache.as_ref().filter(|_| !fetched.cancelled) {
        let snapshot = Snapshot::new(
            source,
            config.tickers.clone(),
            config.window,
            fetched.results.clone(),
            fetched.failed.clone(),
        );
        if let Err(e) = cache.save(&snapshot) {
            warn!(error = %e, "Failed to save snapshot");
        }
    }

    Ok(fetched)
}

fn open_cache(config: &DashboardConfig) -> Option<SnapshotCache> {
    if !config.use_cache {
        return None;
    }
    SnapshotCache::with_default_path()
        .inspect_err(|e| warn!(error = %e, "Snapshot cache unavailable"))
        .ok()
}

async fn fetch_live(config: &DashboardConfig, quiet: bool) -> Result<Fetched> {
    let tickers = &config.tickers;
    if !quiet {
        eprintln!(
            "Fetching {} ticker(s) from {} to {}, at least {} of waiting",
            tickers.len(),
            config.window.start,
            config.window.end,
            format_duration(config.orchestrator.estimated_duration(tickers.len())),
        );
    }

    let client = MarketDataClient::new(config.client.clone())
        .context("Failed to create market data client")?;
    let orchestrator = Orchestrator::new(client, config.orchestrator);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(tickers.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress template")
                .progress_chars("#>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let (handle, signal) = cancel_pair();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let report = orchestrator
        .fetch_all_with(tickers, signal, |event| match event {
            FetchEvent::Started { ticker, .. } => pb.set_message(format!("Fetching {ticker}")),
            FetchEvent::Fetched { ticker, bars } => {
                pb.inc(1);
                pb.println(format!("  {ticker}: {bars} bars"));
            }
            FetchEvent::Failed { ticker, error } => {
                pb.inc(1);
                pb.println(format!("  {ticker}: skipped ({error})"));
            }
            FetchEvent::Waiting { delay, next } => pb.set_message(format!(
                "Waiting {} before {next}",
                format_duration(delay)
            )),
            FetchEvent::Cancelled { remaining } => {
                pb.set_message(format!("Cancelled, {remaining} not requested"));
            }
        })
        .await;

    ctrl_c.abort();
    pb.finish_and_clear();

    let failed: Vec<Ticker> = report.failures().map(|e| e.ticker().clone()).collect();
    let cancelled = report.cancelled;
    let results = report.into_results();

    if cancelled {
        warn!(fetched = results.len(), "Fetch cancelled, showing partial results");
    }
    if results.is_empty() {
        return Err(PolydashError::NoData.into());
    }

    Ok(Fetched {
        results,
        failed,
        from_cache: false,
        cancelled,
    })
}
