//! Cache command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use inquire::Confirm;
use polydash_lib::prelude::*;

/// List cached snapshots.
pub(crate) fn status() -> Result<()> {
    let cache = SnapshotCache::with_default_path().context("Failed to open snapshot cache")?;
    let entries = cache.list().context("Failed to list snapshots")?;

    println!("Cache: {}", cache.base_path().display());

    if entries.is_empty() {
        println!("No cached snapshots.");
        return Ok(());
    }

    let now = Utc::now();
    println!();
    println!("{:<40} {:<22} {:>8} {:>10}", "KEY", "SAVED", "TICKERS", "SIZE");
    println!("{}", "-".repeat(83));
    for entry in &entries {
        let age = (now - entry.saved_at).num_minutes();
        println!(
            "{:<40} {:<22} {:>8} {:>10}",
            entry.key.as_str(),
            format!("{} ({age}m ago)", entry.saved_at.format("%m-%d %H:%M")),
            entry.results,
            format_size(entry.size_bytes),
        );
    }

    println!("\nTotal: {} snapshots", entries.len());
    Ok(())
}

/// Delete every cached snapshot, asking first unless `yes` is set.
pub(crate) fn clear(yes: bool) -> Result<()> {
    let cache = SnapshotCache::with_default_path().context("Failed to open snapshot cache")?;

    if !yes {
        let confirmed = Confirm::new("Delete all cached snapshots?")
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = cache.clear().context("Failed to clear snapshots")?;
    println!("Removed {removed} snapshot(s).");
    Ok(())
}

fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1 << 20 => format!("{:.1} MB", b as f64 / f64::from(1 << 20)),
        b if b >= 1 << 10 => format!("{:.1} KB", b as f64 / f64::from(1 << 10)),
        b => format!("{b} B"),
    }
}
