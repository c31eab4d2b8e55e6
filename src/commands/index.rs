//! Discovery phase: sitemap indexing
//!
//! Walks the sitemap feed one monthly window at a time, from the configured
//! start year through today, and upserts an identifier row per discovered
//! ECLI. A failed window is skipped, not retried; re-running the phase is
//! idempotent because every upsert is keyed by ECLI with last-write-wins.

use crate::config::Config;
use crate::crawl::{monthly_windows, RateLimiter};
use crate::error::{Error, Result};
use crate::parse::{parse_date, parse_sitemap};
use crate::store::{IdentifierRecord, RecordStore};
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Statistics from an indexing run
#[derive(Debug, Default)]
pub struct IndexStats {
    /// Identifiers upserted
    pub discovered: u64,
    /// Sitemap entries without a usable ECLI
    pub skipped: u64,
    /// Windows that failed and were left for a later run
    pub windows_failed: u64,
}

/// Run the discovery phase across all date windows
pub async fn cmd_index(
    config: &Config,
    client: &Client,
    store: &RecordStore,
) -> Result<IndexStats> {
    let windows = monthly_windows(config.start_year, Utc::now().date_naive());
    info!(
        "Indexing sitemaps from {} across {} windows",
        config.start_year,
        windows.len()
    );

    let limiter = RateLimiter::new(config.sitemap_delay);
    let mut stats = IndexStats::default();

    for (i, window) in windows.iter().enumerate() {
        limiter.throttle().await;

        let url = format!(
            "{}?from={}&to={}",
            config.sitemap_url, window.from, window.to
        );
        let body = match fetch_window(client, &url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Skipping sitemap window {}: {}", window.from, e);
                stats.windows_failed += 1;
                continue;
            }
        };

        let page = parse_sitemap(&body);
        stats.skipped += page.skipped as u64;

        for entry in &page.entries {
            let last_modified = entry
                .lastmod
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now);
            let record =
                IdentifierRecord::new(entry.ecli.clone(), last_modified, entry.url.clone());
            store.upsert_identifier(&record).await?;
        }

        stats.discovered += page.entries.len() as u64;
        if page.entries.is_empty() {
            debug!("Window {} is empty ({}/{})", window.from, i + 1, windows.len());
        } else {
            info!(
                "Indexed window {} ({}/{}): {} identifiers",
                window.from,
                i + 1,
                windows.len(),
                page.entries.len()
            );
        }
    }

    info!(
        "Indexing complete: {} identifiers, {} entries skipped, {} windows failed",
        stats.discovered, stats.skipped, stats.windows_failed
    );
    Ok(stats)
}

async fn fetch_window(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Fetch(format!("HTTP {} for {}", response.status(), url)));
    }
    Ok(response.text().await?)
}

/// Parse a sitemap lastmod value, accepting date-only entries
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc())
        })
}
