//! Backfill phase: repair missing raw documents
//!
//! Scraped records can end up without an archived document, either because
//! STORE_XML was off at the time or because an object-store write failed.
//! This phase re-downloads the XML for those records and fills in their
//! `xml_path`.

use crate::config::Config;
use crate::crawl::RateLimiter;
use crate::error::{Error, Result};
use crate::store::{RawStore, RecordStore};
use chrono::Utc;
use reqwest::Client;
use tracing::{info, warn};

/// Statistics from a backfill run
#[derive(Debug, Default)]
pub struct BackfillStats {
    pub stored: u64,
    pub failed: u64,
}

/// Download and archive raw XML for records that have none
pub async fn cmd_backfill(
    config: &Config,
    client: &Client,
    store: &RecordStore,
    raw_store: &RawStore,
) -> Result<BackfillStats> {
    info!("Backfilling raw documents for scraped records without one");

    let limiter = RateLimiter::new(config.request_delay);
    let mut totals = BackfillStats::default();
    let mut batches = 0u64;

    loop {
        if batches >= config.max_batches as u64 {
            warn!("Stopping after {} batches (MAX_BATCHES)", batches);
            break;
        }

        let batch = store.missing_xml_batch(config.batch_size).await?;
        if batch.is_empty() {
            info!("No records left without a raw document");
            break;
        }

        info!("Backfilling batch of {} records", batch.len());
        let mut stored_this_batch = 0u64;

        for ecli in &batch {
            limiter.throttle().await;

            match download_document(config, client, ecli).await {
                Ok(body) => {
                    let path = match raw_store.put_document(ecli, body.as_bytes()) {
                        Ok(path) => path,
                        Err(e) => {
                            warn!("Failed to store raw XML for {}: {}", ecli, e);
                            totals.failed += 1;
                            continue;
                        }
                    };

                    let Some(mut record) = store.get_scraped(ecli).await? else {
                        // Deleted out from under us by another run; nothing to repair
                        continue;
                    };
                    record.xml_path = Some(path);
                    record.scraped_at = Utc::now().to_rfc3339();
                    store.upsert_scraped(&record).await?;

                    totals.stored += 1;
                    stored_this_batch += 1;
                }
                Err(e) => {
                    warn!("Failed to download {}: {}", ecli, e);
                    totals.failed += 1;
                }
            }
        }

        batches += 1;

        // Every remaining record failed; the same batch would repeat forever
        if stored_this_batch == 0 {
            warn!("No progress in last batch; leaving the rest for a later run");
            break;
        }
    }

    info!(
        "Backfill complete: {} documents stored, {} failed",
        totals.stored, totals.failed
    );
    Ok(totals)
}

async fn download_document(config: &Config, client: &Client, ecli: &str) -> Result<String> {
    let url = format!("{}?id={}", config.content_url, ecli);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Fetch(format!(
            "HTTP {} for {}",
            response.status(),
            ecli
        )));
    }

    Ok(response.text().await?)
}
