//! Retrieval phase: content fetching
//!
//! Claims batches from the pending view and turns each identifier into a
//! scraped record plus (optionally) an archived raw document. One content
//! request is in flight at a time, serialized behind the rate limiter.
//!
//! A failed identifier writes nothing, so it stays pending and surfaces
//! again on the next run; there is no in-run retry.

use crate::config::Config;
use crate::crawl::RateLimiter;
use crate::error::{Error, Result};
use crate::parse::parse_decision;
use crate::store::{RawStore, RecordStore, ScrapedRecord};
use reqwest::Client;
use tracing::{info, warn};

/// Statistics from one claimed batch
#[derive(Debug, Default)]
pub struct BatchStats {
    pub fetched: u64,
    pub failed: u64,
}

/// Statistics from a whole retrieval run
#[derive(Debug, Default)]
pub struct FetchStats {
    pub fetched: u64,
    pub failed: u64,
    pub batches: u64,
}

/// Run the retrieval phase until the pending set is drained
///
/// Stops early when `max_batches` iterations have run, which bounds a run
/// where every remaining identifier keeps failing.
pub async fn cmd_fetch(
    config: &Config,
    client: &Client,
    store: &RecordStore,
    raw_store: Option<&RawStore>,
) -> Result<FetchStats> {
    info!("Fetching pending decisions (store_xml: {})", raw_store.is_some());

    let limiter = RateLimiter::new(config.request_delay);
    let mut totals = FetchStats::default();

    loop {
        if totals.batches >= config.max_batches as u64 {
            warn!(
                "Stopping after {} batches (MAX_BATCHES); pending identifiers remain",
                totals.batches
            );
            break;
        }

        let batch = fetch_batch(config, client, store, raw_store, &limiter).await?;
        if batch.fetched + batch.failed == 0 {
            info!("No more pending identifiers");
            break;
        }

        totals.fetched += batch.fetched;
        totals.failed += batch.failed;
        totals.batches += 1;
    }

    info!(
        "Fetching complete: {} decisions in {} batches, {} failed",
        totals.fetched, totals.batches, totals.failed
    );
    Ok(totals)
}

/// Claim and process one batch of pending identifiers
///
/// Failures of a single identifier are contained; record-store write
/// failures propagate and abort the batch.
pub async fn fetch_batch(
    config: &Config,
    client: &Client,
    store: &RecordStore,
    raw_store: Option<&RawStore>,
    limiter: &RateLimiter,
) -> Result<BatchStats> {
    let pending = store.pending_batch(config.batch_size).await?;
    let mut stats = BatchStats::default();

    if pending.is_empty() {
        return Ok(stats);
    }

    info!("Processing batch of {} pending identifiers", pending.len());

    for ecli in &pending {
        limiter.throttle().await;

        match fetch_decision(config, client, raw_store, ecli).await {
            Ok(record) => {
                store.upsert_scraped(&record).await?;
                stats.fetched += 1;
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", ecli, e);
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

/// Fetch and parse one decision; archives the raw XML when enabled
///
/// The record is only built after a successful parse of the full document.
/// A raw-store failure downgrades to a missing `xml_path` so the metadata
/// still lands; the backfill phase repairs the archive later.
async fn fetch_decision(
    config: &Config,
    client: &Client,
    raw_store: Option<&RawStore>,
    ecli: &str,
) -> Result<ScrapedRecord> {
    let url = format!("{}?id={}", config.content_url, ecli);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Fetch(format!(
            "HTTP {} for {}",
            response.status(),
            ecli
        )));
    }

    let body = response.text().await?;
    let decision = parse_decision(&body)?;

    let xml_path = match raw_store {
        Some(raw) => match raw.put_document(ecli, body.as_bytes()) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Failed to store raw XML for {}: {}", ecli, e);
                None
            }
        },
        None => None,
    };

    Ok(ScrapedRecord::from_decision(ecli, &decision, url, xml_path))
}
