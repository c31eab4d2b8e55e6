//! Default values for configuration

use std::path::PathBuf;

/// Default sitemap endpoint
pub fn default_sitemap_url() -> String {
    "https://uitspraken.rechtspraak.nl/sitemap/UrlSet".to_string()
}

/// Default content endpoint
pub fn default_content_url() -> String {
    "https://data.rechtspraak.nl/uitspraken/content".to_string()
}

/// Default user agent
pub fn default_user_agent() -> String {
    format!(
        "rechtspraak-scraper/{} (open data collection bot)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Default earliest indexing year
pub fn default_start_year() -> i32 {
    2000
}

/// Default delay between content requests (seconds)
pub fn default_request_delay() -> f64 {
    1.0
}

/// Default delay between sitemap requests (seconds)
pub fn default_sitemap_delay() -> f64 {
    0.5
}

/// Default fetch batch size
pub fn default_batch_size() -> u32 {
    100
}

/// Default cap on fetch-loop iterations per run
pub fn default_max_batches() -> u32 {
    10_000
}

/// Default bucket name under the object-store root
pub fn default_raw_bucket() -> String {
    "raw-data".to_string()
}

/// Default: store raw XML documents
pub fn default_store_xml() -> bool {
    true
}

/// Default base directory for scraper data (~/.rechtspraak-scraper)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rechtspraak-scraper")
}
