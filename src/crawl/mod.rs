//! Outbound HTTP plumbing
//!
//! This module provides:
//! - A shared HTTP client builder with the scraper's user agent
//! - A global rate limiter for outbound requests
//! - Monthly date windows for sitemap crawling

mod rate_limit;
mod windows;

pub use rate_limit::*;
pub use windows::*;

use crate::error::{Error, Result};
use reqwest::Client;
use std::time::Duration;

/// Build the HTTP client used for all sitemap and content requests
pub fn build_http_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client("test-agent/1.0").is_ok());
    }
}
