//! Configuration management for the scraper
//!
//! All settings are sourced from the environment, with defaults suitable for
//! a local run. Bad values are fatal at startup.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Sitemap endpoint (`?from=..&to=..` is appended per window)
    pub sitemap_url: String,

    /// Content endpoint (`?id=ECLI:..` is appended per document)
    pub content_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Earliest year covered by the sitemap crawl
    pub start_year: i32,

    /// Minimum interval between content requests (seconds)
    pub request_delay: f64,

    /// Minimum interval between sitemap requests (seconds)
    pub sitemap_delay: f64,

    /// Pending identifiers claimed per fetch iteration
    pub batch_size: u32,

    /// Cap on fetch iterations per run
    pub max_batches: u32,

    /// Whether raw XML documents are archived
    pub store_xml: bool,

    /// Bucket name under the object-store root
    pub raw_bucket: String,

    /// Resolved filesystem paths
    pub paths: PathsConfig,
}

/// Resolved store locations
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Base directory for scraper data
    pub data_dir: PathBuf,

    /// SQLite database file
    pub db_file: PathBuf,

    /// Object-store root directory
    pub raw_store_dir: PathBuf,
}

impl Config {
    /// Build configuration from the environment
    pub fn from_env() -> Result<Self> {
        let data_dir = match std::env::var("DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_data_dir(),
        };

        let db_file = std::env::var("DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("rechtspraak.db"));
        let raw_store_dir = std::env::var("RAW_STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("objects"));

        let config = Self {
            sitemap_url: env_or("SITEMAP_URL", default_sitemap_url),
            content_url: env_or("CONTENT_URL", default_content_url),
            user_agent: env_or("USER_AGENT", default_user_agent),
            start_year: env_parsed("START_YEAR", default_start_year)?,
            request_delay: env_parsed("REQUEST_DELAY", default_request_delay)?,
            sitemap_delay: env_parsed("SITEMAP_DELAY", default_sitemap_delay)?,
            batch_size: env_parsed("BATCH_SIZE", default_batch_size)?,
            max_batches: env_parsed("MAX_BATCHES", default_max_batches)?,
            store_xml: env_bool("STORE_XML", default_store_xml)?,
            raw_bucket: env_or("RAW_BUCKET", default_raw_bucket),
            paths: PathsConfig {
                data_dir,
                db_file,
                raw_store_dir,
            },
        };

        debug!("Loaded configuration: {:?}", config);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.start_year < 1900 {
            return Err(Error::Config(
                "START_YEAR must be 1900 or later".to_string(),
            ));
        }

        if self.request_delay < 0.0 || self.sitemap_delay < 0.0 {
            return Err(Error::Config(
                "REQUEST_DELAY and SITEMAP_DELAY must not be negative".to_string(),
            ));
        }

        if self.batch_size == 0 {
            return Err(Error::Config("BATCH_SIZE must be positive".to_string()));
        }

        if self.max_batches == 0 {
            return Err(Error::Config("MAX_BATCHES must be positive".to_string()));
        }

        if self.raw_bucket.is_empty() {
            return Err(Error::Config("RAW_BUCKET must not be empty".to_string()));
        }

        Ok(())
    }
}

fn env_or(name: &str, default: fn() -> String) -> String {
    std::env::var(name).unwrap_or_else(|_| default())
}

fn env_parsed<T: FromStr>(name: &str, default: fn() -> T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(default()),
    }
}

fn env_bool(name: &str, default: fn() -> bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(Error::Config(format!("Invalid value for {}: {}", name, raw))),
        },
        Err(_) => Ok(default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            sitemap_url: default_sitemap_url(),
            content_url: default_content_url(),
            user_agent: default_user_agent(),
            start_year: default_start_year(),
            request_delay: default_request_delay(),
            sitemap_delay: default_sitemap_delay(),
            batch_size: default_batch_size(),
            max_batches: default_max_batches(),
            store_xml: default_store_xml(),
            raw_bucket: default_raw_bucket(),
            paths: PathsConfig {
                data_dir: PathBuf::from("/tmp"),
                db_file: PathBuf::from("/tmp/rechtspraak.db"),
                raw_store_dir: PathBuf::from("/tmp/objects"),
            },
        }
    }

    #[test]
    fn test_default_config_valid() {
        let config = test_config();
        assert_eq!(config.start_year, 2000);
        assert_eq!(config.batch_size, 100);
        assert!(config.store_xml);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        config.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.request_delay = -1.0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.start_year = 1850;
        assert!(config.validate().is_err());
    }
}
