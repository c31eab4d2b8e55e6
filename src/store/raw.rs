//! Raw document storage
//!
//! Archives each decision's original XML under a bucket directory, keyed by
//! the ECLI-derived object path. A retried identifier overwrites its object.

use crate::ecli;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Object store handle for raw XML documents
pub struct RawStore {
    bucket: String,
    bucket_dir: PathBuf,
}

impl RawStore {
    /// Open the store, creating the bucket directory when missing
    pub fn open(root: &Path, bucket: &str) -> Result<Self> {
        let bucket_dir = root.join(bucket);
        if !bucket_dir.exists() {
            std::fs::create_dir_all(&bucket_dir)?;
            info!("Created object-store bucket at {:?}", bucket_dir);
        }

        Ok(Self {
            bucket: bucket.to_string(),
            bucket_dir,
        })
    }

    /// Store a decision's raw XML; returns the bucket-qualified object path
    pub fn put_document(&self, ecli: &str, content: &[u8]) -> Result<String> {
        let key = ecli::object_path(ecli);
        let file_path = self.bucket_dir.join(&key);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;

        debug!("Stored raw document at {:?}", file_path);
        Ok(format!("{}/{}", self.bucket, key))
    }

    /// Read a stored document back
    pub fn get_document(&self, ecli: &str) -> Result<Vec<u8>> {
        let file_path = self.bucket_dir.join(ecli::object_path(ecli));
        std::fs::read(&file_path).map_err(|e| {
            Error::ObjectStore(format!("{}: {}", file_path.display(), e))
        })
    }

    /// Whether a document is present for this ECLI
    pub fn contains(&self, ecli: &str) -> bool {
        self.bucket_dir.join(ecli::object_path(ecli)).exists()
    }
}
