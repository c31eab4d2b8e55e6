//! Relational storage using SQLite
//!
//! This module holds the two base collections and the derived pending view:
//! - `identifiers` — every ECLI discovered through the sitemap feed
//! - `scraped_records` — normalized metadata per retrieved decision
//! - pending — identifiers without a scraped record, computed by query
//!
//! All writes are keyed by ECLI and use last-write-wins upserts, so repeated
//! or concurrent runs can re-insert rows without ever duplicating them.

mod raw;
mod schema;

pub use raw::*;
pub use schema::*;

use crate::error::Result;
use crate::parse::ParsedDecision;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::path::Path;
use tracing::{debug, info};

/// A discovered identifier
#[derive(Debug, Clone, FromRow)]
pub struct IdentifierRecord {
    pub ecli: String,
    pub first_seen: String,
    pub last_modified: String,
    pub source_url: String,
}

impl IdentifierRecord {
    pub fn new(ecli: String, last_modified: DateTime<Utc>, source_url: String) -> Self {
        Self {
            ecli,
            first_seen: Utc::now().to_rfc3339(),
            last_modified: last_modified.to_rfc3339(),
            source_url,
        }
    }
}

/// A scraped decision record
#[derive(Debug, Clone, FromRow)]
pub struct ScrapedRecord {
    pub ecli: String,
    pub case_number: Option<String>,
    pub decision_date: Option<String>,
    pub publication_date: Option<String>,
    pub court: String,
    pub court_type: String,
    pub procedure_type: Option<String>,
    pub subject_area: Option<String>,
    pub summary: Option<String>,
    pub content_url: String,
    pub xml_path: Option<String>,
    pub related_eclis: String,
    pub scraped_at: String,
}

impl ScrapedRecord {
    /// Build a record from a parsed decision document
    ///
    /// The record keys on the requested ECLI, not the document's own, so a
    /// fetched identifier always leaves the pending set.
    pub fn from_decision(
        requested_ecli: &str,
        decision: &ParsedDecision,
        content_url: String,
        xml_path: Option<String>,
    ) -> Self {
        Self {
            ecli: requested_ecli.to_string(),
            case_number: decision.case_number.clone(),
            decision_date: decision.decision_date.map(|d| d.to_string()),
            publication_date: decision.publication_date.map(|d| d.to_string()),
            court: decision.court.clone(),
            court_type: decision.court_type.clone(),
            procedure_type: decision.procedure_type.clone(),
            subject_area: decision.subject_area.clone(),
            summary: decision.summary.clone(),
            content_url,
            xml_path,
            related_eclis: serde_json::to_string(&decision.related_eclis)
                .unwrap_or_else(|_| "[]".to_string()),
            scraped_at: Utc::now().to_rfc3339(),
        }
    }

    /// Decode the related-ECLI list
    pub fn related(&self) -> Vec<String> {
        serde_json::from_str(&self.related_eclis).unwrap_or_default()
    }
}

/// Scraper database handle
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Open the database, creating file and schema when missing
    pub async fn connect(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Initialize the database schema
    async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    // ===== Identifier Operations =====

    /// Insert or refresh an identifier, keeping the newest last_modified
    ///
    /// `first_seen` is written once and never overwritten. Timestamps are
    /// RFC 3339 UTC text, so string comparison orders them chronologically.
    pub async fn upsert_identifier(&self, record: &IdentifierRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO identifiers (ecli, first_seen, last_modified, source_url)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(ecli) DO UPDATE SET
                last_modified = excluded.last_modified,
                source_url = excluded.source_url
            WHERE excluded.last_modified >= identifiers.last_modified
            "#,
        )
        .bind(&record.ecli)
        .bind(&record.first_seen)
        .bind(&record.last_modified)
        .bind(&record.source_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get an identifier by ECLI
    pub async fn get_identifier(&self, ecli: &str) -> Result<Option<IdentifierRecord>> {
        let record =
            sqlx::query_as::<_, IdentifierRecord>("SELECT * FROM identifiers WHERE ecli = ?")
                .bind(ecli)
                .fetch_optional(&self.pool)
                .await?;
        Ok(record)
    }

    // ===== Scraped Record Operations =====

    /// Insert or refresh a scraped record, keeping the newest scraped_at
    pub async fn upsert_scraped(&self, record: &ScrapedRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scraped_records (
                ecli, case_number, decision_date, publication_date,
                court, court_type, procedure_type, subject_area,
                summary, content_url, xml_path, related_eclis, scraped_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(ecli) DO UPDATE SET
                case_number = excluded.case_number,
                decision_date = excluded.decision_date,
                publication_date = excluded.publication_date,
                court = excluded.court,
                court_type = excluded.court_type,
                procedure_type = excluded.procedure_type,
                subject_area = excluded.subject_area,
                summary = excluded.summary,
                content_url = excluded.content_url,
                xml_path = excluded.xml_path,
                related_eclis = excluded.related_eclis,
                scraped_at = excluded.scraped_at
            WHERE excluded.scraped_at >= scraped_records.scraped_at
            "#,
        )
        .bind(&record.ecli)
        .bind(&record.case_number)
        .bind(&record.decision_date)
        .bind(&record.publication_date)
        .bind(&record.court)
        .bind(&record.court_type)
        .bind(&record.procedure_type)
        .bind(&record.subject_area)
        .bind(&record.summary)
        .bind(&record.content_url)
        .bind(&record.xml_path)
        .bind(&record.related_eclis)
        .bind(&record.scraped_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a scraped record by ECLI
    pub async fn get_scraped(&self, ecli: &str) -> Result<Option<ScrapedRecord>> {
        let record =
            sqlx::query_as::<_, ScrapedRecord>("SELECT * FROM scraped_records WHERE ecli = ?")
                .bind(ecli)
                .fetch_optional(&self.pool)
                .await?;
        Ok(record)
    }

    // ===== Pending View =====

    /// Claim up to `limit` pending identifiers
    ///
    /// Pending = identifiers without a scraped record. Ordered by
    /// (last_modified, ecli) so batches are deterministic for a given store
    /// state.
    pub async fn pending_batch(&self, limit: u32) -> Result<Vec<String>> {
        let eclis: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT i.ecli
            FROM identifiers i
            LEFT JOIN scraped_records s ON s.ecli = i.ecli
            WHERE s.ecli IS NULL
            ORDER BY i.last_modified ASC, i.ecli ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(eclis)
    }

    /// Scraped records that never got a raw document archived
    pub async fn missing_xml_batch(&self, limit: u32) -> Result<Vec<String>> {
        let eclis: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT ecli FROM scraped_records
            WHERE xml_path IS NULL
            ORDER BY ecli ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(eclis)
    }

    // ===== Statistics =====

    /// Count known identifiers
    pub async fn count_identifiers(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM identifiers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count scraped records
    pub async fn count_scraped(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scraped_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count pending identifiers
    pub async fn count_pending(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM identifiers i
            LEFT JOIN scraped_records s ON s.ecli = i.ecli
            WHERE s.ecli IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
