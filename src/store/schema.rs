//! SQLite schema definition

/// SQL schema for the scraper database
///
/// The pending set is not a table: it is always computed as the set
/// difference identifiers − scraped_records, so it can never drift from the
/// base collections.
pub const SCHEMA_SQL: &str = r#"
-- Identifiers: every ECLI discovered through the sitemap feed
CREATE TABLE IF NOT EXISTS identifiers (
    ecli TEXT PRIMARY KEY,
    first_seen TEXT NOT NULL,
    last_modified TEXT NOT NULL,
    source_url TEXT NOT NULL
);

-- Scraped records: normalized metadata per retrieved decision
CREATE TABLE IF NOT EXISTS scraped_records (
    ecli TEXT PRIMARY KEY REFERENCES identifiers(ecli),
    case_number TEXT,
    decision_date TEXT,
    publication_date TEXT,
    court TEXT NOT NULL,
    court_type TEXT NOT NULL,
    procedure_type TEXT,
    subject_area TEXT,
    summary TEXT,
    content_url TEXT NOT NULL,
    xml_path TEXT,
    related_eclis TEXT NOT NULL DEFAULT '[]',
    scraped_at TEXT NOT NULL
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_identifiers_lastmod ON identifiers(last_modified);
CREATE INDEX IF NOT EXISTS idx_scraped_court_type ON scraped_records(court_type);
CREATE INDEX IF NOT EXISTS idx_scraped_xml_path ON scraped_records(xml_path);
"#;
