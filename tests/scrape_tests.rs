//! Integration tests for the scrape pipeline
//!
//! These tests run both phases end-to-end against wiremock servers standing
//! in for the sitemap and content endpoints, with the store on a temp dir.

use chrono::Datelike;
use rechtspraak_scraper::commands::{cmd_backfill, cmd_fetch, cmd_index, fetch_batch};
use rechtspraak_scraper::config::{Config, PathsConfig};
use rechtspraak_scraper::crawl::{build_http_client, RateLimiter};
use rechtspraak_scraper::store::{RawStore, RecordStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str, tmp: &TempDir) -> Config {
    Config {
        sitemap_url: format!("{}/sitemap/UrlSet", base_url),
        content_url: format!("{}/content", base_url),
        user_agent: "scraper-tests/0.1".to_string(),
        // Keep the window count small: only the current year
        start_year: chrono::Utc::now().year(),
        request_delay: 0.0,
        sitemap_delay: 0.0,
        batch_size: 100,
        max_batches: 10,
        store_xml: true,
        raw_bucket: "raw-data".to_string(),
        paths: PathsConfig {
            data_dir: tmp.path().to_path_buf(),
            db_file: tmp.path().join("test.db"),
            raw_store_dir: tmp.path().join("objects"),
        },
    }
}

const SITEMAP_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <url>
        <loc>https://uitspraken.rechtspraak.nl/details?id=ECLI:NL:HR:2026:1</loc>
        <lastmod>2026-01-15T09:30:00Z</lastmod>
    </url>
    <url>
        <loc>https://uitspraken.rechtspraak.nl/details?id=ECLI:NL:HR:2026:2</loc>
        <lastmod>2026-02-20T10:00:00Z</lastmod>
    </url>
    <url>
        <loc>https://uitspraken.rechtspraak.nl/details?id=ECLI:NL:RBAMS:2026:3</loc>
        <lastmod>2026-03-05T08:00:00Z</lastmod>
    </url>
    <url>
        <loc>https://uitspraken.rechtspraak.nl/over-deze-site</loc>
    </url>
</urlset>
"#;

fn decision_xml(ecli: &str, court: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<open-rechtspraak>
  <rdf:RDF>
    <rdf:Description>
      <dcterms:identifier>{ecli}</dcterms:identifier>
      <dcterms:creator rdfs:label="Instantie">{court}</dcterms:creator>
      <dcterms:date rdfs:label="Uitspraakdatum">2026-01-10</dcterms:date>
      <dcterms:subject rdfs:label="Rechtsgebied">Civiel recht</dcterms:subject>
    </rdf:Description>
  </rdf:RDF>
  <inhoudsindicatie><para>Samenvatting van {ecli}.</para></inhoudsindicatie>
</open-rechtspraak>
"#
    )
}

async fn mount_sitemap(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sitemap/UrlSet"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SITEMAP_BODY))
        .mount(server)
        .await;
}

async fn mount_decision(server: &MockServer, ecli: &str, court: &str) {
    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("id", ecli))
        .respond_with(ResponseTemplate::new(200).set_body_string(decision_xml(ecli, court)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_index_phase_discovers_identifiers() {
    let server = MockServer::start().await;
    mount_sitemap(&server).await;

    let tmp = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &tmp);
    let client = build_http_client(&config.user_agent).unwrap();
    let store = RecordStore::connect(&config.paths.db_file).await.unwrap();

    let stats = cmd_index(&config, &client, &store).await.unwrap();

    // Every window served the same page; upserts deduplicate by ECLI
    assert_eq!(store.count_identifiers().await.unwrap(), 3);
    assert_eq!(store.count_pending().await.unwrap(), 3);
    assert!(stats.discovered >= 3);
    assert!(stats.skipped >= 1);
    assert_eq!(stats.windows_failed, 0);
}

#[tokio::test]
async fn test_index_phase_is_idempotent() {
    let server = MockServer::start().await;
    mount_sitemap(&server).await;

    let tmp = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &tmp);
    let client = build_http_client(&config.user_agent).unwrap();
    let store = RecordStore::connect(&config.paths.db_file).await.unwrap();

    cmd_index(&config, &client, &store).await.unwrap();
    let first = store.count_identifiers().await.unwrap();

    cmd_index(&config, &client, &store).await.unwrap();
    assert_eq!(store.count_identifiers().await.unwrap(), first);
}

#[tokio::test]
async fn test_index_phase_survives_failing_windows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap/UrlSet"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &tmp);
    let client = build_http_client(&config.user_agent).unwrap();
    let store = RecordStore::connect(&config.paths.db_file).await.unwrap();

    // Every window fails; the phase still completes
    let stats = cmd_index(&config, &client, &store).await.unwrap();
    assert_eq!(stats.discovered, 0);
    assert!(stats.windows_failed > 0);
    assert_eq!(store.count_identifiers().await.unwrap(), 0);
}

#[tokio::test]
async fn test_fetch_phase_drains_pending() {
    let server = MockServer::start().await;
    mount_sitemap(&server).await;
    mount_decision(&server, "ECLI:NL:HR:2026:1", "Hoge Raad").await;
    mount_decision(&server, "ECLI:NL:HR:2026:2", "Hoge Raad").await;
    mount_decision(&server, "ECLI:NL:RBAMS:2026:3", "Rechtbank Amsterdam").await;

    let tmp = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), &tmp);
    config.batch_size = 2; // Force multiple fetch iterations
    let client = build_http_client(&config.user_agent).unwrap();
    let store = RecordStore::connect(&config.paths.db_file).await.unwrap();
    let raw_store = RawStore::open(&config.paths.raw_store_dir, &config.raw_bucket).unwrap();

    cmd_index(&config, &client, &store).await.unwrap();
    let stats = cmd_fetch(&config, &client, &store, Some(&raw_store))
        .await
        .unwrap();

    assert_eq!(stats.fetched, 3);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.batches, 2);
    assert_eq!(store.count_scraped().await.unwrap(), 3);
    assert_eq!(store.count_pending().await.unwrap(), 0);

    // Normalized fields landed
    let record = store
        .get_scraped("ECLI:NL:RBAMS:2026:3")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.court, "Rechtbank Amsterdam");
    assert_eq!(record.court_type, "RB");
    assert_eq!(record.decision_date.as_deref(), Some("2026-01-10"));
    assert_eq!(
        record.xml_path.as_deref(),
        Some("raw-data/rechtspraak/NL/RBAMS/2026/ECLI_NL_RBAMS_2026_3.xml")
    );

    // Raw documents were archived under the escaped path
    assert!(tmp
        .path()
        .join("objects/raw-data/rechtspraak/NL/HR/2026/ECLI_NL_HR_2026_1.xml")
        .exists());
}

#[tokio::test]
async fn test_fetch_partial_failure_isolation() {
    let server = MockServer::start().await;
    mount_sitemap(&server).await;
    mount_decision(&server, "ECLI:NL:HR:2026:1", "Hoge Raad").await;
    // The second document is malformed: no identifier anywhere
    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("id", "ECLI:NL:HR:2026:2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Service interruption</html>"))
        .mount(&server)
        .await;
    mount_decision(&server, "ECLI:NL:RBAMS:2026:3", "Rechtbank Amsterdam").await;

    let tmp = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &tmp);
    let client = build_http_client(&config.user_agent).unwrap();
    let store = RecordStore::connect(&config.paths.db_file).await.unwrap();

    cmd_index(&config, &client, &store).await.unwrap();

    let limiter = RateLimiter::new(config.request_delay);
    let stats = fetch_batch(&config, &client, &store, None, &limiter)
        .await
        .unwrap();

    // One bad document in the middle: the other two still land
    assert_eq!(stats.fetched, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(store.count_scraped().await.unwrap(), 2);

    let pending = store.pending_batch(10).await.unwrap();
    assert_eq!(pending, vec!["ECLI:NL:HR:2026:2"]);
}

#[tokio::test]
async fn test_fetch_without_raw_store() {
    let server = MockServer::start().await;
    mount_sitemap(&server).await;
    mount_decision(&server, "ECLI:NL:HR:2026:1", "Hoge Raad").await;
    mount_decision(&server, "ECLI:NL:HR:2026:2", "Hoge Raad").await;
    mount_decision(&server, "ECLI:NL:RBAMS:2026:3", "Rechtbank Amsterdam").await;

    let tmp = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &tmp);
    let client = build_http_client(&config.user_agent).unwrap();
    let store = RecordStore::connect(&config.paths.db_file).await.unwrap();

    cmd_index(&config, &client, &store).await.unwrap();
    cmd_fetch(&config, &client, &store, None).await.unwrap();

    let record = store
        .get_scraped("ECLI:NL:HR:2026:1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.xml_path, None);
    assert!(!config.paths.raw_store_dir.exists());
}

#[tokio::test]
async fn test_backfill_repairs_missing_documents() {
    let server = MockServer::start().await;
    mount_sitemap(&server).await;
    mount_decision(&server, "ECLI:NL:HR:2026:1", "Hoge Raad").await;
    mount_decision(&server, "ECLI:NL:HR:2026:2", "Hoge Raad").await;
    mount_decision(&server, "ECLI:NL:RBAMS:2026:3", "Rechtbank Amsterdam").await;

    let tmp = TempDir::new().unwrap();
    let config = test_config(&server.uri(), &tmp);
    let client = build_http_client(&config.user_agent).unwrap();
    let store = RecordStore::connect(&config.paths.db_file).await.unwrap();

    // First run without the raw store: records land without xml_path
    cmd_index(&config, &client, &store).await.unwrap();
    cmd_fetch(&config, &client, &store, None).await.unwrap();

    let raw_store = RawStore::open(&config.paths.raw_store_dir, &config.raw_bucket).unwrap();
    let stats = cmd_backfill(&config, &client, &store, &raw_store)
        .await
        .unwrap();

    assert_eq!(stats.stored, 3);
    assert_eq!(stats.failed, 0);
    assert_eq!(store.missing_xml_batch(10).await.unwrap().len(), 0);

    let record = store
        .get_scraped("ECLI:NL:HR:2026:1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        record.xml_path.as_deref(),
        Some("raw-data/rechtspraak/NL/HR/2026/ECLI_NL_HR_2026_1.xml")
    );
    assert!(raw_store.contains("ECLI:NL:HR:2026:1"));
}
