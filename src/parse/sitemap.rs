//! Sitemap urlset parsing

use super::extract_element;
use crate::ecli;

/// A sitemap entry that resolved to an ECLI
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    /// The decision identifier extracted from the entry URL
    pub ecli: String,
    /// Last modification time as reported by the feed (RFC 3339 / W3C date)
    pub lastmod: Option<String>,
    /// The entry URL itself
    pub url: String,
}

/// Result of parsing one sitemap response
#[derive(Debug, Default)]
pub struct SitemapPage {
    pub entries: Vec<SitemapEntry>,
    /// Entries without a recognizable ECLI in their URL
    pub skipped: usize,
}

/// Parse a sitemap urlset into ECLI entries
///
/// Entries whose `<loc>` carries no ECLI are counted as skipped, never fatal.
pub fn parse_sitemap(content: &str) -> SitemapPage {
    let mut page = SitemapPage::default();

    for block in content.split("<url>").skip(1) {
        let Some(end) = block.find("</url>") else {
            continue;
        };
        let block = &block[..end];

        let Some(loc) = extract_element(block, "loc") else {
            page.skipped += 1;
            continue;
        };

        match ecli::extract_ecli(&loc) {
            Some(ecli) => page.entries.push(SitemapEntry {
                ecli,
                lastmod: extract_element(block, "lastmod"),
                url: loc,
            }),
            None => page.skipped += 1,
        }
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <url>
        <loc>https://uitspraken.rechtspraak.nl/details?id=ECLI:NL:HR:2025:1</loc>
        <lastmod>2025-01-15T09:30:00Z</lastmod>
    </url>
    <url>
        <loc>https://uitspraken.rechtspraak.nl/details?id=ECLI:NL:RBAMS:2025:42</loc>
    </url>
    <url>
        <loc>https://uitspraken.rechtspraak.nl/over-deze-site</loc>
        <lastmod>2025-01-10T00:00:00Z</lastmod>
    </url>
</urlset>
"#;

    #[test]
    fn test_parse_sitemap() {
        let page = parse_sitemap(SAMPLE);

        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.skipped, 1);

        assert_eq!(page.entries[0].ecli, "ECLI:NL:HR:2025:1");
        assert_eq!(
            page.entries[0].lastmod.as_deref(),
            Some("2025-01-15T09:30:00Z")
        );
        assert_eq!(page.entries[1].ecli, "ECLI:NL:RBAMS:2025:42");
        assert_eq!(page.entries[1].lastmod, None);
    }

    #[test]
    fn test_parse_sitemap_empty() {
        let page = parse_sitemap("<urlset></urlset>");
        assert!(page.entries.is_empty());
        assert_eq!(page.skipped, 0);
    }

    #[test]
    fn test_parse_sitemap_garbage() {
        let page = parse_sitemap("not xml at all");
        assert!(page.entries.is_empty());
    }
}
