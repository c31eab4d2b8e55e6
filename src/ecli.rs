//! ECLI (European Case Law Identifier) helpers
//!
//! An ECLI looks like `ECLI:NL:HR:2025:123` — country, court, and year are
//! the second through fourth `:`-separated segments.

use url::Url;

/// Extract the ECLI from a sitemap entry URL
///
/// Entry URLs carry the identifier in the `id` query parameter, e.g.
/// `https://uitspraken.rechtspraak.nl/details?id=ECLI:NL:HR:2025:1`.
pub fn extract_ecli(entry_url: &str) -> Option<String> {
    let parsed = Url::parse(entry_url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, value)| key == "id" && value.starts_with("ECLI:"))
        .map(|(_, value)| value.into_owned())
}

/// Escape an ECLI for use as a file name (`:` → `_`)
pub fn escape(ecli: &str) -> String {
    ecli.replace(':', "_")
}

/// Derive the object-store path for an ECLI's raw document
///
/// `ECLI:NL:HR:2025:123` → `rechtspraak/NL/HR/2025/ECLI_NL_HR_2025_123.xml`.
/// Identifiers with fewer than five segments land under `rechtspraak/other/`.
pub fn object_path(ecli: &str) -> String {
    let parts: Vec<&str> = ecli.split(':').collect();
    if parts.len() >= 5 {
        format!(
            "rechtspraak/{}/{}/{}/{}.xml",
            parts[1],
            parts[2],
            parts[3],
            escape(ecli)
        )
    } else {
        format!("rechtspraak/other/{}.xml", escape(ecli))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ecli() {
        assert_eq!(
            extract_ecli("https://uitspraken.rechtspraak.nl/details?id=ECLI:NL:HR:2025:1"),
            Some("ECLI:NL:HR:2025:1".to_string())
        );
        assert_eq!(
            extract_ecli("https://uitspraken.rechtspraak.nl/details?id=ECLI:NL:HR:2025:1&lang=nl"),
            Some("ECLI:NL:HR:2025:1".to_string())
        );
    }

    #[test]
    fn test_extract_ecli_missing() {
        assert_eq!(
            extract_ecli("https://uitspraken.rechtspraak.nl/details?page=2"),
            None
        );
        assert_eq!(extract_ecli("not a url"), None);
        // id present but not an ECLI
        assert_eq!(
            extract_ecli("https://uitspraken.rechtspraak.nl/details?id=12345"),
            None
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("ECLI:NL:HR:2025:123"), "ECLI_NL_HR_2025_123");
    }

    #[test]
    fn test_object_path() {
        assert_eq!(
            object_path("ECLI:NL:HR:2025:123"),
            "rechtspraak/NL/HR/2025/ECLI_NL_HR_2025_123.xml"
        );
    }

    #[test]
    fn test_object_path_short_ecli() {
        assert_eq!(
            object_path("ECLI:NL:HR"),
            "rechtspraak/other/ECLI_NL_HR.xml"
        );
    }
}
