//! Decision document parsing
//!
//! The content endpoint returns an `open-rechtspraak` document: Dublin Core
//! metadata inside `rdf:Description` blocks, followed by an
//! `inhoudsindicatie` summary and the decision text.

use super::{extract_attr_all, extract_element, strip_tags};
use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Normalized metadata extracted from one decision document
#[derive(Debug, Clone)]
pub struct ParsedDecision {
    pub ecli: String,
    pub case_number: Option<String>,
    pub decision_date: Option<NaiveDate>,
    pub publication_date: Option<NaiveDate>,
    pub court: String,
    pub court_type: String,
    pub procedure_type: Option<String>,
    pub subject_area: Option<String>,
    pub summary: Option<String>,
    pub related_eclis: Vec<String>,
}

/// Parse a decision document into its normalized metadata
///
/// Individual fields degrade to `None` when missing or malformed; only a
/// document without any identifier is a parse error.
pub fn parse_decision(content: &str) -> Result<ParsedDecision> {
    let ecli = extract_element(content, "dcterms:identifier")
        .filter(|id| id.starts_with("ECLI:"))
        .or_else(|| extract_element(content, "ecli"))
        .ok_or_else(|| Error::Parse("document carries no ECLI identifier".to_string()))?;

    let decision_date = extract_element(content, "dcterms:date")
        .or_else(|| extract_element(content, "datum"))
        .and_then(|s| parse_date(&s));
    let publication_date =
        extract_element(content, "dcterms:issued").and_then(|s| parse_date(&s));

    let court = extract_element(content, "dcterms:creator")
        .unwrap_or_else(|| "Unknown".to_string());
    let court_type = court_type_code(&court).to_string();

    let procedure_type = extract_element(content, "dcterms:type")
        .or_else(|| extract_element(content, "psi:procedure"));
    let subject_area = extract_element(content, "dcterms:subject");
    let case_number = extract_element(content, "psi:zaaknummer");

    let summary = extract_summary(content);

    let related_eclis = extract_attr_all(content, "dcterms:relation", "rdf:resource")
        .into_iter()
        .filter(|r| r.starts_with("ECLI:"))
        .collect();

    Ok(ParsedDecision {
        ecli,
        case_number,
        decision_date,
        publication_date,
        court,
        court_type,
        procedure_type,
        subject_area,
        summary,
        related_eclis,
    })
}

/// Parse an ISO date, tolerating a trailing time component
///
/// `2025-01-15` and `2025-01-15T09:30:00Z` both yield the same date;
/// anything else yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Map a court name to its low-cardinality type code
pub fn court_type_code(court_name: &str) -> &'static str {
    let name = court_name.to_lowercase();

    if name.contains("hoge raad") {
        "HR"
    } else if name.contains("gerechtshof") {
        "HOF"
    } else if name.contains("rechtbank") {
        "RB"
    } else if name.contains("raad van state") {
        "RVS"
    } else if name.contains("centrale raad van beroep") {
        "CRVB"
    } else if name.contains("college van beroep") {
        "CBB"
    } else if name.contains("raad voor de rechtspraak") {
        "RVR"
    } else {
        "OTHER"
    }
}

fn extract_summary(content: &str) -> Option<String> {
    let fragment = extract_element(content, "inhoudsindicatie")?;
    let text = strip_tags(&fragment);
    (!text.is_empty()).then_some(text)
}
