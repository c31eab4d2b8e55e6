//! Parsing of rechtspraak.nl XML responses
//!
//! This module provides:
//! - Sitemap urlset parsing (`sitemap`)
//! - Decision document parsing (`content`)
//!
//! Both scan the XML with string operations; the documents are flat enough
//! that a full XML parser would add a dependency without buying robustness.

mod content;
mod sitemap;

pub use content::*;
pub use sitemap::*;

/// Extract the text content of the first matching XML element
///
/// Matches `<tag>`, `<tag attr="..">` and namespace-prefixed names passed in
/// `tag`. Self-closing and empty elements yield `None`.
pub(crate) fn extract_element(content: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut search_from = 0;

    while let Some(pos) = content[search_from..].find(&open) {
        let name_end = search_from + pos + open.len();
        let rest = &content[name_end..];

        // The match must be the full element name, not a prefix of a longer one
        let inner_start = match rest.bytes().next() {
            Some(b'>') => name_end + 1,
            Some(b'/') => {
                search_from = name_end;
                continue;
            }
            Some(c) if c.is_ascii_whitespace() => match rest.find('>') {
                Some(gt) if rest[..gt].trim_end().ends_with('/') => {
                    search_from = name_end + gt + 1;
                    continue;
                }
                Some(gt) => name_end + gt + 1,
                None => return None,
            },
            _ => {
                search_from = name_end;
                continue;
            }
        };

        return content[inner_start..].find(&close).and_then(|end| {
            let text = content[inner_start..inner_start + end].trim();
            (!text.is_empty()).then(|| text.to_string())
        });
    }

    None
}

/// Collect an attribute's value from every occurrence of an element
pub(crate) fn extract_attr_all(content: &str, tag: &str, attr: &str) -> Vec<String> {
    let open = format!("<{}", tag);
    let marker = format!("{}=\"", attr);
    let mut values = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = content[search_from..].find(&open) {
        let tag_start = search_from + pos + open.len();
        let Some(gt) = content[tag_start..].find('>') else {
            break;
        };
        let open_tag = &content[tag_start..tag_start + gt];

        if let Some(attr_pos) = open_tag.find(&marker) {
            let value_start = attr_pos + marker.len();
            if let Some(quote) = open_tag[value_start..].find('"') {
                values.push(open_tag[value_start..value_start + quote].to_string());
            }
        }

        search_from = tag_start + gt + 1;
    }

    values
}

/// Flatten an XML fragment to its text content, collapsing whitespace
pub(crate) fn strip_tags(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;

    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            c if !in_tag => text.push(c),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
