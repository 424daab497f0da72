//! Content extraction functionality for the crawler module

use std::collections::HashSet;

use scraper::{Html, Selector};
use tracing::trace;
use url::Url;

use crate::crawler::error::FetchError;
use crate::crawler::normalizer::{normalize, NormalizedUrl};

/// Elements whose text is kept; everything else is treated as boilerplate
const CONTENT_SELECTOR: &str = "h1, h2, h3, p, li";

const LINK_SELECTOR: &str = "a[href]";

/// Reduced representation of one fetched page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPage {
    /// Text of headings, paragraphs and list items in document order
    pub text: String,

    /// Outbound http(s) links, normalized and de-duplicated, in document order
    pub links: Vec<NormalizedUrl>,
}

fn parse_selector(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector)
        .map_err(|e| FetchError::HtmlParse(format!("Failed to parse selector '{}': {}", selector, e)))
}

/// Parse a page once and pull out both its text and its links
///
/// # Arguments
///
/// * `base_url` - The URL relative links are resolved against
/// * `html` - The raw markup
pub fn extract_page(base_url: &Url, html: &str) -> Result<ExtractedPage, FetchError> {
    let document = Html::parse_document(html);
    Ok(ExtractedPage {
        text: extract_text(&document)?,
        links: extract_links(base_url, &document)?,
    })
}

/// Extract the text of h1-h3, p and li elements, joined by single spaces
pub fn extract_text(document: &Html) -> Result<String, FetchError> {
    let selector = parse_selector(CONTENT_SELECTOR)?;

    let parts: Vec<String> = document
        .select(&selector)
        .map(|element| {
            element
                .text()
                .flat_map(|t| t.split_whitespace())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect();

    Ok(parts.join(" "))
}

/// Extract outbound links in document order
///
/// Non-http schemes (mailto, tel, javascript) and unresolvable hrefs are dropped.
pub fn extract_links(base_url: &Url, document: &Html) -> Result<Vec<NormalizedUrl>, FetchError> {
    let selector = parse_selector(LINK_SELECTOR)?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let resolved = match base_url.join(href.trim()) {
            Ok(url) => url,
            Err(e) => {
                trace!("Skipping unresolvable href '{}': {}", href, e);
                continue;
            }
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }

        let normalized = normalize(resolved.as_str());
        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head><title>Acme</title><style>body { color: red; }</style></head>
          <body>
            <nav><a href="/about">About</a> Menu chrome</nav>
            <h1>Acme   Robotics</h1>
            <script>var tracking = true;</script>
            <p>We build <b>warehouse</b> robots.</p>
            <h4>Ignored heading</h4>
            <ul><li>Fast</li><li>Safe</li></ul>
            <h2>Team</h2>
            <a href="/team?ref=home#top">Team</a>
            <a href="https://other.com/x">Partner</a>
            <a href="/about/">About again</a>
            <a href="mailto:hi@acme.com">Mail</a>
            <a href="javascript:void(0)">JS</a>
          </body>
        </html>
    "#;

    fn base() -> Url {
        Url::parse("https://acme.com/").unwrap()
    }

    #[test]
    fn test_extract_text_keeps_content_elements_in_order() {
        let page = extract_page(&base(), PAGE).unwrap();
        assert_eq!(
            page.text,
            "Acme Robotics We build warehouse robots. Fast Safe Team"
        );
        assert!(!page.text.contains("tracking"));
        assert!(!page.text.contains("Menu chrome"));
        assert!(!page.text.contains("Ignored heading"));
    }

    #[test]
    fn test_extract_links_normalizes_and_dedups() {
        let page = extract_page(&base(), PAGE).unwrap();
        let links: Vec<&str> = page.links.iter().map(|l| l.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://acme.com/about",
                "https://acme.com/team",
                "https://other.com/x",
            ]
        );
    }

    #[test]
    fn test_relative_links_resolve_against_base() {
        let base = Url::parse("https://acme.com/docs/").unwrap();
        let page = extract_page(&base, r#"<a href="intro">Intro</a>"#).unwrap();
        assert_eq!(page.links[0].as_str(), "https://acme.com/docs/intro");
    }

    #[test]
    fn test_empty_document() {
        let page = extract_page(&base(), "").unwrap();
        assert!(page.text.is_empty());
        assert!(page.links.is_empty());
    }
}
