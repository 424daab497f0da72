//! URL canonicalization for visited-set keys and same-site checks

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// A URL with query string, fragment and trailing slashes removed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse the normalized form, if it is an absolute URL
    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }

    /// Whether `other` lives on the same network location.
    ///
    /// Compares the host and any explicit port; the scheme is ignored, so
    /// `http://a.com` and `https://a.com/x` share a location.
    pub fn same_host(&self, other: &NormalizedUrl) -> bool {
        match (self.to_url(), other.to_url()) {
            (Some(a), Some(b)) => {
                a.host_str().is_some() && a.host_str() == b.host_str() && a.port() == b.port()
            }
            _ => false,
        }
    }

    /// Case-insensitive substring match against any of `keywords`
    pub fn contains_any(&self, keywords: &[String]) -> bool {
        let lowered = self.0.to_lowercase();
        keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| lowered.contains(&k.to_lowercase()))
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a URL by dropping its query, fragment and trailing slashes.
///
/// Never fails: input the URL grammar rejects is trimmed textually instead.
pub fn normalize(url: &str) -> NormalizedUrl {
    let url = url.trim();
    let stripped = match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            String::from(parsed)
        }
        Err(_) => {
            let end = url.find(['?', '#']).unwrap_or(url.len());
            url[..end].to_string()
        }
    };
    NormalizedUrl(
        stripped
            .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
            .to_string(),
    )
}
