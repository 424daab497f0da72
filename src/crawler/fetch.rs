//! Single-page retrieval for the crawler

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::crawler::content_extraction::{extract_page, ExtractedPage};
use crate::crawler::error::FetchError;
use crate::crawler::normalizer::NormalizedUrl;
use crate::crawler::CrawlerConfig;

/// HTTP fetcher that turns a URL into an `ExtractedPage`
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Build a fetcher using the timeout and user agent from `config`
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Issue one GET and extract the page's text and links
    ///
    /// Relative links resolve against the requested URL, not the post-redirect
    /// one, so they stay comparable with the page's own key.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn fetch_and_extract(&self, url: &NormalizedUrl) -> Result<ExtractedPage, FetchError> {
        let base_url = Url::parse(url.as_str())?;
        let response = self
            .client
            .get(base_url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Unreachable {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response.url() != &base_url {
            debug!("Redirected to {}", response.url());
        }
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Unreachable {
                url: url.to_string(),
                source,
            })?;
        debug!("Fetched {} bytes", body.len());

        extract_page(&base_url, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::normalizer::normalize;
    use mockito::Server;
    use std::io::Write;
    use std::time::Duration;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(&CrawlerConfig::builder().request_timeout_secs(5).build()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/about")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<h1>About</h1><p>We sell tools.</p><a href="/team">Team</a>"#)
            .expect(1)
            .create_async()
            .await;

        let url = normalize(&format!("{}/about/", server.url()));
        let page = fetcher().fetch_and_extract(&url).await.unwrap();

        assert_eq!(page.text, "About We sell tools.");
        assert_eq!(page.links, vec![normalize(&format!("{}/team", server.url()))]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let url = normalize(&format!("{}/missing", server.url()));
        let result = fetcher().fetch_and_extract(&url).await;

        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failure_is_unreachable() {
        // Port 9 (discard) on localhost is not served by anything in tests
        let url = normalize("http://127.0.0.1:9/");
        let result = fetcher().fetch_and_extract(&url).await;
        assert!(matches!(result, Err(FetchError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mut server = Server::new_async().await;
        let _slow = server
            .mock("GET", "/slow")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_chunked_body(|w| {
                // Trickle for ~3s; a write fails as soon as the client hangs up
                for _ in 0..30 {
                    std::thread::sleep(Duration::from_millis(100));
                    w.write_all(b" ")?;
                }
                w.write_all(b"<p>page-slow</p>")
            })
            .create_async()
            .await;

        let fetcher =
            PageFetcher::new(&CrawlerConfig::builder().request_timeout_secs(1).build()).unwrap();
        let url = normalize(&format!("{}/slow", server.url()));
        let err = fetcher.fetch_and_extract(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Unreachable { .. }));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_links_resolve_against_requested_url() {
        let mut server = Server::new_async().await;
        let _old = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new/home")
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/new/home")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<p>Moved</p><a href="about">About</a>"#)
            .create_async()
            .await;

        let url = normalize(&format!("{}/old", server.url()));
        let page = fetcher().fetch_and_extract(&url).await.unwrap();

        assert_eq!(page.text, "Moved");
        assert_eq!(page.links, vec![normalize(&format!("{}/about", server.url()))]);
    }

    #[test]
    fn test_invalid_user_agent_is_a_client_error() {
        let config = CrawlerConfig::builder().user_agent("bad\nagent").build();
        assert!(matches!(PageFetcher::new(&config), Err(FetchError::Client(_))));
    }

    #[tokio::test]
    async fn test_relative_url_is_rejected_before_sending() {
        let result = fetcher().fetch_and_extract(&normalize("/no/host")).await;
        assert!(matches!(result, Err(FetchError::UrlParse(_))));
    }
}
