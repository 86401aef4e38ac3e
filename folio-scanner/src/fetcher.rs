use crate::document::ParsedDocument;
use crate::error::{Result, ScanError};
use crate::sitemap::SitemapDocument;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Request headers sent with a fetch, e.g. `User-Agent`.
pub type Headers = BTreeMap<String, String>;

/// Retrieves pages and parses them. One attempt per request, no retries.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    /// Fetches an HTML page and parses it into a document tree.
    pub async fn fetch_html(&self, url: &str, headers: &Headers) -> Result<ParsedDocument> {
        let body = self.fetch_body(url, headers).await?;
        Ok(ParsedDocument::parse(&body))
    }

    /// Fetches a sitemap and parses its `<loc>` entries.
    pub async fn fetch_sitemap(&self, url: &str, headers: &Headers) -> Result<SitemapDocument> {
        let body = self.fetch_body(url, headers).await?;
        SitemapDocument::parse(&body)
    }

    async fn fetch_body(&self, url: &str, headers: &Headers) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Fetching {}", url);
        let start = Instant::now();
        let response = self
            .client
            .get(parsed)
            .headers(header_map(headers)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Decoded with the charset the server declares, UTF-8 otherwise
        let body = response.text().await?;
        debug!(
            "Fetched {} ({} bytes in {:?})",
            url,
            body.len(),
            start.elapsed()
        );

        Ok(body)
    }
}

fn header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ScanError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ScanError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
