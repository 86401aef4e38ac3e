use folio_scanner::Headers;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/56.0.2924.87 Safari/537.36";

/// Accept header sent with sitemap requests
pub const SITEMAP_ACCEPT: &str = "application/xml";

pub const DEFAULT_MEMORY_THRESHOLD: f64 = 99.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CATALOG: &str = "esp";

/// A publisher catalog, identified by a short key and its product sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub key: String,
    pub sitemap_url: String,
}

impl Catalog {
    pub fn new(key: &str, sitemap_url: &str) -> Self {
        Self {
            key: key.to_string(),
            sitemap_url: sitemap_url.to_string(),
        }
    }

    /// `penguinlibros_<key>_catalog.csv` style file name for this catalog.
    pub fn default_output_file(&self, extension: &str) -> String {
        format!("penguinlibros_{}_catalog.{}", self.key, extension)
    }
}

/// Everything the driver needs; passed in explicitly, no globals.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub catalogs: Vec<Catalog>,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Memory utilisation percentage at which iteration stops early
    pub memory_threshold: f64,
    /// Concurrent product fetches; 1 means strictly sequential
    pub workers: usize,
    /// Cap on product pages processed after listing
    pub limit: Option<usize>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            catalogs: vec![
                Catalog::new(
                    "esp",
                    "https://www.penguinlibros.com/sitemap-products-1-es.xml",
                ),
                Catalog::new(
                    "cat",
                    "https://www.penguinlibros.com/sitemap-products-22-ca.xml",
                ),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            memory_threshold: DEFAULT_MEMORY_THRESHOLD,
            workers: 1,
            limit: None,
        }
    }
}

impl ScrapeConfig {
    pub fn catalog(&self, key: &str) -> Option<&Catalog> {
        self.catalogs.iter().find(|c| c.key.eq_ignore_ascii_case(key))
    }

    /// Headers for product page requests.
    pub fn page_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers
    }

    /// Product page headers plus the XML content hint.
    pub fn sitemap_headers(&self) -> Headers {
        let mut headers = self.page_headers();
        headers.insert("Accept".to_string(), SITEMAP_ACCEPT.to_string());
        headers
    }
}
