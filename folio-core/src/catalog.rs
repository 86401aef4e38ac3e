use crate::config::ScrapeConfig;
use crate::record::{Record, assemble};
use crate::stop::{NeverStop, StopCondition};
use crate::table::ResultTable;
use folio_scanner::extract::extract_product;
use folio_scanner::{Fetcher, Headers, ScanError, extract_urls};
use futures::StreamExt;
use futures::stream::FuturesOrdered;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to load sitemap {url}: {source}")]
    Sitemap {
        url: String,
        #[source]
        source: ScanError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] ScanError),
}

/// Where the driver is in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Init,
    ListingFetched,
    Iterating,
    Done,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Init => "init",
            DriverState::ListingFetched => "listing fetched",
            DriverState::Iterating => "iterating",
            DriverState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Callback for reporting driver state changes and progress messages
pub type ScrapeProgressCallback = Arc<dyn Fn(DriverState, String) + Send + Sync>;

/// A product page that could not be fetched and was skipped.
#[derive(Debug, Clone)]
pub struct PageFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of one catalog run.
#[derive(Debug, Clone)]
pub struct CatalogRun {
    pub table: ResultTable,
    /// Product URLs considered after listing (and `limit`)
    pub listed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub stopped_early: bool,
    pub failures: Vec<PageFailure>,
}

/// Lists a catalog's product pages from its sitemap, scrapes each page and
/// accumulates one record per page in sitemap order.
pub struct CatalogDriver<S = NeverStop> {
    fetcher: Fetcher,
    config: ScrapeConfig,
    page_headers: Headers,
    sitemap_headers: Headers,
    stop: S,
    progress_callback: Option<ScrapeProgressCallback>,
    show_progress_bars: bool,
}

impl CatalogDriver<NeverStop> {
    pub fn new(config: ScrapeConfig) -> Result<Self, CatalogError> {
        let fetcher = Fetcher::with_timeout(config.request_timeout).map_err(CatalogError::Client)?;
        Ok(Self {
            fetcher,
            page_headers: config.page_headers(),
            sitemap_headers: config.sitemap_headers(),
            config,
            stop: NeverStop,
            progress_callback: None,
            show_progress_bars: false,
        })
    }
}

impl<S: StopCondition> CatalogDriver<S> {
    pub fn with_stop_condition<T: StopCondition>(self, stop: T) -> CatalogDriver<T> {
        CatalogDriver {
            fetcher: self.fetcher,
            config: self.config,
            page_headers: self.page_headers,
            sitemap_headers: self.sitemap_headers,
            stop,
            progress_callback: self.progress_callback,
            show_progress_bars: self.show_progress_bars,
        }
    }

    pub fn with_progress_callback(mut self, callback: ScrapeProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_progress_bars(mut self, show: bool) -> Self {
        self.show_progress_bars = show;
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    fn report(&self, state: DriverState, message: String) {
        debug!("[{}] {}", state, message);
        if let Some(ref callback) = self.progress_callback {
            callback(state, message);
        }
    }

    /// Product URLs listed by the sitemap, in document order.
    ///
    /// A sitemap index is expanded one level: each child sitemap is fetched
    /// and its URLs appended. A failing child is logged and skipped.
    pub async fn list_products(&self, sitemap_url: &str) -> Result<Vec<String>, CatalogError> {
        let doc = self
            .fetcher
            .fetch_sitemap(sitemap_url, &self.sitemap_headers)
            .await
            .map_err(|source| CatalogError::Sitemap {
                url: sitemap_url.to_string(),
                source,
            })?;

        let mut urls = extract_urls(&doc);
        if doc.is_index() {
            info!(
                "{} is a sitemap index with {} child sitemaps",
                sitemap_url,
                doc.sitemaps.len()
            );
            for child in &doc.sitemaps {
                let child_url = resolve(sitemap_url, child);
                match self
                    .fetcher
                    .fetch_sitemap(&child_url, &self.sitemap_headers)
                    .await
                {
                    Ok(child_doc) => urls.extend(extract_urls(&child_doc)),
                    Err(e) => warn!("Skipping child sitemap {}: {}", child_url, e),
                }
            }
        }

        info!("Sitemap {} lists {} product pages", sitemap_url, urls.len());
        Ok(urls)
    }

    /// Fetches one product page and assembles its record.
    pub async fn scrape_page(&self, url: &str) -> Result<Record, ScanError> {
        let doc = self.fetcher.fetch_html(url, &self.page_headers).await?;
        Ok(assemble(extract_product(&doc)))
    }

    /// Runs the whole pipeline for one catalog sitemap.
    ///
    /// Sitemap failures are fatal. Product page failures are logged, counted
    /// and skipped. The stop condition is checked before each page is
    /// started; pages already in flight still complete.
    pub async fn run(&self, sitemap_url: &str) -> Result<CatalogRun, CatalogError> {
        self.report(DriverState::Init, format!("Fetching sitemap {}", sitemap_url));

        let mut urls = self.list_products(sitemap_url).await?;
        if let Some(limit) = self.config.limit {
            urls.truncate(limit);
        }
        let listed = urls.len();
        self.report(
            DriverState::ListingFetched,
            format!("{} product pages to scrape", listed),
        );

        let progress_bar = if self.show_progress_bars {
            let pb = ProgressBar::new(listed as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        let workers = self.config.workers.max(1);
        let mut table = ResultTable::new();
        let mut failures = Vec::new();
        let mut stopped_early = false;
        let mut in_flight = FuturesOrdered::new();
        let mut cursor = 0usize;

        self.report(DriverState::Iterating, format!("Scraping with {} worker(s)", workers));

        loop {
            while !stopped_early && cursor < listed && in_flight.len() < workers {
                if self.stop.should_stop() {
                    stopped_early = true;
                    warn!(
                        "Stop condition triggered after starting {}/{} pages",
                        cursor, listed
                    );
                    break;
                }
                let url = urls[cursor].as_str();
                in_flight.push_back(async move { (url, self.scrape_page(url).await) });
                cursor += 1;
            }

            let Some((url, outcome)) = in_flight.next().await else {
                break;
            };

            match outcome {
                Ok(record) => {
                    debug!("Scraped {} ({} fields)", url, record.len());
                    table.push(record);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                    failures.push(PageFailure {
                        url: url.to_string(),
                        error: e.to_string(),
                    });
                }
            }

            if let Some(ref pb) = progress_bar {
                pb.inc(1);
                pb.set_message(self.stop.describe().unwrap_or_default());
            }
        }

        let run = CatalogRun {
            listed,
            succeeded: table.len(),
            skipped: failures.len(),
            stopped_early,
            failures,
            table,
        };

        if let Some(ref pb) = progress_bar {
            pb.finish_with_message(format!(
                "{} scraped, {} skipped",
                run.succeeded, run.skipped
            ));
        }

        info!(
            "Catalog run finished: {} listed, {} succeeded, {} skipped{}",
            run.listed,
            run.succeeded,
            run.skipped,
            if run.stopped_early { " (stopped early)" } else { "" }
        );
        self.report(
            DriverState::Done,
            format!("{} succeeded, {} skipped", run.succeeded, run.skipped),
        );

        Ok(run)
    }
}

/// Resolves a possibly relative `<loc>` against the sitemap it came from.
fn resolve(base: &str, loc: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(loc))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| loc.to_string())
}
