use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use folio_core::config::{DEFAULT_CATALOG, DEFAULT_MEMORY_THRESHOLD, DEFAULT_TIMEOUT_SECS};
use folio_core::{Catalog, CatalogDriver, CatalogRun, MemoryPressure, OutputFormat, ScrapeConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Key given to a catalog read from `--sitemap-url` without `--catalog`
pub const CUSTOM_CATALOG: &str = "custom";

const MAX_LISTED_FAILURES: usize = 10;

/// Command line options for `scrape` and `sitemap`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeArgs {
    pub catalog: Option<String>,
    pub sitemap_url: Option<Url>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub workers: usize,
    pub limit: Option<usize>,
    pub timeout_secs: u64,
    pub memory_threshold: f64,
}

impl Default for ScrapeArgs {
    fn default() -> Self {
        Self {
            catalog: None,
            sitemap_url: None,
            output: None,
            format: OutputFormat::Csv,
            workers: 1,
            limit: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            memory_threshold: DEFAULT_MEMORY_THRESHOLD,
        }
    }
}

impl ScrapeArgs {
    /// Reads whichever options the subcommand defines; the rest keep
    /// their defaults.
    pub fn from_matches(args: &ArgMatches) -> Self {
        let defaults = Self::default();
        Self {
            catalog: try_get::<String>(args, "catalog"),
            sitemap_url: try_get::<Url>(args, "sitemap-url"),
            output: try_get::<PathBuf>(args, "output"),
            format: try_get::<String>(args, "format")
                .and_then(|f| OutputFormat::from_str(&f))
                .unwrap_or(defaults.format),
            workers: try_get::<usize>(args, "workers").unwrap_or(defaults.workers),
            limit: try_get::<usize>(args, "limit"),
            timeout_secs: try_get::<u64>(args, "timeout").unwrap_or(defaults.timeout_secs),
            memory_threshold: try_get::<f64>(args, "memory-threshold")
                .unwrap_or(defaults.memory_threshold),
        }
    }
}

fn try_get<T>(args: &ArgMatches, id: &str) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    args.try_get_one::<T>(id).ok().flatten().cloned()
}

/// Installs the fmt subscriber on stderr. `RUST_LOG` wins over `quiet`.
pub fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn build_config(args: &ScrapeArgs) -> ScrapeConfig {
    ScrapeConfig {
        request_timeout: Duration::from_secs(args.timeout_secs),
        memory_threshold: args.memory_threshold,
        workers: args.workers.max(1),
        limit: args.limit,
        ..ScrapeConfig::default()
    }
}

/// The catalog to read: `--sitemap-url` wins, otherwise `--catalog` (or
/// the default catalog) is looked up in the config.
pub fn resolve_catalog(config: &ScrapeConfig, args: &ScrapeArgs) -> Result<Catalog> {
    if let Some(ref url) = args.sitemap_url {
        let key = args.catalog.as_deref().unwrap_or(CUSTOM_CATALOG);
        return Ok(Catalog::new(key, url.as_str()));
    }

    let key = args.catalog.as_deref().unwrap_or(DEFAULT_CATALOG);
    config.catalog(key).cloned().ok_or_else(|| {
        let known: Vec<&str> = config.catalogs.iter().map(|c| c.key.as_str()).collect();
        anyhow!(
            "Unknown catalog '{}' (known catalogs: {})",
            key,
            known.join(", ")
        )
    })
}

pub fn output_path(args: &ScrapeArgs, catalog: &Catalog) -> PathBuf {
    match args.output {
        Some(ref path) => PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned()),
        None => PathBuf::from(catalog.default_output_file(args.format.extension())),
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub async fn handle_scrape(args: &ScrapeArgs, quiet: bool) -> Result<CatalogRun> {
    let config = build_config(args);
    let catalog = resolve_catalog(&config, args)?;
    let output = output_path(args, &catalog);

    if !quiet {
        print_divider();
        println!(
            "{}",
            format!("  SCRAPING CATALOG {}", catalog.key.to_uppercase())
                .bright_white()
                .bold()
        );
        print_divider();
        println!(
            "{} Sitemap: {}",
            "→".blue(),
            catalog.sitemap_url.as_str().bright_white()
        );
        println!(
            "{} Output: {} ({})",
            "→".blue(),
            output.display().to_string().bright_white(),
            args.format.extension()
        );
        println!("{} Workers: {}", "→".blue(), config.workers);
        if let Some(limit) = config.limit {
            println!("{} Limit: {} pages", "→".blue(), limit);
        }
        println!(
            "{} Memory threshold: {:.1}%",
            "→".blue(),
            config.memory_threshold
        );
        println!();
    }

    let stop = MemoryPressure::new(config.memory_threshold);
    let driver = CatalogDriver::new(config)
        .context("Failed to set up the HTTP client")?
        .with_stop_condition(stop)
        .with_progress_bars(!quiet);

    let run = driver
        .run(&catalog.sitemap_url)
        .await
        .with_context(|| format!("Scraping catalog '{}' failed", catalog.key))?;

    run.table
        .save(&output, args.format)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if quiet {
        println!("{}", summary_line(&run, &output));
    } else {
        print_summary(&run, &output);
    }

    Ok(run)
}

/// One-line run outcome printed under `-q`.
pub fn summary_line(run: &CatalogRun, output: &Path) -> String {
    format!(
        "{} listed, {} scraped, {} skipped{}, saved to {}",
        run.listed,
        run.succeeded,
        run.skipped,
        if run.stopped_early { ", stopped early" } else { "" },
        output.display()
    )
}

fn print_summary(run: &CatalogRun, output: &Path) {
    println!();
    print_divider();
    println!("{}", "  RUN SUMMARY".green().bold());
    print_divider();
    println!("  Listed:  {}", run.listed.to_string().cyan());
    println!("  Scraped: {}", run.succeeded.to_string().green());
    if run.skipped > 0 {
        println!("  Skipped: {}", run.skipped.to_string().yellow());
        for failure in run.failures.iter().take(MAX_LISTED_FAILURES) {
            println!(
                "    {} {} {}",
                "✗".red(),
                failure.url,
                failure.error.as_str().dimmed()
            );
        }
        if run.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "    … and {} more",
                run.failures.len() - MAX_LISTED_FAILURES
            );
        }
    } else {
        println!("  Skipped: {}", "0".cyan());
    }
    if run.stopped_early {
        println!(
            "{} Stopped early: memory threshold reached",
            "⚠".yellow().bold()
        );
    }
    println!();
    println!(
        "{} Saved {} rows to {}",
        "✓".green().bold(),
        run.table.len(),
        output.display().to_string().bright_white()
    );
    println!();
}

pub fn handle_catalogs() {
    let config = ScrapeConfig::default();
    println!("{}", "CATALOGS".bright_blue().bold());
    for catalog in &config.catalogs {
        let marker = if catalog.key == DEFAULT_CATALOG {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {} {}{}",
            catalog.key.as_str().bright_white().bold(),
            catalog.sitemap_url,
            marker.dimmed()
        );
    }
}

/// Prints one product URL per line to stdout, for piping.
pub async fn handle_sitemap(args: &ScrapeArgs) -> Result<Vec<String>> {
    let config = build_config(args);
    let catalog = resolve_catalog(&config, args)?;
    let driver = CatalogDriver::new(config).context("Failed to set up the HTTP client")?;

    let mut urls = driver
        .list_products(&catalog.sitemap_url)
        .await
        .with_context(|| format!("Listing catalog '{}' failed", catalog.key))?;
    if let Some(limit) = args.limit {
        urls.truncate(limit);
    }

    for url in &urls {
        println!("{}", url);
    }

    Ok(urls)
}
