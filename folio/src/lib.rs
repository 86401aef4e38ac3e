pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    ScrapeArgs, build_config, handle_catalogs, handle_scrape, handle_sitemap, init_tracing,
    output_path, resolve_catalog, summary_line,
};
