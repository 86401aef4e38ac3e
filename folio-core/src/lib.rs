pub mod catalog;
pub mod config;
pub mod record;
pub mod stop;
pub mod table;

pub use catalog::{CatalogDriver, CatalogError, CatalogRun, DriverState, PageFailure};
pub use config::{Catalog, ScrapeConfig};
pub use record::{Record, assemble};
pub use stop::{MemoryPressure, NeverStop, StopCondition};
pub use table::{OutputFormat, ResultTable, TableError};

pub fn print_banner() {
    println!(
        r#"
   ___     _ _
  / __|___| (_)___
 | _|/ _ \ | / _ \
 |_| \___/_|_\___/   v{}
   publisher catalog scraper
"#,
        env!("CARGO_PKG_VERSION")
    );
}
