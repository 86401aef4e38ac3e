use clap::{Arg, arg, command};
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// `--catalog`, `--sitemap-url`, `--limit` and `--timeout`, shared by the
/// commands that read a sitemap.
fn target_args() -> [Arg; 4] {
    [
        arg!(-c --"catalog" <KEY>)
            .required(false)
            .help("Configured catalog to read (see `folio catalogs`). Default: esp"),
        arg!(-s --"sitemap-url" <URL>)
            .required(false)
            .help("Read this product sitemap instead of a configured catalog")
            .value_parser(clap::value_parser!(Url)),
        arg!(-l --"limit" <NUM_PAGES>)
            .required(false)
            .help("Only process the first NUM_PAGES product pages of the sitemap")
            .value_parser(clap::value_parser!(usize)),
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Request timeout in seconds. Default: 30")
            .value_parser(clap::value_parser!(u64).range(1..)),
    ]
}

/// A percentage in (0, 100]. Rejects NaN and anything that would stop
/// before the first page.
pub fn parse_percent(value: &str) -> Result<f64, String> {
    let percent: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if percent > 0.0 && percent <= 100.0 {
        Ok(percent)
    } else {
        Err(format!("{} is not in the range (0, 100]", value))
    }
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("folio")
        .about("Scrapes publisher book catalogs into a table, one row per product page")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress bar and info logging")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("scrape")
                .about(
                    "Scrape every product page listed by a catalog sitemap and save the table. \
                This is the default when no command is given.",
                )
                .args(target_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Output file (default: penguinlibros_<catalog>_catalog.<format>)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: csv, json")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(
                    arg!(-w --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("Product pages fetched concurrently. Rows always keep sitemap order.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(-m --"memory-threshold" <PERCENT>)
                        .required(false)
                        .help("Stop starting new pages once system memory use reaches PERCENT (0-100]. Default: 99")
                        .value_parser(parse_percent),
                ),
        )
        .subcommand(command!("catalogs").about("List the configured catalogs and their sitemaps"))
        .subcommand(
            command!("sitemap")
                .about("Print the product URLs a catalog sitemap lists, without scraping them")
                .args(target_args()),
        )
}
