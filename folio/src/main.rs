use colored::Colorize;
use folio::commands::command_argument_builder;
use folio::handlers::{
    ScrapeArgs, handle_catalogs, handle_scrape, handle_sitemap, init_tracing,
};
use folio_core::print_banner;

#[tokio::main]
async fn main() {
    let chosen_command = command_argument_builder().get_matches();
    let quiet = chosen_command.get_flag("quiet");
    init_tracing(quiet);

    // `sitemap` writes URLs to stdout, keep it clean
    if !quiet && !matches!(chosen_command.subcommand(), Some(("sitemap", _))) {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        // No subcommand: scrape the default catalog with default options
        None => handle_scrape(&ScrapeArgs::default(), quiet).await.map(|_| ()),
        Some(("scrape", sub_matches)) => handle_scrape(&ScrapeArgs::from_matches(sub_matches), quiet)
            .await
            .map(|_| ()),
        Some(("catalogs", _)) => {
            handle_catalogs();
            Ok(())
        }
        Some(("sitemap", sub_matches)) => handle_sitemap(&ScrapeArgs::from_matches(sub_matches))
            .await
            .map(|_| ()),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
