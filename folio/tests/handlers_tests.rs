use folio::commands::command_argument_builder;
use folio::handlers::*;
use folio_core::OutputFormat;
use folio_scanner::FieldValue;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn matches_for(argv: &[&str]) -> clap::ArgMatches {
    command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap()
}

fn subcommand_args(argv: &[&str]) -> ScrapeArgs {
    let matches = matches_for(argv);
    let (_, sub_matches) = matches.subcommand().unwrap();
    ScrapeArgs::from_matches(sub_matches)
}

// ============================================================================
// Argument Parsing Tests
// ============================================================================

#[test]
fn test_scrape_args_defaults() {
    let args = subcommand_args(&["folio", "scrape"]);
    assert_eq!(args, ScrapeArgs::default());
    assert_eq!(args.format, OutputFormat::Csv);
    assert_eq!(args.workers, 1);
    assert_eq!(args.timeout_secs, 30);
    assert_eq!(args.memory_threshold, 99.0);
}

#[test]
fn test_scrape_args_from_flags() {
    let args = subcommand_args(&[
        "folio",
        "scrape",
        "--catalog",
        "cat",
        "-w",
        "4",
        "--limit",
        "10",
        "--timeout",
        "5",
        "-m",
        "90.5",
        "-f",
        "json",
        "-o",
        "out.json",
    ]);

    assert_eq!(args.catalog.as_deref(), Some("cat"));
    assert_eq!(args.workers, 4);
    assert_eq!(args.limit, Some(10));
    assert_eq!(args.timeout_secs, 5);
    assert_eq!(args.memory_threshold, 90.5);
    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.output, Some(PathBuf::from("out.json")));
}

#[test]
fn test_sitemap_args_ignore_scrape_only_options() {
    let args = subcommand_args(&["folio", "sitemap", "--limit", "3"]);
    assert_eq!(args.limit, Some(3));
    assert_eq!(args.output, None);
    assert_eq!(args.format, OutputFormat::Csv);
    assert_eq!(args.workers, 1);
}

#[test]
fn test_quiet_is_global() {
    let matches = matches_for(&["folio", "scrape", "-q"]);
    assert!(matches.get_flag("quiet"));

    let matches = matches_for(&["folio"]);
    assert!(!matches.get_flag("quiet"));
    assert!(matches.subcommand().is_none());
}

#[test]
fn test_invalid_arguments_rejected() {
    let cmd = command_argument_builder;
    assert!(cmd().try_get_matches_from(["folio", "scrape", "--timeout", "0"]).is_err());
    assert!(cmd().try_get_matches_from(["folio", "scrape", "-f", "xlsx"]).is_err());
    assert!(cmd().try_get_matches_from(["folio", "sitemap", "-s", "not a url"]).is_err());
}

#[test]
fn test_memory_threshold_range() {
    let cmd = command_argument_builder;
    for bad in ["NaN", "-1", "0", "100.5", "lots"] {
        assert!(
            cmd()
                .try_get_matches_from(["folio", "scrape", "--memory-threshold", bad])
                .is_err(),
            "{} should be rejected",
            bad
        );
    }

    let args = subcommand_args(&["folio", "scrape", "--memory-threshold", "100"]);
    assert_eq!(args.memory_threshold, 100.0);
}

// ============================================================================
// Config Resolution Tests
// ============================================================================

#[test]
fn test_build_config() {
    let args = ScrapeArgs {
        workers: 0,
        limit: Some(5),
        timeout_secs: 12,
        memory_threshold: 80.0,
        ..ScrapeArgs::default()
    };
    let config = build_config(&args);

    assert_eq!(config.workers, 1);
    assert_eq!(config.limit, Some(5));
    assert_eq!(config.request_timeout, Duration::from_secs(12));
    assert_eq!(config.memory_threshold, 80.0);
    assert_eq!(config.catalogs.len(), 2);
}

#[test]
fn test_resolve_default_catalog() {
    let args = ScrapeArgs::default();
    let catalog = resolve_catalog(&build_config(&args), &args).unwrap();
    assert_eq!(catalog.key, "esp");
    assert!(catalog.sitemap_url.ends_with("sitemap-products-1-es.xml"));
}

#[test]
fn test_resolve_catalog_by_key() {
    let args = ScrapeArgs {
        catalog: Some("CAT".to_string()),
        ..ScrapeArgs::default()
    };
    let catalog = resolve_catalog(&build_config(&args), &args).unwrap();
    assert_eq!(catalog.key, "cat");
}

#[test]
fn test_resolve_unknown_catalog() {
    let args = ScrapeArgs {
        catalog: Some("fr".to_string()),
        ..ScrapeArgs::default()
    };
    let err = resolve_catalog(&build_config(&args), &args).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'fr'"));
    assert!(message.contains("esp, cat"));
}

#[test]
fn test_sitemap_url_overrides_catalog() {
    let args = ScrapeArgs {
        sitemap_url: Some(Url::parse("https://example.com/sitemap.xml").unwrap()),
        ..ScrapeArgs::default()
    };
    let catalog = resolve_catalog(&build_config(&args), &args).unwrap();
    assert_eq!(catalog.key, CUSTOM_CATALOG);
    assert_eq!(catalog.sitemap_url, "https://example.com/sitemap.xml");
}

#[test]
fn test_output_path() {
    let args = ScrapeArgs::default();
    let catalog = resolve_catalog(&build_config(&args), &args).unwrap();
    assert_eq!(
        output_path(&args, &catalog),
        PathBuf::from("penguinlibros_esp_catalog.csv")
    );

    let args = ScrapeArgs {
        format: OutputFormat::Json,
        ..ScrapeArgs::default()
    };
    assert_eq!(
        output_path(&args, &catalog),
        PathBuf::from("penguinlibros_esp_catalog.json")
    );

    let args = ScrapeArgs {
        output: Some(PathBuf::from("/tmp/libros.csv")),
        ..ScrapeArgs::default()
    };
    assert_eq!(output_path(&args, &catalog), PathBuf::from("/tmp/libros.csv"));
}

#[test]
fn test_summary_line_reports_skips_and_early_stop() {
    let run = folio_core::CatalogRun {
        table: folio_core::ResultTable::new(),
        listed: 5,
        succeeded: 0,
        skipped: 2,
        stopped_early: true,
        failures: Vec::new(),
    };
    assert_eq!(
        summary_line(&run, &PathBuf::from("out.csv")),
        "5 listed, 0 scraped, 2 skipped, stopped early, saved to out.csv"
    );
}

// ============================================================================
// Handler Tests
// ============================================================================

async fn catalog_server() -> MockServer {
    let server = MockServer::start().await;
    let sitemap = format!(
        r#"<urlset><url><loc>{0}/rayuela.html</loc></url><url><loc>{0}/ficciones.html</loc></url></urlset>"#,
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&server)
        .await;
    for (page, title) in [("/rayuela.html", "Rayuela"), ("/ficciones.html", "Ficciones")] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<h1 class="h1 page-title">{}</h1><span class="product-price" itemprop="price">9,95 €</span>"#,
                title
            )))
            .mount(&server)
            .await;
    }
    server
}

#[tokio::test]
async fn test_handle_scrape_writes_table() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("catalog.json");

    let args = ScrapeArgs {
        sitemap_url: Some(Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap()),
        output: Some(output.clone()),
        format: OutputFormat::Json,
        // never trip on the host running the tests
        memory_threshold: 101.0,
        ..ScrapeArgs::default()
    };

    let run = handle_scrape(&args, true).await.unwrap();
    assert_eq!(run.succeeded, 2);
    assert_eq!(
        run.table.records()[1].get("title"),
        Some(&FieldValue::text("Ficciones"))
    );

    assert_eq!(
        summary_line(&run, &output),
        format!("2 listed, 2 scraped, 0 skipped, saved to {}", output.display())
    );

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written[0]["title"], "Rayuela");
    assert_eq!(written[0]["description"], "");
    assert_eq!(written[1]["price"], "9,95 €");
}

#[tokio::test]
async fn test_handle_scrape_sitemap_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let args = ScrapeArgs {
        sitemap_url: Some(Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap()),
        output: Some(dir.path().join("catalog.csv")),
        ..ScrapeArgs::default()
    };

    let err = handle_scrape(&args, true).await.unwrap_err();
    assert!(format!("{:#}", err).contains("404"));
    assert!(!dir.path().join("catalog.csv").exists());
}

#[tokio::test]
async fn test_handle_sitemap_with_limit() {
    let server = catalog_server().await;
    let args = ScrapeArgs {
        sitemap_url: Some(Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap()),
        limit: Some(1),
        ..ScrapeArgs::default()
    };

    let urls = handle_sitemap(&args).await.unwrap();
    assert_eq!(urls, vec![format!("{}/rayuela.html", server.uri())]);
}
