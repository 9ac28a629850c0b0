// src/main.rs
// =============================================================================
// This is the entry point of the crawler CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so --json output on stdout stays clean)
// 3. Run the crawl, cancelling it cooperatively on Ctrl-C
// 4. Print the per-page results
// 5. Exit with proper code (0 = all pages ok, 1 = some pages failed, 2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod fetch;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use crawl::{CrawlReport, Crawler, PageOutcome, Scope};
use fetch::HttpFetcher;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.crawl_config();
    // The client needs the scope up front so redirects can't leave the site
    let (scope, _) = Scope::from_seed(&config.seed)?;
    let fetcher =
        HttpFetcher::new(config.request_timeout, scope).context("Failed to create HTTP client")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, letting in-flight pages finish");
            on_interrupt.cancel();
        }
    });

    let report = Crawler::new(config, Arc::new(fetcher)).run(cancel).await?;

    print_report(&report, cli.json)?;

    if report.failed_count() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// RUST_LOG wins when set; otherwise info, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "site_crawler=debug,warn"
    } else {
        "site_crawler=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &CrawlReport) {
    println!("{:<6} {:<70} {:<30}", "DEPTH", "URL", "OUTCOME");
    println!("{}", "=".repeat(106));

    for page in report.sorted_pages() {
        // Truncate on a char boundary so multi-byte URLs don't panic
        let url_display = if page.url.chars().count() > 67 {
            let cut: String = page.url.chars().take(67).collect();
            format!("{}...", cut)
        } else {
            page.url.clone()
        };

        println!(
            "{:<6} {:<70} {:<30}",
            page.depth,
            url_display,
            format_outcome(&page.outcome)
        );
    }

    println!();

    let failed = report.failed_count();
    println!("Summary for {}:", report.seed);
    println!("   OK: {}", report.pages.len() - failed);
    println!("   Failed: {}", failed);
    println!("   Total: {}", report.pages.len());
}

fn format_outcome(outcome: &PageOutcome) -> String {
    match outcome {
        PageOutcome::Success {
            links_found,
            links_followed,
        } => format!("OK ({} links, {} followed)", links_found, links_followed),
        PageOutcome::FetchError { message } => format!("FETCH ERROR: {}", message),
        PageOutcome::ParseError { message } => format!("PARSE ERROR: {}", message),
    }
}
