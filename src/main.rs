// src/main.rs
// =============================================================================
// Entry point of the seo-crawler command-line tool.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so JSON on stdout stays clean)
// 3. Run the crawl(s) through the seo_crawler library
// 4. Print a table or JSON
// 5. Exit with a proper code (0 = ok, 1 = crawl could not run, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs};
use seo_crawler::{Comparison, CrawlResult, Crawler, IssueLevel};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise info, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Analyze { url, crawl } => handle_analyze(&url, &crawl).await,
        Commands::Compare {
            url,
            competitors,
            crawl,
        } => handle_compare(&url, &competitors, &crawl).await,
    }
}

async fn handle_analyze(url: &str, args: &CrawlArgs) -> Result<i32> {
    let crawler = Crawler::new(args.to_config()?);
    let result = crawler.crawl_input(url).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }

    Ok(if result.is_ok() { 0 } else { 1 })
}

async fn handle_compare(url: &str, competitors: &[String], args: &CrawlArgs) -> Result<i32> {
    let crawler = Crawler::new(args.to_config()?);
    let comparison = crawler.compare(url, competitors).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        print_comparison(&comparison);
    }

    Ok(if comparison.site.is_ok() { 0 } else { 1 })
}

// Cuts long URLs so the table columns stay aligned
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn print_report(result: &CrawlResult) {
    println!("🔍 {}", result.url);

    if let Some(error) = &result.error {
        println!("❌ {}", error);
        if result.pages.is_empty() {
            return;
        }
    }

    println!();
    println!("{:<60} {:<8} {:<8} {:<6}", "PAGE", "STATUS", "WORDS", "H1");
    println!("{}", "=".repeat(85));

    for page in &result.pages {
        match page.content() {
            Some(content) => println!(
                "{:<60} {:<8} {:<8} {:<6}",
                fit(&page.url, 57),
                content.status_code,
                content.word_count,
                content.h1_tags.len()
            ),
            None => println!(
                "{:<60} {}",
                fit(&page.url, 57),
                page.error().map(|e| e.describe()).unwrap_or_default()
            ),
        }
    }

    let summary = &result.summary;
    println!();
    println!("📊 Summary:");
    println!("   📄 Pages crawled: {}", summary.total_pages_crawled);
    println!("   ✅ Successful: {}", summary.successful_pages);
    println!("   ❌ Failed: {}", summary.error_pages);
    println!("   📝 Average words per page: {}", summary.avg_word_count);

    println!();
    if summary.issues.is_empty() {
        println!("✅ No issues found");
        return;
    }

    println!("⚠️  Issues:");
    for issue in &summary.issues {
        let marker = match issue.level {
            IssueLevel::Red => "🔴",
            IssueLevel::Orange => "🟠",
        };
        println!("   {} {}", marker, issue.text);
        for page in &issue.pages {
            println!("      - {}", page);
        }
    }
}

fn print_comparison(comparison: &Comparison) {
    println!(
        "{:<40} {:<7} {:<7} {:<8} {:<8} {:<8}",
        "SITE", "TITLE", "META", "WORDS", "MOBILE", "NO ALT"
    );
    println!("{}", "=".repeat(82));

    let rows = std::iter::once(&comparison.site).chain(comparison.competitors.iter());
    for result in rows {
        if let Some(error) = &result.error {
            println!("{:<40} ❌ {}", fit(&result.url, 37), error);
            continue;
        }

        let yes_no = |present: bool| if present { "yes" } else { "no" };
        println!(
            "{:<40} {:<7} {:<7} {:<8} {:<8} {:<8}",
            fit(&result.url, 37),
            yes_no(result.title.is_some()),
            yes_no(result.meta_description.is_some()),
            result.word_count,
            yes_no(result.has_mobile_friendly),
            result.summary.total_images_without_alt
        );
    }
}
