// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - analyze: crawl one site and report its SEO issues
// - compare: crawl a site and its competitors at the same time
//
// Both share the same crawl options (page cap, delay, timeout, robots,
// config file), which live in CrawlArgs and are flattened into each
// subcommand.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use seo_crawler::CrawlConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "seo-crawler",
    version = "0.1.0",
    about = "Crawl a few pages of a website and report on-page SEO issues",
    long_about = "seo-crawler visits up to a handful of pages of a website (breadth-first, \
                  same site only, honoring robots.txt) and reports missing titles, meta \
                  descriptions and H1 headings, images without alt text, pages that are not \
                  mobile friendly and thin content."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logs (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and report its SEO issues
    ///
    /// Example: seo-crawler analyze example.com
    Analyze {
        /// Website URL (https:// is assumed when no scheme is given)
        url: String,

        #[command(flatten)]
        crawl: CrawlArgs,
    },

    /// Crawl a website and its competitors side by side
    ///
    /// Example: seo-crawler compare example.com rival-one.com rival-two.com
    Compare {
        /// Your website URL
        url: String,

        /// Competitor website URLs
        #[arg(required = true)]
        competitors: Vec<String>,

        #[command(flatten)]
        crawl: CrawlArgs,
    },
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of pages to fetch per site
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Pause before each page request, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Skip the robots.txt check
    #[arg(long)]
    pub ignore_robots: bool,

    /// JSON config file; flags given on the command line win over it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CrawlArgs {
    /// Builds the crawl configuration: defaults, then the config file,
    /// then command-line flags
    pub fn to_config(&self) -> anyhow::Result<CrawlConfig> {
        let mut config = match &self.config {
            Some(path) => CrawlConfig::from_file(path)?,
            None => CrawlConfig::default(),
        };

        if let Some(max_pages) = self.max_pages {
            config = config.with_max_pages(max_pages);
        }
        if let Some(delay_ms) = self.delay_ms {
            config = config.with_request_delay(Duration::from_millis(delay_ms));
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(timeout_secs));
        }
        if self.ignore_robots {
            config = config.with_respect_robots(false);
        }

        Ok(config)
    }
}
