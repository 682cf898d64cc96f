// src/crawl/compare.rs
// =============================================================================
// Crawls a site and its competitors side by side.
//
// Every site gets its own independent crawl (own HTTP client, own frontier,
// own robots check), so the crawls can run concurrently without sharing
// anything. Inside each crawl, pages are still fetched one at a time.
// =============================================================================

use super::normalize::prepare_url;
use super::queue::Crawler;
use crate::report::{Comparison, CrawlResult};
use futures::future::join_all;
use tracing::info;

impl Crawler {
    /// Crawls raw user input (scheme optional). Bad input becomes an
    /// errored CrawlResult instead of a panic or an Err.
    pub async fn crawl_input(&self, input: &str) -> CrawlResult {
        match prepare_url(input) {
            Ok(url) => self.crawl(&url).await,
            Err(e) => CrawlResult::aborted(input.trim(), &e),
        }
    }

    /// Crawls `site` and every non-blank entry of `competitors` concurrently.
    /// Competitor results keep the input order.
    pub async fn compare(&self, site: &str, competitors: &[String]) -> Comparison {
        let competitors: Vec<&str> = competitors
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();

        info!(site, competitors = competitors.len(), "starting comparison");

        let (site, competitors) = futures::join!(
            self.crawl_input(site),
            join_all(competitors.iter().map(|c| self.crawl_input(c)))
        );

        Comparison { site, competitors }
    }
}
