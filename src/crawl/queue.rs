// src/crawl/queue.rs
// =============================================================================
// Breadth-first crawl of one site, capped at a fixed number of pages.
//
// How it works:
// 1. Canonicalize the start URL
// 2. Check robots.txt once; stop right there if it disallows the start URL
// 3. Put the start URL in the frontier (a FIFO queue)
// 4. Take the oldest URL, fetch it, extract its data, record the page
// 5. If the page was fetched, queue its same-site links that are new
// 6. Repeat until the frontier is empty or max_pages pages are recorded
// 7. Summarize the recorded pages
//
// Rules that always hold:
// - one request at a time, with the polite delay before each one
// - a URL (by canonical form) is fetched at most once
// - a failed page is recorded and still uses up one slot of the page cap
// - whatever is left in the frontier when the cap is hit is dropped
// =============================================================================

use super::normalize::canonicalize;
use super::robots::check_robots;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError};
use crate::page::{extract_page, Fetcher, PageOutcome, PageRecord};
use crate::report::CrawlResult;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};
use url::Url;

/// Pending URLs plus everything already queued or visited
///
/// Lives for exactly one crawl; nothing is shared between crawls.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new(start_url: String) -> Self {
        let mut frontier = Self::default();
        frontier.push(start_url);
        frontier
    }

    /// Queues a canonical URL unless it was already queued or visited.
    /// Returns whether it was added.
    pub fn push(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Takes the oldest queued URL that has not been visited and marks it visited
    pub fn next_unvisited(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Runs crawls with one fixed configuration
///
/// Each call to `crawl` builds its own HTTP client and frontier, so one
/// Crawler can run several crawls at the same time.
#[derive(Debug, Clone, Default)]
pub struct Crawler {
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls the site of `start_url` and returns the full report
    pub async fn crawl(&self, start_url: &Url) -> CrawlResult {
        let start = canonicalize(start_url.clone());
        let start_key = start.to_string();

        let fetcher = match Fetcher::new(&self.config) {
            Ok(fetcher) => fetcher,
            Err(e) => return CrawlResult::aborted(start_key, &CrawlError::Client(e)),
        };

        if self.config.respect_robots {
            let verdict = check_robots(fetcher.client(), &start, &self.config.user_agent).await;
            if !verdict.allowed {
                warn!(robots_url = %verdict.robots_url, "start URL disallowed by robots.txt");
                let error = CrawlError::RobotsDisallowed {
                    robots_url: verdict.robots_url,
                };
                return CrawlResult::aborted(start_key, &error);
            }
        }

        let mut frontier = Frontier::new(start_key.clone());
        let mut pages: Vec<PageRecord> = Vec::new();

        while pages.len() < self.config.max_pages {
            let url = match frontier.next_unvisited() {
                Some(url) => url,
                None => break,
            };

            info!(%url, page = pages.len() + 1, "crawling");
            let record = visit(&fetcher, &url).await;

            match &record.outcome {
                PageOutcome::Fetched(content) => {
                    let added = content
                        .internal_links
                        .iter()
                        .filter(|link| frontier.push(link.to_string()))
                        .count();
                    debug!(%url, added, pending = frontier.pending(), "links queued");
                }
                PageOutcome::Failed(error) => {
                    warn!(%url, kind = error.kind(), error = %error, "page failed");
                }
            }

            pages.push(record);
        }

        if frontier.pending() > 0 {
            debug!(dropped = frontier.pending(), "page cap reached");
        }

        info!(url = %start_key, pages = pages.len(), "crawl finished");
        CrawlResult::from_pages(start_key, pages)
    }
}

/// Crawls one site with the given configuration
pub async fn crawl(start_url: &Url, config: &CrawlConfig) -> CrawlResult {
    Crawler::new(config.clone()).crawl(start_url).await
}

// Fetches and extracts one page. Never fails: errors become the record.
//
// The record keeps the requested URL, but relative links are resolved
// against where redirects ended up ("/blog" -> "/blog/" changes what
// "post-1" points to). Redirects to another host are ignored for link
// resolution so the crawl stays on the start site.
async fn visit(fetcher: &Fetcher, url: &str) -> PageRecord {
    let page_url = match Url::parse(url) {
        Ok(page_url) => page_url,
        Err(e) => return PageRecord::failed(url, FetchError::Other(e.to_string())),
    };

    match fetcher.fetch(url).await {
        Ok(fetched) => {
            let base = link_base(&page_url, &fetched.final_url);
            PageRecord::fetched(url, extract_page(&fetched.html, base, fetched.status_code))
        }
        Err(error) => PageRecord::failed(url, error),
    }
}

fn link_base<'a>(requested: &'a Url, final_url: &'a Url) -> &'a Url {
    let same_site = requested.host_str() == final_url.host_str()
        && requested.port_or_known_default() == final_url.port_or_known_default();
    if same_site {
        final_url
    } else {
        requested
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why both `queued` and `visited`?
//    - A link found on two different pages must only be queued once
//    - `visited` alone would let duplicates pile up in the queue until the
//      first copy is fetched
//
// 2. Why is the page cap checked before popping?
//    - So a failed page counts exactly like a successful one
//    - Links left in the queue are simply never fetched
//
// 3. Why not fetch several pages at once?
//    - Visit order is part of the output, and the target site gets one
//      request at a time. Parallelism happens across separate crawls
//      (see compare.rs), never inside one.
// -----------------------------------------------------------------------------
