// src/lib.rs
// =============================================================================
// seo-crawler: crawls a handful of pages of a website and reports on-page
// SEO problems (missing titles, missing meta descriptions, H1 problems,
// images without alt text, pages that are not mobile friendly, thin content).
//
// Typical use:
//
//   let crawler = Crawler::new(CrawlConfig::default());
//   let result = crawler.crawl(&url).await;   // CrawlResult, never panics
//
// Modules:
// - config: CrawlConfig (page cap, timeout, polite delay, user agent)
// - crawl: URL canonicalization, robots.txt, the breadth-first crawler
// - page: fetching one page and extracting its SEO data
// - report: the CrawlResult and its cross-page summary
// - error: FetchError (per page) and CrawlError (whole crawl)
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod page;
pub mod report;

pub use config::CrawlConfig;
pub use crawl::{crawl, normalize, prepare_url, Crawler};
pub use error::{CrawlError, FetchError};
pub use page::{PageContent, PageOutcome, PageRecord};
pub use report::{Comparison, CrawlResult, Issue, IssueLevel, Summary};
