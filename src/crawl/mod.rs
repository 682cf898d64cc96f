// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - URL canonicalization, so trailing slashes and #fragments never cause a
//   page to be fetched twice
// - One robots.txt check per crawl, failing open when robots.txt is missing
//   or unreachable
// - Breadth-first crawling of same-site links, bounded by a page cap
// - Concurrent crawls of a site and its competitors
// =============================================================================

mod compare;
mod normalize;
mod queue;
mod robots;

pub use normalize::{canonicalize, normalize, prepare_url};
pub use queue::{crawl, Crawler, Frontier};
pub use robots::{check_robots, robots_url_for, RobotsVerdict};
