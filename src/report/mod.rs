// src/report/mod.rs
// =============================================================================
// The crawl report handed back to callers.
//
// CrawlResult's JSON field names are a contract: prompt builders and API
// handlers read them directly, so renaming a field here breaks them.
//
// The top-level fields (title, meta_description, h1_tags, ...) mirror the
// first page of the crawl, which is the start URL. "error" is only set when
// the crawl never really started: robots.txt said no, the URL was unusable,
// or the start page itself failed.
// =============================================================================

mod summary;

pub use summary::{summarize, Issue, IssueLevel, Summary, LOW_CONTENT_THRESHOLD};

use crate::error::CrawlError;
use crate::page::{PageOutcome, PageRecord};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlResult {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub canonical: Option<String>,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub h3_tags: Vec<String>,
    pub word_count: usize,
    pub has_mobile_friendly: bool,
    pub images_without_alt: usize,
    pub pages: Vec<PageRecord>,
    pub summary: Summary,
    pub error: Option<String>,
}

impl CrawlResult {
    /// A crawl that stopped before fetching anything
    pub fn aborted(url: impl Into<String>, error: &CrawlError) -> Self {
        Self {
            url: url.into(),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    /// Assembles the report from the pages in visit order
    pub fn from_pages(url: impl Into<String>, pages: Vec<PageRecord>) -> Self {
        let summary = summarize(&pages);
        let mut result = Self {
            url: url.into(),
            summary,
            ..Default::default()
        };

        match pages.first().map(|page| &page.outcome) {
            Some(PageOutcome::Fetched(home)) => {
                result.title = home.title.clone();
                result.meta_description = home.meta_description.clone();
                result.og_title = home.og_title.clone();
                result.canonical = home.canonical.clone();
                result.h1_tags = home.h1_tags.clone();
                result.h2_tags = home.h2_tags.clone();
                result.h3_tags = home.h3_tags.clone();
                result.word_count = home.word_count;
                result.has_mobile_friendly = home.has_mobile_friendly;
                result.images_without_alt = home.images_without_alt;
            }
            Some(PageOutcome::Failed(error)) => {
                result.error = Some(error.describe());
            }
            None => {}
        }

        result.pages = pages;
        result
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A site crawled alongside its competitors
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub site: CrawlResult,
    pub competitors: Vec<CrawlResult>,
}
