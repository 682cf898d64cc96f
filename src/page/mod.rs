// src/page/mod.rs
// =============================================================================
// Everything about a single page: fetching it and pulling SEO data out of it.
//
// Submodules:
// - http: one polite, rate-limited GET with charset handling
// - html: turns the fetched HTML into a PageContent
//
// A visited page is either Fetched (with content) or Failed (with the
// error). Keeping those as two enum variants means a failed page can never
// carry half-filled content by accident. The JSON shape is still the flat
// record downstream consumers expect: a failed page serializes with empty
// lists, zero counts and a non-null "error".
// =============================================================================

mod html;
mod http;

pub use html::{extract_page, is_excluded_asset};
pub use http::{decode_body, Fetched, Fetcher};

use crate::error::FetchError;
use serde::{Serialize, Serializer};

/// SEO data extracted from one successfully fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub status_code: u16,
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
    /// Canonical same-site links, in the order they appear on the page
    pub internal_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Fetched(PageContent),
    Failed(FetchError),
}

/// One visited page. Immutable once it is added to the crawl's page list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Canonical URL that was requested
    pub url: String,
    pub outcome: PageOutcome,
}

impl PageRecord {
    pub fn fetched(url: impl Into<String>, content: PageContent) -> Self {
        Self {
            url: url.into(),
            outcome: PageOutcome::Fetched(content),
        }
    }

    pub fn failed(url: impl Into<String>, error: FetchError) -> Self {
        Self {
            url: url.into(),
            outcome: PageOutcome::Failed(error),
        }
    }

    pub fn content(&self) -> Option<&PageContent> {
        match &self.outcome {
            PageOutcome::Fetched(content) => Some(content),
            PageOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.outcome {
            PageOutcome::Fetched(_) => None,
            PageOutcome::Failed(error) => Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, PageOutcome::Fetched(_))
    }
}

// Flat JSON view of a PageRecord
#[derive(Serialize)]
struct PageRecordJson<'a> {
    url: &'a str,
    status_code: Option<u16>,
    title: Option<&'a str>,
    meta_description: Option<&'a str>,
    og_title: Option<&'a str>,
    canonical: Option<&'a str>,
    h1_tags: &'a [String],
    h2_tags: &'a [String],
    h3_tags: &'a [String],
    word_count: usize,
    has_mobile_friendly: bool,
    images_without_alt: usize,
    internal_links: &'a [String],
    internal_links_count: usize,
    error: Option<String>,
    error_kind: Option<&'static str>,
}

impl Serialize for PageRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = match &self.outcome {
            PageOutcome::Fetched(c) => PageRecordJson {
                url: &self.url,
                status_code: Some(c.status_code),
                title: c.title.as_deref(),
                meta_description: c.meta_description.as_deref(),
                og_title: c.og_title.as_deref(),
                canonical: c.canonical.as_deref(),
                h1_tags: &c.h1_tags,
                h2_tags: &c.h2_tags,
                h3_tags: &c.h3_tags,
                word_count: c.word_count,
                has_mobile_friendly: c.has_mobile_friendly,
                images_without_alt: c.images_without_alt,
                internal_links: &c.internal_links,
                internal_links_count: c.internal_links.len(),
                error: None,
                error_kind: None,
            },
            PageOutcome::Failed(e) => PageRecordJson {
                url: &self.url,
                status_code: None,
                title: None,
                meta_description: None,
                og_title: None,
                canonical: None,
                h1_tags: &[],
                h2_tags: &[],
                h3_tags: &[],
                word_count: 0,
                has_mobile_friendly: false,
                images_without_alt: 0,
                internal_links: &[],
                internal_links_count: 0,
                error: Some(e.describe()),
                error_kind: Some(e.kind()),
            },
        };
        json.serialize(serializer)
    }
}
