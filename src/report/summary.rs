// src/report/summary.rs
// =============================================================================
// Cross-page statistics and SEO issues for one finished crawl.
//
// summarize() is a pure function of the page list: it runs once, after the
// crawl is over, and never looks at the network.
//
// Issues are produced by fixed rules, always checked in the same order.
// The order is the display order, not a severity ranking:
//   1. multiple H1 on a page            (orange, lists pages)
//   2. images without alt text          (orange, count only)
//   3. missing <title>                  (red, lists pages)
//   4. missing meta description         (orange, lists pages)
//   5. missing H1                       (orange, lists pages)
//   6. not mobile friendly              (red, lists pages)
//   7. average word count below 300     (orange, aggregate only)
// =============================================================================

use crate::page::{PageContent, PageRecord};
use serde::Serialize;

/// Pages averaging fewer words than this get the thin-content issue
pub const LOW_CONTENT_THRESHOLD: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Red,
    Orange,
}

/// A rule-triggered SEO finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub level: IssueLevel,
    pub text: String,
    /// Affected pages; empty for count-only and aggregate issues
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_pages_crawled: usize,
    pub successful_pages: usize,
    pub error_pages: usize,
    pub avg_word_count: usize,
    pub total_images_without_alt: usize,
    pub pages_missing_title: Vec<String>,
    pub pages_missing_meta: Vec<String>,
    pub pages_missing_h1: Vec<String>,
    pub pages_with_multiple_h1: Vec<String>,
    pub pages_not_mobile_friendly: Vec<String>,
    pub issues: Vec<Issue>,
}

/// Builds the summary for a completed crawl
pub fn summarize(pages: &[PageRecord]) -> Summary {
    let successful: Vec<(&str, &PageContent)> = pages
        .iter()
        .filter_map(|page| page.content().map(|content| (page.url.as_str(), content)))
        .collect();

    let urls_where = |predicate: fn(&PageContent) -> bool| -> Vec<String> {
        successful
            .iter()
            .filter(|(_, content)| predicate(content))
            .map(|(url, _)| url.to_string())
            .collect()
    };

    let total_words: usize = successful.iter().map(|(_, c)| c.word_count).sum();
    let avg_word_count = if successful.is_empty() {
        0
    } else {
        (total_words as f64 / successful.len() as f64).round() as usize
    };

    let mut summary = Summary {
        total_pages_crawled: pages.len(),
        successful_pages: successful.len(),
        error_pages: pages.len() - successful.len(),
        avg_word_count,
        total_images_without_alt: successful.iter().map(|(_, c)| c.images_without_alt).sum(),
        pages_missing_title: urls_where(|c| c.title.is_none()),
        pages_missing_meta: urls_where(|c| c.meta_description.is_none()),
        pages_missing_h1: urls_where(|c| c.h1_tags.is_empty()),
        pages_with_multiple_h1: urls_where(|c| c.h1_tags.len() > 1),
        pages_not_mobile_friendly: urls_where(|c| !c.has_mobile_friendly),
        issues: Vec::new(),
    };

    summary.issues = build_issues(&summary);
    summary
}

fn build_issues(summary: &Summary) -> Vec<Issue> {
    let mut issues = Vec::new();

    push_listed(
        &mut issues,
        IssueLevel::Orange,
        &summary.pages_with_multiple_h1,
        "with more than one H1 tag",
    );

    if summary.total_images_without_alt > 0 {
        let n = summary.total_images_without_alt;
        issues.push(Issue {
            level: IssueLevel::Orange,
            text: format!(
                "{} image{} missing alt text",
                n,
                if n == 1 { " is" } else { "s are" }
            ),
            pages: Vec::new(),
        });
    }

    push_listed(
        &mut issues,
        IssueLevel::Red,
        &summary.pages_missing_title,
        "missing a title",
    );
    push_listed(
        &mut issues,
        IssueLevel::Orange,
        &summary.pages_missing_meta,
        "missing a meta description",
    );
    push_listed(
        &mut issues,
        IssueLevel::Orange,
        &summary.pages_missing_h1,
        "missing an H1 heading",
    );
    push_listed(
        &mut issues,
        IssueLevel::Red,
        &summary.pages_not_mobile_friendly,
        "not mobile friendly",
    );

    // Also fires when no page could be read: the average is then 0
    if summary.avg_word_count < LOW_CONTENT_THRESHOLD {
        issues.push(Issue {
            level: IssueLevel::Orange,
            text: format!(
                "Average page content is thin ({} words per page)",
                summary.avg_word_count
            ),
            pages: Vec::new(),
        });
    }

    issues
}

// Adds an issue that lists its pages, if there are any
fn push_listed(issues: &mut Vec<Issue>, level: IssueLevel, pages: &[String], what: &str) {
    if pages.is_empty() {
        return;
    }
    issues.push(Issue {
        level,
        text: format!("{} {}", pages_phrase(pages.len()), what),
        pages: pages.to_vec(),
    });
}

// "1 page" / "3 pages"
fn pages_phrase(count: usize) -> String {
    if count == 1 {
        "1 page".to_string()
    } else {
        format!("{} pages", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    // A page with no SEO problems and a chosen word count
    fn healthy(url: &str, word_count: usize) -> PageRecord {
        PageRecord::fetched(
            url,
            PageContent {
                status_code: 200,
                title: Some("Title".to_string()),
                meta_description: Some("Description".to_string()),
                h1_tags: vec!["Heading".to_string()],
                word_count,
                has_mobile_friendly: true,
                ..Default::default()
            },
        )
    }

    fn issue_texts(summary: &Summary) -> Vec<&str> {
        summary.issues.iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn test_two_h1_and_missing_alt() {
        let mut page = healthy("https://example.com/", 500);
        if let crate::page::PageOutcome::Fetched(content) = &mut page.outcome {
            content.h1_tags.push("Second".to_string());
            content.images_without_alt = 1;
        }

        let summary = summarize(&[page]);

        assert_eq!(summary.issues.len(), 2);
        assert_eq!(summary.issues[0].level, IssueLevel::Orange);
        assert_eq!(summary.issues[0].pages, vec!["https://example.com/"]);
        assert!(summary.issues[0].text.contains("more than one H1"));
        assert_eq!(summary.issues[1].text, "1 image is missing alt text");
        assert!(summary.issues[1].pages.is_empty());
    }

    #[test]
    fn test_healthy_site_has_no_issues() {
        let summary = summarize(&[healthy("https://example.com/", 800)]);
        assert!(summary.issues.is_empty(), "{:?}", issue_texts(&summary));
    }

    #[test]
    fn test_low_content_threshold_is_strict() {
        let summary = summarize(&[healthy("https://example.com/", 250)]);
        assert_eq!(summary.avg_word_count, 250);
        assert!(issue_texts(&summary)
            .iter()
            .any(|t| t.starts_with("Average page content is thin")));

        let summary = summarize(&[healthy("https://example.com/", 300)]);
        assert!(summary.issues.is_empty());
    }

    #[test]
    fn test_average_rounds() {
        let summary = summarize(&[
            healthy("https://example.com/a", 300),
            healthy("https://example.com/b", 301),
        ]);
        // 300.5 rounds up
        assert_eq!(summary.avg_word_count, 301);
    }

    #[test]
    fn test_error_pages_excluded_from_stats() {
        let pages = vec![
            healthy("https://example.com/", 400),
            PageRecord::failed("https://example.com/down", FetchError::Http { status: 500 }),
        ];
        let summary = summarize(&pages);

        assert_eq!(summary.total_pages_crawled, 2);
        assert_eq!(summary.successful_pages, 1);
        assert_eq!(summary.error_pages, 1);
        assert_eq!(summary.avg_word_count, 400);
        assert!(summary.pages_missing_title.is_empty());
        assert!(summary.issues.is_empty());
    }

    #[test]
    fn test_issue_order_and_levels() {
        let bare = PageRecord::fetched(
            "https://example.com/bare",
            PageContent {
                status_code: 200,
                word_count: 10,
                images_without_alt: 3,
                ..Default::default()
            },
        );
        let summary = summarize(&[bare]);

        let levels: Vec<IssueLevel> = summary.issues.iter().map(|i| i.level).collect();
        assert_eq!(
            levels,
            vec![
                IssueLevel::Orange, // images without alt
                IssueLevel::Red,    // missing title
                IssueLevel::Orange, // missing meta
                IssueLevel::Orange, // missing h1
                IssueLevel::Red,    // not mobile friendly
                IssueLevel::Orange, // thin content
            ]
        );
        assert_eq!(summary.issues[0].text, "3 images are missing alt text");
        assert_eq!(summary.issues[1].text, "1 page missing a title");
    }

    #[test]
    fn test_no_pages_only_thin_content() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_pages_crawled, 0);
        assert_eq!(summary.avg_word_count, 0);
        assert_eq!(summary.issues.len(), 1);
        assert!(summary.issues[0].text.starts_with("Average page content is thin"));
    }

    #[test]
    fn test_all_pages_failed_reports_thin_content() {
        let pages = vec![
            PageRecord::failed(
                "https://example.com/",
                FetchError::Connection("connection refused".to_string()),
            ),
            PageRecord::failed("https://example.com/a", FetchError::Http { status: 503 }),
        ];
        let summary = summarize(&pages);

        assert_eq!(summary.successful_pages, 0);
        assert_eq!(summary.error_pages, 2);
        assert_eq!(summary.avg_word_count, 0);
        assert_eq!(
            summary.issues,
            vec![Issue {
                level: IssueLevel::Orange,
                text: "Average page content is thin (0 words per page)".to_string(),
                pages: Vec::new(),
            }]
        );
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_value(IssueLevel::Red).unwrap();
        assert_eq!(json, "red");
    }
}
