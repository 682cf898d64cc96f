// src/page/html.rs
// =============================================================================
// Extracts on-page SEO data from fetched HTML.
//
// We use the `scraper` crate, which parses with html5ever. html5ever never
// fails: broken markup is repaired the same way a browser would repair it,
// so extraction never fails either. Missing elements simply leave their
// field empty.
//
// What we pull out of each page:
// - <title>, meta description (falling back to og:description), og:title,
//   <link rel="canonical">
// - text of every h1, h2 and h3, in document order
// - number of words of visible text inside <body>
// - whether a viewport meta tag makes the page mobile friendly
// - how many <img> tags have no usable alt text
// - same-site links, canonicalized, for the crawler to follow
// =============================================================================

use super::PageContent;
use crate::crawl::canonicalize;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

// File extensions that are never HTML pages worth crawling
const EXCLUDED_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "tif", "tiff", "avif",
    // icons
    "ico",
    // archives
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz",
    // stylesheets and scripts
    "css", "js", "mjs",
    // video
    "mp4", "webm", "avi", "mov", "mkv", "wmv", "flv", "m4v",
    // feeds and sitemaps
    "xml",
];

// Text inside these elements is not visible page content
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

// Builds a selector from a constant string.
// These selectors are fixed and known to be valid, so a failure here is a
// programmer error.
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Parses `html` (fetched from `page_url`) into a PageContent
pub fn extract_page(html: &str, page_url: &Url, status_code: u16) -> PageContent {
    let document = Html::parse_document(html);

    let meta_description = meta_content(&document, "name", "description")
        .or_else(|| meta_content(&document, "property", "og:description"));

    PageContent {
        status_code,
        title: first_text(&document, "title"),
        meta_description,
        og_title: meta_content(&document, "property", "og:title"),
        canonical: canonical_link(&document),
        h1_tags: heading_texts(&document, "h1"),
        h2_tags: heading_texts(&document, "h2"),
        h3_tags: heading_texts(&document, "h3"),
        word_count: body_word_count(&document),
        has_mobile_friendly: is_mobile_friendly(&document),
        images_without_alt: images_without_alt(&document),
        internal_links: internal_links(&document, page_url),
    }
}

// Collapses runs of whitespace inside an element's text into single spaces
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    document
        .select(&selector(css))
        .next()
        .and_then(|element| non_empty(&element_text(element)))
}

// Content of the first <meta> whose `attr` equals `value` (case-insensitive).
// Only the first matching tag counts, even if its content is empty.
fn meta_content(document: &Html, attr: &str, value: &str) -> Option<String> {
    document
        .select(&selector("meta"))
        .find(|meta| {
            meta.value()
                .attr(attr)
                .map_or(false, |v| v.trim().eq_ignore_ascii_case(value))
        })
        .and_then(|meta| meta.value().attr("content"))
        .and_then(non_empty)
}

fn canonical_link(document: &Html) -> Option<String> {
    document
        .select(&selector("link[rel][href]"))
        .find(|link| {
            link.value().attr("rel").map_or(false, |rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|link| link.value().attr("href"))
        .and_then(non_empty)
}

fn heading_texts(document: &Html, tag: &str) -> Vec<String> {
    document
        .select(&selector(tag))
        .filter_map(|heading| non_empty(&element_text(heading)))
        .collect()
}

// Counts whitespace-separated words in the text nodes under <body>,
// skipping script/style content
fn body_word_count(document: &Html) -> usize {
    let body = match document.select(&selector("body")).next() {
        Some(body) => body,
        None => return 0,
    };

    body.descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .map_or(false, |e| INVISIBLE_ELEMENTS.contains(&e.name()))
                });
                if hidden {
                    None
                } else {
                    Some(text.split_whitespace().count())
                }
            }
            _ => None,
        })
        .sum()
}

// A page is mobile friendly when its viewport sets a width and does not
// turn off pinch zoom
fn is_mobile_friendly(document: &Html) -> bool {
    document
        .select(&selector("meta"))
        .find(|meta| {
            meta.value()
                .attr("name")
                .map_or(false, |name| name.trim().eq_ignore_ascii_case("viewport"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map_or(false, |content| {
            let directives: String = content
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();

            let sets_width = directives.contains("width=");
            let blocks_zoom = directives.contains("user-scalable=no")
                || directives.contains("user-scalable=0");

            sets_width && !blocks_zoom
        })
}

fn images_without_alt(document: &Html) -> usize {
    document
        .select(&selector("img"))
        .filter(|img| img.value().attr("alt").map_or(true, |alt| alt.trim().is_empty()))
        .count()
}

/// True when the URL path ends in an image, archive, script, style,
/// video, icon or XML extension
pub fn is_excluded_asset(url: &Url) -> bool {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((_, extension)) => {
            EXCLUDED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        }
        None => false,
    }
}

// Same-site page links, canonicalized and deduplicated in page order
fn internal_links(document: &Html, page_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&selector("a[href]")) {
        let href = match anchor.value().attr("href") {
            Some(href) => href.trim(),
            None => continue,
        };

        let link = match resolve_internal(page_url, href) {
            Some(link) => link,
            None => continue,
        };

        let canonical = canonicalize(link).to_string();
        if seen.insert(canonical.clone()) {
            links.push(canonical);
        }
    }

    links
}

// Resolves an href against the page and keeps it only if it points to
// another crawlable page on the same host
fn resolve_internal(page_url: &Url, href: &str) -> Option<Url> {
    let lower = href.to_ascii_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("javascript:")
    {
        return None;
    }

    let link = page_url.join(href).ok()?;

    let crawlable_scheme = link.scheme() == "http" || link.scheme() == "https";
    let same_host = link.host_str() == page_url.host_str() && link.port() == page_url.port();

    if crawlable_scheme && same_host && !is_excluded_asset(&link) {
        Some(link)
    } else {
        None
    }
}
