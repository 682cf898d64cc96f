// src/crawl/normalize.rs
// =============================================================================
// URL canonicalization.
//
// The canonical form is the key for the visited set and the frontier, and
// it is also the URL shown in the report. Two URLs that differ only by a
// trailing slash or a #fragment must map to the same canonical string,
// otherwise the crawler would fetch the same page twice.
//
// Rules:
// - the fragment is dropped
// - trailing slashes are removed from the path, except the root "/"
// - path case is preserved (servers route /Docs and /docs differently)
// - the query string is kept as-is
// - host lower-casing and default-port removal come from the url crate
// =============================================================================

use crate::error::CrawlError;
use url::Url;

/// Canonicalizes an absolute URL string
///
/// Relative input is an error: resolving against a base is the caller's job.
pub fn normalize(url: &str) -> Result<String, url::ParseError> {
    Ok(canonicalize(Url::parse(url)?).to_string())
}

/// Canonicalizes an already-parsed URL
pub fn canonicalize(mut url: Url) -> Url {
    url.set_fragment(None);

    if url.cannot_be_a_base() {
        return url;
    }

    let trimmed = url.path().trim_end_matches('/').to_string();
    if trimmed.is_empty() {
        url.set_path("/");
    } else {
        url.set_path(&trimmed);
    }

    url
}

/// Turns user input into a crawlable start URL
///
/// Input without an http:// or https:// prefix gets https:// in front of it,
/// so "example.com" and "https://example.com" crawl the same site.
pub fn prepare_url(input: &str) -> Result<Url, CrawlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CrawlError::InvalidUrl {
            input: input.to_string(),
            reason: "URL is empty".to_string(),
        });
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|e| CrawlError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none() {
        return Err(CrawlError::InvalidUrl {
            input: input.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    Ok(canonicalize(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_and_fragment_collapse() {
        let plain = normalize("https://a.com/x").unwrap();
        assert_eq!(normalize("https://a.com/x/").unwrap(), plain);
        assert_eq!(normalize("https://a.com/x#frag").unwrap(), plain);
        assert_eq!(normalize("https://a.com/x/#frag").unwrap(), plain);
        assert_eq!(plain, "https://a.com/x");
    }

    #[test]
    fn test_root_keeps_single_slash() {
        assert_eq!(normalize("https://a.com").unwrap(), "https://a.com/");
        assert_eq!(normalize("https://a.com/").unwrap(), "https://a.com/");
        assert_eq!(normalize("https://a.com//").unwrap(), "https://a.com/");
    }

    #[test]
    fn test_path_case_preserved_host_lowered() {
        assert_eq!(
            normalize("https://A.COM/Docs/Intro/").unwrap(),
            "https://a.com/Docs/Intro"
        );
    }

    #[test]
    fn test_query_kept() {
        assert_eq!(
            normalize("https://a.com/search/?q=rust#top").unwrap(),
            "https://a.com/search?q=rust"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://a.com",
            "https://a.com/x/",
            "https://a.com/x//#y",
            "http://a.com:8080/a/b/?c=d",
            "https://a.com/%C3%BC/",
        ];
        for input in inputs {
            let once = normalize(input).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {}", input);
        }
    }

    #[test]
    fn test_relative_input_rejected() {
        assert!(normalize("/just/a/path").is_err());
    }

    #[test]
    fn test_prepare_url_adds_https() {
        let url = prepare_url("  example.com/blog/ ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/blog");
    }

    #[test]
    fn test_prepare_url_keeps_http() {
        let url = prepare_url("http://example.com").unwrap();
        assert_eq!(url.as_str(), "http://example.com/");
    }

    #[test]
    fn test_prepare_url_rejects_empty() {
        assert!(matches!(
            prepare_url("   "),
            Err(CrawlError::InvalidUrl { .. })
        ));
    }
}
