// src/crawl/robots.rs
// =============================================================================
// robots.txt check, done once per crawl against the start URL.
//
// The rule that matters most here: if robots.txt cannot be fetched (network
// error, timeout, non-2xx answer, unreadable body) the crawl is ALLOWED.
// Only a robots.txt we actually read and that disallows the start URL stops
// the crawl.
//
// Matching is done by the robotstxt crate (a port of Google's parser), so
// wildcard and longest-match rules behave like they do for Googlebot.
// =============================================================================

use reqwest::Client;
use robotstxt::DefaultMatcher;
use tracing::{debug, warn};
use url::Url;

/// Result of the robots.txt check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsVerdict {
    pub allowed: bool,
    pub robots_url: String,
}

/// `{scheme}://{host}[:port]/robots.txt` for the site of `base`
pub fn robots_url_for(base: &Url) -> String {
    match base.join("/robots.txt") {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}://{}/robots.txt", base.scheme(), base.host_str().unwrap_or("")),
    }
}

/// Fetches robots.txt for `base_url` and asks whether `user_agent` may fetch it
pub async fn check_robots(client: &Client, base_url: &Url, user_agent: &str) -> RobotsVerdict {
    let robots_url = robots_url_for(base_url);

    let body = match fetch_robots(client, &robots_url).await {
        Some(body) => body,
        None => {
            return RobotsVerdict {
                allowed: true,
                robots_url,
            }
        }
    };

    let agent = agent_token(user_agent);
    let mut matcher = DefaultMatcher::default();
    let allowed = matcher.one_agent_allowed_by_robots(&body, agent, base_url.as_str());
    debug!(%robots_url, agent, allowed, "robots.txt evaluated");

    RobotsVerdict {
        allowed,
        robots_url,
    }
}

/// Product token robots.txt groups are matched against:
/// "Mozilla/5.0 (Windows NT ...)" becomes "Mozilla"
pub fn agent_token(user_agent: &str) -> &str {
    let end = user_agent
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_' || c == '-'))
        .unwrap_or(user_agent.len());
    if end == 0 {
        "*"
    } else {
        &user_agent[..end]
    }
}

// None means "could not read it" and the caller fails open
async fn fetch_robots(client: &Client, robots_url: &str) -> Option<String> {
    let response = match client.get(robots_url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(%robots_url, error = %e, "robots.txt unreachable, continuing");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(%robots_url, status = response.status().as_u16(), "no robots.txt, continuing");
        return None;
    }

    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!(%robots_url, error = %e, "robots.txt body unreadable, continuing");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const AGENT: &str = "Mozilla/5.0 (compatible; TestBot)";

    #[test]
    fn test_robots_url_drops_path_and_query() {
        let base = Url::parse("https://example.com/blog/post?id=3").unwrap();
        assert_eq!(robots_url_for(&base), "https://example.com/robots.txt");
    }

    #[test]
    fn test_robots_url_keeps_port() {
        let base = Url::parse("http://127.0.0.1:8080/a").unwrap();
        assert_eq!(robots_url_for(&base), "http://127.0.0.1:8080/robots.txt");
    }

    #[test]
    fn test_agent_token() {
        assert_eq!(agent_token(crate::config::USER_AGENT), "Mozilla");
        assert_eq!(agent_token("seo-bot/1.0"), "seo-bot");
        assert_eq!(agent_token("/weird"), "*");
    }

    #[tokio::test]
    async fn test_group_for_named_agent() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/robots.txt")
            .with_status(200)
            .with_body("User-agent: Mozilla\nDisallow: /\n\nUser-agent: *\nAllow: /\n")
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        let verdict = check_robots(&Client::new(), &base, AGENT).await;
        assert!(!verdict.allowed);
    }

    #[tokio::test]
    async fn test_disallow_all() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/robots.txt")
            .with_status(200)
            .with_body("User-agent: *\nDisallow: /\n")
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        let verdict = check_robots(&Client::new(), &base, AGENT).await;

        assert!(!verdict.allowed);
        assert_eq!(verdict.robots_url, format!("{}/robots.txt", server.url()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_disallow_other_path_allows_start() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/robots.txt")
            .with_status(200)
            .with_body("User-agent: *\nDisallow: /private\n")
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        let verdict = check_robots(&Client::new(), &base, AGENT).await;
        assert!(verdict.allowed);
    }

    #[tokio::test]
    async fn test_missing_robots_allows() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/robots.txt")
            .with_status(404)
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        let verdict = check_robots(&Client::new(), &base, AGENT).await;
        assert!(verdict.allowed);
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_open() {
        // Nothing listens on port 1
        let base = Url::parse("http://127.0.0.1:1/").unwrap();
        let verdict = check_robots(&Client::new(), &base, AGENT).await;
        assert!(verdict.allowed);
        assert_eq!(verdict.robots_url, "http://127.0.0.1:1/robots.txt");
    }
}
