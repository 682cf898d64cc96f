// src/page/http.rs
// =============================================================================
// Fetches one page over HTTP.
//
// Every fetch:
// - waits the configured polite delay first (1s by default)
// - sends a desktop browser User-Agent
// - follows redirects
// - gives up after the configured timeout (15s by default)
//
// Failures are sorted into the four FetchError categories (timeout,
// connection, HTTP status, other) so the crawler can record them without
// string matching.
//
// Character encoding:
// The body is read as raw bytes and decoded here instead of trusting
// reqwest's text(). The charset parameter of Content-Type wins. Without it
// we guess: byte order mark, then "is it valid UTF-8?", then a
// <meta charset> near the top of the document, then windows-1252.
// =============================================================================

use crate::config::CrawlConfig;
use crate::error::FetchError;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use mime::Mime;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::debug;
use url::Url;

// How far into the document we look for <meta charset>
const META_SNIFF_BYTES: usize = 1024;

/// A successfully fetched page, already decoded to text
#[derive(Debug, Clone)]
pub struct Fetched {
    pub html: String,
    pub status_code: u16,
    /// Where the request ended up after redirects
    pub final_url: Url,
}

/// HTTP client plus politeness settings for one crawl
///
/// Each crawl builds its own Fetcher, so connection pools are never shared
/// between crawls.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    delay: Duration,
}

impl Fetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            delay: config.request_delay,
        })
    }

    /// The underlying client, shared with the robots.txt check
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Waits the polite delay, then GETs `url`
    pub async fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let status = response.status();
        let final_url = response.url().clone();
        if !(status.is_success() || status.is_redirection()) {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        Ok(Fetched {
            html: decode_body(&bytes, content_type.as_deref()),
            status_code: status.as_u16(),
            final_url,
        })
    }
}

/// Decodes a response body using the header charset, or a best guess
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .unwrap_or_else(|| guess_encoding(bytes));

    debug!(encoding = encoding.name(), "decoding page body");

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let parsed: Mime = content_type.parse().ok()?;
    let label = parsed.get_param(mime::CHARSET)?;
    Encoding::for_label(label.as_str().as_bytes())
}

fn guess_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    sniff_meta_charset(bytes).unwrap_or(WINDOWS_1252)
}

// Finds charset=... in the first bytes of the document. Covers both
// <meta charset="x"> and <meta http-equiv content="text/html; charset=x">.
fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(|c: char| c == '"' || c == '\'')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();

    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::io::Write;

    fn test_config() -> CrawlConfig {
        CrawlConfig::default()
            .with_request_delay(Duration::ZERO)
            .with_request_timeout(Duration::from_secs(5))
    }

    #[test]
    fn test_decode_header_charset_wins() {
        // 0xFE is "ş" in ISO-8859-9 (Turkish)
        let body = b"<p>Ho\xfe geldiniz</p>";
        let text = decode_body(body, Some("text/html; charset=ISO-8859-9"));
        assert_eq!(text, "<p>Hoş geldiniz</p>");
    }

    #[test]
    fn test_decode_defaults_to_utf8() {
        let body = "<p>Hoş geldiniz</p>".as_bytes();
        assert_eq!(decode_body(body, Some("text/html")), "<p>Hoş geldiniz</p>");
        assert_eq!(decode_body(body, None), "<p>Hoş geldiniz</p>");
    }

    #[test]
    fn test_decode_sniffs_meta_charset() {
        let body = b"<html><head><meta charset=\"iso-8859-9\"></head><body>\xfe</body></html>";
        let text = decode_body(body, Some("text/html"));
        assert!(text.contains("<body>ş</body>"));
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // 0xE9 alone is not valid UTF-8, and there is no charset hint
        let text = decode_body(b"caf\xe9", None);
        assert_eq!(text, "café");
    }

    #[test]
    fn test_unknown_header_charset_falls_back_to_guess() {
        let text = decode_body("plain ascii".as_bytes(), Some("text/html; charset=not-a-charset"));
        assert_eq!(text, "plain ascii");
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", mockito::Matcher::Regex("^Mozilla/5.0".to_string()))
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<title>Hi</title>")
            .create_async()
            .await;

        let fetcher = Fetcher::new(&test_config()).unwrap();
        let fetched = fetcher.fetch(&format!("{}/", server.url())).await.unwrap();

        assert_eq!(fetched.status_code, 200);
        assert_eq!(fetched.html, "<title>Hi</title>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_follows_redirect() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        server
            .mock("GET", "/new")
            .with_status(200)
            .with_body("moved here")
            .create_async()
            .await;

        let fetcher = Fetcher::new(&test_config()).unwrap();
        let fetched = fetcher.fetch(&format!("{}/old", server.url())).await.unwrap();
        assert_eq!(fetched.status_code, 200);
        assert_eq!(fetched.html, "moved here");
        assert_eq!(fetched.final_url.path(), "/new");
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = Fetcher::new(&test_config()).unwrap();
        let error = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert_eq!(error, FetchError::Http { status: 404 });
    }

    #[tokio::test]
    async fn test_fetch_connection_error() {
        let fetcher = Fetcher::new(&test_config()).unwrap();
        let error = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert_eq!(error.kind(), "connection");
        assert!(error.describe().chars().count() <= crate::error::MAX_ERROR_LEN);
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/slow")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(1500));
                w.write_all(b"too late")
            })
            .create_async()
            .await;

        let config = test_config().with_request_timeout(Duration::from_millis(200));
        let fetcher = Fetcher::new(&config).unwrap();
        let error = fetcher
            .fetch(&format!("{}/slow", server.url()))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), "timeout");
    }
}
