// src/config.rs
// =============================================================================
// Settings for one crawl.
//
// Everything that used to be a hard-coded constant (page cap, timeout,
// polite delay, user agent) lives here so that tests can build a crawler
// with a tiny page cap and no delay.
//
// A config can come from three places:
// - CrawlConfig::default() - the production values
// - A JSON file (CrawlConfig::from_file) - any field may be omitted
// - Builder methods (with_max_pages, ...) - used by the CLI and tests
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Maximum number of pages fetched in one crawl
pub const MAX_PAGES: usize = 5;

/// Per-request timeout, in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Pause before every page fetch, in milliseconds
pub const REQUEST_DELAY_MS: u64 = 1000;

/// Redirects followed before a request is given up on
pub const MAX_REDIRECTS: usize = 10;

/// Desktop browser user agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Hard limit on pages fetched (successful or not)
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(
        rename = "request_timeout_secs",
        with = "duration_secs",
        default = "default_request_timeout"
    )]
    pub request_timeout: Duration,

    #[serde(
        rename = "request_delay_ms",
        with = "duration_millis",
        default = "default_request_delay"
    )]
    pub request_delay: Duration,

    /// Sent as the User-Agent header and matched against robots.txt groups
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_respect_robots")]
    pub respect_robots: bool,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_max_pages() -> usize {
    MAX_PAGES
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}

fn default_request_delay() -> Duration {
    Duration::from_millis(REQUEST_DELAY_MS)
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_respect_robots() -> bool {
    true
}

fn default_max_redirects() -> usize {
    MAX_REDIRECTS
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_timeout: default_request_timeout(),
            request_delay: default_request_delay(),
            user_agent: default_user_agent(),
            respect_robots: default_respect_robots(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl CrawlConfig {
    /// Loads a JSON config file. Missing fields take their default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read config '{}': {}", path.display(), e))?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path.display(), e))?;
        Ok(config)
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_respect_robots(mut self, respect_robots: bool) -> Self {
        self.respect_robots = respect_robots;
        self
    }
}

// Durations are written as plain integers in config files
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
