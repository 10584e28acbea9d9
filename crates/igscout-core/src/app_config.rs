use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Proxy endpoint pair applied read-only to every fetch in every stage.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub http: String,
    pub https: String,
    /// Extra PEM root certificate to trust while proxying.
    pub ca_cert_path: Option<PathBuf>,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("http", &"[redacted]")
            .field("https", &"[redacted]")
            .field("ca_cert_path", &self.ca_cert_path)
            .finish()
    }
}

/// Pacing knobs for the hashtag feed crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Pause between successive feed polls.
    pub poll_interval: Duration,
    /// Consecutive no-growth polls after which the crawl gives up.
    pub stagnation_limit: u32,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            stagnation_limit: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub hashtags: Vec<String>,
    pub target_post_count: usize,
    pub workers: NonZeroUsize,
    pub headless: bool,
    pub proxy: Option<ProxyConfig>,
    pub min_followers: f64,
    pub max_followers: f64,
    pub feed_url_prefix: String,
    pub profile_url_prefix: String,
    pub post_link_selector: String,
    pub chrome_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub crawl: CrawlSettings,
}
