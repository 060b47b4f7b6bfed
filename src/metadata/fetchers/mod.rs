pub mod oembed;
pub mod watch_page;
pub mod ytdlp;

use crate::config::Config;
use crate::metadata::types::{FetchError, FetchResult};
use crate::video_id::VideoId;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// Trait for a single metadata fetch strategy.
pub trait MetadataFetcher: Send + Sync {
    /// Attempt to fetch metadata for a video id. Any failure is reported as a
    /// `FetchError` with a reason; the Resolver decides what happens next.
    fn fetch(&self, id: &VideoId) -> FetchResult;

    /// Name of this fetcher for logging.
    fn name(&self) -> &'static str;
}

/// Immutable per-fetcher configuration, injected at construction. There is no
/// shared mutable state between requests; user agent selection is a stateless
/// random index into the fixed pool.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub timeout: Duration,
    pub user_agents: Arc<Vec<String>>,
    pub ytdlp_path: String,
}

impl FetchContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            user_agents: Arc::new(config.user_agents.clone()),
            ytdlp_path: config.ytdlp_path.clone(),
        }
    }

    /// Pick a user agent from the pool. This is a best-effort anti-throttling
    /// heuristic to avoid uniform blocking; it is not a security or
    /// correctness mechanism and nothing may rely on it.
    pub fn random_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(USER_AGENT_DEFAULT)
    }

    /// Blocking HTTP client bounded by the configured timeout, with a rotated
    /// user agent.
    pub fn http_client(&self) -> Result<reqwest::blocking::Client, FetchError> {
        reqwest::blocking::Client::builder()
            .user_agent(self.random_user_agent())
            .timeout(self.timeout)
            .build()
            .map_err(|err| FetchError::new(format!("failed to build http client: {err}")))
    }
}
