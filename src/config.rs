use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Per outbound fetch attempt, in seconds. The chain has a fixed length,
    /// so this also bounds total per-request wall time.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Verify a chosen thumbnail URL with a HEAD request before returning it.
    #[serde(default = "default_true")]
    pub verify_thumbnails: bool,

    /// Fixed pool of client-identification strings, one picked at random per
    /// outbound request. Best-effort anti-throttling only.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,

    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: String,

    /// When false, the full chain starts at oEmbed and the formats endpoint
    /// reports an upstream failure.
    #[serde(default = "default_true")]
    pub enable_ytdlp: bool,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_ytdlp_path() -> String {
    DEFAULT_YTDLP_PATH.to_string()
}

fn default_true() -> bool {
    true
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            verify_thumbnails: true,
            user_agents: default_user_agents(),
            ytdlp_path: default_ytdlp_path(),
            enable_ytdlp: true,
            base_path: String::new(),
        }
    }
}

impl Config {
    fn validate(&mut self) -> anyhow::Result<()> {
        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be greater than 0");
        }

        if self.bind_addr.parse::<SocketAddr>().is_err() {
            bail!("bind_addr {:?} is not a valid socket address", self.bind_addr);
        }

        if self.ytdlp_path.trim().is_empty() {
            bail!("ytdlp_path must not be empty");
        }

        // An empty pool would mean no client identification at all; fall back
        // to the defaults rather than rejecting the config.
        if self.user_agents.is_empty() {
            self.user_agents = default_user_agents();
        }

        Ok(())
    }

    /// Load `config.yaml` from the given directory, creating it with defaults
    /// on first run. Resaves if deserialization back-filled new fields.
    pub fn load_with(base_path: &str) -> anyhow::Result<Self> {
        let path = Path::new(base_path).join("config.yaml");

        if !path.exists() {
            let defaults = serde_yml::to_string(&Self::default())?;
            std::fs::write(&path, defaults)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        let config_str = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Self =
            serde_yml::from_str(&config_str).context("config.yaml is malformed")?;

        config.base_path = base_path.to_string();
        config.validate()?;

        // resave in case the config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Path::new(&self.base_path).join("config.yaml");
        let config_str = serde_yml::to_string(&self)?;
        std::fs::write(&path, config_str)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}
