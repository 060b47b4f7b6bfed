use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Canonical video ids are exactly 11 characters of this alphabet.
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("failed to compile id pattern"));

/// Canonical 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Validate a raw token against the fixed id pattern.
    pub fn new(raw: &str) -> Option<Self> {
        if ID_PATTERN.is_match(raw) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page URL for this id.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Extract a video id from any of the known URL shapes.
    ///
    /// Rules are keyed by host and path shape and tried in order; the first
    /// match wins. Tracking parameters (`si`, `t`, `feature`, ...) are ignored
    /// because only the `v` query parameter and path segments are inspected.
    /// Anything unrecognized yields `None`, which callers treat as a client
    /// error.
    pub fn from_url(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        // Accept scheme-less inputs like "youtu.be/ID".
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let parsed = Url::parse(&with_scheme).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        let bare_host = host
            .strip_prefix("www.")
            .or_else(|| host.strip_prefix("m."))
            .unwrap_or(&host);

        match bare_host {
            "youtube.com" | "youtube-nocookie.com" => {
                if parsed.path() == "/watch" {
                    let v = parsed
                        .query_pairs()
                        .find(|(key, _)| key == "v")
                        .map(|(_, value)| value.into_owned())?;
                    return Self::new(&v);
                }

                let mut segments = parsed.path_segments()?;
                match segments.next()? {
                    "embed" | "shorts" | "live" | "v" => Self::new(segments.next()?),
                    _ => None,
                }
            }
            "youtu.be" => {
                let first = parsed.path_segments()?.next()?;
                Self::new(first)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
