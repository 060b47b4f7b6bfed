use serde::{Deserialize, Serialize};

/// Normalized video metadata. Every field is optional because the three fetch
/// strategies populate different subsets; the envelope layer serializes
/// whatever is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub channel_id: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Duration in whole seconds.
    pub duration: Option<u64>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<FormatInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<ThumbnailInfo>,
    pub webpage_url: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

impl VideoMetadata {
    /// Returns true if any field beyond the id itself is populated.
    pub fn has_any_data(&self) -> bool {
        self.title.is_some()
            || self.author_name.is_some()
            || self.thumbnail_url.is_some()
            || self.duration.is_some()
            || self.view_count.is_some()
            || !self.formats.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatInfo {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub resolution: Option<String>,
    pub filesize: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThumbnailInfo {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A single fetch strategy failure. Carries only the reason string; the
/// Resolver reports the last one when every strategy is exhausted.
#[derive(Debug, Clone)]
pub struct FetchError {
    reason: String,
}

impl FetchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Note timeouts explicitly since they are the common upstream failure.
        if err.is_timeout() {
            Self::new(format!("request timed out: {err}"))
        } else {
            Self::new(err.to_string())
        }
    }
}

pub type FetchResult = Result<VideoMetadata, FetchError>;
