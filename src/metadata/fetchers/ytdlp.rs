use crate::metadata::fetchers::{FetchContext, MetadataFetcher};
use crate::metadata::types::{FetchError, FetchResult, FormatInfo, ThumbnailInfo, VideoMetadata};
use crate::video_id::VideoId;
use serde::Deserialize;
use std::process::Command;

/// Fetcher that delegates to the yt-dlp extractor (`--dump-json`). The most
/// capable strategy: it is the only one that yields formats and counts beyond
/// views.
pub struct YtdlpFetcher {
    ctx: FetchContext,
}

#[derive(Debug, Clone, Deserialize)]
struct YtdlpInfo {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    uploader_url: Option<String>,
    channel_id: Option<String>,
    duration: Option<f64>,
    view_count: Option<u64>,
    like_count: Option<u64>,
    comment_count: Option<u64>,
    thumbnail: Option<String>,
    webpage_url: Option<String>,
    #[serde(default)]
    formats: Vec<YtdlpFormat>,
    #[serde(default)]
    thumbnails: Vec<YtdlpThumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
struct YtdlpFormat {
    format_id: Option<String>,
    ext: Option<String>,
    resolution: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct YtdlpThumbnail {
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl YtdlpFetcher {
    pub fn new(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    fn to_metadata(id: &VideoId, info: YtdlpInfo) -> VideoMetadata {
        let formats = info
            .formats
            .into_iter()
            .map(|f| {
                let resolution = f.resolution.or_else(|| match (f.width, f.height) {
                    (Some(w), Some(h)) => Some(format!("{w}x{h}")),
                    _ => None,
                });
                FormatInfo {
                    format_id: f.format_id,
                    ext: f.ext,
                    resolution,
                    filesize: f.filesize.or(f.filesize_approx),
                }
            })
            .collect();

        let thumbnails = info
            .thumbnails
            .into_iter()
            .map(|t| ThumbnailInfo { url: t.url, width: t.width, height: t.height })
            .collect();

        VideoMetadata {
            video_id: info.id.or_else(|| Some(id.as_str().to_string())),
            title: info.title,
            author_name: info.uploader,
            author_url: info.uploader_url,
            channel_id: info.channel_id,
            thumbnail_url: info.thumbnail,
            duration: info.duration.map(|d| d as u64),
            view_count: info.view_count,
            like_count: info.like_count,
            comment_count: info.comment_count,
            formats,
            thumbnails,
            webpage_url: info.webpage_url.or_else(|| Some(id.watch_url())),
            media_type: Some("video".to_string()),
        }
    }
}

/// Map recognized substrings in the extractor's stderr to friendlier reasons.
/// This is a convenience layer only, not a hard taxonomy; unrecognized output
/// falls through to the extractor's own last line.
fn classify_failure(stderr: &str) -> String {
    let lower = stderr.to_lowercase();

    if lower.contains("private video") || lower.contains("is private") {
        return "This video is private".to_string();
    }
    if lower.contains("unavailable") || lower.contains("has been removed") {
        return "This video is unavailable".to_string();
    }
    if lower.contains("sign in to confirm") || lower.contains("captcha") {
        return "Upstream bot detection blocked the request".to_string();
    }
    if lower.contains("age-restricted") || lower.contains("age restricted") {
        return "This video is age restricted".to_string();
    }

    stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| "yt-dlp extraction failed".to_string())
}

impl MetadataFetcher for YtdlpFetcher {
    fn fetch(&self, id: &VideoId) -> FetchResult {
        log::debug!("running {} for {id}", self.ctx.ytdlp_path);

        let output = Command::new(&self.ctx.ytdlp_path)
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-warnings")
            .arg("--socket-timeout")
            .arg(self.ctx.timeout.as_secs().to_string())
            .arg(id.watch_url())
            .output()
            .map_err(|err| FetchError::new(format!("failed to run yt-dlp: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::new(classify_failure(&stderr)));
        }

        let info: YtdlpInfo = serde_json::from_slice(&output.stdout)
            .map_err(|err| FetchError::new(format!("failed to parse yt-dlp output: {err}")))?;

        Ok(Self::to_metadata(id, info))
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> VideoId {
        VideoId::new("dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_classify_private() {
        let reason = classify_failure("ERROR: [youtube] abc: Private video. Sign in if you've been granted access");
        assert_eq!(reason, "This video is private");
    }

    #[test]
    fn test_classify_unavailable() {
        assert_eq!(
            classify_failure("ERROR: [youtube] abc: Video unavailable"),
            "This video is unavailable"
        );
    }

    #[test]
    fn test_classify_bot_detection() {
        assert_eq!(
            classify_failure("ERROR: [youtube] abc: Sign in to confirm you're not a bot."),
            "Upstream bot detection blocked the request"
        );
    }

    #[test]
    fn test_classify_unrecognized_keeps_last_line() {
        let stderr = "WARNING: something benign\nERROR: some brand new failure mode\n";
        assert_eq!(classify_failure(stderr), "ERROR: some brand new failure mode");
    }

    #[test]
    fn test_classify_empty_stderr() {
        assert_eq!(classify_failure(""), "yt-dlp extraction failed");
    }

    #[test]
    fn test_info_json_mapping() {
        let json = serde_json::json!({
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "uploader": "Rick Astley",
            "uploader_url": "https://www.youtube.com/@RickAstleyYT",
            "channel_id": "UCuAXFkgsw1L7xaCfnd5JJOw",
            "duration": 212.0,
            "view_count": 1400000000u64,
            "like_count": 17000000u64,
            "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "formats": [
                {"format_id": "18", "ext": "mp4", "width": 640, "height": 360, "filesize": 12345678},
                {"format_id": "137", "ext": "mp4", "resolution": "1920x1080", "filesize_approx": 98765432}
            ],
            "thumbnails": [
                {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg", "width": 1280, "height": 720}
            ],
            "extractor": "youtube"
        });

        let info: YtdlpInfo = serde_json::from_value(json).unwrap();
        let meta = YtdlpFetcher::to_metadata(&id(), info);

        assert_eq!(meta.title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(meta.author_name.as_deref(), Some("Rick Astley"));
        assert_eq!(meta.duration, Some(212));
        assert_eq!(meta.formats.len(), 2);
        // Resolution is composed from width/height when missing.
        assert_eq!(meta.formats[0].resolution.as_deref(), Some("640x360"));
        assert_eq!(meta.formats[1].resolution.as_deref(), Some("1920x1080"));
        // filesize_approx stands in when filesize is absent.
        assert_eq!(meta.formats[1].filesize, Some(98765432));
        assert_eq!(meta.thumbnails.len(), 1);
    }

    #[test]
    fn test_minimal_info_falls_back_to_request_id() {
        let info: YtdlpInfo = serde_json::from_value(serde_json::json!({})).unwrap();
        let meta = YtdlpFetcher::to_metadata(&id(), info);
        assert_eq!(meta.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(meta.webpage_url.as_deref(), Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(meta.formats.is_empty());
    }
}
