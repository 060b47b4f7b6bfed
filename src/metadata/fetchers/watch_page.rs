use crate::metadata::fetchers::{FetchContext, MetadataFetcher};
use crate::metadata::types::{FetchError, FetchResult, VideoMetadata};
use crate::video_id::VideoId;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::ACCEPT;

static LENGTH_SECONDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""lengthSeconds":"(\d+)""#).expect("failed to compile lengthSeconds pattern")
});

static VIEW_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""viewCount":"(\d+)""#).expect("failed to compile viewCount pattern")
});

static TITLE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<title>(.*?) - YouTube</title>").expect("failed to compile title pattern")
});

/// Fetcher that scrapes the raw watch page HTML with fixed textual patterns.
///
/// A pattern that fails to match yields a null field, not a fetch failure;
/// only a failed page load is an error.
pub struct WatchPageFetcher {
    ctx: FetchContext,
}

impl WatchPageFetcher {
    pub fn new(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    fn extract(id: &VideoId, html: &str) -> VideoMetadata {
        let duration = LENGTH_SECONDS
            .captures(html)
            .and_then(|caps| caps[1].parse().ok());
        let view_count = VIEW_COUNT
            .captures(html)
            .and_then(|caps| caps[1].parse().ok());
        let title = page_title(html);

        VideoMetadata {
            video_id: Some(id.as_str().to_string()),
            title,
            duration,
            view_count,
            // The maxres template exists for any public video id.
            thumbnail_url: Some(format!(
                "https://i.ytimg.com/vi/{}/maxresdefault.jpg",
                id.as_str()
            )),
            webpage_url: Some(id.watch_url()),
            media_type: Some("video".to_string()),
            ..Default::default()
        }
    }
}

/// Page title via the parsed `<title>` element, falling back to a regex over
/// raw HTML. The trailing " - YouTube" suffix is stripped either way.
fn page_title(html: &str) -> Option<String> {
    let document = scraper::Html::parse_document(html);
    let selector = scraper::Selector::parse("title").ok()?;

    let parsed = document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(|raw| raw.strip_suffix(" - YouTube").unwrap_or(&raw).to_string());

    parsed.or_else(|| {
        TITLE_TAG
            .captures(html)
            .map(|caps| caps[1].trim().to_string())
    })
}

impl MetadataFetcher for WatchPageFetcher {
    fn fetch(&self, id: &VideoId) -> FetchResult {
        let client = self.ctx.http_client()?;
        let url = id.watch_url();
        log::debug!("fetching watch page {url}");

        let response = client
            .get(&url)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .send()
            .map_err(FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(format!("watch page returned status {status}")));
        }

        let html = response
            .text()
            .map_err(|err| FetchError::new(format!("failed to read watch page body: {err}")))?;

        Ok(Self::extract(id, &html))
    }

    fn name(&self) -> &'static str {
        "watch page"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> VideoId {
        VideoId::new("dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_extracts_all_fields() {
        let html = r#"<html><head><title>Never Gonna Give You Up - YouTube</title></head>
            <body><script>var config = {"lengthSeconds":"212","viewCount":"1400000000"};</script></body></html>"#;

        let meta = WatchPageFetcher::extract(&id(), html);
        assert_eq!(meta.title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(meta.duration, Some(212));
        assert_eq!(meta.view_count, Some(1_400_000_000));
        assert_eq!(
            meta.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
        );
        assert_eq!(meta.webpage_url.as_deref(), Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_missing_patterns_yield_null_fields() {
        let html = "<html><head></head><body>nothing useful here</body></html>";

        let meta = WatchPageFetcher::extract(&id(), html);
        assert!(meta.title.is_none());
        assert!(meta.duration.is_none());
        assert!(meta.view_count.is_none());
        // Derived fields are still present.
        assert!(meta.thumbnail_url.is_some());
        assert_eq!(meta.video_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_title_without_suffix_kept_verbatim() {
        let html = "<html><head><title>Some Other Page</title></head><body></body></html>";
        let meta = WatchPageFetcher::extract(&id(), html);
        assert_eq!(meta.title.as_deref(), Some("Some Other Page"));
    }

    #[test]
    fn test_regex_title_fallback_on_unparseable_head() {
        // scraper still finds the tag in most malformed documents, but the raw
        // regex must agree on the stripped title.
        let html = "<title>Fallback Title - YouTube</title>";
        assert_eq!(page_title(html).as_deref(), Some("Fallback Title"));
    }

    #[test]
    fn test_duration_pattern_requires_quoted_digits() {
        let html = r#"{"lengthSeconds":"12a4"}"#;
        let meta = WatchPageFetcher::extract(&id(), html);
        assert!(meta.duration.is_none());
    }
}
