use crate::metadata::fetchers::{FetchContext, MetadataFetcher};
use crate::metadata::types::{FetchError, FetchResult, ThumbnailInfo, VideoMetadata};
use crate::video_id::VideoId;
use reqwest::header::{ACCEPT, REFERER};
use serde::Deserialize;

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

#[derive(Debug, Clone, Deserialize)]
struct OembedResponse {
    title: Option<String>,
    author_name: Option<String>,
    author_url: Option<String>,
    thumbnail_url: Option<String>,
    thumbnail_width: Option<u32>,
    thumbnail_height: Option<u32>,
}

/// Fetcher backed by the public oEmbed JSON endpoint. One GET per call; a
/// non-200 status or malformed JSON is a failure.
pub struct OembedFetcher {
    ctx: FetchContext,
}

impl OembedFetcher {
    pub fn new(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    fn to_metadata(id: &VideoId, resp: OembedResponse) -> VideoMetadata {
        let thumbnails = match &resp.thumbnail_url {
            Some(url) => vec![ThumbnailInfo {
                url: Some(url.clone()),
                width: resp.thumbnail_width,
                height: resp.thumbnail_height,
            }],
            None => Vec::new(),
        };

        VideoMetadata {
            video_id: Some(id.as_str().to_string()),
            title: resp.title,
            author_name: resp.author_name,
            author_url: resp.author_url,
            thumbnail_url: resp.thumbnail_url,
            thumbnails,
            webpage_url: Some(id.watch_url()),
            media_type: Some("video".to_string()),
            ..Default::default()
        }
    }
}

impl MetadataFetcher for OembedFetcher {
    fn fetch(&self, id: &VideoId) -> FetchResult {
        let client = self.ctx.http_client()?;

        let endpoint = format!("{OEMBED_ENDPOINT}?url={}&format=json", id.watch_url());
        log::debug!("fetching oEmbed from {endpoint}");

        let response = client
            .get(&endpoint)
            .header(ACCEPT, "application/json")
            .header(REFERER, "https://www.youtube.com/")
            .send()
            .map_err(FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(format!("oEmbed endpoint returned status {status}")));
        }

        let body: OembedResponse = response
            .json()
            .map_err(|err| FetchError::new(format!("malformed oEmbed response: {err}")))?;

        Ok(Self::to_metadata(id, body))
    }

    fn name(&self) -> &'static str {
        "oEmbed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> VideoId {
        VideoId::new("dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_oembed_json_parsing() {
        let json = serde_json::json!({
            "type": "video",
            "title": "Test Video",
            "author_name": "Test Author",
            "author_url": "https://www.youtube.com/@testauthor",
            "thumbnail_url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
            "thumbnail_width": 480,
            "thumbnail_height": 360,
            "provider_name": "YouTube"
        });

        let resp: OembedResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.title.as_deref(), Some("Test Video"));
        assert_eq!(resp.author_name.as_deref(), Some("Test Author"));
        assert_eq!(resp.thumbnail_width, Some(480));
    }

    #[test]
    fn test_to_metadata_mapping() {
        let resp = OembedResponse {
            title: Some("Test Video".into()),
            author_name: Some("Test Author".into()),
            author_url: Some("https://www.youtube.com/@testauthor".into()),
            thumbnail_url: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".into()),
            thumbnail_width: Some(480),
            thumbnail_height: Some(360),
        };

        let meta = OembedFetcher::to_metadata(&id(), resp);
        assert_eq!(meta.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(meta.title.as_deref(), Some("Test Video"));
        assert_eq!(meta.webpage_url.as_deref(), Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert_eq!(meta.media_type.as_deref(), Some("video"));
        assert_eq!(meta.thumbnails.len(), 1);
        assert_eq!(meta.thumbnails[0].width, Some(480));
        assert!(meta.has_any_data());
    }

    #[test]
    fn test_partial_response_still_maps() {
        let resp: OembedResponse = serde_json::from_value(serde_json::json!({
            "title": "Only A Title"
        }))
        .unwrap();

        let meta = OembedFetcher::to_metadata(&id(), resp);
        assert_eq!(meta.title.as_deref(), Some("Only A Title"));
        assert!(meta.thumbnail_url.is_none());
        assert!(meta.thumbnails.is_empty());
    }
}
