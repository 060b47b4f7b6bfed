
use crate::metadata::fetchers::MetadataFetcher;
use crate::metadata::types::{FetchError, FetchResult, VideoMetadata};
use crate::video_id::VideoId;
use std::sync::{Arc, Mutex};

/// Fetcher stub with a canned outcome, used to drive the Resolver and the
/// HTTP surface without touching the network.
pub(crate) struct StaticFetcher {
    pub label: &'static str,
    pub outcome: Result<VideoMetadata, String>,
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl StaticFetcher {
    pub fn ok(label: &'static str, title: &str) -> Box<dyn MetadataFetcher> {
        Box::new(Self {
            label,
            outcome: Ok(VideoMetadata { title: Some(title.to_string()), ..Default::default() }),
            calls: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn err(label: &'static str, reason: &str) -> Box<dyn MetadataFetcher> {
        Box::new(Self {
            label,
            outcome: Err(reason.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Same stub, but appending its label to a shared call log.
    pub fn recording(
        label: &'static str,
        outcome: Result<VideoMetadata, String>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    ) -> Box<dyn MetadataFetcher> {
        Box::new(Self { label, outcome, calls })
    }
}

impl MetadataFetcher for StaticFetcher {
    fn fetch(&self, _id: &VideoId) -> FetchResult {
        self.calls.lock().unwrap().push(self.label);
        self.outcome.clone().map_err(FetchError::new)
    }

    fn name(&self) -> &'static str {
        self.label
    }
}
