use crate::metadata::fetchers::MetadataFetcher;
use crate::metadata::types::{FetchError, FetchResult};
use crate::video_id::VideoId;

/// Orchestrates fetch strategies in a fixed priority order, returning the
/// first success. No retries within a fetcher, no backoff, no circuit
/// breaking; a failing strategy silently falls through to the next and only
/// the last failure reason survives.
pub struct Resolver {
    fetchers: Vec<Box<dyn MetadataFetcher>>,
}

impl Resolver {
    pub fn new(fetchers: Vec<Box<dyn MetadataFetcher>>) -> Self {
        Self { fetchers }
    }

    pub fn resolve(&self, id: &VideoId) -> FetchResult {
        let mut last_failure = FetchError::new("no fetch strategies configured");

        for fetcher in &self.fetchers {
            let name = fetcher.name();
            match fetcher.fetch(id) {
                Ok(meta) => {
                    log::info!("fetcher={name} outcome=success video_id={id}");
                    return Ok(meta);
                }
                Err(err) => {
                    log::warn!("fetcher={name} outcome=failure video_id={id} reason={}", err.reason());
                    last_failure = err;
                }
            }
        }

        Err(last_failure)
    }
}
