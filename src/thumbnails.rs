use crate::video_id::VideoId;
use serde_json::{Map, Value};
use std::time::Duration;

/// Quality key to thumbnail filename, in documented order. These templates are
/// stable upstream and must be reproduced exactly.
pub const QUALITIES: [(&str, &str); 5] = [
    ("maxres", "maxresdefault.jpg"),
    ("high", "hqdefault.jpg"),
    ("medium", "mqdefault.jpg"),
    ("default", "default.jpg"),
    ("sddefault", "sddefault.jpg"),
];

pub const DEFAULT_QUALITY: &str = "maxres";

fn template(id: &VideoId, file: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/{}", id.as_str(), file)
}

/// Thumbnail URL for the given quality key. Unknown keys fall back to maxres.
pub fn url_for(id: &VideoId, quality: &str) -> String {
    let file = QUALITIES
        .iter()
        .find(|(key, _)| *key == quality)
        .map(|(_, file)| *file)
        .unwrap_or("maxresdefault.jpg");
    template(id, file)
}

/// Map of every documented quality key to its URL.
pub fn all_qualities(id: &VideoId) -> Map<String, Value> {
    QUALITIES
        .iter()
        .map(|(key, file)| (key.to_string(), Value::String(template(id, file))))
        .collect()
}

/// Best-effort existence check for a chosen thumbnail URL.
///
/// A confirmed non-200 (maxres is missing for many older videos) downgrades to
/// the `high` template; a transport error keeps the chosen URL since nothing
/// was confirmed either way.
pub fn verify_or_downgrade(id: &VideoId, chosen: String, timeout: Duration) -> String {
    let client = match reqwest::blocking::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(err) => {
            log::debug!("thumbnail verify skipped, client build failed: {err}");
            return chosen;
        }
    };

    match client.head(&chosen).send() {
        Ok(resp) if !resp.status().is_success() => {
            log::debug!("thumbnail {chosen} returned {}, falling back to high", resp.status());
            template(id, "hqdefault.jpg")
        }
        Ok(_) => chosen,
        Err(err) => {
            log::debug!("thumbnail verify failed, keeping {chosen}: {err}");
            chosen
        }
    }
}
