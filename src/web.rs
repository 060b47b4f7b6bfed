use crate::{
    config::Config,
    errors::ApiError,
    metadata::{Resolver, Resolvers, VideoMetadata},
    thumbnails,
    video_id::VideoId,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tokio::signal;

/// Fixed attribution string carried by every JSON response.
pub const CREDIT: &str = "Made with ❤️ by @DIWANI_xD";

const THUMBNAIL_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SharedState {
    pub config: Config,
    pub resolvers: Resolvers,
}

pub fn build_router(state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/youtube/info", get(info))
        .route("/api/youtube/basic", get(basic))
        .route("/api/youtube/formats", get(formats))
        .route("/api/youtube/thumbnail", get(thumbnail))
        .route("/api/youtube/video_id", get(video_id))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(state)
}

pub fn start_daemon(state: SharedState) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { serve(state).await })
}

async fn serve(state: SharedState) -> anyhow::Result<()> {
    let bind_addr = state.config.bind_addr.clone();
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => log::warn!("received Ctrl+C, shutting down"),
        _ = terminate => log::warn!("received SIGTERM, shutting down"),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct VideoQuery {
    url: Option<String>,
    quality: Option<String>,
}

/// Failure envelope: `{success:false, error, credit}` plus endpoint-specific
/// extras (`url`, `video_id`, `example`).
fn failure(err: &ApiError, extra: &[(&str, Value)]) -> (StatusCode, Json<Value>) {
    let mut body = json!({
        "success": false,
        "error": err.public_message(),
        "credit": CREDIT,
    });
    if let Value::Object(map) = &mut body {
        for (key, value) in extra {
            map.insert(key.to_string(), value.clone());
        }
    }
    (err.status(), Json(body))
}

/// Same shape as `failure` but with endpoint-specific error text.
fn failure_msg(status: StatusCode, error: &str, extra: &[(&str, Value)]) -> (StatusCode, Json<Value>) {
    let mut body = json!({
        "success": false,
        "error": error,
        "credit": CREDIT,
    });
    if let Value::Object(map) = &mut body {
        for (key, value) in extra {
            map.insert(key.to_string(), value.clone());
        }
    }
    (status, Json(body))
}

/// Outbound fetches are blocking reqwest/process calls bounded by the
/// configured timeout, so they run under block_in_place.
fn resolve_blocking(resolver: &Resolver, id: &VideoId) -> Result<VideoMetadata, ApiError> {
    tokio::task::block_in_place(|| resolver.resolve(id).map_err(ApiError::from))
}

async fn home() -> Json<Value> {
    Json(json!({
        "message": "YouTube Information API",
        "endpoints": {
            "video_info": "/api/youtube/info?url=YOUTUBE_URL",
            "basic_info": "/api/youtube/basic?url=YOUTUBE_URL",
            "formats": "/api/youtube/formats?url=YOUTUBE_URL",
            "thumbnail": "/api/youtube/thumbnail?url=YOUTUBE_URL&quality=maxres",
            "extract_id": "/api/youtube/video_id?url=YOUTUBE_URL",
            "example": "/api/youtube/info?url=https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        },
        "features": [
            "Video information extraction",
            "Format listing",
            "Thumbnail URLs",
            "Video ID extraction",
        ],
        "credit": CREDIT,
    }))
}

async fn info(
    State(state): State<Arc<SharedState>>,
    Query(query): Query<VideoQuery>,
) -> (StatusCode, Json<Value>) {
    let url = match query.url {
        Some(url) => url,
        None => {
            return failure(
                &ApiError::MissingUrl,
                &[(
                    "example",
                    json!("/api/youtube/info?url=https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
                )],
            )
        }
    };

    let id = match VideoId::from_url(&url) {
        Some(id) => id,
        None => return failure(&ApiError::InvalidUrl, &[("url", json!(url))]),
    };

    match resolve_blocking(&state.resolvers.full, &id) {
        Ok(meta) => match serde_json::to_value(&meta) {
            Ok(data) => (
                StatusCode::OK,
                Json(json!({"success": true, "data": data, "credit": CREDIT})),
            ),
            Err(err) => failure(&ApiError::Unexpected(err.into()), &[("url", json!(url))]),
        },
        Err(err) => failure(&err, &[("url", json!(url)), ("video_id", json!(id.as_str()))]),
    }
}

async fn basic(
    State(state): State<Arc<SharedState>>,
    Query(query): Query<VideoQuery>,
) -> (StatusCode, Json<Value>) {
    let url = match query.url {
        Some(url) => url,
        None => return failure(&ApiError::MissingUrl, &[]),
    };

    let id = match VideoId::from_url(&url) {
        Some(id) => id,
        None => return failure(&ApiError::InvalidUrl, &[("url", json!(url))]),
    };

    match resolve_blocking(&state.resolvers.basic, &id) {
        Ok(meta) => match serde_json::to_value(&meta) {
            Ok(data) => (
                StatusCode::OK,
                Json(json!({"success": true, "data": data, "credit": CREDIT})),
            ),
            Err(err) => failure(&ApiError::Unexpected(err.into()), &[("url", json!(url))]),
        },
        Err(err) => failure(&err, &[("url", json!(url))]),
    }
}

async fn formats(
    State(state): State<Arc<SharedState>>,
    Query(query): Query<VideoQuery>,
) -> (StatusCode, Json<Value>) {
    let url = match query.url {
        Some(url) => url,
        None => return failure(&ApiError::MissingUrl, &[]),
    };

    let id = match VideoId::from_url(&url) {
        Some(id) => id,
        None => return failure(&ApiError::InvalidUrl, &[("url", json!(url))]),
    };

    match resolve_blocking(&state.resolvers.formats, &id) {
        Ok(meta) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "video_id": id.as_str(),
                "title": meta.title,
                "duration": meta.duration,
                "formats": meta.formats,
                "credit": CREDIT,
            })),
        ),
        Err(err) => failure(&err, &[("url", json!(url))]),
    }
}

async fn thumbnail(
    State(state): State<Arc<SharedState>>,
    Query(query): Query<VideoQuery>,
) -> (StatusCode, Json<Value>) {
    let url = match query.url {
        Some(url) => url,
        None => return failure(&ApiError::MissingUrl, &[]),
    };

    let id = match VideoId::from_url(&url) {
        Some(id) => id,
        None => return failure(&ApiError::InvalidUrl, &[]),
    };

    let quality = query
        .quality
        .unwrap_or_else(|| thumbnails::DEFAULT_QUALITY.to_string());
    let mut thumbnail_url = thumbnails::url_for(&id, &quality);

    if state.config.verify_thumbnails {
        thumbnail_url = tokio::task::block_in_place(|| {
            thumbnails::verify_or_downgrade(&id, thumbnail_url, THUMBNAIL_VERIFY_TIMEOUT)
        });
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "video_id": id.as_str(),
            "thumbnail_url": thumbnail_url,
            "quality": quality,
            "all_qualities": thumbnails::all_qualities(&id),
            "credit": CREDIT,
        })),
    )
}

async fn video_id(Query(query): Query<VideoQuery>) -> (StatusCode, Json<Value>) {
    let url = match query.url {
        Some(url) => url,
        None => return failure(&ApiError::MissingUrl, &[]),
    };

    match VideoId::from_url(&url) {
        Some(id) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "video_id": id.as_str(),
                "original_url": url,
                "clean_url": id.watch_url(),
                "credit": CREDIT,
            })),
        ),
        None => failure_msg(
            StatusCode::BAD_REQUEST,
            "Could not extract video ID from URL",
            &[("url", json!(url))],
        ),
    }
}
