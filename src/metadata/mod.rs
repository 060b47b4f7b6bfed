pub mod fetchers;
pub mod resolver;
pub mod types;

pub use resolver::Resolver;
pub use types::{FetchError, FetchResult, FormatInfo, ThumbnailInfo, VideoMetadata};

use crate::config::Config;
use fetchers::{
    oembed::OembedFetcher, watch_page::WatchPageFetcher, ytdlp::YtdlpFetcher, FetchContext,
    MetadataFetcher,
};

/// The three fetch chains the HTTP surface is built from. Each endpoint
/// variant exposes a different subset of capability, so each gets its own
/// priority order over the same fetcher implementations.
pub struct Resolvers {
    /// yt-dlp, then oEmbed, then watch page scrape.
    pub full: Resolver,
    /// oEmbed, then watch page scrape. Never shells out.
    pub basic: Resolver,
    /// yt-dlp only; the other strategies cannot produce format descriptors.
    pub formats: Resolver,
}

pub fn build_resolvers(config: &Config) -> Resolvers {
    let ctx = FetchContext::from_config(config);

    let mut full: Vec<Box<dyn MetadataFetcher>> = Vec::new();
    if config.enable_ytdlp {
        full.push(Box::new(YtdlpFetcher::new(ctx.clone())));
    }
    full.push(Box::new(OembedFetcher::new(ctx.clone())));
    full.push(Box::new(WatchPageFetcher::new(ctx.clone())));

    let basic: Vec<Box<dyn MetadataFetcher>> = vec![
        Box::new(OembedFetcher::new(ctx.clone())),
        Box::new(WatchPageFetcher::new(ctx.clone())),
    ];

    // An empty chain resolves to an upstream failure, which the handler maps
    // to a 400 so a disabled extractor never takes the process down.
    let formats: Vec<Box<dyn MetadataFetcher>> = if config.enable_ytdlp {
        vec![Box::new(YtdlpFetcher::new(ctx))]
    } else {
        Vec::new()
    };

    Resolvers {
        full: Resolver::new(full),
        basic: Resolver::new(basic),
        formats: Resolver::new(formats),
    }
}
