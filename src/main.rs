use anyhow::bail;
use clap::Parser;

mod cli;
mod config;
mod errors;
mod metadata;
#[cfg(test)]
mod tests;
mod thumbnails;
mod video_id;
mod web;

use config::Config;
use video_id::VideoId;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();
    let config = Config::load_with(&args.config_dir)?;

    match args.command {
        cli::Command::Serve {} => {
            let resolvers = metadata::build_resolvers(&config);
            web::start_daemon(web::SharedState { config, resolvers })
        }

        cli::Command::Info { url } => {
            let Some(id) = VideoId::from_url(&url) else {
                bail!("could not extract a video id from {url:?}");
            };

            let resolvers = metadata::build_resolvers(&config);
            let meta = resolvers.full.resolve(&id)?;
            println!("{}", serde_json::to_string_pretty(&meta)?);
            Ok(())
        }

        cli::Command::VideoId { url } => match VideoId::from_url(&url) {
            Some(id) => {
                println!("{id}");
                Ok(())
            }
            None => bail!("could not extract a video id from {url:?}"),
        },
    }
}
