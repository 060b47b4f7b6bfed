use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ytinfo", about = "YouTube metadata API", version)]
pub struct Args {
    /// Directory containing config.yaml (created on first run)
    #[arg(long, default_value = ".", global = true)]
    pub config_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API daemon
    Serve {},

    /// Resolve metadata for a single video URL and print it as JSON
    Info { url: String },

    /// Extract the canonical video id from a URL
    VideoId { url: String },
}
